use crate::options::{FatOptions, OutputKind, StateKind, Verbosity};
use clap::{App, Arg};
use log::error;

/// Get the options from the command line.
pub fn get_options_clap(line: &str, options: &mut FatOptions) {
    let process = App::new("fatnode: nodal fatigue evaluation of finite element results")
        .version(crate_version!())
        .about(include_str!("../description.md"))

        .arg(Arg::with_name("job")
             .short("j")
             .long("job")
             .value_name("FILE")
             .help("read the mesh, stress results and analysis settings from a JSON job file")
             .takes_value(true))

        .arg(Arg::with_name("time_steps")
             .short("t")
             .long("time_steps")
             .value_name("T1,T2,...")
             .help("result sets to evaluate, one sweep each (default 1)")
             .takes_value(true)
             .require_delimiter(true))

        .arg(Arg::with_name("output")
             .short("o")
             .long("output")
             .value_name("NAME")
             .possible_values(&OutputKind::variants())
             .case_insensitive(true)
             .help("evaluate a stress or a life result (default stress)")
             .takes_value(true))

        .arg(Arg::with_name("stress_state")
             .short("s")
             .long("stress_state")
             .value_name("NAME")
             .possible_values(&StateKind::variants())
             .case_insensitive(true)
             .help("evaluate the uniaxial stress component or the multiaxial stress state (default uniaxial)")
             .takes_value(true))

        .arg(Arg::with_name("result_id")
             .long("result_id")
             .value_name("ID")
             .help("number used in the names of the result tables (default 1)")
             .takes_value(true))

        .arg(Arg::with_name("working_dir")
             .short("w")
             .long("working_dir")
             .value_name("DIR")
             .help("directory the worst case result tables are written to (default .)")
             .takes_value(true))

        .arg(Arg::with_name("parallel")
             .long("parallel")
             .help("evaluate the nodes in parallel"))

        .arg(Arg::with_name("nodes")
             .long("nodes")
             .help("print the value of every evaluated node"))

        .arg(Arg::with_name("list")
             .long("list")
             .help("list the available theories, correlations and materials"))

        .arg(Arg::with_name("verbose")
             .short("v")
             .long("verbose")
             .help("print the options used"));

    // turn the commands into matches
    let matches = if line.is_empty() {
        // this will get them directly from the command line
        process.get_matches()
    } else {
        // get them from the string
        // add command word since it skips first argument
        process.get_matches_from(("fatnode ".to_string() + line.trim()).split(' '))
    };

    if let Some(file) = matches.value_of("job") {
        options.job = file.to_string();
    }
    if matches.is_present("time_steps") {
        match values_t!(matches, "time_steps", usize) {
            Ok(steps) => options.time_steps = steps,
            Err(why) => {
                error!("Error: time steps must be result set numbers: {}", why);
                std::process::exit(2);
            }
        }
    }
    if let Ok(output) = value_t!(matches.value_of("output"), OutputKind) {
        options.output = output;
    }
    if let Ok(state) = value_t!(matches.value_of("stress_state"), StateKind) {
        options.stress_state = state;
    }
    if matches.is_present("result_id") {
        options.result_id = value_t!(matches, "result_id", usize).unwrap_or_else(|e| e.exit());
    }
    if let Some(dir) = matches.value_of("working_dir") {
        options.working_dir = dir.to_string();
    }
    if matches.is_present("parallel") {
        options.parallel = true;
    }
    if matches.is_present("nodes") {
        options.nodes = true;
    }
    if matches.is_present("list") {
        options.list = true;
    }
    if matches.is_present("verbose") {
        options.verbosity = Verbosity::Verbose;
        println!("Matches: {:?}", matches);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::get_default_options;

    #[test]
    fn reads_a_command_line() {
        let mut options = get_default_options();
        get_options_clap(
            "--job beam.json -t 1,3,5 -o life --stress_state Multiaxial --result_id 7 --parallel",
            &mut options,
        );
        assert_eq!(options.job, "beam.json");
        assert_eq!(options.time_steps, vec![1, 3, 5]);
        assert_eq!(options.output, OutputKind::Life);
        assert_eq!(options.stress_state, StateKind::Multiaxial);
        assert_eq!(options.result_id, 7);
        assert!(options.parallel);
        assert!(!options.list);
    }

    #[test]
    fn defaults_are_kept() {
        let mut options = get_default_options();
        get_options_clap("--list", &mut options);
        assert!(options.list);
        assert_eq!(options.time_steps, vec![1]);
        assert_eq!(options.output, OutputKind::Stress);
        assert_eq!(options.working_dir, ".");
    }
}
