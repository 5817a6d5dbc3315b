/// fatnode
///
/// A program to evaluate fatigue stress and life at the nodes of a
/// finite element model.
///
/// **fatnode** is a standalone program but the calculations are done
/// through calls to the associated **fatigue** library which is
/// included. The main program only deals with the command line flags
/// which build the **FatOptions** data structure, reads the job file
/// and reports the results of each sweep.
///
/// Think of the program flow as
///
/// 1. Read in the job (mesh, element results, materials and settings)
/// 2. For every requested time step, average the element stresses at the nodes
/// 3. Turn each nodal stress into a fatigue cycle and correct it for mean stress and notches
/// 4. Look up the life on the S-N curve and accumulate damage if required
/// 5. Hand each node value to the collector and keep the worst case
/// 6. Append the worst case to the result table

#[macro_use]
extern crate clap;

use fatigue::evaluator::{EvaluatorOptions, FatigueEvaluator};
use fatigue::memory::Job;
use fatigue::record::{DamageLevel, ResultRecord};
use fatigue::COMMENT;
use log::error;
use options::clap::get_options_clap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

mod list;
mod options;

fn main() {
    env_logger::init();

    let mut options = options::get_default_options();
    get_options_clap("", &mut options);
    println!("{}fatnode: version {}", COMMENT, crate_version!());
    println!("{}", COMMENT);
    if options.verbosity == options::Verbosity::Verbose {
        println!("{}Options: ", COMMENT);
        println!("{}", options);
    }

    // Check if we're just running to output data
    if options.list {
        list::print_list();
        std::process::exit(0);
    }

    if options.job.is_empty() {
        error!("Error: no job file given. Use --job FILE, or --list for the available settings.");
        std::process::exit(2)
    }

    let Job {
        mesh,
        results,
        materials,
        settings,
    } = match Job::load(Path::new(&options.job)) {
        Ok(job) => job,
        Err(why) => {
            error!("Error: could not read the job file '{}': {}", options.job, why);
            std::process::exit(1)
        }
    };

    let evaluator = FatigueEvaluator::new(
        &mesh,
        &results,
        &materials,
        settings,
        EvaluatorOptions {
            working_dir: PathBuf::from(&options.working_dir),
            result_id: options.result_id,
            parallel: options.parallel,
        },
    );

    for &step in &options.time_steps {
        let mut values: BTreeMap<usize, f64> = BTreeMap::new();
        match evaluator.evaluate(options.stress_state(), options.output(), step, &mut values) {
            Ok(worst) => {
                if options.nodes {
                    display_nodes(&values);
                }
                display_worst(step, &worst);
            }
            Err(why) => {
                error!("Error: time step {}: {}", step, why);
                std::process::exit(1)
            }
        }
    }
}

fn display_nodes(values: &BTreeMap<usize, f64>) {
    println!("{:>10} {:>15}", "node", "value");
    for (node, value) in values {
        println!("{:10} {:15.6e}", node, value);
    }
}

fn display_worst(step: usize, worst: &ResultRecord) {
    println!("{}Time step {}: worst {} {:.6e}", COMMENT, step, worst.key_name(), worst.comparison_key());
    match worst {
        ResultRecord::Uniaxial(result) => {
            for (name, value) in result.fields() {
                println!("{}{:25} {:.6e}", COMMENT, name, value);
            }
        }
        ResultRecord::Multiaxial { axes, combined } => {
            for (i, axis) in axes.iter().enumerate() {
                println!(
                    "{}Principal axis {}: alternating {:.6e} mean {:.6e}",
                    COMMENT,
                    i + 1,
                    axis.alternating,
                    axis.mean
                );
            }
            for (name, value) in combined.effective_fields() {
                println!("{}{:30} {:.6e}", COMMENT, name, value);
            }
        }
        ResultRecord::SpectrumDamage(damage) => {
            for (i, level) in damage.levels.iter().enumerate() {
                println!("{}", level_line(i + 1, level));
            }
            println!("{}Miner Sum {:.6e}", COMMENT, damage.miner_sum);
        }
    }
}

/// One spectrum level; stresses are in the stress unit of the model.
fn level_line(sigma: usize, level: &DamageLevel) -> String {
    format!(
        "{}{} sigma: fully-reversed {:.6e}, {:.6e} of {:.6e} cycles, damage {:.6e}",
        COMMENT, sigma, level.fully_reversed, level.applied_cycles, level.cycles_to_failure, level.damage
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_line_keeps_model_stress() {
        let level = DamageLevel {
            alternating: 250.0,
            mean: 0.0,
            fully_reversed: 250.0,
            cycle_percentage: 27.1,
            applied_cycles: 1000.0,
            cycles_to_failure: 4000.0,
            damage: 0.25,
        };
        assert_eq!(
            level_line(2, &level),
            "#  2 sigma: fully-reversed 2.500000e2, 1.000000e3 of 4.000000e3 cycles, damage 2.500000e-1"
        );
    }
}
