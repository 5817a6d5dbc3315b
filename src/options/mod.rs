/// These are the data structures for command line options as well as
/// the initial default values.

use fatigue::context::{Output, StressState};
use fatigue::COMMENT;

pub mod clap;

arg_enum! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum OutputKind {
        Stress,
        Life,
    }
}

arg_enum! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum StateKind {
        Uniaxial,
        Multiaxial,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verbosity {
    Verbose,
    Terse,
}

/// Option data for running an evaluation.
#[derive(Debug, Clone)]
pub struct FatOptions {
    /// Job file with the mesh, results and analysis settings.
    pub job: String,
    /// Result sets to evaluate, one sweep each.
    pub time_steps: Vec<usize>,
    /// Number used in the result table file names.
    pub result_id: usize,
    /// Directory the result tables are written to.
    pub working_dir: String,
    pub output: OutputKind,
    pub stress_state: StateKind,
    /// Evaluate nodes in parallel.
    pub parallel: bool,
    /// Print the per-node values.
    pub nodes: bool,
    pub list: bool,
    pub verbosity: Verbosity,
}

impl FatOptions {
    pub fn output(&self) -> Output {
        match self.output {
            OutputKind::Stress => Output::Stress,
            OutputKind::Life => Output::Life,
        }
    }

    pub fn stress_state(&self) -> StressState {
        match self.stress_state {
            StateKind::Uniaxial => StressState::Uniaxial,
            StateKind::Multiaxial => StressState::Multiaxial,
        }
    }
}

impl std::fmt::Display for FatOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let _e = writeln!(f, "{}job: {:?}", COMMENT, self.job);
        let _e = writeln!(f, "{}time_steps: {:?}", COMMENT, self.time_steps);
        let _e = writeln!(f, "{}result_id: {:?}", COMMENT, self.result_id);
        let _e = writeln!(f, "{}working_dir: {:?}", COMMENT, self.working_dir);
        let _e = writeln!(f, "{}output: {:?}", COMMENT, self.output);
        let _e = writeln!(f, "{}stress_state: {:?}", COMMENT, self.stress_state);
        let _e = writeln!(f, "{}nodes: {:?}", COMMENT, self.nodes);
        write!(f, "{}parallel: {:?}", COMMENT, self.parallel)
    }
}

pub fn get_default_options() -> FatOptions {
    FatOptions {
        job: "".to_string(),
        time_steps: vec![1],
        result_id: 1,
        working_dir: ".".to_string(),
        output: OutputKind::Stress,
        stress_state: StateKind::Uniaxial,
        parallel: false,
        nodes: false,
        list: false,
        verbosity: Verbosity::Terse,
    }
}
