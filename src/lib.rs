//! fatigue
//! A library for nodal fatigue evaluation of finite element stress results

pub static COMMENT: &str = "#  ";

#[macro_use]
extern crate lazy_static;

pub mod averaging;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod material;
pub mod mean_stress;
pub mod memory;
pub mod model;
pub mod multiaxial;
pub mod notch;
pub mod numbers;
pub mod record;
pub mod sn;
pub mod tensor;
pub mod topology;
pub mod tracker;
pub mod units;
