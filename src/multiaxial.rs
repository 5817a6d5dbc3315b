//! Multiaxial stress combination.
//!
//! Each principal axis is cycled on its own between the evaluated
//! principal stress and a minimum set by the load history. The three
//! axis cycles are then collapsed into one equivalent stress by one of
//! the equivalent stress theories.

use log::debug;

use crate::context::Settings;
use crate::error::{FatigueError, Result};
use crate::mean_stress::{fully_reversed_stress, AltMean, LoadHistory, MeanStressTheory};
use crate::numbers::{stdev, NonNan};
use crate::tensor::von_mises;

/// Equivalent stress theories for multiaxial cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiaxialTheory {
    Sines,
    HydrostaticMean,
    SignedVonMisesMean,
}

impl MultiaxialTheory {
    pub const ALL: [MultiaxialTheory; 3] = [
        MultiaxialTheory::Sines,
        MultiaxialTheory::HydrostaticMean,
        MultiaxialTheory::SignedVonMisesMean,
    ];

    pub fn text(&self) -> &'static str {
        match *self {
            MultiaxialTheory::Sines => "Equivalent Stress (Sines)",
            MultiaxialTheory::HydrostaticMean => "Equivalent Stress (Hydrostatic Mean)",
            MultiaxialTheory::SignedVonMisesMean => "Equivalent Stress (Signed Von-Mises Mean)",
        }
    }

    pub fn from_text(input: &str) -> Option<MultiaxialTheory> {
        MultiaxialTheory::ALL.iter().copied().find(|t| t.text() == input)
    }
}

/// All assignments of prestress axes to evaluated axes, tried in this order.
pub const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// Pair the prestress principal axes with the evaluated ones.
///
/// The evaluated state is assumed to be close to a scaled copy of the
/// prestress state, so the assignment whose ratios
/// `eval[i] / prestress[perm[i]]` spread least is chosen. Ratios that
/// are not finite (a zero prestress axis) are left out of the spread and
/// an assignment needs at least two finite ratios to be scored. The
/// first permutation wins ties and the identity is used when no
/// assignment can be scored.
pub fn match_prestress_axes(eval: &[f64; 3], prestress: &[f64; 3]) -> [usize; 3] {
    PERMUTATIONS
        .iter()
        .filter_map(|perm| {
            let ratios: Vec<f64> = (0..3)
                .map(|i| eval[i] / prestress[perm[i]])
                .filter(|ratio| ratio.is_finite())
                .collect();
            if ratios.len() < 2 {
                return None;
            }
            NonNan::new(stdev(&ratios)).map(|spread| (*perm, spread))
        })
        .min_by_key(|&(_perm, spread)| spread)
        .map(|(perm, _)| perm)
        .unwrap_or(PERMUTATIONS[0])
}

/// Alternating and mean stress along each principal axis.
///
/// `prestress` holds the reference for each evaluated axis, already
/// matched. The amplitude keeps its sign so that axes cycling in
/// opposite directions combine correctly.
pub fn axis_stresses(eval: &[f64; 3], prestress: &[f64; 3], load_history: LoadHistory) -> [AltMean; 3] {
    let mut axes = [AltMean::default(); 3];
    for (i, axis) in axes.iter_mut().enumerate() {
        let max_stress = eval[i];
        let min_stress = load_history.min_stress(max_stress, prestress[i]);
        *axis = AltMean {
            alternating: (max_stress - min_stress) / 2.0,
            mean: (max_stress + min_stress) / 2.0,
        };
    }
    axes
}

/// A selected multiaxial theory with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Combination {
    Sines { constant: f64 },
    HydrostaticMean(MeanStressTheory),
    SignedVonMisesMean(MeanStressTheory),
}

impl Combination {
    pub fn from_settings(settings: &Settings) -> Result<Combination> {
        let theory = settings
            .multiaxial_theory
            .ok_or_else(|| FatigueError::Config("no multiaxial stress theory selected".to_string()))?;
        Ok(match theory {
            MultiaxialTheory::Sines => Combination::Sines {
                constant: settings
                    .sines_constant
                    .ok_or_else(|| FatigueError::Config("the Sines theory needs a Sines constant".to_string()))?,
            },
            MultiaxialTheory::HydrostaticMean => Combination::HydrostaticMean(settings.mean_stress_theory()?),
            MultiaxialTheory::SignedVonMisesMean => Combination::SignedVonMisesMean(settings.mean_stress_theory()?),
        })
    }
}

/// Equivalent stresses of a multiaxial cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Equivalent {
    pub alternating: f64,
    pub mean: f64,
    pub fully_reversed: f64,
}

/// Collapse the three axis cycles into one equivalent cycle.
pub fn combine(combination: Combination, axes: &[AltMean; 3], ftu: f64) -> Equivalent {
    let alternating = von_mises(axes[0].alternating, axes[1].alternating, axes[2].alternating);
    let hydrostatic = axes.iter().map(|a| a.mean).sum::<f64>();

    let equivalent = match combination {
        Combination::Sines { constant } => Equivalent {
            alternating,
            mean: hydrostatic,
            fully_reversed: alternating + constant * hydrostatic,
        },
        Combination::HydrostaticMean(theory) => Equivalent {
            alternating,
            mean: hydrostatic,
            fully_reversed: fully_reversed_stress(theory, alternating, hydrostatic, ftu),
        },
        Combination::SignedVonMisesMean(theory) => {
            let mean = von_mises(axes[0].mean, axes[1].mean, axes[2].mean);
            Equivalent {
                alternating,
                mean,
                fully_reversed: fully_reversed_stress(theory, alternating, mean, ftu),
            }
        }
    };
    debug!("{:?} -> {:?}", combination, equivalent);
    equivalent
}
