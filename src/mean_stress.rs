//! Uniaxial mean stress correction.
//!
//! A stress cycle is described by its maximum (the evaluated stress)
//! and a minimum that follows from the load history and any prestress.
//! The (alternating, mean) pair is then collapsed into a single
//! fully-reversed stress that can be looked up on an R = -1 S-N curve.

/// How the load moves between its extremes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadHistory {
    /// Load swings to the mirror image of the maximum about the prestress.
    FullyReversed,
    /// Load returns to the prestress.
    HalfReversed,
}

impl LoadHistory {
    pub fn text(&self) -> &'static str {
        match *self {
            LoadHistory::FullyReversed => "Fully-Reversed",
            LoadHistory::HalfReversed => "Half-Reversed",
        }
    }

    pub fn from_text(input: &str) -> Option<LoadHistory> {
        match input {
            "Fully-Reversed" => Some(LoadHistory::FullyReversed),
            "Half-Reversed" => Some(LoadHistory::HalfReversed),
            _ => None,
        }
    }

    /// Minimum stress of the cycle for the given maximum.
    pub fn min_stress(&self, max_stress: f64, prestress: f64) -> f64 {
        match *self {
            LoadHistory::FullyReversed => 2.0 * prestress - max_stress,
            LoadHistory::HalfReversed => prestress,
        }
    }
}

/// Theories that convert an (alternating, mean) pair into a fully-reversed stress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeanStressTheory {
    SmithWatsonTopper,
    ModifiedGoodman,
    ModifiedGoodmanExtrapolated,
    Gerber,
}

impl MeanStressTheory {
    pub const ALL: [MeanStressTheory; 4] = [
        MeanStressTheory::SmithWatsonTopper,
        MeanStressTheory::ModifiedGoodman,
        MeanStressTheory::ModifiedGoodmanExtrapolated,
        MeanStressTheory::Gerber,
    ];

    pub fn text(&self) -> &'static str {
        match *self {
            MeanStressTheory::SmithWatsonTopper => "Smith-Watson-Topper",
            MeanStressTheory::ModifiedGoodman => "Modified Goodman",
            MeanStressTheory::ModifiedGoodmanExtrapolated => "Modified Goodman (Extrapolated)",
            MeanStressTheory::Gerber => "Gerber",
        }
    }

    pub fn from_text(input: &str) -> Option<MeanStressTheory> {
        MeanStressTheory::ALL.iter().copied().find(|t| t.text() == input)
    }
}

/// Alternating and mean stress of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AltMean {
    pub alternating: f64,
    pub mean: f64,
}

/// Alternating and mean stress for a cycle peaking at `max_stress`.
///
/// `prestress` is the reference the load is reversed about, zero when
/// there is no prestress.
pub fn alt_mean_stress(max_stress: f64, prestress: f64, load_history: LoadHistory) -> AltMean {
    let min_stress = load_history.min_stress(max_stress, prestress);
    AltMean {
        alternating: (max_stress - min_stress).abs() / 2.0,
        mean: (max_stress + min_stress) / 2.0,
    }
}

/// Equivalent fully-reversed stress for an alternating and mean stress.
///
/// `ftu` is the ultimate tensile strength in the same units as the stresses.
pub fn fully_reversed_stress(theory: MeanStressTheory, alternating: f64, mean: f64, ftu: f64) -> f64 {
    match theory {
        MeanStressTheory::SmithWatsonTopper => {
            let product = alternating * (mean + alternating);
            if product > 0.0 {
                product.sqrt()
            } else {
                0.0
            }
        }
        MeanStressTheory::ModifiedGoodman => {
            if mean > 0.0 {
                alternating / (1.0 - mean / ftu)
            } else {
                alternating
            }
        }
        MeanStressTheory::ModifiedGoodmanExtrapolated => alternating / (1.0 - mean / ftu),
        MeanStressTheory::Gerber => alternating / (1.0 - (mean / ftu).powi(2)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_reversed_without_prestress() {
        let am = alt_mean_stress(80.0, 0.0, LoadHistory::FullyReversed);
        assert_eq!(LoadHistory::FullyReversed.min_stress(80.0, 0.0), -80.0);
        assert_eq!(am.alternating, 80.0);
        assert_eq!(am.mean, 0.0);
        let sfr = fully_reversed_stress(MeanStressTheory::ModifiedGoodman, am.alternating, am.mean, 500.0);
        assert_eq!(sfr, 80.0);
    }

    #[test]
    fn fully_reversed_about_prestress() {
        // swings between 120 and 2 * 50 - 120 = -20
        let am = alt_mean_stress(120.0, 50.0, LoadHistory::FullyReversed);
        assert_eq!(am.alternating, 70.0);
        assert_eq!(am.mean, 50.0);
    }

    #[test]
    fn half_reversed_returns_to_prestress() {
        let am = alt_mean_stress(100.0, 0.0, LoadHistory::HalfReversed);
        assert_eq!(am.alternating, 50.0);
        assert_eq!(am.mean, 50.0);

        // a compressive peak still gives a positive amplitude
        let am = alt_mean_stress(-60.0, 20.0, LoadHistory::HalfReversed);
        assert_eq!(am.alternating, 40.0);
        assert_eq!(am.mean, -20.0);
    }

    #[test]
    fn smith_watson_topper() {
        let sfr = fully_reversed_stress(MeanStressTheory::SmithWatsonTopper, 50.0, 50.0, 400.0);
        assert!((sfr - 5000.0f64.sqrt()).abs() < 1e-12);
        assert_eq!(fully_reversed_stress(MeanStressTheory::SmithWatsonTopper, 50.0, -60.0, 400.0), 0.0);
    }

    #[test]
    fn goodman_ignores_compressive_mean() {
        assert_eq!(fully_reversed_stress(MeanStressTheory::ModifiedGoodman, 50.0, -100.0, 400.0), 50.0);
        let sfr = fully_reversed_stress(MeanStressTheory::ModifiedGoodman, 50.0, 100.0, 400.0);
        assert!((sfr - 50.0 / 0.75).abs() < 1e-12);
    }

    #[test]
    fn extrapolated_goodman_credits_compressive_mean() {
        let sfr = fully_reversed_stress(MeanStressTheory::ModifiedGoodmanExtrapolated, 50.0, -100.0, 400.0);
        assert!((sfr - 50.0 / 1.25).abs() < 1e-12);
    }

    #[test]
    fn gerber_is_symmetric_in_mean() {
        let t = fully_reversed_stress(MeanStressTheory::Gerber, 50.0, 200.0, 400.0);
        let c = fully_reversed_stress(MeanStressTheory::Gerber, 50.0, -200.0, 400.0);
        assert!((t - 50.0 / 0.75).abs() < 1e-12);
        assert_eq!(t, c);
    }

    #[test]
    fn theory_names_round_trip() {
        for t in MeanStressTheory::ALL.iter() {
            assert_eq!(MeanStressTheory::from_text(t.text()), Some(*t));
        }
        assert_eq!(MeanStressTheory::from_text("Soderberg"), None);
    }
}
