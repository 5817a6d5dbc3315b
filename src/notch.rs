//! Notch corrections.
//!
//! Stresses from the finite element model already contain the full
//! theoretical stress concentration Kt. Fatigue sees the smaller
//! effective factor Kf = 1 + q (Kt - 1), so the alternating stress is
//! scaled by Kf/Kt and the mean stress is taken back to its nominal
//! value by dividing by Kt.
//!
//! All empirical correlations take the ultimate strength in ksi and the
//! notch radius in inches.

use crate::mean_stress::AltMean;

/// Characteristic length constant for the Peterson notch sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotchCorrelation {
    SteelPeterson,
    AluminumPeterson,
}

impl NotchCorrelation {
    pub const ALL: [NotchCorrelation; 2] = [NotchCorrelation::SteelPeterson, NotchCorrelation::AluminumPeterson];

    pub fn text(&self) -> &'static str {
        match *self {
            NotchCorrelation::SteelPeterson => "Steel (Peterson)",
            NotchCorrelation::AluminumPeterson => "Aluminum (Peterson)",
        }
    }

    pub fn from_text(input: &str) -> Option<NotchCorrelation> {
        NotchCorrelation::ALL.iter().copied().find(|c| c.text() == input)
    }

    /// Peterson's material constant `a` (in).
    pub fn characteristic_length(&self, ftu_ksi: f64) -> f64 {
        match *self {
            NotchCorrelation::SteelPeterson => {
                -2.58e-9 * ftu_ksi.powi(3) + 1.62e-6 * ftu_ksi.powi(2) - 3.55e-4 * ftu_ksi + 2.89e-2
            }
            NotchCorrelation::AluminumPeterson => 0.02,
        }
    }
}

/// Reduction of notch sensitivity at short lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleSensitivity {
    None,
    SteelJuvinall,
    AluminumJuvinall,
}

impl CycleSensitivity {
    pub const ALL: [CycleSensitivity; 3] = [
        CycleSensitivity::None,
        CycleSensitivity::SteelJuvinall,
        CycleSensitivity::AluminumJuvinall,
    ];

    pub fn text(&self) -> &'static str {
        match *self {
            CycleSensitivity::None => "None",
            CycleSensitivity::SteelJuvinall => "Steel (Juvinall)",
            CycleSensitivity::AluminumJuvinall => "Aluminum (Juvinall)",
        }
    }

    pub fn from_text(input: &str) -> Option<CycleSensitivity> {
        CycleSensitivity::ALL.iter().copied().find(|c| c.text() == input)
    }

    /// Sensitivity factor at 1e3 cycles, `None` when not correlated.
    pub fn juvinall_factor(&self, ftu_ksi: f64) -> Option<f64> {
        match *self {
            CycleSensitivity::None => None,
            CycleSensitivity::SteelJuvinall => Some(-5.08e-6 * ftu_ksi.powi(2) + 4.65e-3 * ftu_ksi - 0.212),
            CycleSensitivity::AluminumJuvinall => Some(-4.57e-5 * ftu_ksi.powi(2) + 1.4e-2 * ftu_ksi - 0.212),
        }
    }
}

const LOW_CYCLE_LIMIT: f64 = 1e3;
const HIGH_CYCLE_LIMIT: f64 = 1e6;

/// Notch sensitivity q for a notch of radius `radius_in` (in).
pub fn notch_sensitivity(correlation: NotchCorrelation, ftu_ksi: f64, radius_in: f64) -> f64 {
    1.0 / (1.0 + correlation.characteristic_length(ftu_ksi) / radius_in)
}

/// Cycle sensitivity factor q' for a life of `cycles`.
///
/// Full sensitivity from 1e6 cycles up, the Juvinall factor at 1e3
/// cycles and below, log-log interpolated in between.
pub fn cycle_sensitivity(correlation: CycleSensitivity, ftu_ksi: f64, cycles: f64) -> f64 {
    let factor = match correlation.juvinall_factor(ftu_ksi) {
        Some(factor) => factor,
        None => return 1.0,
    };

    if cycles >= HIGH_CYCLE_LIMIT {
        1.0
    } else if cycles <= LOW_CYCLE_LIMIT {
        factor
    } else {
        let m = (1.0 / factor).log10() / (HIGH_CYCLE_LIMIT / LOW_CYCLE_LIMIT).log10();
        factor * (cycles / LOW_CYCLE_LIMIT).powf(m)
    }
}

/// Effective fatigue notch factor.
pub fn fatigue_notch_factor(q: f64, kt: f64) -> f64 {
    1.0 + q * (kt - 1.0)
}

/// Replace the theoretical concentration in a stress pair with the fatigue one.
pub fn apply_notch(stress: AltMean, q: f64, kt: f64) -> AltMean {
    let kf = fatigue_notch_factor(q, kt);
    AltMean {
        alternating: stress.alternating * kf / kt,
        mean: stress.mean / kt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sharp_notches_are_less_sensitive() {
        let blunt = notch_sensitivity(NotchCorrelation::AluminumPeterson, 60.0, 0.5);
        let sharp = notch_sensitivity(NotchCorrelation::AluminumPeterson, 60.0, 0.01);
        assert!((blunt - 1.0 / 1.04).abs() < 1e-12);
        assert!((sharp - 1.0 / 3.0).abs() < 1e-12);
        assert!(sharp < blunt);
    }

    #[test]
    fn peterson_steel_constant() {
        // 100 ksi steel
        let a = NotchCorrelation::SteelPeterson.characteristic_length(100.0);
        let expected = -2.58e-3 + 1.62e-2 - 3.55e-2 + 2.89e-2;
        assert!((a - expected).abs() < 1e-12);
    }

    #[test]
    fn cycle_sensitivity_limits() {
        let j = CycleSensitivity::SteelJuvinall.juvinall_factor(100.0).unwrap();
        assert_eq!(cycle_sensitivity(CycleSensitivity::SteelJuvinall, 100.0, 2e6), 1.0);
        assert_eq!(cycle_sensitivity(CycleSensitivity::SteelJuvinall, 100.0, 500.0), j);
        assert_eq!(cycle_sensitivity(CycleSensitivity::None, 100.0, 500.0), 1.0);
    }

    #[test]
    fn cycle_sensitivity_is_continuous_at_the_limits() {
        let ftu = 80.0;
        let j = CycleSensitivity::AluminumJuvinall.juvinall_factor(ftu).unwrap();
        let just_above = cycle_sensitivity(CycleSensitivity::AluminumJuvinall, ftu, 1e3 * (1.0 + 1e-9));
        let just_below = cycle_sensitivity(CycleSensitivity::AluminumJuvinall, ftu, 1e6 * (1.0 - 1e-9));
        assert!((just_above - j).abs() < 1e-6);
        assert!((just_below - 1.0).abs() < 1e-6);

        // halfway in log cycles is the geometric mean
        let mid = cycle_sensitivity(CycleSensitivity::AluminumJuvinall, ftu, 10f64.powf(4.5));
        assert!((mid - j.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn notch_correction() {
        let nominal = AltMean { alternating: 300.0, mean: 150.0 };
        let corrected = apply_notch(nominal, 0.5, 3.0);
        // Kf = 2
        assert!((corrected.alternating - 200.0).abs() < 1e-12);
        assert!((corrected.mean - 50.0).abs() < 1e-12);

        // fully sensitive notch leaves the amplitude alone
        let full = apply_notch(nominal, 1.0, 3.0);
        assert!((full.alternating - 300.0).abs() < 1e-12);
    }
}
