//! Stress-life (S-N) curves with log-log interpolation.

use crate::error::{FatigueError, Result};
use crate::material::SnTable;
use log::debug;

/// Knock-down factors applied to raw S-N data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveFactors {
    /// Multiplies the stresses.
    pub scatter_stress: f64,
    /// Divides the cycles.
    pub scatter_life: f64,
    /// Multiplies the stresses.
    pub temperature: f64,
    /// Multiplies the stresses.
    pub misc: f64,
}

impl Default for CurveFactors {
    fn default() -> Self {
        Self {
            scatter_stress: 1.0,
            scatter_life: 1.0,
            temperature: 1.0,
            misc: 1.0,
        }
    }
}

/// Fully-reversed S-N curve, stresses in descending order.
#[derive(Debug, Clone, PartialEq)]
pub struct SnCurve {
    stress: Vec<f64>,
    cycles: Vec<f64>,
}

impl SnCurve {
    /// Build a curve directly from fully-reversed data.
    pub fn new(stress: Vec<f64>, cycles: Vec<f64>) -> Result<SnCurve> {
        if stress.len() != cycles.len() {
            return Err(FatigueError::Material(format!(
                "S-N curve has {} stress values but {} cycle values",
                stress.len(),
                cycles.len()
            )));
        }
        if stress.len() < 2 {
            return Err(FatigueError::Material(
                "S-N curve needs at least two fully-reversed data points".to_string(),
            ));
        }
        if stress.iter().chain(cycles.iter()).any(|v| !(v.is_finite() && *v > 0.0)) {
            return Err(FatigueError::Material(
                "S-N curve values must be positive numbers".to_string(),
            ));
        }
        Ok(SnCurve { stress, cycles })
    }

    /// Build a curve from a material table keeping only the zero mean
    /// stress (R = -1) rows and applying the knock-down factors.
    pub fn from_table(table: &SnTable, factors: &CurveFactors) -> Result<SnCurve> {
        let (stress, cycles) = table.fully_reversed_rows()?;
        debug!("S-N curve with {} fully-reversed rows", stress.len());

        let stress_factor = factors.scatter_stress * factors.temperature * factors.misc;
        let stress = stress.iter().map(|s| s * stress_factor).collect();
        let cycles = cycles.iter().map(|n| n / factors.scatter_life).collect();
        SnCurve::new(stress, cycles)
    }

    pub fn stress(&self) -> &[f64] {
        &self.stress
    }

    pub fn cycles(&self) -> &[f64] {
        &self.cycles
    }

    fn stress_range(&self) -> (f64, f64) {
        min_max(&self.stress)
    }

    fn cycles_range(&self) -> (f64, f64) {
        min_max(&self.cycles)
    }

    /// Life at a fully-reversed stress, clamped to the ends of the curve.
    pub fn cycles_to_failure(&self, stress: f64) -> f64 {
        let (s_min, s_max) = self.stress_range();
        let (n_min, n_max) = self.cycles_range();

        if stress >= s_max {
            return n_min;
        }
        if stress <= s_min {
            return n_max;
        }

        let i = self
            .stress
            .iter()
            .rposition(|&s| s > stress)
            .unwrap_or(0)
            .min(self.stress.len() - 2);
        let m = self.log_slope(i);
        self.cycles[i] * (stress / self.stress[i]).powf(1.0 / m)
    }

    /// Fully-reversed stress that gives a life of `cycles`, clamped to the
    /// ends of the curve.
    pub fn allowable_stress(&self, cycles: f64) -> f64 {
        let (s_min, s_max) = self.stress_range();
        let (n_min, n_max) = self.cycles_range();

        if cycles >= n_max {
            return s_min;
        }
        if cycles <= n_min {
            return s_max;
        }

        let i = self
            .cycles
            .iter()
            .rposition(|&n| n < cycles)
            .unwrap_or(0)
            .min(self.cycles.len() - 2);
        let m = self.log_slope(i);
        self.stress[i] * (cycles / self.cycles[i]).powf(m)
    }

    // slope of log S against log N between point i and i + 1
    fn log_slope(&self, i: usize) -> f64 {
        (self.stress[i + 1] / self.stress[i]).log10() / (self.cycles[i + 1] / self.cycles[i]).log10()
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> SnCurve {
        SnCurve::new(vec![500.0, 300.0, 200.0], vec![1e3, 1e5, 1e7]).unwrap()
    }

    #[test]
    fn interpolates_log_log() {
        let c = curve();
        let m = (300.0f64 / 500.0).log10() / (1e5f64 / 1e3).log10();
        let expected = 1e3 * (400.0f64 / 500.0).powf(1.0 / m);
        let n = c.cycles_to_failure(400.0);
        assert!((n - expected).abs() / expected < 1e-12);
        assert!(n > 1e3 && n < 1e5);
    }

    #[test]
    fn data_points_are_reproduced() {
        let c = curve();
        assert!((c.cycles_to_failure(300.0) / 1e5 - 1.0).abs() < 1e-9);
        assert!((c.allowable_stress(1e5) / 300.0 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn clamps_outside_the_data() {
        let c = curve();
        for s in [500.0, 650.0, 1e9].iter() {
            assert_eq!(c.cycles_to_failure(*s), 1e3);
        }
        for s in [200.0, 150.0, 0.0, -40.0].iter() {
            assert_eq!(c.cycles_to_failure(*s), 1e7);
        }
        assert_eq!(c.allowable_stress(1e8), 200.0);
        assert_eq!(c.allowable_stress(10.0), 500.0);
    }

    #[test]
    fn allowable_stress_inverts_cycles_to_failure() {
        let c = curve();
        for s in [210.0, 250.0, 299.0, 301.0, 420.0, 499.0].iter() {
            let back = c.allowable_stress(c.cycles_to_failure(*s));
            assert!((back - s).abs() < 1e-9 * s, "{} came back as {}", s, back);
        }
    }

    #[test]
    fn factors_scale_the_curve() {
        let table = SnTable {
            alternating_stress: Some(vec![500.0, 300.0, 200.0]),
            cycles: Some(vec![1e3, 1e5, 1e7]),
            r_ratio: Some(vec![-1.0, -1.0, -1.0]),
            mean_stress: None,
        };
        let factors = CurveFactors {
            scatter_stress: 0.5,
            scatter_life: 10.0,
            temperature: 0.8,
            misc: 1.0,
        };
        let c = SnCurve::from_table(&table, &factors).unwrap();
        assert_eq!(c.stress(), &[200.0, 120.0, 80.0]);
        assert_eq!(c.cycles(), &[1e2, 1e4, 1e6]);
    }

    #[test]
    fn needs_two_points() {
        assert!(SnCurve::new(vec![100.0], vec![1e6]).is_err());
        assert!(SnCurve::new(vec![100.0, 50.0], vec![1e6]).is_err());
        assert!(SnCurve::new(vec![100.0, 0.0], vec![1e3, 1e6]).is_err());
    }
}
