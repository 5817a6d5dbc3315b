//! Principal stresses and scalar stress measures of a symmetric stress tensor.

use crate::error::{FatigueError, Result};
use std::cmp::Ordering;
use std::f64::consts::PI;

/// Off-diagonal magnitude below which a tensor is treated as already
/// being in its principal axes.
const SHEAR_TOLERANCE: f64 = 1e-4;

/// Symmetric stress tensor.
///
/// Components are ordered as: [σ_xx, σ_yy, σ_zz, τ_xy, τ_yz, τ_xz]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StressTensor(pub [f64; 6]);

impl StressTensor {
    pub fn new(components: [f64; 6]) -> Self {
        Self(components)
    }

    pub fn zero() -> Self {
        Self([0.0; 6])
    }

    pub fn xx(&self) -> f64 {
        self.0[0]
    }
    pub fn yy(&self) -> f64 {
        self.0[1]
    }
    pub fn zz(&self) -> f64 {
        self.0[2]
    }
    pub fn xy(&self) -> f64 {
        self.0[3]
    }
    pub fn yz(&self) -> f64 {
        self.0[4]
    }
    pub fn xz(&self) -> f64 {
        self.0[5]
    }
}

/// Scalar stress measure taken from the principal stresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StressComponent {
    SignedVonMises,
    MaximumPrincipal,
    MiddlePrincipal,
    MinimumPrincipal,
}

impl StressComponent {
    pub const ALL: [StressComponent; 4] = [
        StressComponent::SignedVonMises,
        StressComponent::MaximumPrincipal,
        StressComponent::MiddlePrincipal,
        StressComponent::MinimumPrincipal,
    ];

    pub fn text(&self) -> &'static str {
        match *self {
            StressComponent::SignedVonMises => "Von-Mises Stress (Signed)",
            StressComponent::MaximumPrincipal => "Maximum Principal Stress",
            StressComponent::MiddlePrincipal => "Middle Principal Stress",
            StressComponent::MinimumPrincipal => "Minimum Principal Stress",
        }
    }

    pub fn from_text(input: &str) -> Option<StressComponent> {
        StressComponent::ALL.iter().copied().find(|c| c.text() == input)
    }
}

/// Eigenvalues of the tensor sorted from largest to smallest.
///
/// Uses the trigonometric solution of the characteristic cubic. Round
/// off in nearly hydrostatic states can push the cosine argument
/// slightly outside [-1, 1], so both it and -Q^3 are clamped.
pub fn principal_stresses(tensor: &StressTensor) -> Result<[f64; 3]> {
    if tensor.0.iter().any(|s| !s.is_finite()) {
        return Err(FatigueError::Numerical(format!(
            "stress tensor contains a non-finite component: {:?}",
            tensor.0
        )));
    }

    let (a, b, c) = (tensor.xx(), tensor.yy(), tensor.zz());
    let (d, e, f) = (tensor.xy(), tensor.xz(), tensor.yz());

    let sheared = [d, e, f].iter().any(|s| s.abs() > SHEAR_TOLERANCE);
    let mut eigs = if sheared {
        let inv_a = -(a + b + c);
        let inv_b = a * b + a * c + b * c - d * d - e * e - f * f;
        let inv_c = d * d * c + f * f * a + e * e * b - 2.0 * d * e * f - a * b * c;
        let q = (3.0 * inv_b - inv_a.powi(2)) / 9.0;
        let r = (9.0 * inv_a * inv_b - 27.0 * inv_c - 2.0 * inv_a.powi(3)) / 54.0;

        let minus_q = (-q).max(0.0);
        if minus_q == 0.0 {
            [-inv_a / 3.0; 3]
        } else {
            let phi = (r / minus_q.powi(3).sqrt()).max(-1.0).min(1.0).acos();
            let radius = 2.0 * minus_q.sqrt();
            [
                radius * (phi / 3.0).cos() - inv_a / 3.0,
                radius * (phi / 3.0 + 2.0 * PI / 3.0).cos() - inv_a / 3.0,
                radius * (phi / 3.0 + 4.0 * PI / 3.0).cos() - inv_a / 3.0,
            ]
        }
    } else {
        [a, b, c]
    };

    eigs.sort_by(|x, y| y.partial_cmp(x).unwrap_or(Ordering::Equal));
    Ok(eigs)
}

/// Von Mises equivalent of three principal values.
pub fn von_mises(s1: f64, s2: f64, s3: f64) -> f64 {
    (((s1 - s2).powi(2) + (s1 - s3).powi(2) + (s2 - s3).powi(2)) / 2.0).sqrt()
}

/// Pick the requested measure from descending principal stresses.
pub fn stress_component(component: StressComponent, principals: &[f64; 3]) -> f64 {
    match component {
        StressComponent::SignedVonMises => {
            let vm = von_mises(principals[0], principals[1], principals[2]);
            if principals[2].abs() > principals[0].abs() {
                -vm
            } else {
                vm
            }
        }
        StressComponent::MaximumPrincipal => principals[0],
        StressComponent::MiddlePrincipal => principals[1],
        StressComponent::MinimumPrincipal => principals[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_descending(s: &[f64; 3]) -> bool {
        s[0] >= s[1] && s[1] >= s[2]
    }

    #[test]
    fn diagonal_tensor_returns_sorted_diagonal() {
        let s = principal_stresses(&StressTensor::new([100.0, 50.0, 0.0, 0.0, 0.0, 0.0])).unwrap();
        assert_eq!(s, [100.0, 50.0, 0.0]);

        let s = principal_stresses(&StressTensor::new([-20.0, 70.0, 5.0, 0.0, 0.0, 0.0])).unwrap();
        assert_eq!(s, [70.0, 5.0, -20.0]);
    }

    #[test]
    fn plane_shear_matches_mohr_circle() {
        // centre 75, radius sqrt(25^2 + 30^2)
        let s = principal_stresses(&StressTensor::new([100.0, 50.0, 0.0, 30.0, 0.0, 0.0])).unwrap();
        let radius = (25.0f64.powi(2) + 30.0f64.powi(2)).sqrt();
        assert!((s[0] - (75.0 + radius)).abs() < 1e-9);
        assert!((s[1] - (75.0 - radius)).abs() < 1e-9);
        assert!(s[2].abs() < 1e-9);
    }

    #[test]
    fn pure_shear_in_yz() {
        let s = principal_stresses(&StressTensor::new([0.0, 0.0, 0.0, 0.0, 40.0, 0.0])).unwrap();
        assert!((s[0] - 40.0).abs() < 1e-9);
        assert!(s[1].abs() < 1e-9);
        assert!((s[2] + 40.0).abs() < 1e-9);
    }

    #[test]
    fn invariants_are_preserved_for_general_tensor() {
        let t = StressTensor::new([12.0, -7.0, 31.0, 4.5, -9.0, 16.0]);
        let s = principal_stresses(&t).unwrap();
        assert!(is_descending(&s));
        // trace
        assert!((s.iter().sum::<f64>() - (12.0 - 7.0 + 31.0)).abs() < 1e-9);
        // determinant
        let det = t.xx() * (t.yy() * t.zz() - t.yz() * t.yz())
            - t.xy() * (t.xy() * t.zz() - t.yz() * t.xz())
            + t.xz() * (t.xy() * t.yz() - t.yy() * t.xz());
        assert!((s[0] * s[1] * s[2] - det).abs() < 1e-6 * det.abs().max(1.0));
    }

    #[test]
    fn principal_stresses_are_always_descending() {
        let tensors = [
            [1.0, 2.0, 3.0, 0.5, 0.5, 0.5],
            [-100.0, -100.0, -100.0, 1e-3, 0.0, 0.0],
            [300.0, -250.0, 10.0, 80.0, -60.0, 45.0],
            [0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            [5.0, 5.0, 5.0, 2.0, 2.0, 2.0],
        ];
        for t in tensors.iter() {
            let s = principal_stresses(&StressTensor::new(*t)).unwrap();
            assert!(is_descending(&s), "not descending for {:?}: {:?}", t, s);
        }
    }

    #[test]
    fn nearly_hydrostatic_tensor_is_clamped() {
        let s = principal_stresses(&StressTensor::new([50.0, 50.0, 50.0, 2e-4, 0.0, 0.0])).unwrap();
        for v in s.iter() {
            assert!((v - 50.0).abs() < 1e-3);
        }
    }

    #[test]
    fn non_finite_tensor_is_an_error() {
        assert!(principal_stresses(&StressTensor::new([f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0])).is_err());
    }

    #[test]
    fn von_mises_example() {
        let vm = von_mises(100.0, 50.0, 0.0);
        assert!((vm - 86.602540378).abs() < 1e-6);
    }

    #[test]
    fn von_mises_is_permutation_invariant() {
        let (a, b, c) = (120.0, -35.0, 18.0);
        let reference = von_mises(a, b, c);
        let permuted = [
            von_mises(a, c, b),
            von_mises(b, a, c),
            von_mises(b, c, a),
            von_mises(c, a, b),
            von_mises(c, b, a),
        ];
        for v in permuted.iter() {
            assert!((v - reference).abs() < 1e-9);
        }
    }

    #[test]
    fn signed_von_mises_follows_dominant_principal() {
        let tension = [100.0, 20.0, -30.0];
        assert!(stress_component(StressComponent::SignedVonMises, &tension) > 0.0);

        let compression = [30.0, -20.0, -100.0];
        assert!(stress_component(StressComponent::SignedVonMises, &compression) < 0.0);

        // equal magnitudes stay positive
        let balanced = [50.0, 0.0, -50.0];
        assert!(stress_component(StressComponent::SignedVonMises, &balanced) > 0.0);
    }

    #[test]
    fn principal_components_select_by_index() {
        let s = [9.0, 4.0, -2.0];
        assert_eq!(stress_component(StressComponent::MaximumPrincipal, &s), 9.0);
        assert_eq!(stress_component(StressComponent::MiddlePrincipal, &s), 4.0);
        assert_eq!(stress_component(StressComponent::MinimumPrincipal, &s), -2.0);
    }

    #[test]
    fn component_names_round_trip() {
        for c in StressComponent::ALL.iter() {
            assert_eq!(StressComponent::from_text(c.text()), Some(*c));
        }
        assert_eq!(StressComponent::from_text("Shear"), None);
    }
}
