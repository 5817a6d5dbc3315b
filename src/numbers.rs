// NonNan numbers. Floating point numbers cannot be sorted because
// they can be NaN. Stresses and ratios are wrapped in this type once
// they are known to be real numbers so they can be ordered.

use std::cmp::Ordering;

#[derive(PartialEq, Clone, Copy, Debug)]
pub struct NonNan(f64);

impl NonNan {
    pub fn new(val: f64) -> Option<NonNan> {
        if val.is_nan() {
            None
        } else {
            Some(NonNan(val))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Eq for NonNan {}
impl Ord for NonNan {
    fn cmp(&self, other: &NonNan) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap()
    }
}

impl PartialOrd for NonNan {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Arithmetic mean of a list of values.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation of a list of values.
pub fn stdev(values: &[f64]) -> f64 {
    let u = mean(values);
    let variance = values.iter().map(|x| (x - u).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
