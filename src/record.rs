//! Evaluation records of a single node.
//!
//! Every record has one comparison key so that the worst node of a
//! sweep can be found regardless of its shape.

use crate::context::ResultType;
use crate::mean_stress::AltMean;

/// Equivalent stresses of a node with any life results that apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressResult {
    pub result_type: ResultType,
    pub alternating: f64,
    pub mean: f64,
    pub fully_reversed: f64,
    pub allowable_stress: f64,
    pub cycles_to_failure: f64,
    pub applied_cycles: f64,
    pub miner_sum: f64,
}

impl StressResult {
    pub fn new(result_type: ResultType, stress: AltMean, fully_reversed: f64) -> StressResult {
        StressResult {
            result_type,
            alternating: stress.alternating,
            mean: stress.mean,
            fully_reversed,
            allowable_stress: 0.0,
            cycles_to_failure: 0.0,
            applied_cycles: 0.0,
            miner_sum: 0.0,
        }
    }

    /// Placeholder that any evaluated node replaces.
    pub fn initial(result_type: ResultType, fully_reversed: f64) -> StressResult {
        StressResult::new(result_type, AltMean::default(), fully_reversed)
    }

    /// Named values in table order. The fields depend on the result type.
    pub fn fields(&self) -> Vec<(&'static str, f64)> {
        self.named_fields(["Alternating Stress", "Mean Stress", "Fully-Reversed Stress"])
    }

    /// Named values of a multiaxial combination in table order.
    pub fn effective_fields(&self) -> Vec<(&'static str, f64)> {
        self.named_fields([
            "Effective Alternating Stress",
            "Effective Mean Stress",
            "Fully-Reversed Stress",
        ])
    }

    fn named_fields(&self, stress_names: [&'static str; 3]) -> Vec<(&'static str, f64)> {
        let mut fields = vec![
            (stress_names[0], self.alternating),
            (stress_names[1], self.mean),
            (stress_names[2], self.fully_reversed),
        ];
        match self.result_type {
            ResultType::Stress => (),
            ResultType::CyclesToFailure => fields.push(("Cycles to Failure", self.cycles_to_failure)),
            ResultType::DamageConstant | ResultType::DamageRandom => {
                fields.push(("Allowable Stress", self.allowable_stress));
                fields.push(("Cycles to Failure", self.cycles_to_failure));
                fields.push(("Applied Cycles", self.applied_cycles));
                fields.push(("Miner Sum", self.miner_sum));
            }
        }
        fields
    }
}

/// One of the three sigma levels of a random vibration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageLevel {
    pub alternating: f64,
    pub mean: f64,
    pub fully_reversed: f64,
    /// Share of the test cycles spent at this level, in percent.
    pub cycle_percentage: f64,
    pub applied_cycles: f64,
    pub cycles_to_failure: f64,
    pub damage: f64,
}

/// Damage of a random vibration test summed over the sigma levels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpectrumDamage {
    pub levels: [DamageLevel; 3],
    pub miner_sum: f64,
}

/// Share of the test cycles spent at 1, 2 and 3 sigma, in percent.
pub const SIGMA_CYCLE_PERCENTAGES: [f64; 3] = [68.3, 27.1, 4.33];

impl SpectrumDamage {
    /// Placeholder that any evaluated node replaces.
    pub fn initial() -> SpectrumDamage {
        let mut damage = SpectrumDamage::default();
        for (level, percentage) in damage.levels.iter_mut().zip(SIGMA_CYCLE_PERCENTAGES.iter()) {
            level.fully_reversed = -1.0;
            level.cycle_percentage = *percentage;
        }
        damage
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultRecord {
    Uniaxial(StressResult),
    Multiaxial {
        /// Cycle along the maximum, middle and minimum principal axes.
        axes: [AltMean; 3],
        combined: StressResult,
    },
    SpectrumDamage(SpectrumDamage),
}

impl ResultRecord {
    /// Value that decides which record governs.
    pub fn comparison_key(&self) -> f64 {
        match self {
            ResultRecord::Uniaxial(result) => result.fully_reversed,
            ResultRecord::Multiaxial { combined, .. } => combined.fully_reversed,
            ResultRecord::SpectrumDamage(damage) => damage.miner_sum,
        }
    }

    /// Name of the comparison key for reporting.
    pub fn key_name(&self) -> &'static str {
        match self {
            ResultRecord::SpectrumDamage(_) => "Miner Sum",
            _ => "Fully-Reversed Stress",
        }
    }

    /// Value handed to the node collector.
    ///
    /// Stresses are converted to Pa with `stress_to_pa`, life results
    /// are returned as they are.
    pub fn node_value(&self, stress_to_pa: f64) -> f64 {
        let result = match self {
            ResultRecord::Uniaxial(result) => result,
            ResultRecord::Multiaxial { combined, .. } => combined,
            ResultRecord::SpectrumDamage(damage) => return damage.miner_sum,
        };
        match result.result_type {
            ResultType::Stress => result.fully_reversed * stress_to_pa,
            ResultType::CyclesToFailure => result.cycles_to_failure,
            ResultType::DamageConstant | ResultType::DamageRandom => result.miner_sum,
        }
    }
}
