//! The analysis context and the user settings it is derived from.
//!
//! The context is the dispatch key of an evaluation: each axis is a
//! closed enum so that every formula path is chosen by an exhaustive
//! match. It is built once per evaluation call and never changes
//! during the sweep.

use crate::error::{FatigueError, Result};
use crate::mean_stress::{LoadHistory, MeanStressTheory};
use crate::multiaxial::MultiaxialTheory;
use crate::notch::{CycleSensitivity, NotchCorrelation};
use crate::sn::CurveFactors;
use crate::tensor::StressComponent;
use crate::units::LengthUnit;

/// Result set holding the 1-sigma stress PSD of a spectrum analysis.
pub const DEFAULT_PSD_RESULT_SET: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Static,
    Harmonic,
    Spectrum,
}

impl AnalysisKind {
    pub fn text(&self) -> &'static str {
        match *self {
            AnalysisKind::Static => "Static",
            AnalysisKind::Harmonic => "Harmonic",
            AnalysisKind::Spectrum => "Spectrum",
        }
    }

    pub fn from_text(input: &str) -> Option<AnalysisKind> {
        match input {
            "Static" => Some(AnalysisKind::Static),
            "Harmonic" => Some(AnalysisKind::Harmonic),
            "Spectrum" => Some(AnalysisKind::Spectrum),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StressState {
    Uniaxial,
    Multiaxial,
}

impl StressState {
    pub fn text(&self) -> &'static str {
        match *self {
            StressState::Uniaxial => "Uniaxial",
            StressState::Multiaxial => "Multiaxial",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Stress,
    Life,
}

/// How the geometry reference ids are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Each id is a node.
    Node,
    /// Each id is a geometric entity whose nodes are all evaluated.
    GeometricEntity,
}

impl Selection {
    pub fn text(&self) -> &'static str {
        match *self {
            Selection::Node => "Node",
            Selection::GeometricEntity => "Geometric Entity",
        }
    }

    pub fn from_text(input: &str) -> Option<Selection> {
        match input {
            "Node" => Some(Selection::Node),
            "Geometric Entity" => Some(Selection::GeometricEntity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prestress {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notched {
    Notched,
    Unnotched,
}

/// What a life output measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeMeasure {
    CyclesToFailure,
    MinerSum,
}

impl LifeMeasure {
    pub fn text(&self) -> &'static str {
        match *self {
            LifeMeasure::CyclesToFailure => "Cycles to Failure",
            LifeMeasure::MinerSum => "Miner Sum",
        }
    }

    pub fn from_text(input: &str) -> Option<LifeMeasure> {
        match input {
            "Cycles to Failure" => Some(LifeMeasure::CyclesToFailure),
            "Miner Sum" => Some(LifeMeasure::MinerSum),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultType {
    Stress,
    CyclesToFailure,
    /// Miner sum for a fixed number of applied cycles.
    DamageConstant,
    /// Miner sum over the three sigma levels of a random vibration.
    DamageRandom,
}

impl ResultType {
    pub fn text(&self) -> &'static str {
        match *self {
            ResultType::Stress => "Stress",
            ResultType::CyclesToFailure => "Cycles to Failure",
            ResultType::DamageConstant => "Damage - Constant",
            ResultType::DamageRandom => "Damage - Random",
        }
    }

    pub fn resolve(analysis: AnalysisKind, output: Output, life_measure: LifeMeasure) -> ResultType {
        match (output, life_measure, analysis) {
            (Output::Stress, _, _) => ResultType::Stress,
            (Output::Life, LifeMeasure::CyclesToFailure, _) => ResultType::CyclesToFailure,
            (Output::Life, LifeMeasure::MinerSum, AnalysisKind::Spectrum) => ResultType::DamageRandom,
            (Output::Life, LifeMeasure::MinerSum, _) => ResultType::DamageConstant,
        }
    }

    pub fn is_damage(&self) -> bool {
        matches!(self, ResultType::DamageConstant | ResultType::DamageRandom)
    }
}

/// Where the prestress reference comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrestressSource {
    None,
    /// Result set of a static prestress state.
    Time(usize),
    /// Constant stress for harmonic and spectrum analyses, in the
    /// stress unit of the model results.
    Value(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotchSettings {
    /// Theoretical stress concentration of the evaluated component.
    pub kt: f64,
    /// Concentrations along the maximum, middle and minimum principal axes.
    pub kt_principal: [f64; 3],
    /// Notch root radius in model length units.
    pub radius: f64,
    pub correlation: NotchCorrelation,
    pub cycle_correlation: CycleSensitivity,
}

/// Duration of a vibration test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VibrationTest {
    pub hours: f64,
    /// Expected response frequency (Hz).
    pub frequency: f64,
}

impl VibrationTest {
    pub fn cycles(&self) -> f64 {
        self.hours * self.frequency * 3600.0
    }
}

/// Everything the user chooses for an evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub analysis: AnalysisKind,
    pub selection: Selection,
    /// Node or geometric entity ids to evaluate.
    pub geometry: Vec<usize>,
    pub stress_component: StressComponent,
    pub mean_stress_theory: Option<MeanStressTheory>,
    pub multiaxial_theory: Option<MultiaxialTheory>,
    pub sines_constant: Option<f64>,
    pub load_history: LoadHistory,
    pub prestress: PrestressSource,
    pub notch: Option<NotchSettings>,
    pub life_measure: LifeMeasure,
    pub factors: CurveFactors,
    /// Applied cycles of a static Miner sum.
    pub cycles: Option<f64>,
    pub vibration_test: Option<VibrationTest>,
    /// Sigma multiplier for spectrum stresses.
    pub scale_factor: f64,
    pub psd_result_set: usize,
    pub length_unit: LengthUnit,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            analysis: AnalysisKind::Static,
            selection: Selection::Node,
            geometry: vec![],
            stress_component: StressComponent::SignedVonMises,
            mean_stress_theory: Some(MeanStressTheory::ModifiedGoodman),
            multiaxial_theory: None,
            sines_constant: None,
            load_history: LoadHistory::FullyReversed,
            prestress: PrestressSource::None,
            notch: None,
            life_measure: LifeMeasure::CyclesToFailure,
            factors: CurveFactors::default(),
            cycles: None,
            vibration_test: None,
            scale_factor: 1.0,
            psd_result_set: DEFAULT_PSD_RESULT_SET,
            length_unit: LengthUnit::Millimeter,
        }
    }
}

impl Settings {
    /// Number of applied cycles for Miner sums and cycle sensitivity.
    pub fn applied_cycles(&self, analysis: AnalysisKind) -> Result<f64> {
        match analysis {
            AnalysisKind::Static => self
                .cycles
                .ok_or_else(|| FatigueError::Config("a static Miner sum needs the number of cycles".to_string())),
            AnalysisKind::Harmonic | AnalysisKind::Spectrum => self
                .vibration_test
                .map(|test| test.cycles())
                .ok_or_else(|| FatigueError::Config("a vibration Miner sum needs the length of test and frequency".to_string())),
        }
    }

    /// Constant prestress of harmonic and spectrum analyses.
    pub fn prestress_value(&self) -> f64 {
        match self.prestress {
            PrestressSource::Value(value) => value,
            _ => 0.0,
        }
    }

    pub fn mean_stress_theory(&self) -> Result<MeanStressTheory> {
        self.mean_stress_theory
            .ok_or_else(|| FatigueError::Config("no mean stress theory selected".to_string()))
    }
}

/// Dispatch key for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisContext {
    pub analysis: AnalysisKind,
    pub stress_state: StressState,
    pub output: Output,
    pub selection: Selection,
    pub load_history: LoadHistory,
    pub prestress: Prestress,
    pub notched: Notched,
    pub result_type: ResultType,
}

impl AnalysisContext {
    /// Build and check the context for an evaluation entry point.
    pub fn new(settings: &Settings, stress_state: StressState, output: Output) -> Result<AnalysisContext> {
        let analysis = settings.analysis;

        let prestress = match (analysis, settings.prestress) {
            (_, PrestressSource::None) => Prestress::No,
            (AnalysisKind::Static, PrestressSource::Time(_)) => Prestress::Yes,
            (AnalysisKind::Static, PrestressSource::Value(_)) => {
                return Err(FatigueError::Config(
                    "static analyses take the prestress from a result set, not a value".to_string(),
                ))
            }
            (_, PrestressSource::Value(_)) => Prestress::Yes,
            (_, PrestressSource::Time(_)) => {
                return Err(FatigueError::Config(format!(
                    "{} analyses take a prestress value, not a result set",
                    analysis.text()
                )))
            }
        };

        let context = AnalysisContext {
            analysis,
            stress_state,
            output,
            selection: settings.selection,
            load_history: settings.load_history,
            prestress,
            notched: if settings.notch.is_some() { Notched::Notched } else { Notched::Unnotched },
            result_type: ResultType::resolve(analysis, output, settings.life_measure),
        };
        context.validate(settings)?;
        Ok(context)
    }

    fn validate(&self, settings: &Settings) -> Result<()> {
        if self.analysis == AnalysisKind::Spectrum && self.stress_state == StressState::Multiaxial {
            return Err(FatigueError::Config(
                "spectrum results hold a single stress PSD and cannot be evaluated multiaxially".to_string(),
            ));
        }
        if self.analysis == AnalysisKind::Harmonic && self.load_history == LoadHistory::HalfReversed {
            return Err(FatigueError::Config(
                "harmonic analyses are always fully reversed".to_string(),
            ));
        }
        if self.analysis == AnalysisKind::Harmonic
            && self.stress_state == StressState::Uniaxial
            && settings.stress_component != StressComponent::SignedVonMises
        {
            return Err(FatigueError::Config(format!(
                "harmonic analyses use '{}'",
                StressComponent::SignedVonMises.text()
            )));
        }

        match self.stress_state {
            StressState::Uniaxial => {
                settings.mean_stress_theory()?;
            }
            StressState::Multiaxial => match settings.multiaxial_theory {
                Some(MultiaxialTheory::Sines) => {
                    if settings.sines_constant.is_none() {
                        return Err(FatigueError::Config("the Sines theory needs a Sines constant".to_string()));
                    }
                }
                Some(_) => {
                    settings.mean_stress_theory()?;
                }
                None => {
                    return Err(FatigueError::Config("no multiaxial stress theory selected".to_string()));
                }
            },
        }

        if self.result_type.is_damage() {
            settings.applied_cycles(self.analysis)?;
        }
        if self.analysis == AnalysisKind::Spectrum && !(settings.scale_factor > 0.0) {
            return Err(FatigueError::Config(format!(
                "scale factor must be positive, got {}",
                settings.scale_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_type_follows_analysis_and_measure() {
        assert_eq!(
            ResultType::resolve(AnalysisKind::Spectrum, Output::Life, LifeMeasure::MinerSum),
            ResultType::DamageRandom
        );
        assert_eq!(
            ResultType::resolve(AnalysisKind::Harmonic, Output::Life, LifeMeasure::MinerSum),
            ResultType::DamageConstant
        );
        assert_eq!(
            ResultType::resolve(AnalysisKind::Static, Output::Life, LifeMeasure::CyclesToFailure),
            ResultType::CyclesToFailure
        );
        assert_eq!(
            ResultType::resolve(AnalysisKind::Static, Output::Stress, LifeMeasure::MinerSum),
            ResultType::Stress
        );
    }

    #[test]
    fn default_settings_make_a_static_uniaxial_context() {
        let context = AnalysisContext::new(&Settings::default(), StressState::Uniaxial, Output::Stress).unwrap();
        assert_eq!(context.prestress, Prestress::No);
        assert_eq!(context.notched, Notched::Unnotched);
        assert_eq!(context.result_type, ResultType::Stress);
    }

    #[test]
    fn spectrum_cannot_be_multiaxial() {
        let settings = Settings {
            analysis: AnalysisKind::Spectrum,
            multiaxial_theory: Some(MultiaxialTheory::HydrostaticMean),
            ..Settings::default()
        };
        assert!(AnalysisContext::new(&settings, StressState::Multiaxial, Output::Stress).is_err());
        assert!(AnalysisContext::new(&settings, StressState::Uniaxial, Output::Stress).is_ok());
    }

    #[test]
    fn prestress_source_must_match_analysis() {
        let settings = Settings {
            prestress: PrestressSource::Value(10.0),
            ..Settings::default()
        };
        assert!(AnalysisContext::new(&settings, StressState::Uniaxial, Output::Stress).is_err());

        let settings = Settings {
            analysis: AnalysisKind::Spectrum,
            prestress: PrestressSource::Value(10.0),
            ..Settings::default()
        };
        let context = AnalysisContext::new(&settings, StressState::Uniaxial, Output::Stress).unwrap();
        assert_eq!(context.prestress, Prestress::Yes);
    }

    #[test]
    fn damage_needs_applied_cycles() {
        let mut settings = Settings {
            life_measure: LifeMeasure::MinerSum,
            ..Settings::default()
        };
        assert!(AnalysisContext::new(&settings, StressState::Uniaxial, Output::Life).is_err());
        settings.cycles = Some(1e5);
        assert!(AnalysisContext::new(&settings, StressState::Uniaxial, Output::Life).is_ok());
    }

    #[test]
    fn multiaxial_theory_requirements() {
        let mut settings = Settings {
            multiaxial_theory: Some(MultiaxialTheory::Sines),
            ..Settings::default()
        };
        assert!(AnalysisContext::new(&settings, StressState::Multiaxial, Output::Stress).is_err());
        settings.sines_constant = Some(0.5);
        assert!(AnalysisContext::new(&settings, StressState::Multiaxial, Output::Stress).is_ok());

        settings.multiaxial_theory = Some(MultiaxialTheory::SignedVonMisesMean);
        settings.mean_stress_theory = None;
        assert!(matches!(
            AnalysisContext::new(&settings, StressState::Multiaxial, Output::Stress),
            Err(FatigueError::Config(_))
        ));
    }

    #[test]
    fn vibration_test_cycles() {
        let test = VibrationTest { hours: 2.0, frequency: 50.0 };
        assert_eq!(test.cycles(), 360_000.0);
    }
}
