#![allow(clippy::unreadable_literal)]

//! Material data and a small library of typical fatigue materials.
//!
//! Strengths and S-N stresses in the library are in Pa.

use std::collections::BTreeMap;

use log::debug;
use serde::Deserialize;

use crate::context::{AnalysisContext, Notched, Output, Settings};
use crate::error::{FatigueError, Result};
use crate::model::{MaterialDatabase, StrengthProperty};
use crate::notch;
use crate::sn::SnCurve;
use crate::units::PA_PER_KSI;

/// S-N data as stored in a material database.
///
/// Alternating stress and cycles are required. Rows are selected with
/// either an R-ratio column (R = -1 rows kept) or a mean stress column
/// (zero mean rows kept), never both.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnTable {
    #[serde(default)]
    pub alternating_stress: Option<Vec<f64>>,
    #[serde(default)]
    pub cycles: Option<Vec<f64>>,
    #[serde(default)]
    pub r_ratio: Option<Vec<f64>>,
    #[serde(default)]
    pub mean_stress: Option<Vec<f64>>,
}

impl SnTable {
    /// Alternating stress and cycles of the fully-reversed rows.
    pub fn fully_reversed_rows(&self) -> Result<(Vec<f64>, Vec<f64>)> {
        let stress = self
            .alternating_stress
            .as_ref()
            .ok_or_else(|| FatigueError::Material("S-N table has no alternating stress column".to_string()))?;
        let cycles = self
            .cycles
            .as_ref()
            .ok_or_else(|| FatigueError::Material("S-N table has no cycles column".to_string()))?;
        if stress.len() != cycles.len() {
            return Err(FatigueError::Material(format!(
                "S-N table columns differ in length ({} stresses, {} cycles)",
                stress.len(),
                cycles.len()
            )));
        }

        let (selector, wanted) = match (&self.r_ratio, &self.mean_stress) {
            (Some(_), Some(_)) => {
                return Err(FatigueError::Material(
                    "S-N table has both an R-ratio and a mean stress column".to_string(),
                ))
            }
            (None, None) => {
                return Err(FatigueError::Material(
                    "S-N table needs an R-ratio or a mean stress column".to_string(),
                ))
            }
            (Some(r), None) => (r, -1.0),
            (None, Some(sm)) => (sm, 0.0),
        };
        if selector.len() != stress.len() {
            return Err(FatigueError::Material(
                "S-N table selector column differs in length from the data".to_string(),
            ));
        }

        #[allow(clippy::float_cmp)]
        let rows: (Vec<f64>, Vec<f64>) = selector
            .iter()
            .zip(stress.iter().zip(cycles.iter()))
            .filter(|&(&sel, _)| sel == wanted)
            .map(|(_, (&s, &n))| (s, n))
            .unzip();
        Ok(rows)
    }
}

/// A material entry: strengths (Pa) and S-N data.
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialRecord {
    pub ultimate_strength: f64,
    pub yield_strength: f64,
    pub sn: SnTable,
    #[serde(default)]
    pub cite: String,
}

lazy_static! {
    static ref MATERIALS: BTreeMap<&'static str, MaterialRecord> = {
        let mut materials = BTreeMap::new();

        materials.insert(
            "structural-steel",
            MaterialRecord {
                ultimate_strength: 4.6e8,
                yield_strength: 2.5e8,
                cite: "[typical mild steel, zero mean stress]".to_string(),
                sn: SnTable {
                    alternating_stress: Some(vec![
                        3.999e9, 2.827e9, 1.896e9, 1.413e9, 1.069e9, 4.41e8, 2.62e8, 2.14e8, 1.38e8,
                        1.14e8, 8.62e7,
                    ]),
                    cycles: Some(vec![
                        10.0, 20.0, 50.0, 100.0, 200.0, 2000.0, 10000.0, 20000.0, 1e5, 2e5, 1e6,
                    ]),
                    r_ratio: None,
                    mean_stress: Some(vec![0.0; 11]),
                },
            },
        );

        materials.insert(
            "aluminum-alloy",
            MaterialRecord {
                ultimate_strength: 3.1e8,
                yield_strength: 2.8e8,
                cite: "[typical wrought aluminium, R = -1 and R = 0.1]".to_string(),
                sn: SnTable {
                    alternating_stress: Some(vec![
                        2.758e8, 2.413e8, 2.068e8, 1.724e8, 1.379e8, 1.172e8, 8.963e7, 8.274e7,
                        7.584e7, 7.067e7, 1.9e8, 1.2e8,
                    ]),
                    cycles: Some(vec![
                        1.7e3, 5e3, 3.4e4, 1.4e5, 8e5, 2.4e6, 5.5e7, 1e8, 2.5e8, 5e8, 1e4, 1e6,
                    ]),
                    r_ratio: Some(vec![
                        -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, 0.1, 0.1,
                    ]),
                    mean_stress: None,
                },
            },
        );

        materials
    };
}

/// Return the full library of materials as <name, material>.
pub fn get_all_materials() -> &'static BTreeMap<&'static str, MaterialRecord> {
    &MATERIALS
}

/// Get a single material from the library.
pub fn get_material(name: &str) -> Option<&'static MaterialRecord> {
    MATERIALS.get(name)
}

/// The built-in library as a material database.
pub struct Library;

impl MaterialDatabase for Library {
    fn strength(&self, material: &str, property: StrengthProperty) -> Result<f64> {
        let record = get_material(material)
            .ok_or_else(|| FatigueError::Material(format!("unknown material '{}'", material)))?;
        Ok(match property {
            StrengthProperty::TensileUltimate => record.ultimate_strength,
            StrengthProperty::TensileYield => record.yield_strength,
        })
    }

    fn sn_table(&self, material: &str) -> Result<&SnTable> {
        get_material(material)
            .map(|record| &record.sn)
            .ok_or_else(|| FatigueError::Material(format!("unknown material '{}'", material)))
    }
}

/// Material properties ready for evaluation, in model stress units.
#[derive(Debug, Clone)]
pub struct MaterialProperties {
    pub name: String,
    /// Ultimate tensile strength with the temperature factor applied.
    pub ftu: f64,
    /// S-N curve in Pa, life outputs only.
    pub sn: Option<SnCurve>,
    /// Notch sensitivity q, notched analyses only.
    pub notch_sensitivity: Option<f64>,
}

impl MaterialProperties {
    /// Look up a material and prepare it for the given analysis.
    ///
    /// `stress_to_pa` converts model stress units to Pa.
    pub fn resolve(
        db: &dyn MaterialDatabase,
        name: &str,
        settings: &Settings,
        context: &AnalysisContext,
        stress_to_pa: f64,
    ) -> Result<MaterialProperties> {
        let k_temperature = settings.factors.temperature;
        let ftu_pa = k_temperature * db.strength(name, StrengthProperty::TensileUltimate)?;
        let ftu_ksi = ftu_pa / PA_PER_KSI;

        let notch_sensitivity = match (context.notched, &settings.notch) {
            (Notched::Notched, Some(notch)) => {
                let radius_in = notch.radius * settings.length_unit.to_inch();
                let mut q = notch::notch_sensitivity(notch.correlation, ftu_ksi, radius_in);
                if context.result_type.is_damage() {
                    let cycles = settings.applied_cycles(context.analysis)?;
                    q *= notch::cycle_sensitivity(notch.cycle_correlation, ftu_ksi, cycles);
                }
                Some(q)
            }
            (Notched::Notched, None) => {
                return Err(FatigueError::Config("notched analysis without notch settings".to_string()))
            }
            (Notched::Unnotched, _) => None,
        };

        let sn = if context.output == Output::Life {
            let table = db.sn_table(name)?;
            let curve = SnCurve::from_table(table, &settings.factors)
                .map_err(|e| FatigueError::Material(format!("{}: {}", name, e)))?;
            Some(curve)
        } else {
            None
        };

        debug!(
            "material '{}': ftu {} ({} ksi), q {:?}, result {:?}",
            name,
            ftu_pa / stress_to_pa,
            ftu_ksi,
            notch_sensitivity,
            context.result_type
        );

        Ok(MaterialProperties {
            name: name.to_string(),
            ftu: ftu_pa / stress_to_pa,
            sn,
            notch_sensitivity,
        })
    }

    /// The S-N curve, which only life outputs resolve.
    pub fn curve(&self) -> Result<&SnCurve> {
        self.sn
            .as_ref()
            .ok_or_else(|| FatigueError::Material(format!("no S-N curve resolved for '{}'", self.name)))
    }
}
