//! In-memory model implementing the collaborator traits.
//!
//! A job file describes the mesh, the stored element results, any
//! material data not in the built-in library and the analysis
//! settings. Setting names are the same labels that `--list` prints.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;

use crate::context::{
    AnalysisKind, LifeMeasure, NotchSettings, PrestressSource, Selection, Settings, VibrationTest,
    DEFAULT_PSD_RESULT_SET,
};
use crate::error::{FatigueError, Result};
use crate::material::{Library, MaterialRecord, SnTable};
use crate::mean_stress::{LoadHistory, MeanStressTheory};
use crate::model::{Element, MaterialDatabase, MeshProvider, Quantity, ResultReader, StrengthProperty};
use crate::multiaxial::MultiaxialTheory;
use crate::notch::{CycleSensitivity, NotchCorrelation};
use crate::sn::CurveFactors;
use crate::tensor::StressComponent;
use crate::units::{LengthUnit, StressUnit};

/// A named group of nodes with an assigned material.
#[derive(Debug, Clone, Deserialize)]
pub struct Region {
    pub nodes: Vec<usize>,
    #[serde(default)]
    pub material: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryMesh {
    elements: BTreeMap<usize, Element>,
    connectivity: BTreeMap<usize, Vec<usize>>,
    regions: BTreeMap<usize, Region>,
    node_materials: BTreeMap<usize, String>,
    default_material: Option<String>,
}

impl MemoryMesh {
    pub fn new(elements: Vec<Element>) -> MemoryMesh {
        let mut mesh = MemoryMesh::default();
        for element in elements {
            for &node in &element.nodes {
                mesh.connectivity.entry(node).or_insert_with(Vec::new).push(element.id);
            }
            mesh.elements.insert(element.id, element);
        }
        for connected in mesh.connectivity.values_mut() {
            connected.sort_unstable();
            connected.dedup();
        }
        mesh
    }

    pub fn add_region(&mut self, region_id: usize, region: Region) {
        self.regions.insert(region_id, region);
    }

    pub fn set_node_material(&mut self, node_id: usize, material: &str) {
        self.node_materials.insert(node_id, material.to_string());
    }

    /// Material used for nodes and regions without their own assignment.
    pub fn set_default_material(&mut self, material: &str) {
        self.default_material = Some(material.to_string());
    }

    fn fallback_material(&self, what: &str) -> Result<String> {
        self.default_material
            .clone()
            .ok_or_else(|| FatigueError::Mesh(format!("no material assigned to {}", what)))
    }
}

impl MeshProvider for MemoryMesh {
    fn connected_elements(&self, node_id: usize) -> Result<&[usize]> {
        self.connectivity
            .get(&node_id)
            .map(|v| v.as_slice())
            .ok_or_else(|| FatigueError::Mesh(format!("node {} is not in the mesh", node_id)))
    }

    fn element(&self, element_id: usize) -> Result<&Element> {
        self.elements
            .get(&element_id)
            .ok_or_else(|| FatigueError::Mesh(format!("element {} is not in the mesh", element_id)))
    }

    fn region_nodes(&self, region_id: usize) -> Result<Vec<usize>> {
        self.regions
            .get(&region_id)
            .map(|region| region.nodes.clone())
            .ok_or_else(|| FatigueError::Mesh(format!("region {} is not in the mesh", region_id)))
    }

    fn material_of(&self, selection: Selection, ref_id: usize) -> Result<String> {
        match selection {
            Selection::GeometricEntity => match self.regions.get(&ref_id) {
                Some(Region {
                    material: Some(material), ..
                }) => Ok(material.clone()),
                Some(_) => self.fallback_material(&format!("region {}", ref_id)),
                None => Err(FatigueError::Mesh(format!("region {} is not in the mesh", ref_id))),
            },
            Selection::Node => {
                if let Some(material) = self.node_materials.get(&ref_id) {
                    return Ok(material.clone());
                }
                if let Some(region) = self
                    .regions
                    .values()
                    .find(|region| region.material.is_some() && region.nodes.contains(&ref_id))
                {
                    return Ok(region.material.clone().unwrap_or_default());
                }
                self.fallback_material(&format!("node {}", ref_id))
            }
        }
    }
}

/// Stored element values keyed by result set, quantity and element.
#[derive(Debug, Clone)]
pub struct MemoryResults {
    unit: StressUnit,
    values: BTreeMap<(usize, Quantity, usize), Vec<f64>>,
}

impl MemoryResults {
    pub fn new(unit: StressUnit) -> MemoryResults {
        MemoryResults {
            unit,
            values: BTreeMap::new(),
        }
    }

    /// Store the corner values of an element, corners in local order.
    pub fn insert(&mut self, set: usize, quantity: Quantity, element_id: usize, values: Vec<f64>) {
        self.values.insert((set, quantity, element_id), values);
    }

    /// Result sets holding any values, ascending.
    pub fn sets(&self) -> Vec<usize> {
        let mut sets: Vec<usize> = self.values.keys().map(|k| k.0).collect();
        sets.dedup();
        sets
    }
}

impl ResultReader for MemoryResults {
    fn stress_unit(&self) -> StressUnit {
        self.unit
    }

    fn element_values(&self, set: usize, quantity: Quantity, element_id: usize) -> Result<&[f64]> {
        self.values
            .get(&(set, quantity, element_id))
            .map(|v| v.as_slice())
            .ok_or_else(|| {
                FatigueError::Results(format!(
                    "no {:?} values for element {} in result set {}",
                    quantity, element_id, set
                ))
            })
    }
}

static LIBRARY: Library = Library;

/// Materials defined in a job, backed by the built-in library.
#[derive(Debug, Clone, Default)]
pub struct MemoryMaterials {
    records: BTreeMap<String, MaterialRecord>,
}

impl MemoryMaterials {
    pub fn new(records: BTreeMap<String, MaterialRecord>) -> MemoryMaterials {
        MemoryMaterials { records }
    }
}

impl MaterialDatabase for MemoryMaterials {
    fn strength(&self, material: &str, property: StrengthProperty) -> Result<f64> {
        match self.records.get(material) {
            Some(record) => Ok(match property {
                StrengthProperty::TensileUltimate => record.ultimate_strength,
                StrengthProperty::TensileYield => record.yield_strength,
            }),
            None => LIBRARY.strength(material, property),
        }
    }

    fn sn_table(&self, material: &str) -> Result<&SnTable> {
        match self.records.get(material) {
            Some(record) => Ok(&record.sn),
            None => LIBRARY.sn_table(material),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ResultBlock {
    set: usize,
    #[serde(default = "default_quantity")]
    quantity: Quantity,
    element: usize,
    values: Vec<f64>,
}

fn default_quantity() -> Quantity {
    Quantity::Stress
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotchFile {
    pub kt: f64,
    pub kt_principal: Option<[f64; 3]>,
    pub radius: f64,
    pub correlation: String,
    pub cycle_correlation: String,
}

impl Default for NotchFile {
    fn default() -> Self {
        Self {
            kt: 1.0,
            kt_principal: None,
            radius: 1.0,
            correlation: NotchCorrelation::SteelPeterson.text().to_string(),
            cycle_correlation: CycleSensitivity::None.text().to_string(),
        }
    }
}

/// Analysis settings as written in a job file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub analysis: String,
    pub selection: String,
    pub geometry: Vec<usize>,
    pub stress_component: String,
    pub mean_stress_theory: Option<String>,
    pub multiaxial_theory: Option<String>,
    pub sines_constant: Option<f64>,
    pub load_history: String,
    pub prestress_time: Option<usize>,
    pub prestress_value: Option<f64>,
    pub notch: Option<NotchFile>,
    pub life_measure: String,
    pub scatter_stress: f64,
    pub scatter_life: f64,
    pub temperature_factor: f64,
    pub misc_factor: f64,
    pub cycles: Option<f64>,
    pub test_hours: Option<f64>,
    pub test_frequency: Option<f64>,
    pub scale_factor: f64,
    pub psd_result_set: usize,
    pub length_unit: String,
}

impl Default for SettingsFile {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            analysis: settings.analysis.text().to_string(),
            selection: settings.selection.text().to_string(),
            geometry: vec![],
            stress_component: settings.stress_component.text().to_string(),
            mean_stress_theory: settings.mean_stress_theory.map(|t| t.text().to_string()),
            multiaxial_theory: None,
            sines_constant: None,
            load_history: settings.load_history.text().to_string(),
            prestress_time: None,
            prestress_value: None,
            notch: None,
            life_measure: settings.life_measure.text().to_string(),
            scatter_stress: 1.0,
            scatter_life: 1.0,
            temperature_factor: 1.0,
            misc_factor: 1.0,
            cycles: None,
            test_hours: None,
            test_frequency: None,
            scale_factor: 1.0,
            psd_result_set: DEFAULT_PSD_RESULT_SET,
            length_unit: settings.length_unit.text().to_string(),
        }
    }
}

fn lookup<T>(kind: &str, name: &str, found: Option<T>) -> Result<T> {
    found.ok_or_else(|| FatigueError::Config(format!("unknown {} '{}'", kind, name)))
}

impl SettingsFile {
    /// Convert the labels into typed settings.
    pub fn to_settings(&self) -> Result<Settings> {
        let analysis = lookup("analysis type", &self.analysis, AnalysisKind::from_text(&self.analysis))?;

        let prestress = match (self.prestress_time, self.prestress_value) {
            (None, None) => PrestressSource::None,
            (Some(time), None) => PrestressSource::Time(time),
            (None, Some(value)) => PrestressSource::Value(value),
            (Some(_), Some(_)) => {
                return Err(FatigueError::Config(
                    "give either a prestress time or a prestress value, not both".to_string(),
                ))
            }
        };

        let notch = match &self.notch {
            Some(notch) => Some(NotchSettings {
                kt: notch.kt,
                kt_principal: notch.kt_principal.unwrap_or([notch.kt; 3]),
                radius: notch.radius,
                correlation: lookup(
                    "notch sensitivity correlation",
                    &notch.correlation,
                    NotchCorrelation::from_text(&notch.correlation),
                )?,
                cycle_correlation: lookup(
                    "cycle sensitivity correlation",
                    &notch.cycle_correlation,
                    CycleSensitivity::from_text(&notch.cycle_correlation),
                )?,
            }),
            None => None,
        };

        let vibration_test = match (self.test_hours, self.test_frequency) {
            (Some(hours), Some(frequency)) => Some(VibrationTest { hours, frequency }),
            (None, None) => None,
            _ => {
                warn!("a vibration test needs both the length of test and the frequency, ignoring it");
                None
            }
        };

        let mean_stress_theory = match &self.mean_stress_theory {
            Some(name) => Some(lookup("mean stress theory", name, MeanStressTheory::from_text(name))?),
            None => None,
        };
        let multiaxial_theory = match &self.multiaxial_theory {
            Some(name) => Some(lookup("multiaxial stress theory", name, MultiaxialTheory::from_text(name))?),
            None => None,
        };

        Ok(Settings {
            analysis,
            selection: lookup("selection", &self.selection, Selection::from_text(&self.selection))?,
            geometry: self.geometry.clone(),
            stress_component: lookup(
                "stress component",
                &self.stress_component,
                StressComponent::from_text(&self.stress_component),
            )?,
            mean_stress_theory,
            multiaxial_theory,
            sines_constant: self.sines_constant,
            load_history: lookup("load history", &self.load_history, LoadHistory::from_text(&self.load_history))?,
            prestress,
            notch,
            life_measure: lookup("life measure", &self.life_measure, LifeMeasure::from_text(&self.life_measure))?,
            factors: CurveFactors {
                scatter_stress: self.scatter_stress,
                scatter_life: self.scatter_life,
                temperature: self.temperature_factor,
                misc: self.misc_factor,
            },
            cycles: self.cycles,
            vibration_test,
            scale_factor: self.scale_factor,
            psd_result_set: self.psd_result_set,
            length_unit: lookup("length unit", &self.length_unit, LengthUnit::from_text(&self.length_unit))?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct JobFile {
    stress_unit: String,
    elements: Vec<Element>,
    #[serde(default)]
    regions: BTreeMap<usize, Region>,
    #[serde(default)]
    node_materials: BTreeMap<usize, String>,
    #[serde(default)]
    default_material: Option<String>,
    #[serde(default)]
    results: Vec<ResultBlock>,
    #[serde(default)]
    materials: BTreeMap<String, MaterialRecord>,
    #[serde(default)]
    settings: SettingsFile,
}

/// Everything needed to run an evaluation.
pub struct Job {
    pub mesh: MemoryMesh,
    pub results: MemoryResults,
    pub materials: MemoryMaterials,
    pub settings: Settings,
}

impl Job {
    pub fn load(path: &Path) -> Result<Job> {
        let text = fs::read_to_string(path)?;
        debug!("read {} bytes from {}", text.len(), path.display());
        Job::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Job> {
        let file: JobFile = serde_json::from_str(text)?;
        let unit = lookup("stress unit", &file.stress_unit, StressUnit::from_text(&file.stress_unit))?;

        for element in &file.elements {
            if element.nodes.len() != element.family.node_count() {
                return Err(FatigueError::Mesh(format!(
                    "element {} is a {} but has {} nodes",
                    element.id,
                    element.family.text(),
                    element.nodes.len()
                )));
            }
        }

        let mut mesh = MemoryMesh::new(file.elements);
        for (id, region) in file.regions {
            mesh.add_region(id, region);
        }
        for (node, material) in &file.node_materials {
            mesh.set_node_material(*node, material);
        }
        if let Some(material) = &file.default_material {
            mesh.set_default_material(material);
        }

        let mut results = MemoryResults::new(unit);
        for block in file.results {
            results.insert(block.set, block.quantity, block.element, block.values);
        }
        let sets = results.sets();
        if sets.is_empty() {
            warn!("the job holds no element results");
        } else {
            debug!("result sets {:?} in {}", sets, unit.text());
        }

        Ok(Job {
            mesh,
            results,
            materials: MemoryMaterials::new(file.materials),
            settings: file.settings.to_settings()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::ElementFamily;

    const JOB: &str = r#"{
        "stress_unit": "MPa",
        "elements": [
            {"id": 1, "family": "tri3", "nodes": [1, 2, 3]},
            {"id": 2, "family": "tri3", "nodes": [2, 4, 3]}
        ],
        "regions": {"10": {"nodes": [1, 2, 3, 4], "material": "structural-steel"}},
        "node_materials": {"4": "soft-steel"},
        "results": [
            {"set": 1, "element": 1, "values": [1, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 3, 0, 0, 0, 0, 0]},
            {"set": 2, "quantity": "stress_psd", "element": 1, "values": [4, 5, 6]}
        ],
        "materials": {
            "soft-steel": {
                "ultimate_strength": 3.0e8,
                "yield_strength": 2.0e8,
                "sn": {"alternating_stress": [2.0e8, 1.0e8], "cycles": [1e3, 1e6], "r_ratio": [-1, -1]}
            }
        },
        "settings": {
            "analysis": "Static",
            "selection": "Geometric Entity",
            "geometry": [10],
            "mean_stress_theory": "Gerber",
            "notch": {"kt": 2.0, "radius": 0.5, "correlation": "Aluminum (Peterson)"},
            "cycles": 1e5
        }
    }"#;

    #[test]
    fn loads_a_job() {
        let job = Job::from_json(JOB).unwrap();
        assert_eq!(job.mesh.connected_elements(2).unwrap(), &[1, 2]);
        assert_eq!(job.mesh.connected_elements(1).unwrap(), &[1]);
        assert_eq!(job.mesh.element(2).unwrap().family, ElementFamily::Tri3);
        assert_eq!(job.mesh.region_nodes(10).unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(job.results.stress_unit(), StressUnit::MPa);
        assert_eq!(job.results.element_values(2, Quantity::StressPsd, 1).unwrap(), &[4.0, 5.0, 6.0]);
        assert_eq!(job.results.sets(), vec![1, 2]);

        let settings = &job.settings;
        assert_eq!(settings.selection, Selection::GeometricEntity);
        assert_eq!(settings.mean_stress_theory, Some(MeanStressTheory::Gerber));
        let notch = settings.notch.as_ref().unwrap();
        assert_eq!(notch.kt_principal, [2.0; 3]);
        assert_eq!(notch.cycle_correlation, CycleSensitivity::None);
        assert_eq!(settings.cycles, Some(1e5));
    }

    #[test]
    fn materials_by_node_and_region() {
        let job = Job::from_json(JOB).unwrap();
        assert_eq!(job.mesh.material_of(Selection::GeometricEntity, 10).unwrap(), "structural-steel");
        assert_eq!(job.mesh.material_of(Selection::Node, 4).unwrap(), "soft-steel");
        assert_eq!(job.mesh.material_of(Selection::Node, 1).unwrap(), "structural-steel");
        assert!(job.mesh.material_of(Selection::Node, 99).is_err());
    }

    #[test]
    fn job_materials_fall_back_to_the_library() {
        let job = Job::from_json(JOB).unwrap();
        let ftu = job.materials.strength("soft-steel", StrengthProperty::TensileUltimate).unwrap();
        assert_eq!(ftu, 3.0e8);
        let ftu = job.materials.strength("structural-steel", StrengthProperty::TensileUltimate).unwrap();
        assert_eq!(ftu, 4.6e8);
        assert!(job.materials.sn_table("unobtainium").is_err());
    }

    #[test]
    fn unknown_labels_are_config_errors() {
        let settings = SettingsFile {
            mean_stress_theory: Some("Goodman".to_string()),
            ..SettingsFile::default()
        };
        assert!(matches!(settings.to_settings(), Err(FatigueError::Config(_))));

        let settings = SettingsFile {
            prestress_time: Some(1),
            prestress_value: Some(3.0),
            ..SettingsFile::default()
        };
        assert!(settings.to_settings().is_err());
    }

    #[test]
    fn default_settings_file_matches_default_settings() {
        assert_eq!(SettingsFile::default().to_settings().unwrap(), Settings::default());
    }

    #[test]
    fn element_node_counts_are_checked() {
        let job = r#"{"stress_unit": "Pa", "elements": [{"id": 1, "family": "tet10", "nodes": [1, 2, 3, 4]}]}"#;
        assert!(matches!(Job::from_json(job), Err(FatigueError::Mesh(_))));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(Job::from_json("{"), Err(FatigueError::Json(_))));
    }
}
