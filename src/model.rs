//! Contracts for the data the evaluator pulls from its host: mesh
//! connectivity, element results, material data, and the per-node
//! output slot.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::context::Selection;
use crate::error::Result;
use crate::material::SnTable;
use crate::topology::ElementFamily;
use crate::units::StressUnit;

/// An element of the mesh with its nodes in local order, corners first.
#[derive(Debug, Clone, Deserialize)]
pub struct Element {
    pub id: usize,
    pub family: ElementFamily,
    pub nodes: Vec<usize>,
}

impl Element {
    pub fn corner_count(&self) -> usize {
        self.family.corner_count()
    }

    /// Local position of a node within the element.
    pub fn local_index(&self, node_id: usize) -> Option<usize> {
        self.nodes.iter().position(|&n| n == node_id)
    }
}

/// Mesh and geometry access.
pub trait MeshProvider {
    /// Ids of the elements that share a node.
    fn connected_elements(&self, node_id: usize) -> Result<&[usize]>;

    fn element(&self, element_id: usize) -> Result<&Element>;

    /// Node ids of a geometric entity (face, body, ...).
    fn region_nodes(&self, region_id: usize) -> Result<Vec<usize>>;

    /// Material name assigned to a geometric entity or node.
    fn material_of(&self, selection: Selection, ref_id: usize) -> Result<String>;
}

/// Stored element quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// Six stress components per corner node.
    Stress,
    /// One stress power spectral density value per corner node.
    StressPsd,
}

impl Quantity {
    pub fn values_per_corner(&self) -> usize {
        match *self {
            Quantity::Stress => 6,
            Quantity::StressPsd => 1,
        }
    }
}

/// Read access to the solved result sets.
pub trait ResultReader {
    /// Unit of the stored stresses.
    fn stress_unit(&self) -> StressUnit;

    /// Raw corner values of one element in a result set.
    fn element_values(&self, set: usize, quantity: Quantity, element_id: usize) -> Result<&[f64]>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthProperty {
    TensileUltimate,
    TensileYield,
}

/// Material property lookups, strengths in Pa.
pub trait MaterialDatabase {
    fn strength(&self, material: &str, property: StrengthProperty) -> Result<f64>;

    fn sn_table(&self, material: &str) -> Result<&SnTable>;
}

/// Receives the evaluated value for each node.
pub trait NodeCollector {
    fn set_value(&mut self, node_id: usize, value: f64);
}

impl NodeCollector for BTreeMap<usize, f64> {
    fn set_value(&mut self, node_id: usize, value: f64) {
        self.insert(node_id, value);
    }
}

impl NodeCollector for Vec<(usize, f64)> {
    fn set_value(&mut self, node_id: usize, value: f64) {
        self.push((node_id, value));
    }
}
