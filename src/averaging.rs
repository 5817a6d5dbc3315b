//! Element corner values to nodal values.
//!
//! Corner nodes take the mean of their values over every connected
//! element. Midside nodes of quadratic elements carry no stored
//! values; they take the mean of the two corner nodes they lie between.

use std::collections::BTreeMap;

use log::debug;

use crate::error::{FatigueError, Result};
use crate::model::{MeshProvider, Quantity, ResultReader};
use crate::tensor::StressTensor;
use crate::topology::midside_corners;

/// Which stored values are averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Stress tensors of a result set.
    Stress(usize),
    /// Harmonic stress tensors, real part in the set and imaginary part
    /// in the set that follows it.
    Harmonic(usize),
    /// Stress power spectral density of a result set.
    Psd(usize),
}

impl Source {
    fn width(&self) -> usize {
        match *self {
            Source::Stress(_) | Source::Harmonic(_) => Quantity::Stress.values_per_corner(),
            Source::Psd(_) => Quantity::StressPsd.values_per_corner(),
        }
    }

    /// Values of one corner of an element.
    fn corner_values(&self, reader: &dyn ResultReader, element_id: usize, local: usize) -> Result<Vec<f64>> {
        match *self {
            Source::Stress(set) => corner_slice(reader, set, Quantity::Stress, element_id, local).map(|v| v.to_vec()),
            Source::Psd(set) => corner_slice(reader, set, Quantity::StressPsd, element_id, local).map(|v| v.to_vec()),
            Source::Harmonic(set) => {
                let real = corner_slice(reader, set, Quantity::Stress, element_id, local)?;
                let imaginary = corner_slice(reader, set + 1, Quantity::Stress, element_id, local)?;
                Ok(real
                    .iter()
                    .zip(imaginary.iter())
                    .map(|(re, im)| re.hypot(*im).copysign(*im))
                    .collect())
            }
        }
    }
}

fn corner_slice<'a>(
    reader: &'a dyn ResultReader,
    set: usize,
    quantity: Quantity,
    element_id: usize,
    local: usize,
) -> Result<&'a [f64]> {
    let width = quantity.values_per_corner();
    let values = reader.element_values(set, quantity, element_id)?;
    values.get(local * width..(local + 1) * width).ok_or_else(|| {
        FatigueError::Results(format!(
            "element {} in set {} has {} values, corner {} is missing",
            element_id,
            set,
            values.len(),
            local
        ))
    })
}

/// Averaged values for a set of nodes.
#[derive(Debug, Clone, Default)]
pub struct NodalField {
    values: BTreeMap<usize, Vec<f64>>,
}

impl NodalField {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn get(&self, node_id: usize) -> Result<&[f64]> {
        self.values
            .get(&node_id)
            .map(|v| v.as_slice())
            .ok_or_else(|| FatigueError::Mesh(format!("no averaged value for node {}", node_id)))
    }

    /// Averaged stress tensor of a node.
    pub fn tensor(&self, node_id: usize) -> Result<StressTensor> {
        let values = self.get(node_id)?;
        if values.len() != 6 {
            return Err(FatigueError::Results(format!(
                "node {} holds {} values, not a stress tensor",
                node_id,
                values.len()
            )));
        }
        let mut components = [0.0; 6];
        components.copy_from_slice(values);
        Ok(StressTensor::new(components))
    }

    /// Averaged scalar of a node.
    pub fn scalar(&self, node_id: usize) -> Result<f64> {
        match self.get(node_id)? {
            [value] => Ok(*value),
            values => Err(FatigueError::Results(format!(
                "node {} holds {} values, not a scalar",
                node_id,
                values.len()
            ))),
        }
    }
}

enum Occurrence {
    /// Sum of the corner values over the connected elements and their count.
    Corner(Vec<f64>, usize),
    /// Midside node between two corner nodes.
    Midside([usize; 2]),
}

fn scan_node(mesh: &dyn MeshProvider, reader: &dyn ResultReader, source: Source, node_id: usize) -> Result<Occurrence> {
    let connected = mesh.connected_elements(node_id)?;
    if connected.is_empty() {
        return Err(FatigueError::Mesh(format!("node {} is not connected to any element", node_id)));
    }

    let mut sum = vec![0.0; source.width()];
    for &element_id in connected {
        let element = mesh.element(element_id)?;
        let local = element.local_index(node_id).ok_or_else(|| {
            FatigueError::Mesh(format!("element {} does not contain node {}", element_id, node_id))
        })?;

        if local < element.corner_count() {
            let values = source.corner_values(reader, element_id, local)?;
            for (total, value) in sum.iter_mut().zip(values) {
                *total += value;
            }
        } else {
            let [first, second] = midside_corners(element.family, local).ok_or_else(|| {
                FatigueError::Mesh(format!(
                    "no midside entry for local node {} of a {} element",
                    local,
                    element.family.text()
                ))
            })?;
            return Ok(Occurrence::Midside([element.nodes[first], element.nodes[second]]));
        }
    }
    Ok(Occurrence::Corner(sum, connected.len()))
}

fn corner_average(
    mesh: &dyn MeshProvider,
    reader: &dyn ResultReader,
    source: Source,
    node_id: usize,
) -> Result<Vec<f64>> {
    match scan_node(mesh, reader, source, node_id)? {
        Occurrence::Corner(sum, count) => Ok(sum.into_iter().map(|v| v / count as f64).collect()),
        Occurrence::Midside(_) => Err(FatigueError::Mesh(format!(
            "node {} was expected to be a corner node",
            node_id
        ))),
    }
}

/// Average the stored element values onto the given nodes.
pub fn average(mesh: &dyn MeshProvider, reader: &dyn ResultReader, source: Source, nodes: &[usize]) -> Result<NodalField> {
    let mut field = NodalField::default();
    let mut midside = Vec::new();

    for &node_id in nodes {
        if field.values.contains_key(&node_id) {
            continue;
        }
        match scan_node(mesh, reader, source, node_id)? {
            Occurrence::Corner(sum, count) => {
                let average = sum.into_iter().map(|v| v / count as f64).collect();
                field.values.insert(node_id, average);
            }
            Occurrence::Midside(corners) => midside.push((node_id, corners)),
        }
    }

    // corners outside the requested nodes are averaged as they are needed
    let mut extra: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
    for (node_id, corners) in midside {
        let mut value = vec![0.0; source.width()];
        for corner in corners.iter() {
            let cached = field.values.get(corner).or_else(|| extra.get(corner)).cloned();
            let corner_value = match cached {
                Some(v) => v,
                None => {
                    let v = corner_average(mesh, reader, source, *corner)?;
                    extra.insert(*corner, v.clone());
                    v
                }
            };
            for (total, v) in value.iter_mut().zip(corner_value) {
                *total += v / 2.0;
            }
        }
        field.values.insert(node_id, value);
    }

    debug!("averaged {:?} onto {} nodes", source, field.len());
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryMesh, MemoryResults};
    use crate::model::Element;
    use crate::topology::ElementFamily;
    use crate::units::StressUnit;

    fn tensor_values(per_corner: &[[f64; 6]]) -> Vec<f64> {
        per_corner.iter().flat_map(|c| c.iter().copied()).collect()
    }

    // two quad8 elements sharing the edge 2-3 with midside node 12
    fn two_quads() -> MemoryMesh {
        MemoryMesh::new(vec![
            Element {
                id: 1,
                family: ElementFamily::Quad8,
                nodes: vec![1, 2, 3, 4, 10, 12, 13, 14],
            },
            Element {
                id: 2,
                family: ElementFamily::Quad8,
                nodes: vec![2, 5, 6, 3, 15, 16, 17, 12],
            },
        ])
    }

    fn results() -> MemoryResults {
        let mut results = MemoryResults::new(StressUnit::MPa);
        results.insert(
            1,
            Quantity::Stress,
            1,
            tensor_values(&[[1.0; 6], [10.0; 6], [20.0; 6], [4.0; 6]]),
        );
        results.insert(
            1,
            Quantity::Stress,
            2,
            tensor_values(&[[30.0; 6], [5.0; 6], [6.0; 6], [40.0; 6]]),
        );
        results
    }

    #[test]
    fn corners_divide_by_connected_count() {
        let field = average(&two_quads(), &results(), Source::Stress(1), &[2, 3, 1]).unwrap();
        assert_eq!(field.tensor(2).unwrap().xx(), 20.0);
        assert_eq!(field.tensor(3).unwrap().yz(), 30.0);
        assert_eq!(field.tensor(1).unwrap().zz(), 1.0);
    }

    #[test]
    fn midside_is_mean_of_its_corners() {
        let field = average(&two_quads(), &results(), Source::Stress(1), &[2, 12, 3]).unwrap();
        assert_eq!(field.tensor(12).unwrap().xy(), 25.0);

        // node 10 lies between 1 and 2, neither of them requested
        let field = average(&two_quads(), &results(), Source::Stress(1), &[10]).unwrap();
        assert_eq!(field.len(), 1);
        assert_eq!(field.tensor(10).unwrap().xx(), (1.0 + 20.0) / 2.0);
    }

    #[test]
    fn harmonic_corners_carry_the_imaginary_sign() {
        let mesh = MemoryMesh::new(vec![Element {
            id: 7,
            family: ElementFamily::Tri3,
            nodes: vec![1, 2, 3],
        }]);
        let mut results = MemoryResults::new(StressUnit::Pa);
        results.insert(4, Quantity::Stress, 7, tensor_values(&[[3.0; 6], [0.0; 6], [1.0; 6]]));
        results.insert(5, Quantity::Stress, 7, tensor_values(&[[4.0; 6], [0.0; 6], [-1.0; 6]]));

        let field = average(&mesh, &results, Source::Harmonic(4), &[1, 3]).unwrap();
        assert_eq!(field.tensor(1).unwrap().xx(), 5.0);
        assert!((field.tensor(3).unwrap().xz() + 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn psd_values_are_scalars() {
        let mesh = two_quads();
        let mut results = MemoryResults::new(StressUnit::MPa);
        results.insert(2, Quantity::StressPsd, 1, vec![1.0, 2.0, 3.0, 4.0]);
        results.insert(2, Quantity::StressPsd, 2, vec![6.0, 7.0, 8.0, 9.0]);

        let field = average(&mesh, &results, Source::Psd(2), &[2, 3, 12]).unwrap();
        assert_eq!(field.scalar(2).unwrap(), 4.0);
        assert_eq!(field.scalar(3).unwrap(), 6.0);
        assert_eq!(field.scalar(12).unwrap(), 5.0);
        assert!(field.tensor(2).is_err());
    }

    #[test]
    fn unknown_nodes_are_mesh_errors() {
        let result = average(&two_quads(), &results(), Source::Stress(1), &[99]);
        assert!(matches!(result, Err(FatigueError::Mesh(_))));
    }

    #[test]
    fn missing_sets_are_result_errors() {
        let result = average(&two_quads(), &results(), Source::Stress(3), &[1]);
        assert!(matches!(result, Err(FatigueError::Results(_))));
    }
}
