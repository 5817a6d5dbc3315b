//! Element families and the corner nodes that each midside node sits between.

use std::collections::HashMap;
use std::convert::TryFrom;

use serde::Deserialize;

/// Families of finite elements that can appear in the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum ElementFamily {
    Tri3,
    Quad4,
    Tet4,
    Pyramid5,
    Wedge6,
    Hex8,
    Tri6,
    Quad8,
    Tet10,
    Pyramid13,
    Wedge15,
    Hex20,
}

impl ElementFamily {
    pub fn text(&self) -> &'static str {
        match *self {
            ElementFamily::Tri3 => "tri3",
            ElementFamily::Quad4 => "quad4",
            ElementFamily::Tet4 => "tet4",
            ElementFamily::Pyramid5 => "pyramid5",
            ElementFamily::Wedge6 => "wedge6",
            ElementFamily::Hex8 => "hex8",
            ElementFamily::Tri6 => "tri6",
            ElementFamily::Quad8 => "quad8",
            ElementFamily::Tet10 => "tet10",
            ElementFamily::Pyramid13 => "pyramid13",
            ElementFamily::Wedge15 => "wedge15",
            ElementFamily::Hex20 => "hex20",
        }
    }

    pub fn from_text(input: &str) -> Option<ElementFamily> {
        match input.to_lowercase().as_str() {
            "tri3" => Some(ElementFamily::Tri3),
            "quad4" => Some(ElementFamily::Quad4),
            "tet4" => Some(ElementFamily::Tet4),
            "pyramid5" => Some(ElementFamily::Pyramid5),
            "wedge6" => Some(ElementFamily::Wedge6),
            "hex8" => Some(ElementFamily::Hex8),
            "tri6" => Some(ElementFamily::Tri6),
            "quad8" => Some(ElementFamily::Quad8),
            "tet10" => Some(ElementFamily::Tet10),
            "pyramid13" => Some(ElementFamily::Pyramid13),
            "wedge15" => Some(ElementFamily::Wedge15),
            "hex20" => Some(ElementFamily::Hex20),
            _ => None,
        }
    }

    /// Number of corner nodes, which come first in the node ordering.
    pub fn corner_count(&self) -> usize {
        match *self {
            ElementFamily::Tri3 | ElementFamily::Tri6 => 3,
            ElementFamily::Quad4 | ElementFamily::Quad8 => 4,
            ElementFamily::Tet4 | ElementFamily::Tet10 => 4,
            ElementFamily::Pyramid5 | ElementFamily::Pyramid13 => 5,
            ElementFamily::Wedge6 | ElementFamily::Wedge15 => 6,
            ElementFamily::Hex8 | ElementFamily::Hex20 => 8,
        }
    }

    pub fn node_count(&self) -> usize {
        match *self {
            ElementFamily::Tri6 => 6,
            ElementFamily::Quad8 => 8,
            ElementFamily::Tet10 => 10,
            ElementFamily::Pyramid13 => 13,
            ElementFamily::Wedge15 => 15,
            ElementFamily::Hex20 => 20,
            linear => linear.corner_count(),
        }
    }
}

impl TryFrom<String> for ElementFamily {
    type Error = String;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        ElementFamily::from_text(&name).ok_or_else(|| format!("unknown element family '{}'", name))
    }
}

lazy_static! {
    static ref MIDSIDE_LINKS: HashMap<ElementFamily, HashMap<usize, [usize; 2]>> = {
        let mut links = HashMap::new();

        links.insert(
            ElementFamily::Hex20,
            HashMap::from([
                (8, [0, 1]), (9, [1, 2]), (10, [2, 3]), (11, [3, 0]),
                (12, [4, 5]), (13, [5, 6]), (14, [6, 7]), (15, [7, 4]),
                (16, [0, 4]), (17, [1, 5]), (18, [2, 6]), (19, [3, 7]),
            ]),
        );

        links.insert(
            ElementFamily::Pyramid13,
            HashMap::from([
                (5, [0, 1]), (6, [1, 2]), (7, [2, 3]), (8, [3, 0]),
                (9, [0, 4]), (10, [1, 4]), (11, [2, 4]), (12, [3, 4]),
            ]),
        );

        links.insert(
            ElementFamily::Quad8,
            HashMap::from([(4, [0, 1]), (5, [1, 2]), (6, [2, 3]), (7, [3, 0])]),
        );

        links.insert(
            ElementFamily::Tet10,
            HashMap::from([
                (4, [0, 1]), (5, [1, 2]), (6, [2, 0]),
                (7, [0, 3]), (8, [1, 3]), (9, [2, 3]),
            ]),
        );

        links.insert(
            ElementFamily::Tri6,
            HashMap::from([(3, [0, 1]), (4, [1, 2]), (5, [2, 0])]),
        );

        links.insert(
            ElementFamily::Wedge15,
            HashMap::from([
                (6, [0, 1]), (7, [1, 2]), (8, [2, 0]),
                (9, [3, 4]), (10, [4, 5]), (11, [5, 3]),
                (12, [0, 3]), (13, [1, 4]), (14, [2, 5]),
            ]),
        );

        links
    };
}

/// Local indices of the two corner nodes a midside node lies between.
///
/// Returns `None` for linear families and for indices that are not
/// midside positions of the family.
pub fn midside_corners(family: ElementFamily, local_index: usize) -> Option<[usize; 2]> {
    MIDSIDE_LINKS
        .get(&family)
        .and_then(|table| table.get(&local_index))
        .copied()
}
