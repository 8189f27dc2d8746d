//! Boundary node and side sets from the ID grids.
//!
//! Each of the six boundary sets projects an ID grid onto one outer face.
//! Inactive cells leave zeros in the grids, so the projector descends each
//! column from the chosen face into the first non-zero entry; the boundary
//! of the mesh is wherever the active region starts.

use crate::model::{NodeSet, SideSet};
use ndarray::ArrayView3;

/// Boundary set names in emission order.
pub const BOUNDARY_NAMES: [&str; 6] = ["bottom", "front", "left", "right", "back", "top"];

/// HEX8 local face numbers matching [`BOUNDARY_NAMES`].
pub const BOUNDARY_FACES: [i32; 6] = [5, 1, 4, 2, 3, 6];

/// The six boundary faces in emission order: (projection axis, far slab).
const FACES: [(usize, bool); 6] = [
    (0, false), // bottom  k = 0
    (1, false), // front   j = 0
    (2, false), // left    i = 0
    (2, true),  // right   i = max
    (1, true),  // back    j = max
    (0, true),  // top     k = max
];

/// Build the six boundary node sets from the corner-ID lattice.
pub fn node_sets(node_ids: ArrayView3<'_, i64>) -> Vec<NodeSet> {
    FACES
        .iter()
        .zip(BOUNDARY_NAMES)
        .map(|(&(axis, from_end), name)| NodeSet {
            name: name.to_string(),
            nodes: project_face(node_ids, axis, from_end),
        })
        .collect()
}

/// Build the six boundary side sets from the element-ID grid.
pub fn side_sets(elem_ids: ArrayView3<'_, i64>) -> Vec<SideSet> {
    FACES
        .iter()
        .zip(BOUNDARY_NAMES)
        .zip(BOUNDARY_FACES)
        .map(|((&(axis, from_end), name), face)| {
            let elements = project_face(elem_ids, axis, from_end);
            let sides = vec![face; elements.len()];
            SideSet {
                name: name.to_string(),
                elements,
                sides,
            }
        })
        .collect()
}

/// Swap the bottom and top entries after a Z flip.
///
/// The k = 0 slab is geometrically on top once Z is negated: the first and
/// last sets trade names, and their side sets trade face numbers (5 <-> 6).
pub fn flip_vertical(node_sets: &mut [NodeSet], side_sets: &mut [SideSet]) {
    if let [first, .., last] = node_sets {
        std::mem::swap(&mut first.name, &mut last.name);
    }
    if let [first, .., last] = side_sets {
        std::mem::swap(&mut first.name, &mut last.name);
        for side in &mut first.sides {
            *side = 6;
        }
        for side in &mut last.sides {
            *side = 5;
        }
    }
}

/// First non-zero entry of each column of the chosen boundary face, sorted
/// and deduplicated.
fn project_face(ids: ArrayView3<'_, i64>, axis: usize, from_end: bool) -> Vec<i64> {
    let (d0, d1, d2) = ids.dim();
    let dim = [d0, d1, d2];
    let (u_axis, v_axis) = match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };

    let mut values = Vec::new();
    for u in 0..dim[u_axis] {
        for v in 0..dim[v_axis] {
            for w in 0..dim[axis] {
                let w = if from_end { dim[axis] - 1 - w } else { w };
                let mut index = [0usize; 3];
                index[axis] = w;
                index[u_axis] = u;
                index[v_axis] = v;
                let id = ids[index];
                if id > 0 {
                    values.push(id);
                    break;
                }
            }
        }
    }

    values.sort_unstable();
    values.dedup();
    values
}
