//! Node numbering for corner-point cells.
//!
//! Adjacent cells in a corner-point grid may or may not share corners: where
//! the depths on a shared pillar coincide one node is emitted, where they
//! differ (a geological fault) each side keeps its own node. Inactive cells
//! contribute no nodes themselves, but their corner slots are back-filled
//! with the IDs of matching active-cell corners so set construction can look
//! through them.

use crate::model::Tolerance;
use ndarray::{Array2, Array3, Array4};

/// Matching corner of the previously visited neighbor in each of the -k,
/// -j and -i directions, per local corner. `None` where the lattice point
/// is not shared with that neighbor. Corner 6 touches no predecessor and
/// always allocates a fresh node.
const PREDECESSORS: [[Option<usize>; 3]; 8] = [
    [Some(4), Some(3), Some(1)], // corner 0
    [Some(5), Some(2), None],    // corner 1
    [Some(6), None, None],       // corner 2
    [Some(7), None, Some(2)],    // corner 3
    [None, Some(7), Some(5)],    // corner 4
    [None, Some(6), None],       // corner 5
    [None, None, None],          // corner 6
    [None, None, Some(6)],       // corner 7
];

/// Number every unique node of the grid, fault check included.
///
/// `z` holds the per-cell corner depths (`num_cells x 8`, cells in raster
/// (k, j, i) order); `active` flags each cell. Returns the node ID of
/// every corner slot as an (nz, ny, nx, 8) array in which inactive cells
/// hold either 0 or the back-filled ID of a matching active corner.
///
/// Cells are scanned in raster order. Each corner of an active cell reuses
/// the ID of the first predecessor corner (-k, then -j, then -i) whose
/// depth matches within tolerance and whose slot was already numbered;
/// otherwise it allocates the next ID and back-fills every matching
/// predecessor slot still at zero, so that later lookups through the
/// intervening inactive cells find the node.
pub fn number_nodes(z: &Array2<f64>, active: &Array3<i64>, tol: Tolerance) -> Array4<i64> {
    let (nz, ny, nx) = active.dim();
    let mut ids = Array4::<i64>::zeros((nz, ny, nx, 8));
    let mut next: i64 = 1;

    let cell = |k: usize, j: usize, i: usize| (k * ny + j) * nx + i;

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                if active[[k, j, i]] == 0 {
                    continue;
                }
                for c in 0..8 {
                    let depth = z[[cell(k, j, i), c]];
                    let preds = predecessor_slots(k, j, i, c);

                    let reused = preds.iter().flatten().find_map(|&(k2, j2, i2, c2)| {
                        let id = ids[[k2, j2, i2, c2]];
                        (id != 0 && tol.is_close(depth, z[[cell(k2, j2, i2), c2]])).then_some(id)
                    });
                    if let Some(id) = reused {
                        ids[[k, j, i, c]] = id;
                        continue;
                    }

                    let id = next;
                    next += 1;
                    ids[[k, j, i, c]] = id;

                    for &(k2, j2, i2, c2) in preds.iter().flatten() {
                        if ids[[k2, j2, i2, c2]] == 0
                            && tol.is_close(depth, z[[cell(k2, j2, i2), c2]])
                        {
                            ids[[k2, j2, i2, c2]] = id;
                        }
                    }
                }
            }
        }
    }

    ids
}

/// In-range predecessor slots of corner `c` of cell (k, j, i), in -k, -j,
/// -i priority order.
fn predecessor_slots(
    k: usize,
    j: usize,
    i: usize,
    c: usize,
) -> [Option<(usize, usize, usize, usize)>; 3] {
    let row = PREDECESSORS[c];
    [
        row[0].and_then(|c2| (k > 0).then(|| (k - 1, j, i, c2))),
        row[1].and_then(|c2| (j > 0).then(|| (k, j - 1, i, c2))),
        row[2].and_then(|c2| (i > 0).then(|| (k, j, i - 1, c2))),
    ]
}

/// Scatter the per-cell corner IDs of active cells into the doubled
/// (2nz, 2ny, 2nx) lattice.
///
/// Every corner slot of every cell has its own lattice position, so faulted
/// corners stay distinct. Slots no active cell owns stay 0 and the set
/// projector descends past them.
pub fn corner_lattice(ids: &Array4<i64>, active: &Array3<i64>) -> Array3<i64> {
    let (nz, ny, nx, _) = ids.dim();
    let mut lattice = Array3::<i64>::zeros((2 * nz, 2 * ny, 2 * nx));

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                if active[[k, j, i]] == 0 {
                    continue;
                }
                lattice[[2 * k, 2 * j, 2 * i]] = ids[[k, j, i, 0]];
                lattice[[2 * k, 2 * j, 2 * i + 1]] = ids[[k, j, i, 1]];
                lattice[[2 * k, 2 * j + 1, 2 * i]] = ids[[k, j, i, 3]];
                lattice[[2 * k, 2 * j + 1, 2 * i + 1]] = ids[[k, j, i, 2]];
                lattice[[2 * k + 1, 2 * j, 2 * i]] = ids[[k, j, i, 4]];
                lattice[[2 * k + 1, 2 * j, 2 * i + 1]] = ids[[k, j, i, 5]];
                lattice[[2 * k + 1, 2 * j + 1, 2 * i]] = ids[[k, j, i, 7]];
                lattice[[2 * k + 1, 2 * j + 1, 2 * i + 1]] = ids[[k, j, i, 6]];
            }
        }
    }

    lattice
}
