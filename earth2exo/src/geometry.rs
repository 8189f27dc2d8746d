//! Pillar-grid geometry: COORD and ZCORN arrays to per-cell corner
//! coordinates.
//!
//! A corner-point grid stores one (x, y) position per pillar and eight
//! independent depths per cell. Everything downstream works on a doubled
//! (2nz, 2ny, 2nx) lattice in which every cell-corner slot is distinct,
//! and on `num_cells x 8` matrices in the fixed right-hand corner order:
//! the bottom face counter-clockwise viewed from +k, that is (i,j),
//! (i+1,j), (i+1,j+1), (i,j+1), then the top face in the same order.

use ndarray::{Array2, Array3, ArrayView3};

/// Expand the (ny+1, nx+1, 6) COORD pillar array into per-corner X and Y
/// lattices of shape (2nz, 2ny, 2nx).
///
/// Each internal pillar is shared by the adjacent cells on both sides, so
/// it appears twice along each horizontal axis; border pillars appear
/// once. The (x, y) values repeat unchanged across all 2nz depth layers.
pub fn expand_pillars(coord: &Array3<f64>, nz: usize) -> (Array3<f64>, Array3<f64>) {
    let ny = coord.shape()[0] - 1;
    let nx = coord.shape()[1] - 1;

    let mut xcorn = Array3::zeros((2 * nz, 2 * ny, 2 * nx));
    let mut ycorn = Array3::zeros((2 * nz, 2 * ny, 2 * nx));

    for jj in 0..2 * ny {
        // Doubling and stripping the borders maps lattice position p back
        // to pillar index (p + 1) / 2.
        let j = (jj + 1) / 2;
        for ii in 0..2 * nx {
            let i = (ii + 1) / 2;
            let x = coord[[j, i, 0]];
            let y = coord[[j, i, 1]];
            for kk in 0..2 * nz {
                xcorn[[kk, jj, ii]] = x;
                ycorn[[kk, jj, ii]] = y;
            }
        }
    }

    (xcorn, ycorn)
}

/// Transform the (x, y) entries of COORD into the MAPAXES frame, in place.
///
/// MAPAXES carries three 2D points: a point on the map Y axis, the origin,
/// and a point on the map X axis. Each pillar position becomes its
/// projection onto the normalized axis vectors, relative to the origin.
pub fn apply_mapaxes(coord: &mut Array3<f64>, mapaxes: &[f64]) {
    let (xorigin, yorigin) = (mapaxes[2], mapaxes[3]);
    let xvec = normalize([mapaxes[4] - xorigin, mapaxes[5] - yorigin]);
    let yvec = normalize([mapaxes[0] - xorigin, mapaxes[1] - yorigin]);

    let (npy, npx, _) = coord.dim();
    for j in 0..npy {
        for i in 0..npx {
            let dx = coord[[j, i, 0]] - xorigin;
            let dy = coord[[j, i, 1]] - yorigin;
            coord[[j, i, 0]] = xvec[0] * dx + xvec[1] * dy;
            coord[[j, i, 1]] = yvec[0] * dx + yvec[1] * dy;
        }
    }
}

fn normalize(v: [f64; 2]) -> [f64; 2] {
    let len = (v[0] * v[0] + v[1] * v[1]).sqrt();
    [v[0] / len, v[1] / len]
}

/// Gather a doubled corner lattice into a `num_cells x 8` matrix, corners
/// in right-hand order, cells in raster (k, j, i) order.
pub fn cell_corners(corners: ArrayView3<'_, f64>) -> Array2<f64> {
    let (dnz, dny, dnx) = corners.dim();
    let num_cells = dnz * dny * dnx / 8;
    let mut out = Array2::zeros((num_cells, 8));

    let mut cell = 0;
    for k in (0..dnz).step_by(2) {
        for j in (0..dny).step_by(2) {
            for i in (0..dnx).step_by(2) {
                out[[cell, 0]] = corners[[k, j, i]];
                out[[cell, 1]] = corners[[k, j, i + 1]];
                out[[cell, 2]] = corners[[k, j + 1, i + 1]];
                out[[cell, 3]] = corners[[k, j + 1, i]];
                out[[cell, 4]] = corners[[k + 1, j, i]];
                out[[cell, 5]] = corners[[k + 1, j, i + 1]];
                out[[cell, 6]] = corners[[k + 1, j + 1, i + 1]];
                out[[cell, 7]] = corners[[k + 1, j + 1, i]];
                cell += 1;
            }
        }
    }

    out
}
