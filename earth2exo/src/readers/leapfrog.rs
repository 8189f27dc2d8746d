//! Reader for Leapfrog Geothermal CSV exports.
//!
//! A Leapfrog export is a pair of CSV files, `<base>_cell.csv` and
//! `<base>_node.csv`, describing a strictly regular grid: no faults, no
//! inactive cells, a single block. The header states the grid size as
//! `size in blocks: NX NY NZ =`; ten header lines precede the column row,
//! and the first seven columns of each table are bookkeeping. Remaining
//! cell columns become element variables, remaining node columns nodal
//! variables.
//!
//! Because every corner is shared, the mesh goes through a first-come
//! corner numbering over the (nz+1, ny+1, nx+1) node lattice instead of
//! the fault-aware deduplicator.

use crate::cli::{ConvertError, Result};
use crate::model::{ConvertOptions, ExodusModel, FieldVar};
use crate::sets;
use ndarray::{Array2, Array3};
use std::path::Path;

/// Leading bookkeeping columns before the named properties.
const BOOKKEEPING_COLUMNS: usize = 7;

/// Header lines preceding the column row.
const HEADER_LINES: usize = 10;

/// Corner offsets (dk, dj, di) in right-hand order.
const CELL_CORNERS: [(usize, usize, usize); 8] = [
    (0, 0, 0),
    (0, 0, 1),
    (0, 1, 1),
    (0, 1, 0),
    (1, 0, 0),
    (1, 0, 1),
    (1, 1, 1),
    (1, 1, 0),
];

/// A parsed CSV table: column headers and per-column values.
#[derive(Debug)]
struct Table {
    headers: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl Table {
    fn column(&self, name: &str, path: &str) -> Result<&[f64]> {
        self.headers
            .iter()
            .position(|h| h.as_str() == name)
            .map(|idx| self.columns[idx].as_slice())
            .ok_or_else(|| ConvertError::MissingColumn {
                column: name.to_string(),
                path: path.to_string(),
            })
    }
}

/// Parse a Leapfrog export and build the mesh model.
///
/// `path` is the export base name; the cell and node tables are read from
/// `<base>_cell.csv` and `<base>_node.csv` beside it.
pub fn parse(path: &Path, options: &ConvertOptions) -> Result<ExodusModel> {
    let cell_path = format!("{}_cell.csv", path.display());
    let node_path = format!("{}_node.csv", path.display());

    let cell_text = std::fs::read_to_string(&cell_path)?;
    let node_text = std::fs::read_to_string(&node_path)?;

    let (nx, ny, nz) =
        block_size(&cell_text).ok_or_else(|| ConvertError::MissingBlockSize(cell_path.clone()))?;

    let cell_table = read_table(&cell_text, &cell_path)?;
    let node_table = read_table(&node_text, &node_path)?;

    println!("Finished parsing Leapfrog file");

    let num_cells = nx * ny * nz;
    let num_nodes = (nx + 1) * (ny + 1) * (nz + 1);

    // First-come corner numbering over the cell raster: each cell labels
    // its eight corners in right-hand order, corners already labelled by
    // an earlier cell keep their number.
    let mut node_ids = Array3::<i64>::zeros((nz + 1, ny + 1, nx + 1));
    let mut next = 1i64;
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                for &(dk, dj, di) in &CELL_CORNERS {
                    let slot = &mut node_ids[[k + dk, j + dj, i + di]];
                    if *slot == 0 {
                        *slot = next;
                        next += 1;
                    }
                }
            }
        }
    }

    // Connectivity and element IDs in raster order, one block.
    let mut elem_nodes = Array2::<i64>::zeros((num_cells, 8));
    let mut elem_ids = Array3::<i64>::zeros((nz, ny, nx));
    let mut elem = 0usize;
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                for (c, &(dk, dj, di)) in CELL_CORNERS.iter().enumerate() {
                    elem_nodes[[elem, c]] = node_ids[[k + dk, j + dj, i + di]];
                }
                elem += 1;
                elem_ids[[k, j, i]] = elem as i64;
            }
        }
    }

    // Coordinates and nodal variables arrive in lattice raster order and
    // are reordered to node-ID order.
    let to_node_order = |lattice: &[f64]| -> Vec<f64> {
        let mut values = vec![0.0; num_nodes];
        let mut index = 0;
        for k in 0..=nz {
            for j in 0..=ny {
                for i in 0..=nx {
                    values[(node_ids[[k, j, i]] - 1) as usize] = lattice[index];
                    index += 1;
                }
            }
        }
        values
    };

    let mut coords = Vec::with_capacity(3);
    for axis in ["X", "Y", "Z"] {
        let column = node_table.column(axis, &node_path)?;
        if column.len() != num_nodes {
            return Err(ConvertError::WrongCount {
                keyword: format!("node {}", axis),
                expected: num_nodes,
                actual: column.len(),
            });
        }
        coords.push(to_node_order(column));
    }
    let zcoords = coords.pop().unwrap_or_default();
    let ycoords = coords.pop().unwrap_or_default();
    let xcoords = coords.pop().unwrap_or_default();

    let mut node_vars = Vec::new();
    for (header, column) in node_table
        .headers
        .iter()
        .zip(&node_table.columns)
        .skip(BOOKKEEPING_COLUMNS)
    {
        if column.len() != num_nodes {
            return Err(ConvertError::WrongCount {
                keyword: header.clone(),
                expected: num_nodes,
                actual: column.len(),
            });
        }
        node_vars.push(FieldVar {
            name: header.clone(),
            values: to_node_order(column),
        });
    }

    // Cell raster order is already element-ID order.
    let mut elem_vars = Vec::new();
    for (header, column) in cell_table
        .headers
        .iter()
        .zip(&cell_table.columns)
        .skip(BOOKKEEPING_COLUMNS)
    {
        if column.len() != num_cells {
            return Err(ConvertError::WrongCount {
                keyword: header.clone(),
                expected: num_cells,
                actual: column.len(),
            });
        }
        elem_vars.push(FieldVar {
            name: header.clone(),
            values: column.clone(),
        });
    }

    let mut boundary_node_sets = Vec::new();
    let mut boundary_side_sets = Vec::new();
    if !options.omit_nodesets {
        boundary_node_sets = sets::node_sets(node_ids.view());
    }
    if !options.omit_sidesets {
        boundary_side_sets = sets::side_sets(elem_ids.view());
    }

    Ok(ExodusModel {
        dim: 3,
        xcoords,
        ycoords,
        zcoords,
        node_ids,
        elem_ids,
        elem_nodes,
        block_ids: vec![0; num_cells],
        elem_vars,
        node_vars,
        node_sets: boundary_node_sets,
        side_sets: boundary_side_sets,
    })
}

/// Pull the grid size from the `size in blocks: NX NY NZ =` header line.
fn block_size(content: &str) -> Option<(usize, usize, usize)> {
    let start = content.find("size in blocks:")? + "size in blocks:".len();
    let rest = &content[start..];
    let end = rest.find('=')?;
    let dims: Vec<usize> = rest[..end]
        .split_whitespace()
        .filter_map(|token| token.parse().ok())
        .collect();
    if dims.len() >= 3 {
        Some((dims[0], dims[1], dims[2]))
    } else {
        None
    }
}

/// Read a CSV table: skip the header lines, take the column row, then
/// parse every remaining row as numbers.
fn read_table(content: &str, path: &str) -> Result<Table> {
    let mut lines = content.lines().skip(HEADER_LINES);
    let header_line = lines
        .next()
        .ok_or_else(|| ConvertError::TruncatedTable(path.to_string()))?;
    let headers: Vec<String> = header_line
        .split(',')
        .map(|header| header.trim().to_string())
        .collect();

    let mut columns = vec![Vec::new(); headers.len()];
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        for (idx, token) in line.split(',').enumerate() {
            if idx >= columns.len() {
                break;
            }
            let value: f64 = token.trim().parse().map_err(|_| ConvertError::BadToken {
                keyword: path.to_string(),
                token: token.trim().to_string(),
            })?;
            columns[idx].push(value);
        }
    }

    Ok(Table { headers, columns })
}
