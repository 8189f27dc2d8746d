//! The mesh aggregate passed from the importers to the writer.

use ndarray::{Array2, Array3};

/// Near-equality predicate for corner depths.
///
/// Two depths are close when `|a - b| <= atol + rtol * |b|`. Fault
/// detection is sensitive to this at faults of very small throw, so both
/// knobs sit on [`ConvertOptions`] rather than being hard-coded.
#[derive(Debug, Copy, Clone)]
pub struct Tolerance {
    /// Relative tolerance, scaled by the magnitude of the reference value
    pub rtol: f64,
    /// Absolute tolerance
    pub atol: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            rtol: 1e-5,
            atol: 1e-8,
        }
    }
}

impl Tolerance {
    /// True when `a` is within tolerance of the reference value `b`.
    pub fn is_close(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.atol + self.rtol * b.abs()
    }
}

/// Knobs controlling mesh construction.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Negate all Z coordinates
    pub flip_z: bool,
    /// Transform X/Y coordinates into the MAPAXES frame
    pub use_mapaxes: bool,
    /// Skip boundary node sets
    pub omit_nodesets: bool,
    /// Skip boundary side sets
    pub omit_sidesets: bool,
    /// Corner-depth equality tolerance
    pub tolerance: Tolerance,
}

/// A named value vector, aligned to element IDs or node IDs.
///
/// Kept as an ordered list rather than a map so variables reach the file in
/// the order they were read, under the names they were read with.
#[derive(Debug, Clone)]
pub struct FieldVar {
    /// Variable name as it appeared in the input
    pub name: String,
    /// One value per element (or node), indexed by ID - 1
    pub values: Vec<f64>,
}

/// A named boundary node set.
#[derive(Debug, Clone)]
pub struct NodeSet {
    /// Set name
    pub name: String,
    /// Member node IDs, ascending
    pub nodes: Vec<i64>,
}

/// A named boundary side set: element IDs with parallel local face numbers.
#[derive(Debug, Clone)]
pub struct SideSet {
    /// Set name
    pub name: String,
    /// Member element IDs, ascending
    pub elements: Vec<i64>,
    /// Local face number (1..=6) per member
    pub sides: Vec<i32>,
}

/// All components of an Exodus II mesh.
///
/// Built in a single pass by a reader, consumed in a single pass by the
/// writer; nothing mutates it in between.
///
/// Element IDs are 1-based and grouped by block: ordering elements by
/// ascending block tag gives the sequence `1..=num_elems` without gaps.
/// `elem_nodes`, `block_ids` and every element variable are stored in that
/// element-ID order, so per-block slices are contiguous runs.
#[derive(Debug, Clone)]
pub struct ExodusModel {
    /// Spatial dimension (always 3 for these grids)
    pub dim: usize,
    /// Nodal X coordinates, indexed by node ID - 1
    pub xcoords: Vec<f64>,
    /// Nodal Y coordinates, indexed by node ID - 1
    pub ycoords: Vec<f64>,
    /// Nodal Z coordinates, indexed by node ID - 1
    pub zcoords: Vec<f64>,
    /// Node ID of every cell-corner slot of the doubled (2nz, 2ny, 2nx)
    /// lattice; 0 where no active cell owns the corner
    pub node_ids: Array3<i64>,
    /// Element ID per cell of the (nz, ny, nx) grid; 0 for inactive cells
    pub elem_ids: Array3<i64>,
    /// `num_elems x 8` connectivity, 1-based node IDs, right-hand order
    pub elem_nodes: Array2<i64>,
    /// Block tag per element
    pub block_ids: Vec<i64>,
    /// Elemental variables in input order
    pub elem_vars: Vec<FieldVar>,
    /// Nodal variables in input order
    pub node_vars: Vec<FieldVar>,
    /// Boundary node sets (bottom, front, left, right, back, top)
    pub node_sets: Vec<NodeSet>,
    /// Boundary side sets, parallel to `node_sets`
    pub side_sets: Vec<SideSet>,
}

impl ExodusModel {
    /// Number of nodes in the mesh.
    pub fn num_nodes(&self) -> usize {
        self.xcoords.len()
    }

    /// Number of elements in the mesh.
    pub fn num_elems(&self) -> usize {
        self.elem_nodes.nrows()
    }

    /// Unique block tags in ascending order.
    pub fn unique_block_ids(&self) -> Vec<i64> {
        let mut ids = self.block_ids.clone();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
