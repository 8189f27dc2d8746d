//! # exolite
//!
//! A writer-only subset of the Exodus II finite element data format.
//!
//! Exodus II is a convention layered on NetCDF for storing finite element
//! meshes: nodal coordinates, element blocks with connectivity, node sets,
//! side sets, and time-dependent result variables. This crate implements the
//! part of that convention needed to *emit* such a mesh: element blocks of
//! a single topology, node and side sets, one or more time steps, and
//! elemental / nodal / set-scoped variables. Reading existing Exodus files
//! is out of scope.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use exolite::{CreateOptions, ExodusFile, InitParams};
//!
//! let params = InitParams {
//!     title: "Example mesh".into(),
//!     num_dim: 3,
//!     num_nodes: 8,
//!     num_elems: 1,
//!     num_elem_blocks: 1,
//!     ..Default::default()
//! };
//! let mut file = ExodusFile::create("mesh.e", &params, CreateOptions::default())?;
//! file.put_coord_names(&["x", "y", "z"])?;
//! file.put_coords(&x, &y, &z)?;
//! file.put_elem_blk_info(1, "HEX8", 1, 8, 0)?;
//! file.put_elem_connectivity(1, &[1, 2, 3, 4, 5, 6, 7, 8])?;
//! file.put_time(1, 0.0)?;
//! file.close()?;
//! # Ok::<(), exolite::ExodusError>(())
//! ```
//!
//! ## Module organization
//!
//! - [`error`] - Error types and result alias
//! - [`types`] - Core type definitions (CreateOptions, InitParams, ...)
//! - `file` - File handle, creation, global attributes
//! - `block` - Element block definitions and connectivity
//! - `set` - Node set and side set operations
//! - `variable` - Variable registries and value I/O
//! - `time` - Time step values

#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Public modules
pub mod error;
pub mod types;

// Internal modules
mod block;
mod file;
mod naming;
mod set;
mod time;
mod variable;

// Internal constants
mod constants;

// Re-exports for convenience
pub use error::{EntityId, ExodusError, Result};
pub use file::ExodusFile;
pub use types::{CreateMode, CreateOptions, InitParams, VarScope};
