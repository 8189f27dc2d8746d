//! earth2exo: convert corner-point reservoir earth models to Exodus II
//! meshes.
//!
//! The converter reads an ECLIPSE `.grdecl` pillar-grid description (or a
//! Leapfrog CSV export), builds a conforming HEX8 mesh with deduplicated
//! node numbering (geological faults keep their coincident corners
//! distinct, inactive cells contribute no nodes) and writes the result as
//! an Exodus II file via the `exolite` crate.
//!
//! The pipeline: a reader produces per-cell corner geometry
//! ([`geometry`]), the node numbering merges coincident corners
//! ([`numbering`]), the reader assembles the [`model::ExodusModel`]
//! aggregate with boundary sets ([`sets`]), and the driver ([`writer`])
//! walks the model through the Exodus writer.

pub mod cli;
pub mod geometry;
pub mod model;
pub mod numbering;
pub mod readers;
pub mod sets;
pub mod writer;

pub use cli::{Cli, ConvertError, FileType, Result};
pub use model::{ConvertOptions, ExodusModel, Tolerance};
