//! Earth model importers.

pub mod eclipse;
pub mod leapfrog;
