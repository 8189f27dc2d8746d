//! Core type definitions for the Exodus writer.

/// Behavior when the target path already exists at creation time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CreateMode {
    /// Overwrite an existing file
    Clobber,
    /// Fail if the file already exists
    NoClobber,
}

/// Options for creating a new Exodus file.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Creation mode (clobber or no-clobber)
    pub mode: CreateMode,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            mode: CreateMode::NoClobber,
        }
    }
}

/// Database sizes declared when a file is created.
///
/// Every count is fixed for the lifetime of the file; the writer pre-creates
/// the matching NetCDF dimensions and the status/property/name arrays sized
/// to these counts. Counts of zero create nothing.
#[derive(Debug, Clone)]
pub struct InitParams {
    /// Title of the database (max 80 characters)
    pub title: String,
    /// Number of spatial dimensions (1, 2, or 3)
    pub num_dim: usize,
    /// Number of nodes
    pub num_nodes: usize,
    /// Number of elements
    pub num_elems: usize,
    /// Number of element blocks
    pub num_elem_blocks: usize,
    /// Number of node sets
    pub num_node_sets: usize,
    /// Number of side sets
    pub num_side_sets: usize,
}

impl Default for InitParams {
    fn default() -> Self {
        Self {
            title: String::new(),
            num_dim: 3,
            num_nodes: 0,
            num_elems: 0,
            num_elem_blocks: 0,
            num_node_sets: 0,
            num_side_sets: 0,
        }
    }
}

/// The four variable registries a file can carry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VarScope {
    /// Elemental variables (one value per element, stored per block)
    Element,
    /// Nodal variables (one value per node)
    Nodal,
    /// Side set variables (one value per side set entry)
    SideSet,
    /// Node set variables (one value per node set entry)
    NodeSet,
}

impl VarScope {
    /// Dimension holding the variable count for this scope.
    pub(crate) fn count_dim(self) -> &'static str {
        match self {
            VarScope::Element => "num_elem_var",
            VarScope::Nodal => "num_nod_var",
            VarScope::SideSet => "num_sset_var",
            VarScope::NodeSet => "num_nset_var",
        }
    }

    /// Name-registry variable for this scope.
    pub(crate) fn name_registry(self) -> &'static str {
        match self {
            VarScope::Element => "name_elem_var",
            VarScope::Nodal => "name_nod_var",
            VarScope::SideSet => "name_sset_var",
            VarScope::NodeSet => "name_nset_var",
        }
    }

    /// Human-readable scope name for error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            VarScope::Element => "element",
            VarScope::Nodal => "nodal",
            VarScope::SideSet => "side set",
            VarScope::NodeSet => "node set",
        }
    }
}

impl std::fmt::Display for VarScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_options_default() {
        let opts = CreateOptions::default();
        assert_eq!(opts.mode, CreateMode::NoClobber);
    }

    #[test]
    fn test_init_params_default() {
        let params = InitParams::default();
        assert_eq!(params.num_dim, 3);
        assert_eq!(params.num_nodes, 0);
        assert_eq!(params.num_elem_blocks, 0);
    }

    #[test]
    fn test_var_scope_names() {
        assert_eq!(VarScope::Element.count_dim(), "num_elem_var");
        assert_eq!(VarScope::NodeSet.name_registry(), "name_nset_var");
        assert_eq!(VarScope::SideSet.to_string(), "side set");
    }
}
