//! Helper functions for the numbered NetCDF names of the Exodus convention,
//! and fixed-width storage of name strings.
//!
//! Centralizing these keeps the `{kind}{index + 1}` formatting in one place
//! and out of the operation code.

use crate::constants::{LEN_NAME, MAX_NAME_LENGTH};
use crate::error::{ExodusError, Result};

// =============================================================================
// Dimension names
// =============================================================================

/// Dimension holding the element count of the block in `slot` (0-based).
pub(crate) fn block_entries_dim(slot: usize) -> String {
    format!("num_el_in_blk{}", slot + 1)
}

/// Dimension holding the nodes-per-element count of the block in `slot`.
pub(crate) fn block_nodes_dim(slot: usize) -> String {
    format!("num_nod_per_el{}", slot + 1)
}

/// Dimension holding the entry count of the side set in `slot`.
pub(crate) fn side_set_entries_dim(slot: usize) -> String {
    format!("num_side_ss{}", slot + 1)
}

/// Dimension holding the entry count of the node set in `slot`.
pub(crate) fn node_set_entries_dim(slot: usize) -> String {
    format!("num_nod_ns{}", slot + 1)
}

// =============================================================================
// Variable names
// =============================================================================

/// Connectivity variable of the block in `slot`.
pub(crate) fn connect_var(slot: usize) -> String {
    format!("connect{}", slot + 1)
}

/// Element-id array of the side set in `slot`.
pub(crate) fn side_set_elem_var(slot: usize) -> String {
    format!("elem_ss{}", slot + 1)
}

/// Face-number array of the side set in `slot`.
pub(crate) fn side_set_side_var(slot: usize) -> String {
    format!("side_ss{}", slot + 1)
}

/// Node-id array of the node set in `slot`.
pub(crate) fn node_set_node_var(slot: usize) -> String {
    format!("node_ns{}", slot + 1)
}

/// Values of element variable `var` (0-based) on the block in `slot`.
pub(crate) fn elem_var_vals(var: usize, slot: usize) -> String {
    format!("vals_elem_var{}eb{}", var + 1, slot + 1)
}

/// Values of nodal variable `var` (0-based).
pub(crate) fn nodal_var_vals(var: usize) -> String {
    format!("vals_nod_var{}", var + 1)
}

/// Values of side set variable `var` on the side set in `slot`.
pub(crate) fn sset_var_vals(var: usize, slot: usize) -> String {
    format!("vals_sset_var{}ss{}", var + 1, slot + 1)
}

/// Values of node set variable `var` on the node set in `slot`.
pub(crate) fn nset_var_vals(var: usize, slot: usize) -> String {
    format!("vals_nset_var{}ns{}", var + 1, slot + 1)
}

// =============================================================================
// Name storage
// =============================================================================

/// Write `name` into row `row` of the per-character name array `var_name`.
///
/// Names are stored one character per slot and null-padded to `len_name`;
/// readers recover them by joining the bytes and stripping the padding.
pub(crate) fn write_name_row(
    nc: &mut netcdf::FileMut,
    var_name: &str,
    row: usize,
    name: &str,
) -> Result<()> {
    if name.len() > MAX_NAME_LENGTH {
        return Err(ExodusError::StringTooLong {
            max: MAX_NAME_LENGTH,
            actual: name.len(),
        });
    }

    let mut padded = [0u8; LEN_NAME];
    padded[..name.len()].copy_from_slice(name.as_bytes());

    let mut var = nc
        .variable_mut(var_name)
        .ok_or_else(|| ExodusError::VariableNotDefined(var_name.to_string()))?;
    var.put_values(&padded, (row..row + 1, 0..LEN_NAME))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_names() {
        assert_eq!(connect_var(0), "connect1");
        assert_eq!(block_entries_dim(1), "num_el_in_blk2");
        assert_eq!(block_nodes_dim(0), "num_nod_per_el1");
        assert_eq!(side_set_entries_dim(5), "num_side_ss6");
        assert_eq!(side_set_elem_var(2), "elem_ss3");
        assert_eq!(side_set_side_var(2), "side_ss3");
        assert_eq!(node_set_entries_dim(0), "num_nod_ns1");
        assert_eq!(node_set_node_var(3), "node_ns4");
    }

    #[test]
    fn test_value_names() {
        assert_eq!(elem_var_vals(0, 0), "vals_elem_var1eb1");
        assert_eq!(elem_var_vals(1, 2), "vals_elem_var2eb3");
        assert_eq!(nodal_var_vals(0), "vals_nod_var1");
        assert_eq!(sset_var_vals(0, 4), "vals_sset_var1ss5");
        assert_eq!(nset_var_vals(2, 0), "vals_nset_var3ns1");
    }
}
