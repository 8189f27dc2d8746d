//! Variable definitions and value I/O.
//!
//! Each of the four scopes (elemental, nodal, side set, node set) carries a
//! registry: a count set once, names registered by 1-based index, and value
//! arrays created lazily on first write. Names may be registered in any
//! order as long as the count precedes them and every value write follows
//! the registration of its name.

use crate::error::{EntityId, ExodusError, Result};
use crate::naming;
use crate::types::VarScope;
use crate::ExodusFile;

impl ExodusFile {
    /// Set the number of elemental variables.
    pub fn set_element_variable_number(&mut self, count: usize) -> Result<()> {
        self.define_variables(VarScope::Element, count)
    }

    /// Register the name of elemental variable `index` (1-based).
    pub fn put_element_variable_name(&mut self, name: &str, index: usize) -> Result<()> {
        self.put_variable_name(VarScope::Element, name, index)
    }

    /// Write the values of an elemental variable on one block at `step`.
    ///
    /// The value array must hold one entry per element of the block.
    pub fn put_element_variable_values(
        &mut self,
        blk_id: EntityId,
        name: &str,
        step: usize,
        values: &[f64],
    ) -> Result<()> {
        let var = self.variable_index(VarScope::Element, name)?;
        let slot = self.find_block_slot(blk_id)?;
        let num_entries = self.meta.blocks[slot].num_elems;
        self.put_values_array(
            &naming::elem_var_vals(var, slot),
            &naming::block_entries_dim(slot),
            step,
            num_entries,
            values,
        )
    }

    /// Set the number of nodal variables.
    pub fn set_node_variable_number(&mut self, count: usize) -> Result<()> {
        self.define_variables(VarScope::Nodal, count)
    }

    /// Register the name of nodal variable `index` (1-based).
    pub fn put_node_variable_name(&mut self, name: &str, index: usize) -> Result<()> {
        self.put_variable_name(VarScope::Nodal, name, index)
    }

    /// Write the values of a nodal variable at `step`, one entry per node.
    pub fn put_node_variable_values(
        &mut self,
        name: &str,
        step: usize,
        values: &[f64],
    ) -> Result<()> {
        let var = self.variable_index(VarScope::Nodal, name)?;
        let num_entries = self.meta.num_nodes;
        self.put_values_array(
            &naming::nodal_var_vals(var),
            "num_nodes",
            step,
            num_entries,
            values,
        )
    }

    /// Set the number of side set variables.
    pub fn set_side_set_variable_number(&mut self, count: usize) -> Result<()> {
        self.define_variables(VarScope::SideSet, count)
    }

    /// Register the name of side set variable `index` (1-based).
    pub fn put_side_set_variable_name(&mut self, name: &str, index: usize) -> Result<()> {
        self.put_variable_name(VarScope::SideSet, name, index)
    }

    /// Write the values of a side set variable on one side set at `step`.
    pub fn put_side_set_variable_values(
        &mut self,
        set_id: EntityId,
        name: &str,
        step: usize,
        values: &[f64],
    ) -> Result<()> {
        let var = self.variable_index(VarScope::SideSet, name)?;
        let slot = self.find_side_set_slot(set_id)?;
        let num_entries = self.meta.side_sets[slot].num_entries;
        self.put_values_array(
            &naming::sset_var_vals(var, slot),
            &naming::side_set_entries_dim(slot),
            step,
            num_entries,
            values,
        )
    }

    /// Set the number of node set variables.
    pub fn set_node_set_variable_number(&mut self, count: usize) -> Result<()> {
        self.define_variables(VarScope::NodeSet, count)
    }

    /// Register the name of node set variable `index` (1-based).
    pub fn put_node_set_variable_name(&mut self, name: &str, index: usize) -> Result<()> {
        self.put_variable_name(VarScope::NodeSet, name, index)
    }

    /// Write the values of a node set variable on one node set at `step`.
    pub fn put_node_set_variable_values(
        &mut self,
        set_id: EntityId,
        name: &str,
        step: usize,
        values: &[f64],
    ) -> Result<()> {
        let var = self.variable_index(VarScope::NodeSet, name)?;
        let slot = self.find_node_set_slot(set_id)?;
        let num_entries = self.meta.node_sets[slot].num_entries;
        self.put_values_array(
            &naming::nset_var_vals(var, slot),
            &naming::node_set_entries_dim(slot),
            step,
            num_entries,
            values,
        )
    }

    /// Create the count dimension and name registry of a scope.
    fn define_variables(&mut self, scope: VarScope, count: usize) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        self.nc.add_dimension(scope.count_dim(), count)?;
        self.nc
            .add_variable::<u8>(scope.name_registry(), &[scope.count_dim(), "len_name"])?;
        *self.var_names_mut(scope) = vec![None; count];
        Ok(())
    }

    /// Store a registered name, both in the file and in the metadata cache.
    fn put_variable_name(&mut self, scope: VarScope, name: &str, index: usize) -> Result<()> {
        let count = self.var_names(scope).len();
        if index == 0 || index > count {
            return Err(ExodusError::VariableIndexOutOfRange { index, count });
        }
        naming::write_name_row(&mut self.nc, scope.name_registry(), index - 1, name)?;
        self.var_names_mut(scope)[index - 1] = Some(name.to_string());
        Ok(())
    }

    /// 0-based slot of the registered variable `name` in a scope.
    fn variable_index(&self, scope: VarScope, name: &str) -> Result<usize> {
        self.var_names(scope)
            .iter()
            .position(|n| n.as_deref() == Some(name))
            .ok_or_else(|| ExodusError::VariableNotDefined(format!("{} variable {}", scope, name)))
    }

    /// Write one time step of a value array, creating it on first use.
    fn put_values_array(
        &mut self,
        var_name: &str,
        entries_dim: &str,
        step: usize,
        num_entries: usize,
        values: &[f64],
    ) -> Result<()> {
        if step == 0 {
            return Err(ExodusError::InvalidTimeStep(step));
        }
        if values.len() != num_entries {
            return Err(ExodusError::InvalidArrayLength {
                expected: num_entries,
                actual: values.len(),
            });
        }
        if num_entries == 0 {
            return Ok(());
        }

        if self.nc.variable(var_name).is_none() {
            self.nc
                .add_variable::<f64>(var_name, &["time_step", entries_dim])?;
        }

        let mut var = self
            .nc
            .variable_mut(var_name)
            .ok_or_else(|| ExodusError::VariableNotDefined(var_name.to_string()))?;
        var.put_values(values, (step - 1..step, 0..num_entries))?;

        Ok(())
    }

    fn var_names(&self, scope: VarScope) -> &Vec<Option<String>> {
        match scope {
            VarScope::Element => &self.meta.elem_var_names,
            VarScope::Nodal => &self.meta.nodal_var_names,
            VarScope::SideSet => &self.meta.sset_var_names,
            VarScope::NodeSet => &self.meta.nset_var_names,
        }
    }

    fn var_names_mut(&mut self, scope: VarScope) -> &mut Vec<Option<String>> {
        match scope {
            VarScope::Element => &mut self.meta.elem_var_names,
            VarScope::Nodal => &mut self.meta.nodal_var_names,
            VarScope::SideSet => &mut self.meta.sset_var_names,
            VarScope::NodeSet => &mut self.meta.nset_var_names,
        }
    }
}
