//! Node set and side set operations.
//!
//! Sets name boundary regions for downstream solvers: a node set is a list
//! of node IDs, a side set a list of (element ID, local face number) pairs.
//! Slots are handed out in definition order, like block slots.

use crate::error::{EntityId, ExodusError, Result};
use crate::file::SetSlot;
use crate::naming;
use crate::ExodusFile;

impl ExodusFile {
    /// Write the side set name registry.
    pub fn put_side_set_names(&mut self, names: &[impl AsRef<str>]) -> Result<()> {
        if names.len() != self.meta.num_side_sets {
            return Err(ExodusError::InvalidArrayLength {
                expected: self.meta.num_side_sets,
                actual: names.len(),
            });
        }
        for (i, name) in names.iter().enumerate() {
            naming::write_name_row(&mut self.nc, "ss_names", i, name.as_ref())?;
        }
        Ok(())
    }

    /// Write the node set name registry.
    pub fn put_node_set_names(&mut self, names: &[impl AsRef<str>]) -> Result<()> {
        if names.len() != self.meta.num_node_sets {
            return Err(ExodusError::InvalidArrayLength {
                expected: self.meta.num_node_sets,
                actual: names.len(),
            });
        }
        for (i, name) in names.iter().enumerate() {
            naming::write_name_row(&mut self.nc, "ns_names", i, name.as_ref())?;
        }
        Ok(())
    }

    /// Define a side set.
    ///
    /// Allocates the next free side set slot and creates the containing
    /// dimension and the `elem_ss{N}` / `side_ss{N}` arrays. An empty set
    /// occupies its slot but creates no arrays.
    ///
    /// # Errors
    ///
    /// - `num_dist_factors` is nonzero (distribution factors are outside
    ///   this subset)
    /// - `set_id` is already in use
    /// - every declared side set slot is occupied
    pub fn put_side_set_params(
        &mut self,
        set_id: EntityId,
        num_sides: usize,
        num_dist_factors: usize,
    ) -> Result<()> {
        if num_dist_factors != 0 {
            return Err(ExodusError::Unsupported(
                "distribution factors are not supported (num_dist_factors must be 0)".to_string(),
            ));
        }
        if self.meta.side_sets.iter().any(|s| s.id == set_id) {
            return Err(ExodusError::DuplicateEntityId {
                entity_type: "side set".to_string(),
                id: set_id,
            });
        }

        let slot = self.meta.side_sets.len();
        if slot >= self.meta.num_side_sets {
            return Err(ExodusError::SlotsExhausted {
                entity_type: "side set".to_string(),
                declared: self.meta.num_side_sets,
            });
        }

        self.mark_slot("ss", slot, set_id)?;

        if num_sides > 0 {
            let dim = naming::side_set_entries_dim(slot);
            self.nc.add_dimension(&dim, num_sides)?;
            self.nc
                .add_variable::<i32>(&naming::side_set_elem_var(slot), &[&dim])?;
            self.nc
                .add_variable::<i32>(&naming::side_set_side_var(slot), &[&dim])?;
        }

        self.meta.side_sets.push(SetSlot {
            id: set_id,
            num_entries: num_sides,
        });

        Ok(())
    }

    /// Define a node set.
    ///
    /// The node set analogue of [`ExodusFile::put_side_set_params`]; a node
    /// set carries a single `node_ns{N}` array.
    pub fn put_node_set_params(
        &mut self,
        set_id: EntityId,
        num_nodes: usize,
        num_dist_factors: usize,
    ) -> Result<()> {
        if num_dist_factors != 0 {
            return Err(ExodusError::Unsupported(
                "distribution factors are not supported (num_dist_factors must be 0)".to_string(),
            ));
        }
        if self.meta.node_sets.iter().any(|s| s.id == set_id) {
            return Err(ExodusError::DuplicateEntityId {
                entity_type: "node set".to_string(),
                id: set_id,
            });
        }

        let slot = self.meta.node_sets.len();
        if slot >= self.meta.num_node_sets {
            return Err(ExodusError::SlotsExhausted {
                entity_type: "node set".to_string(),
                declared: self.meta.num_node_sets,
            });
        }

        self.mark_slot("ns", slot, set_id)?;

        if num_nodes > 0 {
            let dim = naming::node_set_entries_dim(slot);
            self.nc.add_dimension(&dim, num_nodes)?;
            self.nc
                .add_variable::<i32>(&naming::node_set_node_var(slot), &[&dim])?;
        }

        self.meta.node_sets.push(SetSlot {
            id: set_id,
            num_entries: num_nodes,
        });

        Ok(())
    }

    /// Write the element IDs and face numbers of a side set.
    ///
    /// # Errors
    ///
    /// - `set_id` is unknown
    /// - either array length differs from the declared entry count
    pub fn put_side_set(
        &mut self,
        set_id: EntityId,
        elements: &[EntityId],
        sides: &[i32],
    ) -> Result<()> {
        let slot = self.find_side_set_slot(set_id)?;
        let num_entries = self.meta.side_sets[slot].num_entries;

        for len in [elements.len(), sides.len()] {
            if len != num_entries {
                return Err(ExodusError::InvalidArrayLength {
                    expected: num_entries,
                    actual: len,
                });
            }
        }
        if num_entries == 0 {
            return Ok(());
        }

        let elems: Vec<i32> = elements.iter().map(|&id| id as i32).collect();
        let elem_name = naming::side_set_elem_var(slot);
        let mut var = self
            .nc
            .variable_mut(&elem_name)
            .ok_or_else(|| ExodusError::VariableNotDefined(elem_name.clone()))?;
        var.put_values(&elems, 0..num_entries)?;

        let side_name = naming::side_set_side_var(slot);
        let mut var = self
            .nc
            .variable_mut(&side_name)
            .ok_or_else(|| ExodusError::VariableNotDefined(side_name.clone()))?;
        var.put_values(sides, 0..num_entries)?;

        Ok(())
    }

    /// Write the node IDs of a node set.
    ///
    /// # Errors
    ///
    /// - `set_id` is unknown
    /// - the array length differs from the declared entry count
    pub fn put_node_set(&mut self, set_id: EntityId, nodes: &[EntityId]) -> Result<()> {
        let slot = self.find_node_set_slot(set_id)?;
        let num_entries = self.meta.node_sets[slot].num_entries;

        if nodes.len() != num_entries {
            return Err(ExodusError::InvalidArrayLength {
                expected: num_entries,
                actual: nodes.len(),
            });
        }
        if num_entries == 0 {
            return Ok(());
        }

        let ids: Vec<i32> = nodes.iter().map(|&id| id as i32).collect();
        let var_name = naming::node_set_node_var(slot);
        let mut var = self
            .nc
            .variable_mut(&var_name)
            .ok_or_else(|| ExodusError::VariableNotDefined(var_name.clone()))?;
        var.put_values(&ids, 0..num_entries)?;

        Ok(())
    }

    /// Slot index of the side set with `set_id`.
    pub(crate) fn find_side_set_slot(&self, set_id: EntityId) -> Result<usize> {
        self.meta
            .side_sets
            .iter()
            .position(|s| s.id == set_id)
            .ok_or_else(|| ExodusError::EntityNotFound {
                entity_type: "side set".to_string(),
                id: set_id,
            })
    }

    /// Slot index of the node set with `set_id`.
    pub(crate) fn find_node_set_slot(&self, set_id: EntityId) -> Result<usize> {
        self.meta
            .node_sets
            .iter()
            .position(|s| s.id == set_id)
            .ok_or_else(|| ExodusError::EntityNotFound {
                entity_type: "node set".to_string(),
                id: set_id,
            })
    }
}
