//! Element block operations.
//!
//! Blocks partition the elements of the mesh; each block carries a single
//! topology and a connectivity table. Slots are handed out in definition
//! order and numbered from 1 in the file (`connect1`, `num_el_in_blk1`, ...).

use crate::error::{EntityId, ExodusError, Result};
use crate::file::BlockSlot;
use crate::naming;
use crate::ExodusFile;

impl ExodusFile {
    /// Write the block name registry.
    ///
    /// # Errors
    ///
    /// Fails if the number of names doesn't match the declared block count,
    /// or a name exceeds the maximum name length.
    pub fn put_elem_blk_names(&mut self, names: &[impl AsRef<str>]) -> Result<()> {
        if names.len() != self.meta.num_elem_blocks {
            return Err(ExodusError::InvalidArrayLength {
                expected: self.meta.num_elem_blocks,
                actual: names.len(),
            });
        }

        for (i, name) in names.iter().enumerate() {
            naming::write_name_row(&mut self.nc, "eb_names", i, name.as_ref())?;
        }

        Ok(())
    }

    /// Define an element block.
    ///
    /// Allocates the next free block slot, marks it occupied, records
    /// `blk_id` in `eb_prop1`, and creates the per-block dimensions and the
    /// `connect{N}` variable carrying the `elem_type` attribute.
    ///
    /// # Errors
    ///
    /// - `num_elem_attrs` is nonzero (attributes are outside this subset)
    /// - `blk_id` is already in use
    /// - every declared block slot is occupied
    /// - NetCDF errors
    pub fn put_elem_blk_info(
        &mut self,
        blk_id: EntityId,
        elem_type: &str,
        num_blk_elems: usize,
        num_elem_nodes: usize,
        num_elem_attrs: usize,
    ) -> Result<()> {
        if num_elem_attrs != 0 {
            return Err(ExodusError::Unsupported(
                "element attributes are not supported (num_elem_attrs must be 0)".to_string(),
            ));
        }
        if self.meta.blocks.iter().any(|b| b.id == blk_id) {
            return Err(ExodusError::DuplicateEntityId {
                entity_type: "element block".to_string(),
                id: blk_id,
            });
        }

        let slot = self.meta.blocks.len();
        if slot >= self.meta.num_elem_blocks {
            return Err(ExodusError::SlotsExhausted {
                entity_type: "element block".to_string(),
                declared: self.meta.num_elem_blocks,
            });
        }

        self.mark_slot("eb", slot, blk_id)?;

        if num_blk_elems > 0 {
            let entries_dim = naming::block_entries_dim(slot);
            let nodes_dim = naming::block_nodes_dim(slot);
            self.nc.add_dimension(&entries_dim, num_blk_elems)?;
            self.nc.add_dimension(&nodes_dim, num_elem_nodes)?;

            let mut conn = self
                .nc
                .add_variable::<i32>(&naming::connect_var(slot), &[&entries_dim, &nodes_dim])?;
            conn.put_attribute("elem_type", elem_type.to_uppercase().as_str())?;
        }

        self.meta.blocks.push(BlockSlot {
            id: blk_id,
            num_elems: num_blk_elems,
            nodes_per_elem: num_elem_nodes,
        });

        Ok(())
    }

    /// Write the connectivity of a block from a flat node-ID array.
    ///
    /// # Errors
    ///
    /// - `blk_id` is unknown
    /// - the array length isn't `num_blk_elems * num_elem_nodes`
    pub fn put_elem_connectivity(&mut self, blk_id: EntityId, connectivity: &[i64]) -> Result<()> {
        let slot = self.find_block_slot(blk_id)?;
        let block = &self.meta.blocks[slot];
        let (num_elems, nodes_per_elem) = (block.num_elems, block.nodes_per_elem);

        if connectivity.len() != num_elems * nodes_per_elem {
            return Err(ExodusError::InvalidArrayLength {
                expected: num_elems * nodes_per_elem,
                actual: connectivity.len(),
            });
        }
        if num_elems == 0 {
            return Ok(());
        }

        let conn: Vec<i32> = connectivity.iter().map(|&id| id as i32).collect();
        let var_name = naming::connect_var(slot);
        let mut var = self
            .nc
            .variable_mut(&var_name)
            .ok_or_else(|| ExodusError::VariableNotDefined(var_name.clone()))?;
        var.put_values(&conn, (0..num_elems, 0..nodes_per_elem))?;

        Ok(())
    }

    /// Slot index of the block with `blk_id`.
    pub(crate) fn find_block_slot(&self, blk_id: EntityId) -> Result<usize> {
        self.meta
            .blocks
            .iter()
            .position(|b| b.id == blk_id)
            .ok_or_else(|| ExodusError::EntityNotFound {
                entity_type: "element block".to_string(),
                id: blk_id,
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{CreateMode, CreateOptions, InitParams};
    use crate::{ExodusError, ExodusFile};
    use tempfile::NamedTempFile;

    fn two_block_file(path: &std::path::Path) -> ExodusFile {
        let params = InitParams {
            title: "Blocks".into(),
            num_dim: 3,
            num_nodes: 12,
            num_elems: 2,
            num_elem_blocks: 2,
            ..Default::default()
        };
        ExodusFile::create(
            path,
            &params,
            CreateOptions {
                mode: CreateMode::Clobber,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_block_info_and_connectivity() {
        let tmp = NamedTempFile::new().unwrap();
        {
            let mut file = two_block_file(tmp.path());
            file.put_elem_blk_names(&["1", "2"]).unwrap();
            file.put_elem_blk_info(1, "hex8", 1, 8, 0).unwrap();
            file.put_elem_blk_info(2, "HEX8", 1, 8, 0).unwrap();
            file.put_elem_connectivity(1, &[1, 2, 3, 4, 5, 6, 7, 8])
                .unwrap();
            file.put_elem_connectivity(2, &[2, 9, 10, 3, 6, 11, 12, 7])
                .unwrap();
        }

        let nc = netcdf::open(tmp.path()).unwrap();
        assert_eq!(nc.dimension("num_el_in_blk1").unwrap().len(), 1);
        assert_eq!(nc.dimension("num_nod_per_el2").unwrap().len(), 8);

        let status: Vec<i32> = nc.variable("eb_status").unwrap().get_values(..).unwrap();
        assert_eq!(status, vec![1, 1]);
        let ids: Vec<i32> = nc.variable("eb_prop1").unwrap().get_values(..).unwrap();
        assert_eq!(ids, vec![1, 2]);

        let conn2 = nc.variable("connect2").unwrap();
        let values: Vec<i32> = conn2.get_values(..).unwrap();
        assert_eq!(values, vec![2, 9, 10, 3, 6, 11, 12, 7]);
        match conn2.attribute("elem_type").unwrap().value().unwrap() {
            netcdf::AttributeValue::Str(s) => assert_eq!(s, "HEX8"),
            other => panic!("unexpected attribute type: {:?}", other),
        }
    }

    #[test]
    fn test_block_attrs_rejected() {
        let tmp = NamedTempFile::new().unwrap();
        let mut file = two_block_file(tmp.path());
        let result = file.put_elem_blk_info(1, "HEX8", 1, 8, 2);
        assert!(matches!(result, Err(ExodusError::Unsupported(_))));
    }

    #[test]
    fn test_block_duplicate_id() {
        let tmp = NamedTempFile::new().unwrap();
        let mut file = two_block_file(tmp.path());
        file.put_elem_blk_info(1, "HEX8", 1, 8, 0).unwrap();
        let result = file.put_elem_blk_info(1, "HEX8", 1, 8, 0);
        assert!(matches!(
            result,
            Err(ExodusError::DuplicateEntityId { id: 1, .. })
        ));
    }

    #[test]
    fn test_block_slots_exhausted() {
        let tmp = NamedTempFile::new().unwrap();
        let mut file = two_block_file(tmp.path());
        file.put_elem_blk_info(1, "HEX8", 1, 8, 0).unwrap();
        file.put_elem_blk_info(2, "HEX8", 1, 8, 0).unwrap();
        let result = file.put_elem_blk_info(3, "HEX8", 1, 8, 0);
        assert!(matches!(result, Err(ExodusError::SlotsExhausted { .. })));
    }

    #[test]
    fn test_connectivity_unknown_block() {
        let tmp = NamedTempFile::new().unwrap();
        let mut file = two_block_file(tmp.path());
        let result = file.put_elem_connectivity(9, &[1; 8]);
        assert!(matches!(
            result,
            Err(ExodusError::EntityNotFound { id: 9, .. })
        ));
    }

    #[test]
    fn test_connectivity_wrong_size() {
        let tmp = NamedTempFile::new().unwrap();
        let mut file = two_block_file(tmp.path());
        file.put_elem_blk_info(1, "HEX8", 1, 8, 0).unwrap();
        let result = file.put_elem_connectivity(1, &[1, 2, 3]);
        assert!(matches!(
            result,
            Err(ExodusError::InvalidArrayLength {
                expected: 8,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_block_names_wrong_count() {
        let tmp = NamedTempFile::new().unwrap();
        let mut file = two_block_file(tmp.path());
        assert!(file.put_elem_blk_names(&["only one"]).is_err());
    }
}
