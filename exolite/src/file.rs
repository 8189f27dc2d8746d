//! File handle implementation for Exodus II output.
//!
//! This module provides creation of the NetCDF container with the global
//! attributes and fixed dimensions of the Exodus convention, plus the
//! coordinate operations. The declared counts, occupied slots and
//! registered variable names are cached in [`FileMetadata`] so no
//! operation has to read the file back for its contract checks.

use crate::constants::{
    API_VERSION, FILE_VERSION, LEN_NAME, LEN_STRING, MAX_NAME_LENGTH, MAX_TITLE_LENGTH,
};
use crate::error::{EntityId, ExodusError, Result};
use crate::naming;
use crate::types::{CreateMode, CreateOptions, InitParams};
use std::path::{Path, PathBuf};

/// An occupied element-block slot.
#[derive(Debug)]
pub(crate) struct BlockSlot {
    /// User-supplied block ID (written to `eb_prop1`)
    pub id: EntityId,
    /// Number of elements in the block
    pub num_elems: usize,
    /// Nodes per element
    pub nodes_per_elem: usize,
}

/// An occupied set slot (node set or side set).
#[derive(Debug)]
pub(crate) struct SetSlot {
    /// User-supplied set ID (written to `ns_prop1` / `ss_prop1`)
    pub id: EntityId,
    /// Number of entries in the set
    pub num_entries: usize,
}

/// Cached file state for contract checks.
///
/// Slot allocation works off the occupied-slot vectors: the next free slot
/// of an entity kind is the length of its vector, so no status-array scan
/// is ever needed.
#[derive(Debug, Default)]
pub(crate) struct FileMetadata {
    pub num_dim: usize,
    pub num_nodes: usize,
    pub num_elems: usize,
    pub num_elem_blocks: usize,
    pub num_node_sets: usize,
    pub num_side_sets: usize,
    /// Occupied block slots in slot order
    pub blocks: Vec<BlockSlot>,
    /// Occupied side set slots in slot order
    pub side_sets: Vec<SetSlot>,
    /// Occupied node set slots in slot order
    pub node_sets: Vec<SetSlot>,
    /// Registered element variable names, indexed by slot
    pub elem_var_names: Vec<Option<String>>,
    /// Registered nodal variable names, indexed by slot
    pub nodal_var_names: Vec<Option<String>>,
    /// Registered side set variable names, indexed by slot
    pub sset_var_names: Vec<Option<String>>,
    /// Registered node set variable names, indexed by slot
    pub nset_var_names: Vec<Option<String>>,
}

/// Write handle for an Exodus II file.
///
/// Created with [`ExodusFile::create`]; the underlying NetCDF file is the
/// only resource the handle owns and it is flushed and released when the
/// handle is dropped or [`ExodusFile::close`]d.
#[derive(Debug)]
pub struct ExodusFile {
    pub(crate) nc: netcdf::FileMut,
    path: PathBuf,
    pub(crate) meta: FileMetadata,
}

impl ExodusFile {
    /// Create a new Exodus file sized to `params`.
    ///
    /// Writes the global attributes of the convention, creates the fixed
    /// dimensions (`len_string`, `len_name`, `num_dim`, `num_nodes`,
    /// `num_elem`, `num_el_blk`, the optional set-count dimensions and the
    /// unlimited `time_step`) and pre-creates the coordinate arrays and the
    /// status/property/name arrays for blocks and sets. Counts of zero
    /// create neither their dimension nor the dependent variables.
    ///
    /// # Errors
    ///
    /// - `num_dim` is not 1, 2 or 3
    /// - the title exceeds 80 characters
    /// - the file exists and [`CreateMode::NoClobber`] is set
    /// - NetCDF errors
    pub fn create<P: AsRef<Path>>(
        path: P,
        params: &InitParams,
        options: CreateOptions,
    ) -> Result<Self> {
        let path = path.as_ref();

        if params.num_dim == 0 || params.num_dim > 3 {
            return Err(ExodusError::InvalidDimension {
                expected: "1, 2, or 3".to_string(),
                actual: params.num_dim,
            });
        }
        if params.title.len() > MAX_TITLE_LENGTH {
            return Err(ExodusError::StringTooLong {
                max: MAX_TITLE_LENGTH,
                actual: params.title.len(),
            });
        }

        let mut nc_options = netcdf::Options::NETCDF4;
        if options.mode == CreateMode::NoClobber {
            nc_options |= netcdf::Options::NOCLOBBER;
        }

        let mut nc = netcdf::create_with(path, nc_options)?;

        Self::write_global_attributes(&mut nc, &params.title)?;
        Self::write_dimensions(&mut nc, params)?;
        Self::write_fixed_variables(&mut nc, params)?;

        let meta = FileMetadata {
            num_dim: params.num_dim,
            num_nodes: params.num_nodes,
            num_elems: params.num_elems,
            num_elem_blocks: params.num_elem_blocks,
            num_node_sets: params.num_node_sets,
            num_side_sets: params.num_side_sets,
            ..FileMetadata::default()
        };

        Ok(Self {
            nc,
            path: path.to_path_buf(),
            meta,
        })
    }

    /// Write the global attributes that mark this as an Exodus file.
    fn write_global_attributes(nc: &mut netcdf::FileMut, title: &str) -> Result<()> {
        nc.add_attribute("title", title)?;
        nc.add_attribute("version", FILE_VERSION)?;
        nc.add_attribute("api_version", API_VERSION)?;
        nc.add_attribute("floating_point_word_size", 8_i32)?;
        nc.add_attribute("maximum_name_length", MAX_NAME_LENGTH as i32)?;
        nc.add_attribute("file_size", 1_i32)?;
        nc.add_attribute("int64_status", 0_i32)?;
        Ok(())
    }

    /// Create the fixed dimensions sized to the declared counts.
    fn write_dimensions(nc: &mut netcdf::FileMut, params: &InitParams) -> Result<()> {
        nc.add_dimension("len_string", LEN_STRING)?;
        nc.add_dimension("len_name", LEN_NAME)?;
        nc.add_dimension("num_dim", params.num_dim)?;

        if params.num_nodes > 0 {
            nc.add_dimension("num_nodes", params.num_nodes)?;
        }
        if params.num_elems > 0 {
            nc.add_dimension("num_elem", params.num_elems)?;
        }
        if params.num_elem_blocks > 0 {
            nc.add_dimension("num_el_blk", params.num_elem_blocks)?;
        }
        if params.num_side_sets > 0 {
            nc.add_dimension("num_side_sets", params.num_side_sets)?;
        }
        if params.num_node_sets > 0 {
            nc.add_dimension("num_node_sets", params.num_node_sets)?;
        }

        nc.add_unlimited_dimension("time_step")?;

        Ok(())
    }

    /// Create the canonical variables the declared counts call for.
    fn write_fixed_variables(nc: &mut netcdf::FileMut, params: &InitParams) -> Result<()> {
        nc.add_variable::<f64>("time_whole", &["time_step"])?;
        nc.add_variable::<u8>("coor_names", &["num_dim", "len_name"])?;

        if params.num_nodes > 0 {
            nc.add_variable::<f64>("coordx", &["num_nodes"])?;
            nc.add_variable::<f64>("coordy", &["num_nodes"])?;
            nc.add_variable::<f64>("coordz", &["num_nodes"])?;
        }

        if params.num_elem_blocks > 0 {
            Self::add_entity_slots(nc, "eb", "num_el_blk", params.num_elem_blocks)?;
        }
        if params.num_side_sets > 0 {
            Self::add_entity_slots(nc, "ss", "num_side_sets", params.num_side_sets)?;
        }
        if params.num_node_sets > 0 {
            Self::add_entity_slots(nc, "ns", "num_node_sets", params.num_node_sets)?;
        }

        Ok(())
    }

    /// Create the `{prefix}_status`, `{prefix}_prop1` and `{prefix}_names`
    /// arrays for an entity kind, with every status slot zeroed ("empty").
    fn add_entity_slots(
        nc: &mut netcdf::FileMut,
        prefix: &str,
        dim: &str,
        count: usize,
    ) -> Result<()> {
        let status_name = format!("{}_status", prefix);
        let mut status = nc.add_variable::<i32>(&status_name, &[dim])?;
        status.put_values(&vec![0_i32; count], 0..count)?;

        let prop_name = format!("{}_prop1", prefix);
        let mut prop = nc.add_variable::<i32>(&prop_name, &[dim])?;
        prop.put_attribute("name", "ID")?;

        let names_name = format!("{}_names", prefix);
        nc.add_variable::<u8>(&names_name, &[dim, "len_name"])?;

        Ok(())
    }

    /// Mark slot `slot` of an entity kind as occupied by `id`.
    pub(crate) fn mark_slot(&mut self, prefix: &str, slot: usize, id: EntityId) -> Result<()> {
        let status_name = format!("{}_status", prefix);
        let mut status = self
            .nc
            .variable_mut(&status_name)
            .ok_or_else(|| ExodusError::VariableNotDefined(status_name.clone()))?;
        status.put_values(&[1_i32], slot..slot + 1)?;

        let prop_name = format!("{}_prop1", prefix);
        let mut prop = self
            .nc
            .variable_mut(&prop_name)
            .ok_or_else(|| ExodusError::VariableNotDefined(prop_name.clone()))?;
        prop.put_values(&[id as i32], slot..slot + 1)?;

        Ok(())
    }

    /// Set coordinate axis names.
    ///
    /// # Errors
    ///
    /// Fails if the number of names doesn't match `num_dim`, or a name
    /// exceeds the maximum name length.
    pub fn put_coord_names(&mut self, names: &[impl AsRef<str>]) -> Result<()> {
        if names.len() != self.meta.num_dim {
            return Err(ExodusError::InvalidArrayLength {
                expected: self.meta.num_dim,
                actual: names.len(),
            });
        }

        for (i, name) in names.iter().enumerate() {
            naming::write_name_row(&mut self.nc, "coor_names", i, name.as_ref())?;
        }

        Ok(())
    }

    /// Write all nodal coordinates.
    ///
    /// # Errors
    ///
    /// Fails if any array length differs from the declared node count.
    pub fn put_coords(&mut self, x: &[f64], y: &[f64], z: &[f64]) -> Result<()> {
        let num_nodes = self.meta.num_nodes;

        for coords in [x, y, z] {
            if coords.len() != num_nodes {
                return Err(ExodusError::InvalidArrayLength {
                    expected: num_nodes,
                    actual: coords.len(),
                });
            }
        }

        // A node-free mesh has no coordinate arrays to fill.
        if num_nodes == 0 {
            return Ok(());
        }

        for (name, coords) in [("coordx", x), ("coordy", y), ("coordz", z)] {
            let mut var = self
                .nc
                .variable_mut(name)
                .ok_or_else(|| ExodusError::VariableNotDefined(name.to_string()))?;
            var.put_values(coords, 0..num_nodes)?;
        }

        Ok(())
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush pending data to disk.
    pub fn sync(&mut self) -> Result<()> {
        self.nc.sync()?;
        Ok(())
    }

    /// Close the file explicitly.
    ///
    /// This is called automatically when the handle is dropped, but can be
    /// called explicitly to make the release point visible.
    pub fn close(self) -> Result<()> {
        // The netcdf crate closes the file in its Drop implementation.
        Ok(())
    }
}

impl Drop for ExodusFile {
    fn drop(&mut self) {
        // Best-effort flush; errors cannot be reported from Drop.
        let _ = self.nc.sync();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    // Helper to create a file with clobber mode for tests
    fn create_test_file(path: impl AsRef<Path>, params: &InitParams) -> Result<ExodusFile> {
        ExodusFile::create(
            path,
            params,
            CreateOptions {
                mode: CreateMode::Clobber,
            },
        )
    }

    fn small_params() -> InitParams {
        InitParams {
            title: "Test mesh".into(),
            num_dim: 3,
            num_nodes: 8,
            num_elems: 1,
            num_elem_blocks: 1,
            num_node_sets: 0,
            num_side_sets: 0,
        }
    }

    #[test]
    fn test_create_writes_global_attributes() {
        let tmp = NamedTempFile::new().unwrap();
        {
            let _file = create_test_file(tmp.path(), &small_params()).unwrap();
        }

        let nc = netcdf::open(tmp.path()).unwrap();
        match nc.attribute("version").unwrap().value().unwrap() {
            netcdf::AttributeValue::Float(v) => assert_eq!(v, 7.16),
            other => panic!("unexpected attribute type: {:?}", other),
        }
        match nc.attribute("floating_point_word_size").unwrap().value().unwrap() {
            netcdf::AttributeValue::Int(v) => assert_eq!(v, 8),
            other => panic!("unexpected attribute type: {:?}", other),
        }
        match nc.attribute("title").unwrap().value().unwrap() {
            netcdf::AttributeValue::Str(v) => assert_eq!(v, "Test mesh"),
            other => panic!("unexpected attribute type: {:?}", other),
        }
    }

    #[test]
    fn test_create_dimensions() {
        let tmp = NamedTempFile::new().unwrap();
        {
            let _file = create_test_file(tmp.path(), &small_params()).unwrap();
        }

        let nc = netcdf::open(tmp.path()).unwrap();
        assert_eq!(nc.dimension("len_string").unwrap().len(), 32);
        assert_eq!(nc.dimension("len_name").unwrap().len(), 256);
        assert_eq!(nc.dimension("num_dim").unwrap().len(), 3);
        assert_eq!(nc.dimension("num_nodes").unwrap().len(), 8);
        assert_eq!(nc.dimension("num_elem").unwrap().len(), 1);
        assert_eq!(nc.dimension("num_el_blk").unwrap().len(), 1);
        assert!(nc.dimension("num_side_sets").is_none());
        assert!(nc.dimension("num_node_sets").is_none());
    }

    #[test]
    fn test_create_noclobber() {
        let tmp = NamedTempFile::new().unwrap();
        let _file = create_test_file(tmp.path(), &small_params()).unwrap();

        let result = ExodusFile::create(tmp.path(), &small_params(), CreateOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_create_invalid_dimensions() {
        let tmp = NamedTempFile::new().unwrap();

        for num_dim in [0, 4] {
            let params = InitParams {
                num_dim,
                ..small_params()
            };
            let result = create_test_file(tmp.path(), &params);
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_create_title_too_long() {
        let tmp = NamedTempFile::new().unwrap();
        let params = InitParams {
            title: "a".repeat(81),
            ..small_params()
        };
        assert!(create_test_file(tmp.path(), &params).is_err());
    }

    #[test]
    fn test_put_coords() {
        let tmp = NamedTempFile::new().unwrap();
        let params = InitParams {
            num_nodes: 4,
            ..small_params()
        };
        {
            let mut file = create_test_file(tmp.path(), &params).unwrap();
            let x = vec![0.0, 1.0, 1.0, 0.0];
            let y = vec![0.0, 0.0, 1.0, 1.0];
            let z = vec![0.0; 4];
            file.put_coords(&x, &y, &z).unwrap();
        }

        let nc = netcdf::open(tmp.path()).unwrap();
        let x: Vec<f64> = nc.variable("coordx").unwrap().get_values(..).unwrap();
        assert_eq!(x, vec![0.0, 1.0, 1.0, 0.0]);
        let y: Vec<f64> = nc.variable("coordy").unwrap().get_values(..).unwrap();
        assert_eq!(y, vec![0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_put_coords_wrong_length() {
        let tmp = NamedTempFile::new().unwrap();
        let mut file = create_test_file(tmp.path(), &small_params()).unwrap();
        let result = file.put_coords(&[0.0; 3], &[0.0; 8], &[0.0; 8]);
        assert!(matches!(
            result,
            Err(ExodusError::InvalidArrayLength {
                expected: 8,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_put_coords_empty_mesh() {
        let tmp = NamedTempFile::new().unwrap();
        let params = InitParams {
            title: "Empty".into(),
            ..InitParams::default()
        };
        let mut file = create_test_file(tmp.path(), &params).unwrap();
        file.put_coords(&[], &[], &[]).unwrap();
    }

    #[test]
    fn test_coord_names_roundtrip() {
        let tmp = NamedTempFile::new().unwrap();
        {
            let mut file = create_test_file(tmp.path(), &small_params()).unwrap();
            file.put_coord_names(&["x", "y", "z"]).unwrap();
        }

        let nc = netcdf::open(tmp.path()).unwrap();
        let var = nc.variable("coor_names").unwrap();
        let bytes: Vec<u8> = var.get_values((0..1, 0..256)).unwrap();
        let name = String::from_utf8_lossy(&bytes);
        assert_eq!(name.trim_end_matches('\0'), "x");
    }

    #[test]
    fn test_coord_names_wrong_count() {
        let tmp = NamedTempFile::new().unwrap();
        let mut file = create_test_file(tmp.path(), &small_params()).unwrap();
        assert!(file.put_coord_names(&["x", "y"]).is_err());
    }

    #[test]
    fn test_close_explicit() {
        let tmp = NamedTempFile::new().unwrap();
        let file = create_test_file(tmp.path(), &small_params()).unwrap();
        file.close().unwrap();
    }
}
