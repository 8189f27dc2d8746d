//! Drives the Exodus writer from a mesh model.
//!
//! The model arrives fully assembled; this module only orders the writer
//! calls: sizes, coordinates, block-partitioned connectivity, sets, the
//! single time step, then variables. Element IDs are block-contiguous, so
//! every per-block slice is a contiguous run of the element-ordered
//! vectors.

use crate::cli::Result;
use crate::model::ExodusModel;
use exolite::{CreateMode, CreateOptions, ExodusFile, InitParams};
use std::path::Path;

/// The single time step every converted mesh carries, at t = 0.
const TIME_STEP: usize = 1;

/// Exodus titles are capped at 80 bytes; a deep input path must not make
/// the conversion fail.
fn clip_title(title: &str) -> String {
    if title.len() <= 80 {
        return title.to_string();
    }
    let mut end = 80;
    while !title.is_char_boundary(end) {
        end -= 1;
    }
    title[..end].to_string()
}

/// Write `model` to `path` as an Exodus II file.
pub fn write_model(model: &ExodusModel, path: &Path, title: &str) -> Result<()> {
    let block_tags = model.unique_block_ids();

    let params = InitParams {
        title: clip_title(title),
        num_dim: model.dim,
        num_nodes: model.num_nodes(),
        num_elems: model.num_elems(),
        num_elem_blocks: block_tags.len(),
        num_node_sets: model.node_sets.len(),
        num_side_sets: model.side_sets.len(),
    };
    let mut file = ExodusFile::create(
        path,
        &params,
        CreateOptions {
            mode: CreateMode::Clobber,
        },
    )?;

    file.put_coord_names(&["x", "y", "z"])?;
    file.put_coords(&model.xcoords, &model.ycoords, &model.zcoords)?;

    let block_names: Vec<String> = block_tags.iter().map(|tag| tag.to_string()).collect();
    file.put_elem_blk_names(&block_names)?;

    for &tag in &block_tags {
        let num_in_block = model.block_ids.iter().filter(|&&b| b == tag).count();
        file.put_elem_blk_info(tag, "HEX8", num_in_block, 8, 0)?;
        let connectivity: Vec<i64> = model
            .block_ids
            .iter()
            .enumerate()
            .filter(|(_, &b)| b == tag)
            .flat_map(|(row, _)| model.elem_nodes.row(row).to_vec())
            .collect();
        file.put_elem_connectivity(tag, &connectivity)?;
    }

    if !model.node_sets.is_empty() {
        let names: Vec<&str> = model.node_sets.iter().map(|s| s.name.as_str()).collect();
        file.put_node_set_names(&names)?;
        for (index, set) in model.node_sets.iter().enumerate() {
            file.put_node_set_params(index as i64, set.nodes.len(), 0)?;
            file.put_node_set(index as i64, &set.nodes)?;
        }
    }

    if !model.side_sets.is_empty() {
        let names: Vec<&str> = model.side_sets.iter().map(|s| s.name.as_str()).collect();
        file.put_side_set_names(&names)?;
        for (index, set) in model.side_sets.iter().enumerate() {
            file.put_side_set_params(index as i64, set.elements.len(), 0)?;
            file.put_side_set(index as i64, &set.elements, &set.sides)?;
        }
    }

    file.put_time(TIME_STEP, 0.0)?;

    if !model.elem_vars.is_empty() {
        file.set_element_variable_number(model.elem_vars.len())?;
        for (index, var) in model.elem_vars.iter().enumerate() {
            file.put_element_variable_name(&var.name.to_lowercase(), index + 1)?;
        }
        for &tag in &block_tags {
            for var in &model.elem_vars {
                let values: Vec<f64> = model
                    .block_ids
                    .iter()
                    .zip(&var.values)
                    .filter(|(&b, _)| b == tag)
                    .map(|(_, &v)| v)
                    .collect();
                file.put_element_variable_values(
                    tag,
                    &var.name.to_lowercase(),
                    TIME_STEP,
                    &values,
                )?;
            }
        }

        // Side sets mirror the elemental variables, gathered through each
        // set's element IDs.
        if !model.side_sets.is_empty() {
            file.set_side_set_variable_number(model.elem_vars.len())?;
            for (index, var) in model.elem_vars.iter().enumerate() {
                file.put_side_set_variable_name(&var.name.to_lowercase(), index + 1)?;
            }
            for var in &model.elem_vars {
                for (index, set) in model.side_sets.iter().enumerate() {
                    let values: Vec<f64> = set
                        .elements
                        .iter()
                        .map(|&elem| var.values[(elem - 1) as usize])
                        .collect();
                    file.put_side_set_variable_values(
                        index as i64,
                        &var.name.to_lowercase(),
                        TIME_STEP,
                        &values,
                    )?;
                }
            }
        }
    }

    if !model.node_vars.is_empty() {
        file.set_node_variable_number(model.node_vars.len())?;
        for (index, var) in model.node_vars.iter().enumerate() {
            file.put_node_variable_name(&var.name.to_lowercase(), index + 1)?;
        }
        for var in &model.node_vars {
            file.put_node_variable_values(&var.name.to_lowercase(), TIME_STEP, &var.values)?;
        }

        // Node sets mirror the nodal variables the same way.
        if !model.node_sets.is_empty() {
            file.set_node_set_variable_number(model.node_vars.len())?;
            for (index, var) in model.node_vars.iter().enumerate() {
                file.put_node_set_variable_name(&var.name.to_lowercase(), index + 1)?;
            }
            for var in &model.node_vars {
                for (index, set) in model.node_sets.iter().enumerate() {
                    let values: Vec<f64> = set
                        .nodes
                        .iter()
                        .map(|&node| var.values[(node - 1) as usize])
                        .collect();
                    file.put_node_set_variable_values(
                        index as i64,
                        &var.name.to_lowercase(),
                        TIME_STEP,
                        &values,
                    )?;
                }
            }
        }
    }

    file.close()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_title() {
        assert_eq!(clip_title("short"), "short");
        let long = "x".repeat(100);
        assert_eq!(clip_title(&long).len(), 80);
        // never split a multi-byte character
        let multibyte = "é".repeat(50);
        let clipped = clip_title(&multibyte);
        assert!(clipped.len() <= 80);
        assert!(multibyte.starts_with(&clipped));
    }
}
