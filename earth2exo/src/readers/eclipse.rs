//! Reader for ECLIPSE grdecl corner-point grids.
//!
//! A grdecl deck is a line-oriented keyword file: `--` starts a comment,
//! a keyword line introduces a data block, and a block is a stream of
//! whitespace tokens (with the `N*value` repeat shorthand) terminated by a
//! `/`. The reader tokenizes the sections it understands, validates the
//! array sizes against SPECGRID, and assembles the mesh model.

use crate::cli::{ConvertError, Result};
use crate::geometry;
use crate::model::{ConvertOptions, ExodusModel, FieldVar};
use crate::numbering;
use crate::sets;
use ndarray::{Array2, Array3};
use std::path::Path;

/// Property keywords the reader understands.
const KEYWORDS: [&str; 6] = ["ACTNUM", "SATNUM", "PORO", "PERMX", "PERMY", "PERMZ"];

/// Raw data pulled from a deck before validation.
#[derive(Debug, Default)]
struct EclipseDeck {
    specgrid: Option<(usize, usize, usize)>,
    mapaxes: Option<Vec<f64>>,
    gridunit: Option<Vec<String>>,
    coord: Option<Vec<f64>>,
    zcorn: Option<Vec<f64>>,
    /// Cell properties in the order they were read
    props: Vec<(String, Vec<f64>)>,
}

impl EclipseDeck {
    fn prop(&self, name: &str) -> Option<&[f64]> {
        self.props
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| v.as_slice())
    }
}

/// Parse a grdecl file and build the mesh model.
pub fn parse(path: &Path, options: &ConvertOptions) -> Result<ExodusModel> {
    let mut deck = EclipseDeck::default();
    read_deck(path, &mut deck)?;

    let display = path.display().to_string();
    let (nx, ny, nz) = deck.specgrid.ok_or(ConvertError::MissingKeyword {
        keyword: "SPECGRID",
        path: display.clone(),
    })?;
    let coord = deck.coord.take().ok_or(ConvertError::MissingKeyword {
        keyword: "COORD",
        path: display.clone(),
    })?;
    let zcorn = deck.zcorn.take().ok_or(ConvertError::MissingKeyword {
        keyword: "ZCORN",
        path: display,
    })?;

    let num_cells = nx * ny * nz;
    if coord.len() != 6 * (nx + 1) * (ny + 1) {
        return Err(ConvertError::WrongCount {
            keyword: "COORD".to_string(),
            expected: 6 * (nx + 1) * (ny + 1),
            actual: coord.len(),
        });
    }
    if zcorn.len() != 8 * num_cells {
        return Err(ConvertError::WrongCount {
            keyword: "ZCORN".to_string(),
            expected: 8 * num_cells,
            actual: zcorn.len(),
        });
    }
    for (name, values) in &deck.props {
        if values.len() != num_cells {
            return Err(ConvertError::WrongCount {
                keyword: name.clone(),
                expected: num_cells,
                actual: values.len(),
            });
        }
    }

    println!("Finished parsing Eclipse file");

    // COORD has six entries per pillar; entries 0 and 1 are the (x, y)
    // position every corner on the pillar shares.
    let mut coord = Array3::from_shape_vec((ny + 1, nx + 1, 6), coord)?;

    if options.use_mapaxes {
        let mapaxes = deck.mapaxes.as_deref().ok_or(ConvertError::MissingMapAxes)?;
        if mapaxes.len() != 6 {
            return Err(ConvertError::WrongCount {
                keyword: "MAPAXES".to_string(),
                expected: 6,
                actual: mapaxes.len(),
            });
        }
        if let Some(unit) = &deck.gridunit {
            if unit.len() > 2 {
                return Err(ConvertError::WrongCount {
                    keyword: "GRIDUNIT".to_string(),
                    expected: 2,
                    actual: unit.len(),
                });
            }
        }

        // Transform only when the deck says its coordinates are grid-local;
        // a missing scope word means GRID.
        let grid_local = deck
            .gridunit
            .as_ref()
            .is_some_and(|unit| unit.get(1).map(String::as_str).unwrap_or("GRID") == "GRID");
        if grid_local {
            geometry::apply_mapaxes(&mut coord, mapaxes);
        }
    }

    let (xcorn, ycorn) = geometry::expand_pillars(&coord, nz);

    // ZCORN varies by x, then y, then z: layer, row, column.
    let mut zcorn = Array3::from_shape_vec((2 * nz, 2 * ny, 2 * nx), zcorn)?;
    if options.flip_z {
        zcorn.mapv_inplace(|v| -v);
    }

    let cornx = geometry::cell_corners(xcorn.view());
    let corny = geometry::cell_corners(ycorn.view());
    let cornz = geometry::cell_corners(zcorn.view());

    let active = match deck.prop("ACTNUM") {
        Some(values) => int_grid(values, nz, ny, nx)?,
        None => Array3::ones((nz, ny, nx)),
    };

    let corner_ids = numbering::number_nodes(&cornz, &active, options.tolerance);
    let node_ids = numbering::corner_lattice(&corner_ids, &active);
    let num_nodes = corner_ids.iter().copied().max().unwrap_or(0) as usize;

    // Block tags come from SATNUM; a deck without one is a single block 0.
    let blocks = match deck.prop("SATNUM") {
        Some(values) => int_grid(values, nz, ny, nx)?,
        None => Array3::zeros((nz, ny, nx)),
    };

    // Element IDs are handed out per block tag in ascending order, raster
    // order within a block, so IDs are contiguous within each block.
    let mut unique_tags: Vec<i64> = blocks.iter().copied().collect();
    unique_tags.sort_unstable();
    unique_tags.dedup();

    let mut elem_ids = Array3::<i64>::zeros((nz, ny, nx));
    let mut elem_count = 0usize;
    for &tag in &unique_tags {
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    if active[[k, j, i]] != 0 && blocks[[k, j, i]] == tag {
                        elem_count += 1;
                        elem_ids[[k, j, i]] = elem_count as i64;
                    }
                }
            }
        }
    }

    // Connectivity, block tags and coordinates, all in element-ID order.
    // Coordinates come from the first element that touches each node.
    let mut elem_nodes = Array2::<i64>::zeros((elem_count, 8));
    let mut block_ids = vec![0i64; elem_count];
    let mut xcoords = vec![0.0; num_nodes];
    let mut ycoords = vec![0.0; num_nodes];
    let mut zcoords = vec![0.0; num_nodes];
    let mut seen = vec![false; num_nodes];

    for &tag in &unique_tags {
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    if active[[k, j, i]] == 0 || blocks[[k, j, i]] != tag {
                        continue;
                    }
                    let elem = (elem_ids[[k, j, i]] - 1) as usize;
                    let cell = (k * ny + j) * nx + i;
                    for c in 0..8 {
                        let id = corner_ids[[k, j, i, c]];
                        elem_nodes[[elem, c]] = id;
                        let node = (id - 1) as usize;
                        if !seen[node] {
                            seen[node] = true;
                            xcoords[node] = cornx[[cell, c]];
                            ycoords[node] = corny[[cell, c]];
                            zcoords[node] = cornz[[cell, c]];
                        }
                    }
                    block_ids[elem] = tag;
                }
            }
        }
    }

    // With Z negated the k axis runs upward, so each element's bottom and
    // top faces trade places to keep the right-hand ordering.
    if options.flip_z {
        for mut row in elem_nodes.rows_mut() {
            for c in 0..4 {
                row.swap(c, c + 4);
            }
        }
    }

    // Cell properties become element variables: inactive entries dropped,
    // the rest reordered to element-ID order.
    let mut elem_vars = Vec::with_capacity(deck.props.len());
    for (name, values) in &deck.props {
        let mut sliced = vec![0.0; elem_count];
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    let id = elem_ids[[k, j, i]];
                    if id != 0 {
                        sliced[(id - 1) as usize] = values[(k * ny + j) * nx + i];
                    }
                }
            }
        }
        elem_vars.push(FieldVar {
            name: name.clone(),
            values: sliced,
        });
    }

    let mut node_sets = Vec::new();
    let mut side_sets = Vec::new();
    if !options.omit_nodesets {
        node_sets = sets::node_sets(node_ids.view());
    }
    if !options.omit_sidesets {
        side_sets = sets::side_sets(elem_ids.view());
    }
    if options.flip_z {
        sets::flip_vertical(&mut node_sets, &mut side_sets);
    }

    Ok(ExodusModel {
        dim: 3,
        xcoords,
        ycoords,
        zcoords,
        node_ids,
        elem_ids,
        elem_nodes,
        block_ids,
        elem_vars,
        node_vars: Vec::new(),
        node_sets,
        side_sets,
    })
}

/// Reshape a property array into an integer (nz, ny, nx) grid.
fn int_grid(values: &[f64], nz: usize, ny: usize, nx: usize) -> Result<Array3<i64>> {
    let ints: Vec<i64> = values.iter().map(|&v| v as i64).collect();
    Ok(Array3::from_shape_vec((nz, ny, nx), ints)?)
}

/// Read one grdecl file into `deck`, following INCLUDE lines.
fn read_deck(path: &Path, deck: &mut EclipseDeck) -> Result<()> {
    let text = std::fs::read_to_string(path)?;
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("--") {
            continue;
        }
        let keyword = line.split_whitespace().next().unwrap_or("");

        if keyword.starts_with("SPECGRID") {
            deck.specgrid = Some(parse_specgrid(next_data_line(&mut lines, "SPECGRID")?)?);
        } else if keyword.starts_with("MAPAXES") {
            deck.mapaxes = Some(read_block(&mut lines, "MAPAXES")?);
        } else if keyword.starts_with("GRIDUNIT") {
            let data = next_data_line(&mut lines, "GRIDUNIT")?;
            deck.gridunit = Some(
                data.split_whitespace()
                    .take_while(|token| *token != "/")
                    .map(str::to_string)
                    .collect(),
            );
        } else if keyword.starts_with("COORD") && !keyword.starts_with("COORDSYS") {
            deck.coord = Some(read_block(&mut lines, "COORD")?);
        } else if keyword.starts_with("ZCORN") {
            deck.zcorn = Some(read_block(&mut lines, "ZCORN")?);
        } else if keyword.starts_with("INCLUDE") {
            let data = next_data_line(&mut lines, "INCLUDE")?;
            let name = data
                .split_whitespace()
                .next()
                .ok_or_else(|| ConvertError::UnexpectedEof {
                    keyword: "INCLUDE".to_string(),
                })?
                .trim_matches('\'');
            let parent = path.parent().unwrap_or_else(|| Path::new(""));
            read_deck(&parent.join(name), deck)?;
        } else if KEYWORDS.contains(&keyword) {
            let values = read_block(&mut lines, keyword)?;
            deck.props.push((keyword.to_string(), values));
        }
        // Unknown sections are skipped.
    }

    Ok(())
}

/// Next non-blank, non-comment line.
fn next_data_line<'a>(lines: &mut std::str::Lines<'a>, keyword: &str) -> Result<&'a str> {
    for line in lines {
        let line = line.trim();
        if line.is_empty() || line.starts_with("--") {
            continue;
        }
        return Ok(line);
    }
    Err(ConvertError::UnexpectedEof {
        keyword: keyword.to_string(),
    })
}

/// SPECGRID data line: nx, ny, nz, then entries the reader doesn't use.
fn parse_specgrid(line: &str) -> Result<(usize, usize, usize)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(ConvertError::WrongCount {
            keyword: "SPECGRID".to_string(),
            expected: 3,
            actual: tokens.len(),
        });
    }
    let parse = |token: &str| -> Result<usize> {
        token.parse().map_err(|_| ConvertError::BadToken {
            keyword: "SPECGRID".to_string(),
            token: token.to_string(),
        })
    };
    Ok((parse(tokens[0])?, parse(tokens[1])?, parse(tokens[2])?))
}

/// Read a `/`-terminated block of numbers, expanding `N*value` shorthand.
fn read_block(lines: &mut std::str::Lines<'_>, keyword: &str) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() || line.starts_with("--") {
            continue;
        }
        for token in line.split_whitespace() {
            if token == "/" {
                return Ok(values);
            }
            push_token(&mut values, token, keyword)?;
        }
    }
    Err(ConvertError::UnexpectedEof {
        keyword: keyword.to_string(),
    })
}

fn push_token(values: &mut Vec<f64>, token: &str, keyword: &str) -> Result<()> {
    let bad = || ConvertError::BadToken {
        keyword: keyword.to_string(),
        token: token.to_string(),
    };
    match token.split_once('*') {
        Some((count, value)) => {
            let count: usize = count.parse().map_err(|_| bad())?;
            let value: f64 = value.parse().map_err(|_| bad())?;
            values.extend(std::iter::repeat(value).take(count));
        }
        None => values.push(token.parse().map_err(|_| bad())?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tolerance;
    use std::io::Write;

    fn write_deck(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    /// A flat 2x1x1 deck with two unit cells.
    const TWO_CELL_DECK: &str = "\
-- two cells along x
SPECGRID
2 1 1 1 F /
COORD
0 0 0 0 0 1  1 0 0 1 0 1  2 0 0 2 0 1
0 1 0 0 1 1  1 1 0 1 1 1  2 1 0 2 1 1 /
ZCORN
8*0.0
8*1.0 /
ACTNUM
2*1 /
SATNUM
1 1 /
";

    #[test]
    fn test_read_block_expands_shorthand() {
        let mut lines = "3*2.5 1.0\n0.5 /\n".lines();
        let values = read_block(&mut lines, "PORO").unwrap();
        assert_eq!(values, vec![2.5, 2.5, 2.5, 1.0, 0.5]);
    }

    #[test]
    fn test_read_block_skips_comments() {
        let mut lines = "1.0\n-- a comment\n\n2.0 /\n".lines();
        let values = read_block(&mut lines, "PORO").unwrap();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_read_block_unterminated() {
        let mut lines = "1.0 2.0\n".lines();
        let result = read_block(&mut lines, "PORO");
        assert!(matches!(result, Err(ConvertError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_read_block_bad_token() {
        let mut lines = "1.0 oops /\n".lines();
        let result = read_block(&mut lines, "PORO");
        assert!(matches!(result, Err(ConvertError::BadToken { .. })));
    }

    #[test]
    fn test_parse_specgrid() {
        assert_eq!(parse_specgrid("20 10 5 1 F /").unwrap(), (20, 10, 5));
        assert!(parse_specgrid("20 10").is_err());
        assert!(parse_specgrid("a b c").is_err());
    }

    #[test]
    fn test_parse_two_cell_deck() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_deck(dir.path(), "two.grdecl", TWO_CELL_DECK);
        let model = parse(&path, &ConvertOptions::default()).unwrap();

        assert_eq!(model.num_nodes(), 12);
        assert_eq!(model.num_elems(), 2);
        assert_eq!(model.block_ids, vec![1, 1]);
        assert_eq!(model.elem_vars.len(), 2);
        assert_eq!(model.elem_vars[0].name, "ACTNUM");

        // The two rows share the four nodes of the common face.
        let row0: Vec<i64> = model.elem_nodes.row(0).to_vec();
        let row1: Vec<i64> = model.elem_nodes.row(1).to_vec();
        let shared: Vec<i64> = row0.iter().copied().filter(|id| row1.contains(id)).collect();
        assert_eq!(shared.len(), 4);
    }

    #[test]
    fn test_missing_specgrid() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_deck(dir.path(), "bad.grdecl", "COORD\n0 0 0 0 0 1 /\n");
        let result = parse(&path, &ConvertOptions::default());
        assert!(matches!(
            result,
            Err(ConvertError::MissingKeyword {
                keyword: "SPECGRID",
                ..
            })
        ));
    }

    #[test]
    fn test_wrong_zcorn_count() {
        let dir = tempfile::tempdir().unwrap();
        let deck = "\
SPECGRID
1 1 1 1 F /
COORD
0 0 0 0 0 1  1 0 0 1 0 1
0 1 0 0 1 1  1 1 0 1 1 1 /
ZCORN
4*0.0 /
";
        let path = write_deck(dir.path(), "short.grdecl", deck);
        let result = parse(&path, &ConvertOptions::default());
        assert!(matches!(
            result,
            Err(ConvertError::WrongCount { expected: 8, actual: 4, .. })
        ));
    }

    #[test]
    fn test_include_directive() {
        let dir = tempfile::tempdir().unwrap();
        write_deck(dir.path(), "props.grdecl", "PORO\n2*0.25 /\n");
        let deck = format!("{}INCLUDE\nprops.grdecl /\n", TWO_CELL_DECK);
        let path = write_deck(dir.path(), "main.grdecl", &deck);

        let model = parse(&path, &ConvertOptions::default()).unwrap();
        let poro = model.elem_vars.iter().find(|v| v.name == "PORO").unwrap();
        assert_eq!(poro.values, vec![0.25, 0.25]);
    }

    #[test]
    fn test_mapaxes_requested_but_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_deck(dir.path(), "two.grdecl", TWO_CELL_DECK);
        let options = ConvertOptions {
            use_mapaxes: true,
            ..Default::default()
        };
        let result = parse(&path, &options);
        assert!(matches!(result, Err(ConvertError::MissingMapAxes)));
    }

    #[test]
    fn test_inactive_cells_drop_out() {
        let dir = tempfile::tempdir().unwrap();
        let deck = TWO_CELL_DECK.replace("2*1 /", "0 1 /");
        let path = write_deck(dir.path(), "half.grdecl", &deck);

        let model = parse(&path, &ConvertOptions::default()).unwrap();
        assert_eq!(model.num_elems(), 1);
        assert_eq!(model.num_nodes(), 8);
        assert_eq!(model.elem_ids[[0, 0, 0]], 0);
        assert_eq!(model.elem_ids[[0, 0, 1]], 1);
        // Property vectors shrink to the active elements.
        let satnum = model.elem_vars.iter().find(|v| v.name == "SATNUM").unwrap();
        assert_eq!(satnum.values, vec![1.0]);
    }

    #[test]
    fn test_tolerance_knob_controls_fault_detection() {
        let dir = tempfile::tempdir().unwrap();
        // Displace the shared face by 1e-3: a fault under the default
        // tolerance, merged under a loose one.
        let deck = TWO_CELL_DECK.replace(
            "8*0.0\n8*1.0 /",
            "0 0 0.001 0.001 0 0 0.001 0.001\n1 1 1.001 1.001 1 1 1.001 1.001 /",
        );
        let path = write_deck(dir.path(), "fault.grdecl", &deck);

        let strict = parse(&path, &ConvertOptions::default()).unwrap();
        assert_eq!(strict.num_nodes(), 16);

        let loose = ConvertOptions {
            tolerance: Tolerance {
                rtol: 0.0,
                atol: 0.01,
            },
            ..Default::default()
        };
        let merged = parse(&path, &loose).unwrap();
        assert_eq!(merged.num_nodes(), 12);
    }
}
