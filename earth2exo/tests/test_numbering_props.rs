//! Property tests for the node numbering: whatever the depths and activity
//! flags, the IDs it hands out are contiguous, complete per active cell,
//! distinct within a cell, and never merged across a fault.

use earth2exo::model::Tolerance;
use earth2exo::numbering;
use ndarray::{Array2, Array3};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

/// Corner pairs that meet at a shared lattice point across each face
/// direction, as (later cell corner, earlier cell corner).
const I_PAIRS: [(usize, usize); 4] = [(0, 1), (3, 2), (4, 5), (7, 6)];
const J_PAIRS: [(usize, usize); 4] = [(0, 3), (1, 2), (4, 7), (5, 6)];
const K_PAIRS: [(usize, usize); 4] = [(0, 4), (1, 5), (2, 6), (3, 7)];

#[derive(Debug, Clone)]
struct GridCase {
    nz: usize,
    ny: usize,
    nx: usize,
    /// Corner depths drawn from a small integer set so coincidences and
    /// faults both happen often.
    z: Vec<f64>,
    active: Vec<bool>,
}

fn grid_case() -> impl Strategy<Value = GridCase> {
    (1usize..=3, 1usize..=3, 1usize..=3).prop_flat_map(|(nz, ny, nx)| {
        let cells = nz * ny * nx;
        (
            proptest::collection::vec(0i64..=2, cells * 8),
            proptest::collection::vec(prop::bool::weighted(0.8), cells),
        )
            .prop_map(move |(z, active)| GridCase {
                nz,
                ny,
                nx,
                z: z.into_iter().map(|v| v as f64).collect(),
                active,
            })
    })
}

fn run_case(case: &GridCase) -> (Array2<f64>, Array3<i64>, ndarray::Array4<i64>) {
    let cells = case.nz * case.ny * case.nx;
    let z = Array2::from_shape_vec((cells, 8), case.z.clone()).unwrap();
    let active = Array3::from_shape_vec(
        (case.nz, case.ny, case.nx),
        case.active.iter().map(|&a| i64::from(a)).collect(),
    )
    .unwrap();
    let ids = numbering::number_nodes(&z, &active, Tolerance::default());
    (z, active, ids)
}

proptest! {
    #[test]
    fn active_cells_are_fully_numbered_with_distinct_corners(case in grid_case()) {
        let (_, active, ids) = run_case(&case);
        for k in 0..case.nz {
            for j in 0..case.ny {
                for i in 0..case.nx {
                    if active[[k, j, i]] == 0 {
                        continue;
                    }
                    let corners: Vec<i64> = (0..8).map(|c| ids[[k, j, i, c]]).collect();
                    prop_assert!(corners.iter().all(|&id| id > 0));
                    let mut unique = corners.clone();
                    unique.sort_unstable();
                    unique.dedup();
                    prop_assert_eq!(unique.len(), 8);
                }
            }
        }
    }

    #[test]
    fn ids_are_contiguous_from_one(case in grid_case()) {
        let (_, _, ids) = run_case(&case);
        let mut seen: Vec<i64> = ids.iter().copied().filter(|&id| id > 0).collect();
        seen.sort_unstable();
        seen.dedup();
        let max = seen.last().copied().unwrap_or(0);
        prop_assert_eq!(seen.len() as i64, max);
        if max > 0 {
            prop_assert_eq!(seen[0], 1);
        }
    }

    #[test]
    fn faulted_corners_never_share_ids(case in grid_case()) {
        let (z, active, ids) = run_case(&case);
        let cell = |k: usize, j: usize, i: usize| (k * case.ny + j) * case.nx + i;

        let check = |a: (usize, usize, usize),
                         b: (usize, usize, usize),
                         pairs: &[(usize, usize)]|
         -> Result<(), TestCaseError> {
            if active[[a.0, a.1, a.2]] == 0 || active[[b.0, b.1, b.2]] == 0 {
                return Ok(());
            }
            for &(bc, ac) in pairs {
                let za = z[[cell(a.0, a.1, a.2), ac]];
                let zb = z[[cell(b.0, b.1, b.2), bc]];
                if za != zb {
                    prop_assert_ne!(ids[[b.0, b.1, b.2, bc]], ids[[a.0, a.1, a.2, ac]]);
                }
            }
            Ok(())
        };

        for k in 0..case.nz {
            for j in 0..case.ny {
                for i in 0..case.nx {
                    if i > 0 {
                        check((k, j, i - 1), (k, j, i), &I_PAIRS)?;
                    }
                    if j > 0 {
                        check((k, j - 1, i), (k, j, i), &J_PAIRS)?;
                    }
                    if k > 0 {
                        check((k - 1, j, i), (k, j, i), &K_PAIRS)?;
                    }
                }
            }
        }
    }

    /// A fault-free, all-active grid meshes like a regular lattice.
    #[test]
    fn layered_grid_has_lattice_node_count(
        (nz, ny, nx) in (1usize..=3, 1usize..=3, 1usize..=3)
    ) {
        let cells = nz * ny * nx;
        let mut z = Array2::zeros((cells, 8));
        for k in 0..nz {
            for row in k * ny * nx..(k + 1) * ny * nx {
                for c in 0..4 {
                    z[[row, c]] = k as f64;
                    z[[row, c + 4]] = (k + 1) as f64;
                }
            }
        }
        let active = Array3::ones((nz, ny, nx));
        let ids = numbering::number_nodes(&z, &active, Tolerance::default());
        let max = ids.iter().copied().max().unwrap_or(0);
        prop_assert_eq!(max as usize, (nx + 1) * (ny + 1) * (nz + 1));
    }
}
