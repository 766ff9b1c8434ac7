//! Candidate slab pairs and the best-triple search
//!
//! Three slabs with linearly independent normals always intersect in a
//! parallelepiped enclosing the hull. Its volume is
//!
//! ```text
//! V = (t_i² · t_j² · t_k²) / |s_i · (s_j × s_k)|
//! ```
//!
//! where `t` is the slab thickness and `s = t · n` the scaled normal. The
//! search enumerates pairs of transversal slabs, then completes each pair
//! with slabs transversal to both, found by merging sorted adjacency lists.

use crate::antipodal::SupportingPlane;
use crate::{BoxError, Result};
use math_convex_hull::CancelFlag;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Relative slack on the volume lower bound, covering rounding in the
/// triple product of orthogonal normals
const BOUND_SLACK: f64 = 1.0 + 1e-9;

/// The winning slab triple
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triple {
    /// Indices into the supporting plane list, ascending
    pub planes: [usize; 3],
    pub volume: f64,
}

/// Whether two slabs cross each other: their normals are not parallel
#[inline]
fn is_candidate_pair(a: &SupportingPlane, b: &SupportingPlane, epsilon: f64) -> bool {
    a.normal.cross(&b.normal).norm() > epsilon
}

/// Mutual candidate lists: `adjacency[i]` holds, ascending, every slab that
/// forms a candidate pair with slab `i`.
pub fn candidate_pairs(planes: &[SupportingPlane], epsilon: f64, parallel_threshold: usize) -> Vec<Vec<usize>> {
    let row = |i: usize| -> Vec<usize> {
        (0..planes.len())
            .filter(|&j| j != i && is_candidate_pair(&planes[i], &planes[j], epsilon))
            .collect()
    };

    if planes.len() >= parallel_threshold {
        (0..planes.len()).into_par_iter().map(row).collect()
    } else {
        (0..planes.len()).map(row).collect()
    }
}

/// Append to `out` the values present in both ascending lists
pub fn intersect_sorted(a: &[usize], b: &[usize], out: &mut Vec<usize>) {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
}

/// Best triple whose first slab is `i`, with volume strictly below `bound`
fn search_row(
    i: usize,
    planes: &[SupportingPlane],
    adjacency: &[Vec<usize>],
    triple_epsilon: f64,
    min_thickness: f64,
    bound: f64,
) -> Option<Triple> {
    let mut best: Option<Triple> = None;
    let mut best_volume = bound;
    let mut common = Vec::new();

    let pi = &planes[i];
    let si = pi.scaled_normal();

    for &j in adjacency[i].iter().filter(|&&j| j > i) {
        let pj = &planes[j];
        // |n_i · (n_j × n_k)| ≤ 1, so no completion of (i, j) beats this
        if pi.thickness * pj.thickness * min_thickness > best_volume * BOUND_SLACK {
            continue;
        }
        let sij = pj.scaled_normal();

        common.clear();
        intersect_sorted(&adjacency[i], &adjacency[j], &mut common);

        for &k in common.iter().filter(|&&k| k > j) {
            let pk = &planes[k];
            let thickness_product = pi.thickness * pj.thickness * pk.thickness;
            let triple_product = si.dot(&sij.cross(&pk.scaled_normal()));

            // compare the unit-normal volume so the threshold is scale-free
            if (triple_product / thickness_product).abs() <= triple_epsilon {
                continue;
            }

            let volume = thickness_product * thickness_product / triple_product.abs();
            if volume < best_volume {
                best_volume = volume;
                best = Some(Triple {
                    planes: [i, j, k],
                    volume,
                });
            }
        }
    }

    best
}

fn check_cancelled(cancel: Option<&CancelFlag>) -> Result<()> {
    match cancel {
        Some(flag) if flag.is_cancelled() => Err(BoxError::Cancelled),
        _ => Ok(()),
    }
}

/// Find the slab triple of minimum volume.
///
/// Ties keep the lexicographically smallest triple, in both the sequential
/// and the parallel path.
pub fn best_triple(
    planes: &[SupportingPlane],
    adjacency: &[Vec<usize>],
    triple_epsilon: f64,
    parallel_threshold: usize,
    cancel: Option<&CancelFlag>,
) -> Result<Triple> {
    let min_thickness = planes
        .iter()
        .map(|p| p.thickness)
        .fold(f64::INFINITY, f64::min);

    let best = if planes.len() >= parallel_threshold {
        let rows: Vec<Option<Triple>> = (0..planes.len())
            .into_par_iter()
            .map(|i| {
                check_cancelled(cancel)?;
                Ok(search_row(i, planes, adjacency, triple_epsilon, min_thickness, f64::INFINITY))
            })
            .collect::<Result<_>>()?;

        // rows are in index order, so the first minimum is the smallest triple
        rows.into_iter()
            .flatten()
            .fold(None, |best: Option<Triple>, t| match best {
                Some(b) if b.volume <= t.volume => Some(b),
                _ => Some(t),
            })
    } else {
        let mut best: Option<Triple> = None;
        for i in 0..planes.len() {
            check_cancelled(cancel)?;
            let bound = best.map_or(f64::INFINITY, |b| b.volume);
            if let Some(t) = search_row(i, planes, adjacency, triple_epsilon, min_thickness, bound) {
                best = Some(t);
            }
        }
        best
    };

    let best = best.ok_or(BoxError::NoSeparatingTriple)?;
    log::debug!(
        "best slab triple {:?} (faces {}, {}, {}) with volume {:.6e}",
        best.planes,
        planes[best.planes[0]].face,
        planes[best.planes[1]].face,
        planes[best.planes[2]].face,
        best.volume
    );
    Ok(best)
}
