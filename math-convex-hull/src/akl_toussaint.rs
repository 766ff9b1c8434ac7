//! Akl–Toussaint interior-point pre-filter
//!
//! The hull of the six axis-extremal points is contained in the full hull,
//! so any point strictly inside it can never become a hull vertex.

use crate::geometry::{Side, Tolerance, classify, find_extreme_points};
use crate::quickhull::ConvexHullBuilder;
use crate::types::Point;

/// Drop the points of `candidates` lying strictly inside the hull of their
/// axis-extremal points.
///
/// Input order is preserved. When the extremal points span no volume the
/// candidates are returned unchanged.
pub fn akl_toussaint_filter(
    points: &[Point],
    candidates: &[usize],
    tolerance: &Tolerance,
) -> Vec<usize> {
    let Some(extremes) = find_extreme_points(points, candidates) else {
        return Vec::new();
    };

    let mut extremes = extremes.to_vec();
    extremes.sort_unstable();
    extremes.dedup();

    if extremes.len() < 4 {
        return candidates.to_vec();
    }

    let reduced = match ConvexHullBuilder::default().build_indexed(points, &extremes, tolerance) {
        Ok(mesh) => mesh,
        Err(e) => {
            log::trace!("extremal points give no reduced hull ({}), skipping filter", e);
            return candidates.to_vec();
        }
    };

    let faces: Vec<[Point; 3]> = reduced
        .faces()
        .map(|(_, f)| {
            let v = f.vertices();
            [points[v[0]], points[v[1]], points[v[2]]]
        })
        .collect();

    candidates
        .iter()
        .copied()
        .filter(|&i| {
            reduced.is_vertex(i)
                || faces.iter().any(|[a, b, c]| {
                    classify(a, b, c, &points[i], tolerance.volume) != Side::Inside
                })
        })
        .collect()
}
