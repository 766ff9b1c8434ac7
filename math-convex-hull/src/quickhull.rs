//! Incremental convex hull construction for 3D point sets
//!
//! Based on:
//! - Barber, C.B., Dobkin, D.P., and Huhdanpaa, H.T., "The Quickhull algorithm
//!   for convex hulls," ACM Trans. on Mathematical Software, 22(4):469-483, 1996.
//!
//! Points are inserted in input order on top of a seed tetrahedron. For each
//! point the faces it can see are deleted and the horizon (the boundary of the
//! deleted region) is coned to the new point. Points set aside as collinear or
//! coplanar while searching for the seed are re-inserted at the end.
//!
//! Implementation notes:
//! - Faces live in the mesh arena; deletion vacates a slot in O(1)
//! - Horizon edges cancel pairwise through a reused HashMap
//! - Visibility scans go parallel with rayon on large hulls

use crate::akl_toussaint::akl_toussaint_filter;
use crate::config::{CancelFlag, HullConfig};
use crate::geometry::{Side, Tolerance, are_collinear, classify, orientation};
use crate::types::{Edge, Face, Mesh, Point};
use crate::{ConvexHullError, Result};
use rayon::prelude::*;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Scratch buffers to avoid allocations in hot loop
struct ScratchBuffers {
    visible_faces: Vec<usize>,
    boundary: HashMap<Edge, (usize, usize)>,
    horizon_edges: Vec<(usize, usize)>,
}

impl ScratchBuffers {
    fn new() -> Self {
        Self {
            visible_faces: Vec::with_capacity(64),
            boundary: HashMap::with_capacity(128),
            horizon_edges: Vec::with_capacity(64),
        }
    }

    fn clear(&mut self) {
        self.visible_faces.clear();
        self.boundary.clear();
        self.horizon_edges.clear();
    }
}

/// Seed tetrahedron plus the points skipped while looking for it
struct Seed {
    tetrahedron: [usize; 4],
    co_vertices: Vec<usize>,
    /// Position in the insertion order right after the fourth seed point
    resume_at: usize,
}

/// Builds the convex hull of a point set.
///
/// The builder is stateless between calls; one instance can be shared.
#[derive(Debug, Clone, Default)]
pub struct ConvexHullBuilder {
    config: HullConfig,
    cancel: Option<CancelFlag>,
}

impl ConvexHullBuilder {
    pub fn new(config: HullConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Poll `flag` between point insertions and stop with
    /// [`ConvexHullError::Cancelled`] once it is raised.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &HullConfig {
        &self.config
    }

    /// Build the convex hull of `points`.
    ///
    /// The returned mesh keeps every input point; only hull vertices are
    /// referenced by its faces (see [`Mesh::vertices`]).
    pub fn build(&self, points: &[Point]) -> Result<Mesh> {
        if points.len() < 4 {
            return Err(ConvexHullError::InsufficientPoints {
                found: points.len(),
            });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(ConvexHullError::NonFinitePoint { index });
        }

        let tolerance = Tolerance::for_points(points, self.config.epsilon);
        let mut order: Vec<usize> = (0..points.len()).collect();

        if self.config.use_akl_toussaint {
            order = akl_toussaint_filter(points, &order, &tolerance);
            log::debug!(
                "Akl-Toussaint filter kept {} of {} points",
                order.len(),
                points.len()
            );
            if order.len() < 4 {
                return Err(ConvexHullError::InsufficientPoints { found: order.len() });
            }
        }

        self.build_indexed(points, &order, &tolerance)
    }

    /// Run the incremental construction over `points[order[..]]`, in that order
    pub(crate) fn build_indexed(
        &self,
        points: &[Point],
        order: &[usize],
        tolerance: &Tolerance,
    ) -> Result<Mesh> {
        let seed = find_seed(points, order, tolerance)?;

        let mut mesh = Mesh::new(points.to_vec());
        add_seed_faces(&mut mesh, seed.tetrahedron)?;

        let mut scratch = ScratchBuffers::new();
        let mut discarded = 0;

        for &point_idx in order[seed.resume_at..].iter().chain(&seed.co_vertices) {
            self.check_cancelled()?;
            if !self.insert_point(&mut mesh, point_idx, tolerance, &mut scratch)? {
                discarded += 1;
            }
        }

        if mesh.num_faces() == 0 {
            return Err(ConvexHullError::DegenerateGeometry);
        }
        mesh.compact();

        log::debug!(
            "Hull of {} points: {} faces, {} vertices ({} co-vertices re-inserted, {} discarded)",
            order.len(),
            mesh.num_faces(),
            mesh.num_vertices(),
            seed.co_vertices.len(),
            discarded
        );

        Ok(mesh)
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.is_cancelled() => Err(ConvexHullError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Insert one point; returns `false` when no face sees it (interior or
    /// coplanar) and the point is discarded.
    fn insert_point(
        &self,
        mesh: &mut Mesh,
        point_idx: usize,
        tolerance: &Tolerance,
        scratch: &mut ScratchBuffers,
    ) -> Result<bool> {
        scratch.clear();
        let point = mesh.points()[point_idx];

        find_visible_faces(
            mesh,
            &point,
            tolerance.volume,
            self.config.parallel_threshold,
            &mut scratch.visible_faces,
        );

        if scratch.visible_faces.is_empty() {
            log::trace!("point {} is inside the hull", point_idx);
            return Ok(false);
        }

        find_horizon(
            mesh,
            &scratch.visible_faces,
            &mut scratch.boundary,
            &mut scratch.horizon_edges,
        );

        for &face_id in &scratch.visible_faces {
            mesh.remove_face(face_id);
        }

        // Horizon edges keep the orientation they had in the deleted faces,
        // so the cone to the new point stays outward-facing.
        for &(a, b) in &scratch.horizon_edges {
            mesh.add_face(Face::triangle(a, b, point_idx)?)?;
        }

        log::trace!(
            "point {}: {} faces removed, {} added",
            point_idx,
            scratch.visible_faces.len(),
            scratch.horizon_edges.len()
        );

        Ok(true)
    }
}

/// Build the convex hull of `points` with the default tolerances
pub fn convex_hull(points: &[Point], use_akl_toussaint: bool) -> Result<Mesh> {
    let config = HullConfig {
        use_akl_toussaint,
        ..Default::default()
    };
    ConvexHullBuilder::new(config).build(points)
}

#[inline]
fn face_side(face: &Face, points: &[Point], point: &Point, tolerance: f64) -> Side {
    let v = face.vertices();
    classify(&points[v[0]], &points[v[1]], &points[v[2]], point, tolerance)
}

/// Collect the ids of the faces strictly visible from `point`, in id order
fn find_visible_faces(
    mesh: &Mesh,
    point: &Point,
    tolerance: f64,
    parallel_threshold: usize,
    result: &mut Vec<usize>,
) {
    let points = mesh.points();
    let visible = |(id, slot): (usize, &Option<Face>)| {
        let face = slot.as_ref()?;
        (face_side(face, points, point, tolerance) == Side::Outside).then_some(id)
    };

    if mesh.num_faces() >= parallel_threshold {
        let found: Vec<usize> = mesh
            .face_slots()
            .par_iter()
            .enumerate()
            .filter_map(visible)
            .collect();
        result.extend(found);
    } else {
        result.extend(mesh.face_slots().iter().enumerate().filter_map(visible));
    }
}

/// Compute the oriented horizon edges of a set of visible faces.
///
/// An edge seen twice belongs to two visible faces and cancels out; the
/// edges left over separate visible from hidden faces.
fn find_horizon(
    mesh: &Mesh,
    visible_faces: &[usize],
    boundary: &mut HashMap<Edge, (usize, usize)>,
    horizon: &mut Vec<(usize, usize)>,
) {
    boundary.clear();
    horizon.clear();

    for face in visible_faces.iter().filter_map(|&id| mesh.face(id)) {
        for (a, b) in face.oriented_edges() {
            match boundary.entry(Edge::new(a, b)) {
                Entry::Vacant(e) => {
                    e.insert((a, b));
                }
                Entry::Occupied(e) => {
                    e.remove();
                }
            }
        }
    }

    horizon.extend(boundary.values().copied());
    // HashMap order is unspecified; keep face creation deterministic
    horizon.sort_unstable();
}

/// Scan the insertion order for the seed tetrahedron.
///
/// Points coincident with the first point are dropped. Points collinear with
/// the first pair, or coplanar with the first triangle, are kept aside as
/// co-vertices and re-inserted once the hull exists.
fn find_seed(points: &[Point], order: &[usize], tolerance: &Tolerance) -> Result<Seed> {
    let mut scan = order.iter().copied().enumerate();
    let mut co_vertices = Vec::new();

    let Some((_, a)) = scan.next() else {
        return Err(ConvexHullError::InsufficientPoints { found: 0 });
    };

    let b = loop {
        let Some((_, i)) = scan.next() else {
            return Err(ConvexHullError::DegenerateGeometry);
        };
        if points[i].distance(&points[a]) > tolerance.length {
            break i;
        }
    };

    let c = loop {
        let Some((_, i)) = scan.next() else {
            return Err(ConvexHullError::DegenerateGeometry);
        };
        if !are_collinear(&points[a], &points[b], &points[i], tolerance.area) {
            break i;
        }
        co_vertices.push(i);
    };

    let (position, d) = loop {
        let Some((position, i)) = scan.next() else {
            return Err(ConvexHullError::DegenerateGeometry);
        };
        if orientation(&points[a], &points[b], &points[c], &points[i]).abs() > tolerance.volume {
            break (position, i);
        }
        co_vertices.push(i);
    };

    Ok(Seed {
        tetrahedron: [a, b, c, d],
        co_vertices,
        resume_at: position + 1,
    })
}

/// Add the four outward-oriented faces of the seed tetrahedron
fn add_seed_faces(mesh: &mut Mesh, tetrahedron: [usize; 4]) -> Result<()> {
    let [a, mut b, mut c, d] = tetrahedron;

    // d must lie behind (a, b, c); otherwise reverse the first triangle
    let points = mesh.points();
    if orientation(&points[a], &points[b], &points[c], &points[d]) < 0.0 {
        std::mem::swap(&mut b, &mut c);
    }

    for face in [
        Face::triangle(a, b, c)?,
        Face::triangle(a, d, b)?,
        Face::triangle(b, d, c)?,
        Face::triangle(c, d, a)?,
    ] {
        mesh.add_face(face)?;
    }

    Ok(())
}
