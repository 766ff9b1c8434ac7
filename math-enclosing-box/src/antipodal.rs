//! Per-face antipodal points and slab thickness
//!
//! Every hull face defines a slab: its own plane and the parallel plane
//! through the hull vertex farthest behind it. Faces that share a supporting
//! direction (coplanar triangles, or opposite faces of the same slab) give
//! the same slab and are merged, keeping the lowest face id.

use math_convex_hull::{Mesh, Point};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Normals this close to (anti)parallel describe the same slab
const SAME_DIRECTION_EPSILON: f64 = 1e-9;

/// A slab of two parallel planes enclosing the hull, anchored on a hull face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportingPlane {
    /// Id of the hull face lying on the outer plane
    pub face: usize,
    /// Unit outward normal of that face
    pub normal: Point,
    /// `normal · x` for every point of the face plane
    pub offset: f64,
    /// Largest distance from the face plane to a hull vertex
    pub thickness: f64,
    /// Hull vertices at that distance (ties within the tie epsilon)
    pub antipodal: Vec<usize>,
}

impl SupportingPlane {
    /// Outward normal scaled by the slab thickness
    pub fn scaled_normal(&self) -> Point {
        self.normal.scale(self.thickness)
    }

    /// `normal · x` on the inner (antipodal) plane
    pub fn mirror_offset(&self) -> f64 {
        self.offset - self.thickness
    }

    /// Whether `point` lies between the two planes, within `tolerance`
    pub fn contains(&self, point: &Point, tolerance: f64) -> bool {
        let d = self.normal.dot(point);
        d <= self.offset + tolerance && d >= self.mirror_offset() - tolerance
    }
}

/// Compute the slab of one hull face, or `None` for a zero-area face
fn face_slab(hull: &Mesh, face_id: usize, vertices: &[usize], tie_epsilon: f64) -> Option<SupportingPlane> {
    let points = hull.points();
    let face = hull.face(face_id)?;
    let v = face.vertices();

    let e1 = points[v[1]].sub(&points[v[0]]);
    let e2 = points[v[2]].sub(&points[v[0]]);
    let normal = e1.cross(&e2).try_normalize()?;
    let offset = normal.dot(&points[v[0]]);

    let mut thickness = f64::NEG_INFINITY;
    let mut antipodal = Vec::new();

    for &i in vertices {
        let distance = offset - normal.dot(&points[i]);
        if distance > thickness + tie_epsilon {
            thickness = distance;
            antipodal.clear();
            antipodal.push(i);
        } else if distance >= thickness - tie_epsilon {
            thickness = thickness.max(distance);
            antipodal.push(i);
        }
    }

    Some(SupportingPlane {
        face: face_id,
        normal,
        offset,
        thickness,
        antipodal,
    })
}

/// Compute the distinct supporting slabs of a convex hull, ordered by face id
pub fn supporting_planes(hull: &Mesh, tie_epsilon: f64, parallel_threshold: usize) -> Vec<SupportingPlane> {
    let vertices = hull.vertices();
    let face_ids: Vec<usize> = hull.faces().map(|(id, _)| id).collect();

    let slabs: Vec<SupportingPlane> = if face_ids.len() >= parallel_threshold {
        face_ids
            .par_iter()
            .filter_map(|&id| face_slab(hull, id, &vertices, tie_epsilon))
            .collect()
    } else {
        face_ids
            .iter()
            .filter_map(|&id| face_slab(hull, id, &vertices, tie_epsilon))
            .collect()
    };

    let mut distinct: Vec<SupportingPlane> = Vec::with_capacity(slabs.len());
    for slab in slabs {
        let duplicate = distinct
            .iter()
            .any(|d| d.normal.dot(&slab.normal).abs() > 1.0 - SAME_DIRECTION_EPSILON);
        if !duplicate {
            distinct.push(slab);
        }
    }

    log::debug!(
        "{} hull faces give {} distinct supporting slabs",
        face_ids.len(),
        distinct.len()
    );

    distinct
}
