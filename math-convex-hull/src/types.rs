//! Core data types: points, faces, edges and the face-arena mesh

use crate::{ConvexHullError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// A point (or free vector) in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a point from spherical coordinates (azimuth, elevation in radians, radius)
    pub fn from_spherical(azimuth: f64, elevation: f64, radius: f64) -> Self {
        let x = radius * elevation.cos() * azimuth.cos();
        let y = radius * elevation.cos() * azimuth.sin();
        let z = radius * elevation.sin();
        Self { x, y, z }
    }

    /// Dot product with another point
    pub fn dot(&self, other: &Point) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product with another point
    pub fn cross(&self, other: &Point) -> Point {
        Point {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Subtract another point
    pub fn sub(&self, other: &Point) -> Point {
        Point {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    /// Add another point
    pub fn add(&self, other: &Point) -> Point {
        Point {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    /// Scale by a scalar
    pub fn scale(&self, s: f64) -> Point {
        Point {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector
    pub fn try_normalize(&self) -> Option<Point> {
        let norm = self.norm();
        if norm > f64::MIN_POSITIVE && norm.is_finite() {
            Some(self.scale(1.0 / norm))
        } else {
            None
        }
    }

    /// Normalize to unit length; zero vectors are returned unchanged
    pub fn normalize(&self) -> Point {
        self.try_normalize().unwrap_or(*self)
    }

    /// Distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        self.sub(other).norm()
    }

    /// Coordinate-wise equality within `epsilon`
    pub fn approx_eq(&self, other: &Point, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Coordinates as an array
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Point {
    fn from(c: [f64; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6}, {:.6})", self.x, self.y, self.z)
    }
}

/// Undirected edge between two vertex indices.
///
/// The pair is stored as `(min, max)` so `Edge::new(a, b) == Edge::new(b, a)`
/// and the edge can be used directly as a map or set key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub v0: usize,
    pub v1: usize,
}

impl Edge {
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        if a < b {
            Self { v0: a, v1: b }
        } else {
            Self { v0: b, v1: a }
        }
    }
}

/// A planar polygon given by an ordered list of vertex indices.
///
/// Vertex order defines the outward normal through the right-hand rule.
/// Hull faces are always triangles; the enclosing box uses quads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    vertices: Vec<usize>,
}

impl Face {
    /// Create a face, checking it has at least 3 pairwise distinct vertices
    pub fn new(vertices: Vec<usize>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(ConvexHullError::InvalidFace(format!(
                "a face needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        for (i, v) in vertices.iter().enumerate() {
            if vertices[i + 1..].contains(v) {
                return Err(ConvexHullError::InvalidFace(format!(
                    "vertex {} repeated in face {:?}",
                    v, vertices
                )));
            }
        }
        Ok(Self { vertices })
    }

    /// Create a triangular face
    pub fn triangle(v0: usize, v1: usize, v2: usize) -> Result<Self> {
        Self::new(vec![v0, v1, v2])
    }

    /// Ordered vertex indices
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false: a face holds at least 3 vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn is_triangle(&self) -> bool {
        self.vertices.len() == 3
    }

    /// Check if this face references a vertex index
    pub fn contains(&self, v: usize) -> bool {
        self.vertices.contains(&v)
    }

    /// Consecutive vertex pairs `(a, b)` in face order, closing back to the first vertex
    pub fn oriented_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Undirected edges of this face
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.oriented_edges().map(|(a, b)| Edge::new(a, b))
    }

    /// Reverse the vertex order, flipping the outward normal
    pub fn flip(&mut self) {
        self.vertices.reverse();
    }

    /// Unit normal (Newell's method, exact for planar polygons)
    pub fn normal(&self, points: &[Point]) -> Point {
        self.area_vector(points).normalize()
    }

    /// Area-weighted normal: its length is twice the polygon area
    fn area_vector(&self, points: &[Point]) -> Point {
        let origin = points[self.vertices[0]];
        let mut sum = Point::default();
        for i in 1..self.vertices.len() - 1 {
            let e1 = points[self.vertices[i]].sub(&origin);
            let e2 = points[self.vertices[i + 1]].sub(&origin);
            sum = sum.add(&e1.cross(&e2));
        }
        sum
    }

    /// Polygon area
    pub fn area(&self, points: &[Point]) -> f64 {
        self.area_vector(points).norm() / 2.0
    }

    /// Average of the face vertices
    pub fn centroid(&self, points: &[Point]) -> Point {
        let sum = self
            .vertices
            .iter()
            .fold(Point::default(), |acc, &v| acc.add(&points[v]));
        sum.scale(1.0 / self.vertices.len() as f64)
    }
}

/// A polygon mesh owning its points and an arena of faces.
///
/// Faces live in slots addressed by a face id; removing a face vacates its
/// slot without shifting the others. Vertex reference counts track which
/// points are still used by a live face.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    points: Vec<Point>,
    faces: Vec<Option<Face>>,
    vertex_refs: Vec<u32>,
    live_faces: usize,
}

impl Mesh {
    /// Create an empty mesh over a point set
    pub fn new(points: Vec<Point>) -> Self {
        let vertex_refs = vec![0; points.len()];
        Self {
            points,
            faces: Vec::new(),
            vertex_refs,
            live_faces: 0,
        }
    }

    /// Add a face, returning its id
    pub fn add_face(&mut self, face: Face) -> Result<usize> {
        if let Some(&v) = face.vertices().iter().find(|&&v| v >= self.points.len()) {
            return Err(ConvexHullError::InvalidFace(format!(
                "vertex index {} out of range for {} points",
                v,
                self.points.len()
            )));
        }
        for &v in face.vertices() {
            self.vertex_refs[v] += 1;
        }
        self.faces.push(Some(face));
        self.live_faces += 1;
        Ok(self.faces.len() - 1)
    }

    /// Remove a face, returning it if the id referred to a live face
    pub fn remove_face(&mut self, id: usize) -> Option<Face> {
        let face = self.faces.get_mut(id)?.take()?;
        for &v in face.vertices() {
            self.vertex_refs[v] -= 1;
        }
        self.live_faces -= 1;
        Some(face)
    }

    /// Look up a live face
    pub fn face(&self, id: usize) -> Option<&Face> {
        self.faces.get(id).and_then(Option::as_ref)
    }

    /// Live faces with their ids
    pub fn faces(&self) -> impl Iterator<Item = (usize, &Face)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(id, f)| f.as_ref().map(|f| (id, f)))
    }

    pub(crate) fn face_slots(&self) -> &[Option<Face>] {
        &self.faces
    }

    /// All points the mesh was created over, referenced or not
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Indices of the points referenced by at least one live face, ascending
    pub fn vertices(&self) -> Vec<usize> {
        self.vertex_refs
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Coordinates of the referenced vertices, in index order
    pub fn vertex_points(&self) -> Vec<Point> {
        self.vertices().into_iter().map(|i| self.points[i]).collect()
    }

    /// Whether a point index is referenced by a live face
    pub fn is_vertex(&self, v: usize) -> bool {
        self.vertex_refs.get(v).is_some_and(|&count| count > 0)
    }

    pub fn num_faces(&self) -> usize {
        self.live_faces
    }

    pub fn num_vertices(&self) -> usize {
        self.vertex_refs.iter().filter(|&&count| count > 0).count()
    }

    /// Distinct undirected edges of the live faces
    pub fn edges(&self) -> BTreeSet<Edge> {
        self.faces().flat_map(|(_, f)| f.edges()).collect()
    }

    pub fn num_edges(&self) -> usize {
        self.edges().len()
    }

    /// True when every edge is shared by exactly two faces with opposite orientation
    pub fn is_closed(&self) -> bool {
        let mut directed: HashMap<(usize, usize), usize> = HashMap::new();
        for (_, face) in self.faces() {
            for e in face.oriented_edges() {
                *directed.entry(e).or_insert(0) += 1;
            }
        }
        !directed.is_empty()
            && directed
                .iter()
                .all(|(&(a, b), &count)| count == 1 && directed.get(&(b, a)) == Some(&1))
    }

    /// True when no vertex lies more than `tolerance` outside any face plane
    pub fn is_convex(&self, tolerance: f64) -> bool {
        let vertices = self.vertices();
        self.faces().all(|(_, face)| {
            let normal = face.normal(&self.points);
            let origin = self.points[face.vertices()[0]];
            vertices
                .iter()
                .filter(|&&v| !face.contains(v))
                .all(|&v| normal.dot(&self.points[v].sub(&origin)) <= tolerance)
        })
    }

    /// Signed enclosed volume; positive when faces are outward-oriented
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;
        for (_, face) in self.faces() {
            let v = face.vertices();
            let p0 = &self.points[v[0]];
            for i in 1..v.len() - 1 {
                let p1 = &self.points[v[i]];
                let p2 = &self.points[v[i + 1]];
                volume += p0.dot(&p1.cross(p2)) / 6.0;
            }
        }
        volume
    }

    /// Enclosed volume
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Total face area
    pub fn surface_area(&self) -> f64 {
        self.faces().map(|(_, f)| f.area(&self.points)).sum()
    }

    /// Drop vacated face slots; face ids are renumbered in order
    pub fn compact(&mut self) {
        self.faces.retain(Option::is_some);
    }
}
