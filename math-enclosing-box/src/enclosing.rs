//! Minimal enclosing box: hull, slabs, best triple, corners, box mesh

use crate::antipodal::{SupportingPlane, supporting_planes};
use crate::candidates::{best_triple, candidate_pairs};
use crate::config::BoxConfig;
use crate::solver::{LinearSolver, LuSolver};
use crate::{BoxError, Result};
use math_convex_hull::{CancelFlag, ConvexHullBuilder, Face, Mesh, Point};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// The minimal enclosing parallelepiped of a point set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnclosingBox {
    mesh: Mesh,
    corners: [Point; 8],
    volume: f64,
    planes: [SupportingPlane; 3],
}

impl EnclosingBox {
    /// Box mesh: 8 corners and 6 outward-oriented quads
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }

    /// Corners indexed by bit mask: bit `r` set means the inner plane of slab `r`
    pub fn corners(&self) -> &[Point; 8] {
        &self.corners
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// The three slabs bounding the box
    pub fn planes(&self) -> &[SupportingPlane; 3] {
        &self.planes
    }

    /// Whether `point` lies inside the box or within `tolerance` of its boundary
    pub fn contains(&self, point: &Point, tolerance: f64) -> bool {
        self.planes.iter().all(|p| p.contains(point, tolerance))
    }
}

/// Computes minimal-volume enclosing parallelepipeds (Vivien–Wicker).
///
/// References:
/// - Vivien, F. and Wicker, N., "Minimal enclosing parallelepiped in 3D,"
///   Computational Geometry 29(3):177-190, 2004.
#[derive(Debug, Clone)]
pub struct MinimalEnclosingBox<S: LinearSolver = LuSolver> {
    config: BoxConfig,
    solver: S,
    cancel: Option<CancelFlag>,
}

impl MinimalEnclosingBox<LuSolver> {
    pub fn new(config: BoxConfig) -> Self {
        Self::with_solver(config, LuSolver::default())
    }
}

impl Default for MinimalEnclosingBox<LuSolver> {
    fn default() -> Self {
        Self::new(BoxConfig::default())
    }
}

impl<S: LinearSolver> MinimalEnclosingBox<S> {
    /// Use a custom solver for the corner systems
    pub fn with_solver(config: BoxConfig, solver: S) -> Self {
        Self {
            config,
            solver,
            cancel: None,
        }
    }

    /// Poll `flag` during hull construction and between triple-search rows
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &BoxConfig {
        &self.config
    }

    /// Compute the minimal enclosing box of `points`
    pub fn compute(&self, points: &[Point]) -> Result<EnclosingBox> {
        let mut builder = ConvexHullBuilder::new(self.config.hull.clone());
        if let Some(flag) = &self.cancel {
            builder = builder.with_cancel_flag(flag.clone());
        }
        let hull = builder.build(points)?;
        self.compute_from_hull(&hull)
    }

    /// Compute the minimal enclosing box of an already built convex hull
    pub fn compute_from_hull(&self, hull: &Mesh) -> Result<EnclosingBox> {
        let config = &self.config;

        let planes = supporting_planes(hull, config.tie_epsilon, config.parallel_threshold);
        let adjacency = candidate_pairs(&planes, config.triple_epsilon, config.parallel_threshold);
        let pair_count: usize = adjacency.iter().map(Vec::len).sum::<usize>() / 2;
        log::debug!("{} candidate slab pairs", pair_count);

        let triple = best_triple(
            &planes,
            &adjacency,
            config.triple_epsilon,
            config.parallel_threshold,
            self.cancel.as_ref(),
        )?;

        let [i, j, k] = triple.planes;
        let planes = [planes[i].clone(), planes[j].clone(), planes[k].clone()];
        let corners = box_corners(&planes, &self.solver)?;
        let mesh = assemble_box(&corners)?;

        Ok(EnclosingBox {
            mesh,
            corners,
            volume: triple.volume,
            planes,
        })
    }
}

/// Minimal enclosing box of `points` with the default configuration
pub fn minimal_enclosing_box(points: &[Point]) -> Result<EnclosingBox> {
    MinimalEnclosingBox::default().compute(points)
}

/// Intersect the three slabs: corner `c` lies on the outer plane of slab `r`
/// when bit `r` of `c` is clear, on the inner plane otherwise.
pub fn box_corners<S: LinearSolver + ?Sized>(
    planes: &[SupportingPlane; 3],
    solver: &S,
) -> Result<[Point; 8]> {
    let mut a = Array2::<f64>::zeros((3, 3));
    for (r, plane) in planes.iter().enumerate() {
        a[[r, 0]] = plane.normal.x;
        a[[r, 1]] = plane.normal.y;
        a[[r, 2]] = plane.normal.z;
    }

    let mut corners = [Point::default(); 8];
    for (corner, slot) in corners.iter_mut().enumerate() {
        let b: Array1<f64> = planes
            .iter()
            .enumerate()
            .map(|(r, plane)| {
                if corner & (1 << r) == 0 {
                    plane.offset
                } else {
                    plane.mirror_offset()
                }
            })
            .collect();

        let x = solver.solve(&a, &b).map_err(|e| {
            log::warn!("corner {} system has no solution: {}", corner, e);
            BoxError::SingularSystem { corner }
        })?;
        *slot = Point::new(x[0], x[1], x[2]);
    }

    Ok(corners)
}

/// Build the 6-quad mesh of a parallelepiped from its bit-indexed corners.
///
/// Faces come in slab order, outer plane first: the quads with bit `r`
/// clear then set, for `r` = 0, 1, 2.
pub fn assemble_box(corners: &[Point; 8]) -> Result<Mesh> {
    let center = corners
        .iter()
        .fold(Point::default(), |acc, c| acc.add(c))
        .scale(1.0 / 8.0);

    let mut mesh = Mesh::new(corners.to_vec());
    for r in 0..3 {
        let (p, q) = ((r + 1) % 3, (r + 2) % 3);
        for side in 0..2 {
            let base = side << r;
            let mut face = Face::new(
                [(0, 0), (1, 0), (1, 1), (0, 1)]
                    .iter()
                    .map(|&(sp, sq)| base | (sp << p) | (sq << q))
                    .collect(),
            )?;

            let outward = face.centroid(mesh.points()).sub(&center);
            if face.normal(mesh.points()).dot(&outward) < 0.0 {
                face.flip();
            }
            mesh.add_face(face)?;
        }
    }

    Ok(mesh)
}
