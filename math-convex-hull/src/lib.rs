//! 3D Convex Hull Library
//!
//! This library implements an incremental (Beneath-Beyond / Quickhull style)
//! construction of the convex hull of a 3D point set, with an optional
//! Akl–Toussaint pre-filter that discards points provably interior to the
//! hull of the six axis-extremal points.
//!
//! The hull is returned as a [`Mesh`]: an arena of outward-oriented
//! triangular [`Face`]s over the input points. Hull vertices are always
//! input points; nothing is synthesized.
//!
//! # Example
//! ```
//! use math_convex_hull::{ConvexHullBuilder, HullConfig, Point};
//!
//! let points = vec![
//!     Point::new(0.0, 0.0, 0.0),
//!     Point::new(1.0, 0.0, 0.0),
//!     Point::new(0.0, 1.0, 0.0),
//!     Point::new(0.0, 0.0, 1.0),
//!     Point::new(0.1, 0.1, 0.1),
//! ];
//!
//! let hull = ConvexHullBuilder::new(HullConfig::default()).build(&points).unwrap();
//! assert_eq!(hull.num_faces(), 4);
//! assert_eq!(hull.num_vertices(), 4);
//! ```

mod akl_toussaint;
mod config;
mod geometry;
mod quickhull;
mod types;

pub mod testdata;

pub use akl_toussaint::akl_toussaint_filter;
pub use config::{CancelFlag, HullConfig};
pub use geometry::{
    Side, Tolerance, are_collinear, are_coplanar, bounding_extent, classify, find_extreme_points,
    orientation, tetrahedron_volume,
};
pub use quickhull::{ConvexHullBuilder, convex_hull};
pub use types::{Edge, Face, Mesh, Point};

/// Error types for convex hull operations
#[derive(Debug, thiserror::Error)]
pub enum ConvexHullError {
    #[error("not enough points to form a hull: {found} (minimum 4 required)")]
    InsufficientPoints { found: usize },

    #[error("points are coincident, collinear or coplanar")]
    DegenerateGeometry,

    #[error("point {index} has a non-finite coordinate")]
    NonFinitePoint { index: usize },

    #[error("invalid face: {0}")]
    InvalidFace(String),

    #[error("hull construction cancelled")]
    Cancelled,
}

impl ConvexHullError {
    /// Returns `true` when the input cannot span a solid: too few points or
    /// a flat/collinear configuration.
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            ConvexHullError::InsufficientPoints { .. } | ConvexHullError::DegenerateGeometry
        )
    }
}

pub type Result<T> = std::result::Result<T, ConvexHullError>;

/// Default relative tolerance for floating-point comparisons.
///
/// Scaled by the input extent (see [`Tolerance`]) before use in
/// coincidence, collinearity, coplanarity and visibility tests.
pub const EPSILON: f64 = 1e-10;
