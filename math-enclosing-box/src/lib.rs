//! Minimal enclosing parallelepiped of a 3D point set
//!
//! Implements the Vivien–Wicker construction on top of the convex hull:
//!
//! 1. Build the hull (Akl–Toussaint filtered by default)
//! 2. For every hull face, find its antipodal vertices and slab thickness
//! 3. Pair up slabs whose normals are transversal
//! 4. Search all slab triples for the minimum volume
//! 5. Solve the 8 corner systems and assemble a 6-quad box mesh
//!
//! # Example
//! ```
//! use math_enclosing_box::{MinimalEnclosingBox, BoxConfig};
//! use math_convex_hull::testdata;
//!
//! let points = testdata::cube_points(2.0);
//! let result = MinimalEnclosingBox::new(BoxConfig::default()).compute(&points).unwrap();
//! assert!((result.volume() - 8.0).abs() < 1e-9);
//! assert_eq!(result.mesh().num_faces(), 6);
//! ```

mod antipodal;
mod candidates;
mod config;
mod enclosing;
pub mod solver;

pub use antipodal::{SupportingPlane, supporting_planes};
pub use candidates::{Triple, best_triple, candidate_pairs, intersect_sorted};
pub use config::BoxConfig;
pub use enclosing::{EnclosingBox, MinimalEnclosingBox, assemble_box, box_corners, minimal_enclosing_box};
pub use solver::{LinearSolver, LuSolver, SolveError};

use math_convex_hull::ConvexHullError;
use thiserror::Error;

/// Errors that can occur while computing an enclosing box
#[derive(Debug, Error)]
pub enum BoxError {
    /// The convex hull could not be built
    #[error("convex hull failed: {0}")]
    Hull(#[from] ConvexHullError),

    /// A corner system had no unique solution
    #[error("corner {corner} system is singular")]
    SingularSystem {
        /// Bit mask of the failing corner
        corner: usize,
    },

    /// No three slabs with independent normals exist
    #[error("no slab triple with independent normals")]
    NoSeparatingTriple,

    #[error("enclosing box computation cancelled")]
    Cancelled,
}

impl BoxError {
    /// Returns `true` for failures caused by the geometry of the input
    /// rather than by cancellation.
    pub fn is_degenerate(&self) -> bool {
        match self {
            BoxError::Hull(e) => e.is_degenerate(),
            BoxError::SingularSystem { .. } | BoxError::NoSeparatingTriple => true,
            BoxError::Cancelled => false,
        }
    }

    /// Returns `true` if the computation was stopped through a cancel flag
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            BoxError::Cancelled | BoxError::Hull(ConvexHullError::Cancelled)
        )
    }
}

/// A specialized `Result` type for enclosing box operations.
pub type Result<T> = std::result::Result<T, BoxError>;
