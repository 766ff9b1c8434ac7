//! Hull builder configuration and cooperative cancellation

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Convex hull construction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullConfig {
    /// Relative tolerance, scaled by the input extent
    pub epsilon: f64,
    /// Discard points inside the hull of the 6 axis-extremal points first
    pub use_akl_toussaint: bool,
    /// Face count above which visibility scans run in parallel
    pub parallel_threshold: usize,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            epsilon: crate::EPSILON,
            use_akl_toussaint: false,
            parallel_threshold: 100,
        }
    }
}

impl HullConfig {
    /// Default configuration with the Akl–Toussaint pre-filter enabled
    pub fn with_akl_toussaint() -> Self {
        Self {
            use_akl_toussaint: true,
            ..Default::default()
        }
    }
}

/// Shared flag used to stop a long-running computation between steps.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
