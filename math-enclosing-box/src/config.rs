//! Enclosing box configuration

use math_convex_hull::HullConfig;
use serde::{Deserialize, Serialize};

/// Minimal enclosing box configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxConfig {
    /// Hull construction settings (Akl–Toussaint filtering on by default)
    pub hull: HullConfig,
    /// Distance within which hull vertices tie for the antipodal set
    pub tie_epsilon: f64,
    /// Triples whose unit normals span less than this volume are skipped
    pub triple_epsilon: f64,
    /// Supporting-plane count above which candidate discovery and the
    /// triple search run in parallel
    pub parallel_threshold: usize,
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            hull: HullConfig::with_akl_toussaint(),
            tie_epsilon: 1e-6,
            triple_epsilon: 1e-9,
            parallel_threshold: 64,
        }
    }
}
