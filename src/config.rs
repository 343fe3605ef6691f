//! Configuration types for the curve fitter

use serde::{Deserialize, Serialize};

/// Tunable numeric constants for the adaptive Bezier fit.
///
/// These are the knobs the fitting algorithm itself exposes; they are
/// not part of the per-call signature (`points`, `dims`, `error_threshold`,
/// `corners`) because callers essentially never need to change them, but
/// they are broken out here rather than hard-coded so that unusual inputs
/// (very high dimension, pathological point spacing) can be tuned without
/// forking the algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitConfig {
    /// Maximum number of Newton-Raphson reparameterization attempts per
    /// recursion level before giving up and splitting (default: 4).
    pub max_reparam_iterations: u32,

    /// Multiplier applied to the run's weighted-centroid spread to obtain
    /// the handle-clamp sphere radius (default: 3.0).
    pub clamp_scale: f64,

    /// Threshold below which the normal-equation determinant is treated
    /// as singular and nudged rather than divided by directly
    /// (default: 1e-12).
    pub determinant_zero_epsilon: f64,

    /// Nudge factor applied to `C[0][0] * C[1][1]` when the determinant
    /// is judged singular (default: 1e-11).
    pub determinant_nudge_factor: f64,

    /// Epsilon used when comparing two n-dimensional points for equality,
    /// e.g. to detect the split-index degenerate-tangent guard
    /// (default: 1e-10).
    pub point_equality_epsilon: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_reparam_iterations: 4,
            clamp_scale: 3.0,
            determinant_zero_epsilon: 1e-12,
            determinant_nudge_factor: 1e-11,
            point_equality_epsilon: 1e-10,
        }
    }
}
