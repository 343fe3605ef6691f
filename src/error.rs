//! Error types for the curvefit-nd library

use thiserror::Error;

/// Main error type for curve-fitting operations.
///
/// This taxonomy is intentionally narrow: it only covers caller-input
/// validation failures. Numerical edge cases encountered while fitting
/// (a singular normal-equation matrix, a divergent Newton step, a run
/// that never reaches the error threshold) are recovered internally per
/// the fitting algorithm's own fallback rules and are never surfaced
/// here; they are only observable through `log::warn!` output.
#[derive(Error, Debug)]
pub enum FitError {
    #[error("points array is empty")]
    EmptyInput,

    #[error("dims must be at least 1, got {dims}")]
    ZeroDimensions { dims: usize },

    #[error("points[{index}] has {actual_dims} dimensions, expected {expected_dims} to match points[0]")]
    MisshapenInput {
        index: usize,
        actual_dims: usize,
        expected_dims: usize,
    },

    #[error("corners must contain at least 2 indices, got {len}")]
    TooFewCorners { len: usize },

    #[error("corners[{index}] = {value} is out of range for {points_len} points")]
    CornerOutOfRange {
        index: usize,
        value: usize,
        points_len: usize,
    },

    #[error(
        "corners must be strictly increasing; corners[{index}] = {value} does not exceed the previous entry {previous}"
    )]
    NonMonotonicCorners {
        index: usize,
        value: usize,
        previous: usize,
    },
}

/// Result type alias for convenience
pub type FitResult<T> = Result<T, FitError>;
