//! Errors raised at the trajectory load boundary.
//!
//! Playback operations themselves never fail: out-of-range times are clamped
//! and non-finite sample values propagate into the derived state untouched.

use thiserror::Error;

/// Why a sequence of samples cannot be used as a trajectory.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TrajectoryError {
    #[error("sample {index} has a non-finite timestamp")]
    NonFiniteTime { index: usize },

    #[error("sample {index} has negative timestamp {t}")]
    NegativeTime { index: usize, t: f64 },

    #[error("sample {index} goes back in time ({prev} -> {next})")]
    NonMonotonicTime { index: usize, prev: f64, next: f64 },
}

/// A playback speed outside the supported multipliers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("unsupported playback speed x{0} (expected 1, 2, 5 or 10)")]
pub struct InvalidSpeed(pub u32);
