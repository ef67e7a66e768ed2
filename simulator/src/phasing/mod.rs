//! WP2 phasing and pointing control models.
//!
//! - [`requirement`]: closed-form path-length stability needed to keep the
//!   beam spot on the sail.
//! - [`control_loop`]: Monte Carlo walk-off of a single-pole controller
//!   rejecting path-length jitter.

use thiserror::Error;

pub mod control_loop;
pub mod requirement;

pub use control_loop::{closed_loop_walkoff, PsdSamples, WalkoffParams, WalkoffResult};
pub use requirement::{phase_error_frontier, required_path_length_stability, PhaseErrorFrontier};

/// Errors from the phasing models
#[derive(Debug, Error, PartialEq)]
pub enum PhasingError {
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("PSD has no samples")]
    EmptyPsd,

    #[error("PSD frequency and magnitude lengths differ: {frequencies} vs {magnitudes}")]
    PsdLengthMismatch {
        frequencies: usize,
        magnitudes: usize,
    },

    #[error("PSD sample {index} is invalid: {reason}")]
    InvalidPsdSample { index: usize, reason: String },

    #[error("run count must be at least 1")]
    NoRuns,

    #[error("acceleration time {accel_time_s} s is shorter than one sample interval ({sample_interval_s} s)")]
    NoSamples {
        accel_time_s: f64,
        sample_interval_s: f64,
    },

    #[error("{runs} runs of {samples} samples exceed the addressable sample count")]
    TooManySamples { runs: usize, samples: f64 },

    #[error("equivalent white-noise standard deviation is not finite ({0} m)")]
    NonFiniteNoise(f64),

    #[error("mission constants provide no {0}")]
    MissingMissionValue(&'static str),
}

/// Reject anything that is not a strictly positive finite number.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64, PhasingError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PhasingError::NonPositive { name, value })
    }
}
