//! Error types for curve operations.

use fragility_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Not enough data points.
    #[error("Insufficient points: need at least {required}, got {got}")]
    InsufficientPoints {
        /// Minimum required points.
        required: usize,
        /// Actual number of points provided.
        got: usize,
    },

    /// Load and value columns differ in length.
    #[error("Length mismatch: {loads} loads but {values} values")]
    LengthMismatch {
        /// Number of loads.
        loads: usize,
        /// Number of values.
        values: usize,
    },

    /// Invalid value (NaN, Inf, or domain error).
    #[error("Invalid value: {reason}")]
    InvalidValue {
        /// Description of why value is invalid.
        reason: String,
    },

    /// Reliability update at a level where the curve is (almost) certain
    /// failure; the renormalization `1 - F` would divide by zero.
    #[error(
        "Degenerate reliability update at level {update_level:.4}: failure probability {probability:.6e} leaves no mass to renormalize"
    )]
    DegenerateUpdate {
        /// The update (survived) load level.
        update_level: f64,
        /// Curve probability at the update level.
        probability: f64,
    },

    /// Error raised by the interpolation kernel.
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

impl CurveError {
    /// Creates an insufficient points error.
    #[must_use]
    pub fn insufficient_points(required: usize, got: usize) -> Self {
        Self::InsufficientPoints { required, got }
    }

    /// Creates a length mismatch error.
    #[must_use]
    pub fn length_mismatch(loads: usize, values: usize) -> Self {
        Self::LengthMismatch { loads, values }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }
}
