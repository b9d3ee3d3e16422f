//! One-dimensional interpolation with variable transforms.
//!
//! Fragility curves hold probabilities that span many orders of magnitude
//! (1e-12 up to 1). Interpolating them linearly produces poor results in the
//! tails, so the kernel can interpolate a transformed variable instead:
//!
//! | Transform | Forward | Use Case |
//! |-----------|---------|----------|
//! | [`Transform::Identity`] | `y` | Wave heights, periods, levels |
//! | [`Transform::Log`] | `ln(y)` | Probabilities and frequencies |
//! | [`Transform::Probit`] | `Φ⁻¹(y)` | Quantities bounded in (0, 1) |
//!
//! Outside the knot range the kernel extrapolates linearly (in the transformed
//! variable), it never clamps to the boundary value.
//!
//! # Lower limit
//!
//! A finite lower limit acts as a floor: values in `fp` below the limit are
//! replaced by it before transforming, and results that end up below (or
//! within a relative tolerance of) the limit are reported as exactly 0.
//!
//! # Example
//!
//! ```rust
//! use fragility_math::interpolation::{Interpolation, Transform};
//!
//! let kernel = Interpolation::new(Transform::Log)
//!     .with_lower_limit(1e-20)
//!     .with_clip01(true);
//!
//! let p = kernel.interpolate(1.5, &[1.0, 2.0], &[1e-4, 1e-2]).unwrap();
//! assert!((p - 1e-3).abs() < 1e-15);
//! ```

mod bracketing;
mod circular;

pub use bracketing::{bracketing_indices, Bracket, KNOT_EPSILON};
pub use circular::{circular_lerp, normalize_bearing};

use crate::distributions::{normal_cdf, normal_quantile};
use crate::error::{MathError, MathResult};

/// Relative distance to the lower limit below which a result snaps to 0.
pub const LOWER_LIMIT_TOLERANCE: f64 = 1e-5;

/// Bounds applied to probit inputs so the transform stays finite.
const PROBIT_BOUND: f64 = 1e-15;

/// Variable transform applied before interpolating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Transform {
    /// Interpolate the values as they are.
    #[default]
    Identity,
    /// Interpolate the natural logarithm.
    Log,
    /// Interpolate the standard normal quantile.
    Probit,
}

impl Transform {
    /// Applies the transform.
    #[must_use]
    pub fn forward(self, value: f64) -> f64 {
        match self {
            Self::Identity => value,
            // Zero and negative inputs only occur without a lower limit.
            Self::Log => value.max(f64::MIN_POSITIVE).ln(),
            Self::Probit => normal_quantile(value.clamp(PROBIT_BOUND, 1.0 - PROBIT_BOUND)),
        }
    }

    /// Applies the inverse transform.
    #[must_use]
    pub fn inverse(self, value: f64) -> f64 {
        match self {
            Self::Identity => value,
            Self::Log => value.exp(),
            Self::Probit => normal_cdf(value),
        }
    }
}

/// Interpolation kernel configuration.
///
/// The kernel is a small `Copy` value; build it once and reuse it for many
/// queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolation {
    transform: Transform,
    lower_limit: f64,
    clip01: bool,
}

impl Default for Interpolation {
    fn default() -> Self {
        Self::new(Transform::Identity)
    }
}

impl Interpolation {
    /// Creates a kernel with the given transform, no lower limit and no
    /// clipping.
    #[must_use]
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            lower_limit: f64::NEG_INFINITY,
            clip01: false,
        }
    }

    /// Sets the lower limit (floor) for input and output values.
    #[must_use]
    pub fn with_lower_limit(mut self, lower_limit: f64) -> Self {
        self.lower_limit = lower_limit;
        self
    }

    /// Enables or disables clipping of results to [0, 1].
    #[must_use]
    pub fn with_clip01(mut self, clip01: bool) -> Self {
        self.clip01 = clip01;
        self
    }

    /// Returns the transform.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Returns the lower limit.
    #[must_use]
    pub fn lower_limit(&self) -> f64 {
        self.lower_limit
    }

    /// Returns true if results are clipped to [0, 1].
    #[must_use]
    pub fn clips(&self) -> bool {
        self.clip01
    }

    /// Interpolates `fp` (given at knots `xp`) at `x`.
    ///
    /// # Errors
    ///
    /// Returns an error if `xp` is empty, decreasing somewhere, or has a
    /// different length than `fp`.
    pub fn interpolate(&self, x: f64, xp: &[f64], fp: &[f64]) -> MathResult<f64> {
        validate_knots(xp, fp)?;
        let transformed = self.prepare(fp);
        self.evaluate(x, xp, &transformed)
    }

    /// Interpolates `fp` at every value of `xs`.
    ///
    /// The knots are validated and transformed once.
    pub fn interpolate_many(&self, xs: &[f64], xp: &[f64], fp: &[f64]) -> MathResult<Vec<f64>> {
        validate_knots(xp, fp)?;
        let transformed = self.prepare(fp);
        xs.iter()
            .map(|&x| self.evaluate(x, xp, &transformed))
            .collect()
    }

    fn prepare(&self, fp: &[f64]) -> Vec<f64> {
        fp.iter()
            .map(|&value| {
                let floored = if value < self.lower_limit {
                    self.lower_limit
                } else {
                    value
                };
                self.transform.forward(floored)
            })
            .collect()
    }

    fn evaluate(&self, x: f64, xp: &[f64], transformed: &[f64]) -> MathResult<f64> {
        let bracket = bracketing_indices(xp, x, false)?;
        let value = bracket.lerp(transformed[bracket.lower], transformed[bracket.upper]);
        Ok(self.finish(self.transform.inverse(value)))
    }

    fn finish(&self, value: f64) -> f64 {
        let mut result = value;
        if self.lower_limit.is_finite()
            && (result < self.lower_limit
                || (result - self.lower_limit).abs()
                    <= LOWER_LIMIT_TOLERANCE * self.lower_limit.abs())
        {
            result = 0.0;
        }
        if self.clip01 {
            result = result.clamp(0.0, 1.0);
        }
        result
    }
}

fn validate_knots(xp: &[f64], fp: &[f64]) -> MathResult<()> {
    if xp.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    if xp.len() != fp.len() {
        return Err(MathError::length_mismatch("xp", xp.len(), "fp", fp.len()));
    }
    if let Some(i) = xp.windows(2).position(|w| w[1] < w[0]) {
        return Err(MathError::invalid_input(format!(
            "knots must be non-decreasing: xp[{}] = {} > xp[{}] = {}",
            i,
            xp[i],
            i + 1,
            xp[i + 1]
        )));
    }
    Ok(())
}
