//! Normal and log-normal distribution helpers.
//!
//! Thin wrappers around the special functions in [`statrs`] so callers do not
//! have to construct (fallible) distribution objects for the standard normal.

use statrs::function::erf::{erfc, erfc_inv};

const SQRT_2: f64 = std::f64::consts::SQRT_2;
const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Standard normal probability density.
#[must_use]
pub fn normal_pdf(x: f64) -> f64 {
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal cumulative distribution.
///
/// Returns exact 0 / 1 for infinite arguments.
#[must_use]
pub fn normal_cdf(x: f64) -> f64 {
    if x == f64::NEG_INFINITY {
        return 0.0;
    }
    if x == f64::INFINITY {
        return 1.0;
    }
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal quantile (probit).
///
/// `p` outside (0, 1) maps to the corresponding infinity.
#[must_use]
pub fn normal_quantile(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    -SQRT_2 * erfc_inv(2.0 * p)
}

/// Log-normal cumulative distribution with unit scale and shape `sigma`.
///
/// Evaluates `Φ(ln(x) / sigma)`; `x <= 0` gives 0.
#[must_use]
pub fn lognormal_cdf(x: f64, sigma: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    normal_cdf(x.ln() / sigma)
}
