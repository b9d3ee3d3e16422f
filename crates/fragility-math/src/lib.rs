//! # Fragility Math
//!
//! Numerical building blocks for the Fragility flood-risk library.
//!
//! This crate provides:
//!
//! - **Interpolation**: 1D interpolation/extrapolation with variable transforms
//!   (identity, log, probit), lower-limit flooring and [0, 1] clipping
//! - **Bracketing**: knot lookup on linear and circular (compass) domains
//! - **Grids**: stepped load grids with drift-free decimal rounding
//! - **Distributions**: standard normal and log-normal helpers
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: identical inputs give bit-identical outputs
//! - **Forgiving where physics allows it**: degenerate knot spacing is
//!   corrected with an epsilon instead of failing

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]

pub mod distributions;
pub mod error;
pub mod grid;
pub mod interpolation;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::distributions::{lognormal_cdf, normal_cdf, normal_pdf, normal_quantile};
    pub use crate::error::{MathError, MathResult};
    pub use crate::grid::{decimals_for_step, round_to, stepped_range};
    pub use crate::interpolation::{
        bracketing_indices, circular_lerp, normalize_bearing, Bracket, Interpolation, Transform,
    };
}

pub use error::{MathError, MathResult};
