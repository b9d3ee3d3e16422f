//! # Fragility Curves
//!
//! Fragility curves map a hydraulic load (typically a water level) to the
//! conditional probability that a flood defence fails.
//!
//! This crate provides:
//!
//! - **Curve Model**: [`FragilityCurve`] with refinement, load shifts and
//!   reliability updating; every operation returns a new curve
//! - **Exceedance Curves**: [`ExceedanceFrequencyCurve`] for load statistics
//! - **Combination**: [`CurveCombiner`] for independent, dependent and
//!   weighted combination of mechanism curves
//! - **Integration**: [`CurveIntegrator`] for the risk contribution of a curve
//!   against a load exceedance distribution
//!
//! ## Quick Start
//!
//! ```rust
//! use fragility_curves::prelude::*;
//!
//! let overtopping = FragilityCurve::new(
//!     vec![4.0, 5.0, 6.0, 7.0],
//!     vec![1e-6, 1e-4, 1e-2, 0.5],
//! ).unwrap();
//! let piping = FragilityCurve::new(
//!     vec![4.0, 5.0, 6.0, 7.0],
//!     vec![1e-5, 1e-3, 5e-2, 0.3],
//! ).unwrap();
//!
//! // Either mechanism leads to failure
//! let combined = CurveCombiner::new(CombineSettings::default())
//!     .combine(&[overtopping, piping])
//!     .unwrap();
//!
//! // Convolve with the yearly exceedance frequency of the water level
//! let exceedance = ExceedanceFrequencyCurve::new(
//!     vec![4.0, 5.0, 6.0, 7.0],
//!     vec![1e-1, 1e-2, 1e-3, 1e-4],
//! ).unwrap();
//! let risk = CurveIntegrator::new(IntegrationSettings::default())
//!     .integrate(&combined, &exceedance)
//!     .unwrap();
//!
//! assert!(risk.total_probability() > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::float_cmp)]

pub mod combine;
pub mod curve;
pub mod error;
pub mod exceedance;
pub mod grid;
pub mod integrate;
mod reliability;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::combine::{CombineMethod, CombineSettings, CurveCombiner};
    pub use crate::curve::{CurveSettings, FragilityCurve};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::exceedance::ExceedanceFrequencyCurve;
    pub use crate::grid::common_grid;
    pub use crate::integrate::{CurveIntegrator, IntegrationSettings};
}

pub use combine::{CombineMethod, CombineSettings, CurveCombiner};
pub use curve::{CurveSettings, FragilityCurve};
pub use error::{CurveError, CurveResult};
pub use exceedance::ExceedanceFrequencyCurve;
pub use integrate::{CurveIntegrator, IntegrationSettings};
