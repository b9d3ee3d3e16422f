//! Fragility Configuration Layer
//!
//! This crate loads, validates and applies the settings of a fragility
//! assessment.
//!
//! # Features
//!
//! - **Curve Configuration**: normalization of curves built from external results
//! - **Combination and Integration**: grid steps, combination rule and weights
//! - **Overtopping Configuration**: wind, load grid and critical discharge
//! - **Model Uncertainty**: factor distributions per closing situation
//! - **Validation**: every section reports all of its problems at once
//!
//! # Example
//!
//! ```rust
//! use fragility_config::{FragilityConfig, Validate};
//!
//! let config = FragilityConfig::from_json_str(
//!     r#"{
//!         "combine": { "method": "dependent" },
//!         "uncertainty": {
//!             "entries": [
//!                 { "closing_situation": 1, "hs_mean": 0.96, "hs_stddev": 0.27,
//!                   "tspec_mean": 1.03, "tspec_stddev": 0.13 }
//!             ]
//!         }
//!     }"#,
//! )
//! .unwrap();
//!
//! assert!(config.is_valid());
//! let uncertainty = config.model_uncertainty().unwrap();
//! assert_eq!(uncertainty.discretization(), 5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod settings;
mod validation;

pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use settings::{FragilityConfig, UncertaintyConfig, UncertaintyEntry};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ConfigError, ConfigResult, Validate};
    pub use crate::settings::{FragilityConfig, UncertaintyConfig};
}
