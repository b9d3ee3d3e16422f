//! # Fragility Hydra
//!
//! Hydraulic loads for the Fragility flood-risk library.
//!
//! This crate provides:
//!
//! - **Wave Conditions**: the [`WaveConditionProvider`] trait and the
//!   [`WaveConditionSource`] variants (Bretschneider formulas, precomputed
//!   grids, raw database rows)
//! - **Model Uncertainty**: discretized `Hs` / `Tspec` factor scenarios per
//!   [`ClosingSituation`]
//!
//! ## Example
//!
//! ```rust
//! use fragility_hydra::prelude::*;
//!
//! let source = WaveConditionSource::Empirical(
//!     Bretschneider::new(
//!         vec![0.0, 90.0, 180.0, 270.0],
//!         vec![-3.0, -3.0, -4.0, -3.5],
//!         vec![1500.0, 800.0, 4000.0, 2500.0],
//!     )
//!     .unwrap(),
//! );
//!
//! let waves = source
//!     .conditions_for_levels(20.0, 200.0, &[1.0, 2.0, 3.0])
//!     .unwrap();
//! assert!(waves.hs[0] < waves.hs[2]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]

pub mod closing;
pub mod error;
pub mod uncertainty;
pub mod waves;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::closing::ClosingSituation;
    pub use crate::error::{HydraError, HydraResult};
    pub use crate::uncertainty::{
        FactorDistribution, ModelUncertainty, UncertaintyParameters, UncertaintyScenario,
    };
    pub use crate::waves::{
        Aggregation, Bretschneider, RawWaveData, WaveConditionProvider, WaveConditionSample,
        WaveConditionSource, WaveConditions, WaveDataRow, WaveGrid, WaveQuantity,
    };
}

pub use closing::ClosingSituation;
pub use error::{HydraError, HydraResult};
pub use uncertainty::{ModelUncertainty, UncertaintyParameters, UncertaintyScenario};
pub use waves::{WaveConditionProvider, WaveConditionSource, WaveConditions};
