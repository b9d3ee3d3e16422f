//! # Fragility Mechanisms
//!
//! Fragility curve builders for flood-defence failure mechanisms.
//!
//! This crate provides:
//!
//! - **Profiles**: [`ProfileGeometry`] and the [`Profile`] physics trait
//! - **Overtopping**: [`OvertoppingCurveBuilder`], combining wave conditions,
//!   model uncertainty and a [`CriticalDischarge`] criterion
//! - **Piping**: [`PipingCurveBuilder`] around an external [`PipingSolver`]
//!
//! ## Feature Flags
//!
//! - `parallel`: evaluate overtopping load points on the rayon thread pool.
//!   Scenario sums per load keep their order, so results are identical to
//!   the sequential build.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]

pub mod critical_discharge;
pub mod error;
pub mod overtopping;
pub mod piping;
pub mod profile;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::critical_discharge::{CriticalDischarge, GrassQuality};
    pub use crate::error::{MechanismError, MechanismResult};
    pub use crate::overtopping::{OvertoppingCurveBuilder, OvertoppingSettings, WindSector};
    pub use crate::piping::{
        PipingCurveBuilder, PipingCurves, PipingSolver, PipingSolverOutput, ReliabilityUpdate,
    };
    pub use crate::profile::{
        Breakwater, BreakwaterKind, Profile, ProfileGeometry, ProfilePoint, SegmentKind,
        SlopeSegment,
    };
}

pub use critical_discharge::{CriticalDischarge, GrassQuality};
pub use error::{MechanismError, MechanismResult};
pub use overtopping::{OvertoppingCurveBuilder, OvertoppingSettings, WindSector};
pub use piping::{
    PipingCurveBuilder, PipingCurves, PipingSolver, PipingSolverOutput, ReliabilityUpdate,
};
pub use profile::{Profile, ProfileGeometry};
