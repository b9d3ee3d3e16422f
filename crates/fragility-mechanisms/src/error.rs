//! Error types for failure-mechanism builders.

use fragility_curves::CurveError;
use fragility_hydra::HydraError;
use fragility_math::MathError;
use thiserror::Error;

/// A specialized Result type for mechanism builders.
pub type MechanismResult<T> = Result<T, MechanismError>;

/// Error types for mechanism builders.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MechanismError {
    /// Inconsistent or missing builder configuration.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// What is missing or inconsistent.
        reason: String,
    },

    /// Input data failed validation.
    #[error("Invalid {field}: {reason}")]
    InputValidation {
        /// Name of the offending field.
        field: String,
        /// Description of the problem.
        reason: String,
    },

    /// The overtopping physics collaborator failed.
    #[error("Physics error: {reason}")]
    Physics {
        /// Message from the collaborator.
        reason: String,
    },

    /// The piping solver collaborator failed.
    #[error("Solver error: {reason}")]
    Solver {
        /// Message from the collaborator.
        reason: String,
    },

    /// Error from the wave-condition providers.
    #[error("Hydraulic load error: {0}")]
    Hydra(#[from] HydraError),

    /// Error from curve construction.
    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),

    /// Error from the numerical kernels.
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

impl MechanismError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Creates an input validation error.
    #[must_use]
    pub fn input_validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InputValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a physics error.
    #[must_use]
    pub fn physics(reason: impl Into<String>) -> Self {
        Self::Physics {
            reason: reason.into(),
        }
    }

    /// Creates a solver error.
    #[must_use]
    pub fn solver(reason: impl Into<String>) -> Self {
        Self::Solver {
            reason: reason.into(),
        }
    }

    /// Returns true for configuration errors, including those raised by the
    /// hydraulic load layer.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::Hydra(HydraError::Configuration { .. })
        )
    }

    /// Returns true for input validation errors, including those raised by
    /// the hydraulic load layer.
    #[must_use]
    pub fn is_input_validation(&self) -> bool {
        matches!(
            self,
            Self::InputValidation { .. } | Self::Hydra(HydraError::InputValidation { .. })
        )
    }
}
