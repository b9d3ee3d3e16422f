//! Error types for hydraulic load providers.

use fragility_math::MathError;
use thiserror::Error;

use crate::closing::ClosingSituation;

/// A specialized Result type for hydraulic load operations.
pub type HydraResult<T> = Result<T, HydraError>;

/// Error types for hydraulic load operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HydraError {
    /// Requested data is not configured (e.g. an unknown closing situation).
    #[error("Configuration error: {reason}")]
    Configuration {
        /// What is missing or inconsistent.
        reason: String,
    },

    /// Input data failed validation.
    #[error("Invalid {field}: {reason}")]
    InputValidation {
        /// Name of the offending field or table.
        field: String,
        /// Description of the problem.
        reason: String,
    },

    /// Error raised by the interpolation kernel.
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

impl HydraError {
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

    /// Creates the error for a closing situation without configured data.
    #[must_use]
    pub fn missing_closing_situation(closing_situation: ClosingSituation) -> Self {
        Self::configuration(format!("no data for closing situation {closing_situation}"))
    }
}
