//! Configuration error types.

use fragility_hydra::HydraError;
use fragility_mechanisms::MechanismError;
use thiserror::Error;

/// Configuration operation result type.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration section is absent.
    #[error("Configuration not found: {key}")]
    NotFound {
        /// The missing section.
        key: String,
    },

    /// Validation error.
    #[error("Validation error: {field}: {message}")]
    Validation {
        /// Field that failed validation.
        field: String,
        /// Validation error message.
        message: String,
    },

    /// Multiple validation errors.
    #[error("Multiple validation errors: {0:?}")]
    MultipleValidationErrors(Vec<ValidationError>),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Unsupported configuration file format.
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Building the model uncertainty failed.
    #[error("Hydraulic load error: {0}")]
    Hydra(#[from] HydraError),

    /// Building a mechanism failed.
    #[error("Mechanism error: {0}")]
    Mechanism(#[from] MechanismError),
}

/// A single validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field that failed validation.
    pub field: String,
    /// Validation error message.
    pub message: String,
    /// Validation rule that was violated.
    pub rule: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Creates a validation error with a rule name.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }

    /// Qualifies the field with the name of the enclosing section.
    #[must_use]
    pub fn in_section(mut self, section: &str) -> Self {
        self.field = format!("{section}.{}", self.field);
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref rule) = self.rule {
            write!(f, "{}: {} (rule: {})", self.field, self.message, rule)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            ConfigError::Deserialization(err.to_string())
        } else {
            ConfigError::Serialization(err.to_string())
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Deserialization(err.to_string())
    }
}

/// Trait for validatable configurations.
pub trait Validate {
    /// Validates the configuration.
    ///
    /// Returns a list of validation errors, or an empty vector if valid.
    fn validate(&self) -> Vec<ValidationError>;

    /// Returns true if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Validates and returns an error if invalid.
    fn validate_or_error(&self) -> ConfigResult<()> {
        let mut errors = self.validate();
        match errors.len() {
            0 => Ok(()),
            1 => {
                let err = errors.remove(0);
                Err(ConfigError::Validation {
                    field: err.field,
                    message: err.message,
                })
            }
            _ => Err(ConfigError::MultipleValidationErrors(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fields(Vec<&'static str>);

    impl Validate for Fields {
        fn validate(&self) -> Vec<ValidationError> {
            self.0
                .iter()
                .map(|field| ValidationError::new(*field, "bad"))
                .collect()
        }
    }

    #[test]
    fn test_validate_or_error() {
        assert!(Fields(vec![]).validate_or_error().is_ok());
        assert!(Fields(vec![]).is_valid());

        let single = Fields(vec!["a"]).validate_or_error().unwrap_err();
        assert!(matches!(single, ConfigError::Validation { ref field, .. } if field == "a"));

        let multiple = Fields(vec!["a", "b"]).validate_or_error().unwrap_err();
        assert!(matches!(multiple, ConfigError::MultipleValidationErrors(ref e) if e.len() == 2));
    }

    #[test]
    fn test_display_and_section() {
        let err = ValidationError::with_rule("hstap", "must be positive", "positive_step")
            .in_section("overtopping");
        assert_eq!(err.field, "overtopping.hstap");
        assert_eq!(
            err.to_string(),
            "overtopping.hstap: must be positive (rule: positive_step)"
        );
    }

    #[test]
    fn test_json_error_is_deserialization() {
        let err: ConfigError = serde_json::from_str::<f64>("not json").unwrap_err().into();
        assert!(matches!(err, ConfigError::Deserialization(_)));
    }
}
