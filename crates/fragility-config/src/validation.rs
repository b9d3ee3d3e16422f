//! Validation rules for the settings of the runtime crates.

use fragility_curves::{CombineMethod, CombineSettings, CurveSettings, IntegrationSettings};
use fragility_mechanisms::{MechanismError, OvertoppingSettings, ReliabilityUpdate};

use crate::error::{Validate, ValidationError};

fn positive_step(field: &str, value: f64) -> Option<ValidationError> {
    (!(value.is_finite() && value > 0.0)).then(|| {
        ValidationError::with_rule(
            field,
            format!("Step must be positive and finite, got {value}"),
            "positive_step",
        )
    })
}

fn non_negative(field: &str, value: f64) -> Option<ValidationError> {
    (!(value.is_finite() && value >= 0.0)).then(|| {
        ValidationError::with_rule(
            field,
            format!("Value must be non-negative and finite, got {value}"),
            "non_negative",
        )
    })
}

impl Validate for CurveSettings {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.lower_limit.is_finite() && (0.0..1.0).contains(&self.lower_limit)) {
            errors.push(ValidationError::with_rule(
                "lower_limit",
                "Lower limit must be in [0, 1)",
                "probability_range",
            ));
        }

        errors
    }
}

impl Validate for CombineSettings {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors: Vec<ValidationError> = [
            positive_step("refine_step_size", self.refine_step_size),
            non_negative("extend_past_max", self.extend_past_max),
        ]
        .into_iter()
        .flatten()
        .collect();

        if let Some(weights) = &self.weights {
            if self.method != CombineMethod::Weighted {
                errors.push(ValidationError::with_rule(
                    "weights",
                    "Weights are only used by the weighted method",
                    "weighted_only",
                ));
            }
            if weights.is_empty() || weights.iter().any(|w| !(w.is_finite() && *w >= 0.0)) {
                errors.push(ValidationError::with_rule(
                    "weights",
                    "Weights must be non-empty, finite and non-negative",
                    "valid_weights",
                ));
            } else if weights.iter().sum::<f64>() <= 0.0 {
                errors.push(ValidationError::with_rule(
                    "weights",
                    "Weights must not all be zero",
                    "valid_weights",
                ));
            }
        }

        errors
    }
}

impl Validate for IntegrationSettings {
    fn validate(&self) -> Vec<ValidationError> {
        [
            positive_step("refine_step_size", self.refine_step_size),
            non_negative("extend_past_max", self.extend_past_max),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl Validate for ReliabilityUpdate {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !self.level.is_finite() {
            errors.push(ValidationError::new("level", "Level must be finite"));
        }
        if !(0.0..=1.0).contains(&self.trust_factor) {
            errors.push(ValidationError::with_rule(
                "trust_factor",
                "Trust factor must be between 0 and 1",
                "probability_range",
            ));
        }

        errors
    }
}

impl Validate for OvertoppingSettings {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = match OvertoppingSettings::validate(self) {
            Ok(()) => Vec::new(),
            Err(MechanismError::InputValidation { field, reason }) => {
                vec![ValidationError::new(field, reason)]
            }
            Err(other) => vec![ValidationError::new("overtopping", other.to_string())],
        };
        errors.extend(
            Validate::validate(&self.curve)
                .into_iter()
                .map(|e| e.in_section("curve")),
        );
        errors
    }
}
