//! The configuration aggregate.
//!
//! A [`FragilityConfig`] collects every tunable of a fragility assessment in
//! one serializable document:
//!
//! ```toml
//! [curve]
//! lower_limit = 1e-20
//!
//! [combine]
//! method = "independent"
//! refine_step_size = 0.05
//!
//! [integration]
//! refine_step_size = 0.05
//!
//! [overtopping]
//! windspeed = 20.0
//! wind_sector = { start = 180.0, end = 270.0 }
//! critical_discharge = { grass_quality = "closed" }
//!
//! [uncertainty]
//! discretization = 5
//!
//! [[uncertainty.entries]]
//! closing_situation = 1
//! hs_mean = 0.96
//! hs_stddev = 0.27
//! tspec_mean = 1.03
//! tspec_stddev = 0.13
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use fragility_curves::{
    CombineSettings, CurveCombiner, CurveIntegrator, CurveSettings, IntegrationSettings,
};
use fragility_hydra::uncertainty::DEFAULT_DISCRETIZATION;
use fragility_hydra::{
    ClosingSituation, ModelUncertainty, UncertaintyParameters, WaveConditionSource,
};
use fragility_mechanisms::{
    OvertoppingCurveBuilder, OvertoppingSettings, PipingCurveBuilder, PipingSolver, Profile,
    ReliabilityUpdate,
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};

// =============================================================================
// UNCERTAINTY
// =============================================================================

/// Model uncertainty of one closing situation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyEntry {
    /// Closing situation the parameters apply to.
    pub closing_situation: ClosingSituation,

    /// Factor distributions.
    #[serde(flatten)]
    pub parameters: UncertaintyParameters,
}

/// Model uncertainty configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyConfig {
    /// Number of nodes per factor.
    #[serde(default = "default_discretization")]
    pub discretization: usize,

    /// Parameters per closing situation.
    #[serde(default)]
    pub entries: Vec<UncertaintyEntry>,
}

fn default_discretization() -> usize {
    DEFAULT_DISCRETIZATION
}

impl Default for UncertaintyConfig {
    fn default() -> Self {
        Self {
            discretization: DEFAULT_DISCRETIZATION,
            entries: Vec::new(),
        }
    }
}

impl UncertaintyConfig {
    /// Adds an entry.
    #[must_use]
    pub fn with_entry(
        mut self,
        closing_situation: ClosingSituation,
        parameters: UncertaintyParameters,
    ) -> Self {
        self.entries.push(UncertaintyEntry {
            closing_situation,
            parameters,
        });
        self
    }

    /// Builds the runtime model uncertainty.
    ///
    /// # Errors
    ///
    /// Returns an error if the discretization is 0 or an entry is invalid.
    pub fn build(&self) -> ConfigResult<ModelUncertainty> {
        let mut uncertainty = ModelUncertainty::new(self.discretization)?;
        for entry in &self.entries {
            uncertainty.insert(entry.closing_situation, entry.parameters)?;
        }
        Ok(uncertainty)
    }
}

impl Validate for UncertaintyConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.discretization == 0 {
            errors.push(ValidationError::with_rule(
                "discretization",
                "Discretization must be at least 1",
                "positive_bins",
            ));
        }

        let mut seen = BTreeSet::new();
        for entry in &self.entries {
            let cs = entry.closing_situation;
            if !seen.insert(cs) {
                errors.push(ValidationError::with_rule(
                    format!("entries[{cs}]"),
                    "Closing situation is listed more than once",
                    "unique_closing_situation",
                ));
            }

            let p = &entry.parameters;
            if [p.hs_mean, p.hs_stddev, p.tspec_mean, p.tspec_stddev]
                .iter()
                .any(|v| !v.is_finite())
            {
                errors.push(ValidationError::new(
                    format!("entries[{cs}]"),
                    "Parameters must be finite",
                ));
            } else if p.hs_stddev < 0.0 || p.tspec_stddev < 0.0 {
                errors.push(ValidationError::with_rule(
                    format!("entries[{cs}]"),
                    "Standard deviations must be non-negative",
                    "non_negative",
                ));
            }
        }

        errors
    }
}

// =============================================================================
// FRAGILITY CONFIGURATION
// =============================================================================

/// Settings of a complete fragility assessment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FragilityConfig {
    /// Normalization of curves built from external results.
    #[serde(default)]
    pub curve: CurveSettings,

    /// Mechanism combination.
    #[serde(default)]
    pub combine: CombineSettings,

    /// Risk integration.
    #[serde(default)]
    pub integration: IntegrationSettings,

    /// Overtopping builder settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overtopping: Option<OvertoppingSettings>,

    /// Survived load applied to piping curves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reliability_update: Option<ReliabilityUpdate>,

    /// Model uncertainty of the wave conditions.
    #[serde(default)]
    pub uncertainty: UncertaintyConfig,
}

impl FragilityConfig {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns a deserialization error for malformed input and validation
    /// errors for out-of-range settings.
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns a deserialization error for malformed input and validation
    /// errors for out-of-range settings.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Loads a `.json` or `.toml` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has another extension,
    /// or fails to parse or validate.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            Some("toml") => Self::from_toml_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                ))
            }
        };
        tracing::debug!(path = %path.display(), "Loaded fragility configuration");
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if a value cannot be represented.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sets the overtopping settings.
    #[must_use]
    pub fn with_overtopping(mut self, settings: OvertoppingSettings) -> Self {
        self.overtopping = Some(settings);
        self
    }

    /// Sets the combination settings.
    #[must_use]
    pub fn with_combine(mut self, settings: CombineSettings) -> Self {
        self.combine = settings;
        self
    }

    /// Sets the model uncertainty.
    #[must_use]
    pub fn with_uncertainty(mut self, uncertainty: UncertaintyConfig) -> Self {
        self.uncertainty = uncertainty;
        self
    }

    /// The mechanism combiner.
    #[must_use]
    pub fn combiner(&self) -> CurveCombiner {
        CurveCombiner::new(self.combine.clone())
    }

    /// The risk integrator.
    #[must_use]
    pub fn integrator(&self) -> CurveIntegrator {
        CurveIntegrator::new(self.integration)
    }

    /// The model uncertainty.
    ///
    /// # Errors
    ///
    /// Returns an error if the uncertainty section is invalid.
    pub fn model_uncertainty(&self) -> ConfigResult<ModelUncertainty> {
        self.uncertainty.build()
    }

    /// An overtopping builder for `profile` using the configured settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] without an `overtopping` section and
    /// a mechanism error if the builder rejects the settings.
    pub fn overtopping_builder<'a, P: Profile + ?Sized>(
        &self,
        profile: &'a P,
        waves: &'a WaveConditionSource,
        uncertainty: &'a ModelUncertainty,
    ) -> ConfigResult<OvertoppingCurveBuilder<'a, P>> {
        let settings = self.overtopping.clone().ok_or_else(|| ConfigError::NotFound {
            key: "overtopping".to_string(),
        })?;
        Ok(OvertoppingCurveBuilder::new(
            profile,
            waves,
            uncertainty,
            settings,
        )?)
    }

    /// A piping builder for `solver` with the configured curve settings and
    /// reliability update.
    #[must_use]
    pub fn piping_builder<'a, T: PipingSolver>(&self, solver: &'a T) -> PipingCurveBuilder<'a, T> {
        let builder = PipingCurveBuilder::new(solver).with_curve_settings(self.curve);
        match self.reliability_update {
            Some(update) => builder.with_reliability_update(update),
            None => builder,
        }
    }
}

impl Validate for FragilityConfig {
    fn validate(&self) -> Vec<ValidationError> {
        fn section<T: Validate + ?Sized>(name: &str, value: &T) -> Vec<ValidationError> {
            value
                .validate()
                .into_iter()
                .map(|e| e.in_section(name))
                .collect()
        }

        let mut errors = section("curve", &self.curve);
        errors.extend(section("combine", &self.combine));
        errors.extend(section("integration", &self.integration));
        if let Some(overtopping) = &self.overtopping {
            errors.extend(section("overtopping", overtopping));
        }
        if let Some(update) = &self.reliability_update {
            errors.extend(section("reliability_update", update));
        }
        errors.extend(section("uncertainty", &self.uncertainty));

        if let Some(overtopping) = &self.overtopping {
            let cs = overtopping.closing_situation;
            if !self.uncertainty.entries.is_empty()
                && !self
                    .uncertainty
                    .entries
                    .iter()
                    .any(|e| e.closing_situation == cs)
            {
                errors.push(ValidationError::with_rule(
                    "overtopping.closing_situation",
                    format!("No model uncertainty configured for closing situation {cs}"),
                    "known_closing_situation",
                ));
            }
        }

        errors
    }
}
