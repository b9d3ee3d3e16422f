//! Wave-overtopping fragility curves.
//!
//! The builder evaluates, for a fixed windspeed, the probability that the
//! overtopping discharge exceeds the critical discharge at a range of water
//! levels around the crest:
//!
//! 1. **Dominant direction**: the wind direction in the sector that gives the
//!    largest discharge on the bare profile at `crest - 0.5` m
//! 2. **Load grid**: a coarse part (step `2 · hstap`) well below the crest and
//!    a fine part (step `hstap`) around it
//! 3. **Scenarios**: wave conditions at the dominant direction, scaled by
//!    every model-uncertainty scenario, fed to the physics collaborator
//! 4. **Criterion**: each scenario contributes its weight times the
//!    probability that its discharge exceeds `qcr`

use fragility_curves::{CurveSettings, FragilityCurve};
use fragility_hydra::prelude::*;
use fragility_math::grid::{decimals_for_step, round_to, stepped_range};
use fragility_math::interpolation::normalize_bearing;
use serde::{Deserialize, Serialize};

use crate::critical_discharge::CriticalDischarge;
use crate::error::{MechanismError, MechanismResult};
use crate::profile::Profile;

/// Freeboard at which wind directions are ranked (m).
pub const DIRECTION_SEARCH_FREEBOARD: f64 = 0.5;

/// A wind sector, clockwise from `start` to `end` (degrees).
///
/// Sectors may wrap through north (`start = 350`, `end = 20`). A sector of
/// 360° or more covers the full circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindSector {
    /// First direction of the sector.
    pub start: f64,
    /// Last direction of the sector.
    pub end: f64,
}

impl WindSector {
    /// Creates a sector.
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Directions from `start` to `end` in steps of `step`, on [0, 360).
    ///
    /// # Errors
    ///
    /// Returns an error if the bounds are not finite or the step is not
    /// positive.
    pub fn directions(&self, step: f64) -> MechanismResult<Vec<f64>> {
        if !(self.start.is_finite() && self.end.is_finite()) {
            return Err(MechanismError::input_validation(
                "wind_sector",
                format!("bounds must be finite, got [{}, {}]", self.start, self.end),
            ));
        }

        let full_circle = (self.end - self.start).abs() >= 360.0;
        let span = if full_circle {
            360.0
        } else {
            (self.end - self.start).rem_euclid(360.0)
        };

        let origin = normalize_bearing(self.start);
        let decimals = decimals_for_step(step);
        let mut directions: Vec<f64> = stepped_range(0.0, span, step, !full_circle)?
            .into_iter()
            .map(|offset| normalize_bearing(round_to(origin + offset, decimals)))
            .collect();
        directions.dedup();
        Ok(directions)
    }
}

/// Settings of the overtopping curve builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertoppingSettings {
    /// Windspeed (m/s).
    pub windspeed: f64,

    /// Wind directions considered for the dominant direction.
    pub wind_sector: WindSector,

    /// Step between sector directions (degrees).
    #[serde(default = "default_direction_step")]
    pub direction_step: f64,

    /// Fine water level step (m); the coarse step is twice as large.
    #[serde(default = "default_hstap")]
    pub hstap: f64,

    /// Start of the coarse grid below the crest (m).
    #[serde(default = "default_lower_limit_coarse")]
    pub lower_limit_coarse: f64,

    /// Start of the fine grid below the crest (m).
    #[serde(default = "default_upper_limit_coarse")]
    pub upper_limit_coarse: f64,

    /// End of the fine grid above the crest (m).
    #[serde(default = "default_upper_limit_fine")]
    pub upper_limit_fine: f64,

    /// Closing situation of the model uncertainties.
    #[serde(default = "default_closing_situation")]
    pub closing_situation: ClosingSituation,

    /// Failure criterion.
    #[serde(default)]
    pub critical_discharge: CriticalDischarge,

    /// Normalization of the resulting curve.
    #[serde(default)]
    pub curve: CurveSettings,
}

fn default_direction_step() -> f64 {
    10.0
}

fn default_hstap() -> f64 {
    0.05
}

fn default_lower_limit_coarse() -> f64 {
    4.0
}

fn default_upper_limit_coarse() -> f64 {
    2.0
}

fn default_upper_limit_fine() -> f64 {
    1.0
}

fn default_closing_situation() -> ClosingSituation {
    ClosingSituation::new(1)
}

impl OvertoppingSettings {
    /// Creates settings with default grid parameters.
    #[must_use]
    pub fn new(windspeed: f64, wind_sector: WindSector) -> Self {
        Self {
            windspeed,
            wind_sector,
            direction_step: default_direction_step(),
            hstap: default_hstap(),
            lower_limit_coarse: default_lower_limit_coarse(),
            upper_limit_coarse: default_upper_limit_coarse(),
            upper_limit_fine: default_upper_limit_fine(),
            closing_situation: default_closing_situation(),
            critical_discharge: CriticalDischarge::default(),
            curve: CurveSettings::default(),
        }
    }

    /// Sets the closing situation.
    #[must_use]
    pub fn with_closing_situation(mut self, closing_situation: ClosingSituation) -> Self {
        self.closing_situation = closing_situation;
        self
    }

    /// Sets the failure criterion.
    #[must_use]
    pub fn with_critical_discharge(mut self, critical_discharge: CriticalDischarge) -> Self {
        self.critical_discharge = critical_discharge;
        self
    }

    /// Sets the fine water level step.
    #[must_use]
    pub fn with_hstap(mut self, hstap: f64) -> Self {
        self.hstap = hstap;
        self
    }

    /// Checks the settings.
    ///
    /// # Errors
    ///
    /// Returns an input validation error for a negative or non-finite
    /// windspeed, non-positive steps, grid limits that do not nest, or an
    /// invalid critical discharge.
    pub fn validate(&self) -> MechanismResult<()> {
        if !(self.windspeed.is_finite() && self.windspeed >= 0.0) {
            return Err(MechanismError::input_validation(
                "windspeed",
                format!("must be non-negative, got {}", self.windspeed),
            ));
        }
        for (field, step) in [("direction_step", self.direction_step), ("hstap", self.hstap)] {
            if !(step.is_finite() && step > 0.0) {
                return Err(MechanismError::input_validation(
                    field,
                    format!("must be positive, got {step}"),
                ));
            }
        }
        if !(self.lower_limit_coarse.is_finite()
            && self.upper_limit_coarse.is_finite()
            && self.upper_limit_fine.is_finite())
        {
            return Err(MechanismError::input_validation(
                "grid limits",
                "must be finite",
            ));
        }
        if self.lower_limit_coarse < self.upper_limit_coarse {
            return Err(MechanismError::input_validation(
                "lower_limit_coarse",
                format!(
                    "must be at least upper_limit_coarse ({} < {})",
                    self.lower_limit_coarse, self.upper_limit_coarse
                ),
            ));
        }
        if -self.upper_limit_coarse > self.upper_limit_fine {
            return Err(MechanismError::input_validation(
                "upper_limit_fine",
                "fine grid ends below its start",
            ));
        }
        self.critical_discharge.validate()
    }
}

/// Builds overtopping fragility curves for one profile.
///
/// # Example
///
/// ```rust
/// use fragility_hydra::prelude::*;
/// use fragility_mechanisms::prelude::*;
///
/// /// Discharge grows with wave height and water level.
/// struct Toy;
///
/// impl Profile for Toy {
///     fn crest_level(&self) -> f64 {
///         5.0
///     }
///
///     fn calculate_overtopping(&self, level: f64, hs: f64, _: f64, _: f64) -> MechanismResult<f64> {
///         Ok(0.01 * hs * (level - 5.0).exp())
///     }
/// }
///
/// let waves = WaveConditionSource::Empirical(
///     Bretschneider::new(vec![0.0, 180.0], vec![-2.0, -2.0], vec![3000.0, 3000.0]).unwrap(),
/// );
/// let cs = ClosingSituation::new(1);
/// let uncertainty = ModelUncertainty::new(3)
///     .unwrap()
///     .with_parameters(cs, UncertaintyParameters::new(1.0, 0.2, 1.0, 0.1))
///     .unwrap();
///
/// let settings = OvertoppingSettings::new(20.0, WindSector::new(180.0, 270.0));
/// let builder = OvertoppingCurveBuilder::new(&Toy, &waves, &uncertainty, settings).unwrap();
/// let curve = builder.build().unwrap();
///
/// assert_eq!(curve.max_load(), 6.0);
/// ```
#[derive(Debug)]
pub struct OvertoppingCurveBuilder<'a, P: Profile + ?Sized> {
    profile: &'a P,
    waves: &'a WaveConditionSource,
    uncertainty: &'a ModelUncertainty,
    settings: OvertoppingSettings,
}

impl<'a, P: Profile + ?Sized> OvertoppingCurveBuilder<'a, P> {
    /// Creates a builder.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the profile's crest
    /// level is not finite.
    pub fn new(
        profile: &'a P,
        waves: &'a WaveConditionSource,
        uncertainty: &'a ModelUncertainty,
        settings: OvertoppingSettings,
    ) -> MechanismResult<Self> {
        settings.validate()?;
        let crest = profile.crest_level();
        if !crest.is_finite() {
            return Err(MechanismError::input_validation(
                "crest_level",
                format!("must be finite, got {crest}"),
            ));
        }
        Ok(Self {
            profile,
            waves,
            uncertainty,
            settings,
        })
    }

    /// Returns the settings.
    #[must_use]
    pub fn settings(&self) -> &OvertoppingSettings {
        &self.settings
    }

    /// The sector direction with the largest bare-profile discharge at
    /// `crest - 0.5` m. The first direction wins ties.
    pub fn dominant_direction(&self) -> MechanismResult<f64> {
        let directions = self
            .settings
            .wind_sector
            .directions(self.settings.direction_step)?;
        let level = self.profile.crest_level() - DIRECTION_SEARCH_FREEBOARD;
        let waves = self
            .waves
            .conditions_for_directions(self.settings.windspeed, &directions, level)?;

        let mut best: Option<(f64, f64)> = None;
        for (direction, sample) in directions.iter().zip(waves.iter()) {
            let discharge =
                self.profile
                    .baseline_overtopping(level, sample.hs, sample.tspec, sample.direction)?;
            if !discharge.is_finite() {
                return Err(MechanismError::physics(format!(
                    "non-finite discharge {discharge} for direction {direction}"
                )));
            }
            if best.map_or(true, |(_, q)| discharge > q) {
                best = Some((*direction, discharge));
            }
        }

        let (direction, discharge) = best.ok_or_else(|| {
            MechanismError::configuration("wind sector contains no directions")
        })?;
        tracing::debug!(direction, discharge, "Selected dominant wind direction");
        Ok(direction)
    }

    /// Water levels at which the curve is evaluated, ascending.
    pub fn load_grid(&self) -> MechanismResult<Vec<f64>> {
        let s = &self.settings;
        let crest = self.profile.crest_level();

        let mut loads = stepped_range(
            crest - s.lower_limit_coarse,
            crest - s.upper_limit_coarse,
            2.0 * s.hstap,
            false,
        )?;
        loads.extend(stepped_range(
            crest - s.upper_limit_coarse,
            crest + s.upper_limit_fine,
            s.hstap,
            true,
        )?);

        let decimals = decimals_for_step(s.hstap);
        for load in &mut loads {
            *load = round_to(*load, decimals);
        }
        loads.dedup();
        Ok(loads)
    }

    /// Builds the fragility curve.
    ///
    /// # Errors
    ///
    /// - configuration error if the closing situation has no model
    ///   uncertainty
    /// - errors from the wave provider or the physics collaborator
    pub fn build(&self) -> MechanismResult<FragilityCurve> {
        let scenarios = self.uncertainty.scenarios(self.settings.closing_situation)?;
        let direction = self.dominant_direction()?;
        let loads = self.load_grid()?;
        let waves = self
            .waves
            .conditions_for_levels(self.settings.windspeed, direction, &loads)?;

        tracing::debug!(
            source = self.waves.kind(),
            direction,
            grid_points = loads.len(),
            scenarios = scenarios.len(),
            "Building overtopping fragility curve"
        );

        let evaluate = |i: usize| -> MechanismResult<f64> {
            let sample = waves.get(i).ok_or_else(|| {
                MechanismError::input_validation("wave conditions", "fewer samples than loads")
            })?;
            self.failure_probability(loads[i], sample, &scenarios)
        };

        #[cfg(feature = "parallel")]
        let probabilities: Vec<f64> = {
            use rayon::prelude::*;
            (0..loads.len())
                .into_par_iter()
                .map(evaluate)
                .collect::<MechanismResult<Vec<_>>>()?
        };

        #[cfg(not(feature = "parallel"))]
        let probabilities: Vec<f64> = (0..loads.len())
            .map(evaluate)
            .collect::<MechanismResult<Vec<_>>>()?;

        Ok(FragilityCurve::with_settings(
            loads,
            probabilities,
            self.settings.curve,
        )?)
    }

    /// Failure probability at one water level, summed over the scenarios.
    fn failure_probability(
        &self,
        waterlevel: f64,
        sample: WaveConditionSample,
        scenarios: &[UncertaintyScenario],
    ) -> MechanismResult<f64> {
        scenarios.iter().try_fold(0.0, |total, scenario| {
            let hs = (sample.hs * scenario.hs_factor).max(0.0);
            let tspec = (sample.tspec * scenario.tspec_factor).max(0.0);
            let discharge = self
                .profile
                .calculate_overtopping(waterlevel, hs, tspec, sample.direction)?;
            if discharge.is_nan() {
                return Err(MechanismError::physics(format!(
                    "NaN discharge at waterlevel {waterlevel} (hs={hs}, tspec={tspec})"
                )));
            }
            Ok(total
                + scenario.weight
                    * self
                        .settings
                        .critical_discharge
                        .exceedance_probability(discharge, hs))
        })
    }
}
