//! The fragility curve model.
//!
//! A [`FragilityCurve`] is an ordered list of `(load, probability)` points.
//! Construction normalizes the points so every curve satisfies:
//!
//! - loads are non-decreasing; equal loads (vertical jumps) are ordered by
//!   ascending probability
//! - probabilities below the lower limit are exactly 0
//! - probabilities are clipped to [0, 1] when clipping is enabled
//! - probabilities are non-decreasing when monotonic enforcement is enabled
//!   (failure cannot become less likely as the load increases)
//!
//! All operations return a new curve; a curve is never mutated after
//! construction, so pipelines like combine → integrate → shift can share
//! inputs freely.

use std::cmp::Ordering;

use fragility_math::interpolation::{Interpolation, Transform};
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Default probability floor.
pub const DEFAULT_LOWER_LIMIT: f64 = 1e-20;

const DEDUP_TOLERANCE: f64 = 1e-12;

/// Normalization settings carried by a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSettings {
    /// Probabilities below this value are treated as exactly 0.
    #[serde(default = "default_lower_limit")]
    pub lower_limit: f64,

    /// Replace probabilities by their running maximum.
    #[serde(default = "default_true")]
    pub enforce_monotonic: bool,

    /// Clip probabilities to [0, 1].
    #[serde(default = "default_true")]
    pub clip01: bool,
}

fn default_lower_limit() -> f64 {
    DEFAULT_LOWER_LIMIT
}

fn default_true() -> bool {
    true
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            lower_limit: DEFAULT_LOWER_LIMIT,
            enforce_monotonic: true,
            clip01: true,
        }
    }
}

impl CurveSettings {
    /// Settings for derived quantities that are neither monotonic nor bounded
    /// by 1, such as per-level risk contributions.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self {
            lower_limit: 0.0,
            enforce_monotonic: false,
            clip01: false,
        }
    }

    /// Sets monotonic enforcement.
    #[must_use]
    pub fn with_enforce_monotonic(mut self, enforce: bool) -> Self {
        self.enforce_monotonic = enforce;
        self
    }

    /// Sets the lower limit.
    #[must_use]
    pub fn with_lower_limit(mut self, lower_limit: f64) -> Self {
        self.lower_limit = lower_limit;
        self
    }

    /// The log-domain kernel used for refining curves with these settings.
    #[must_use]
    pub fn kernel(&self) -> Interpolation {
        Interpolation::new(Transform::Log)
            .with_lower_limit(self.lower_limit)
            .with_clip01(self.clip01)
    }
}

/// A fragility curve: conditional failure probability as a function of load.
///
/// # Example
///
/// ```rust
/// use fragility_curves::FragilityCurve;
///
/// let curve = FragilityCurve::new(
///     vec![6.0, 5.0, 7.0],
///     vec![1e-3, 1e-4, 0.2],
/// ).unwrap();
///
/// // Points are sorted on construction
/// assert_eq!(curve.loads(), &[5.0, 6.0, 7.0]);
///
/// // Log-domain interpolation between knots
/// let p = curve.probability_at(5.5).unwrap();
/// assert!((p - 1e-3_f64.sqrt() * 1e-2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveRecord", into = "CurveRecord")]
pub struct FragilityCurve {
    loads: Vec<f64>,
    probabilities: Vec<f64>,
    settings: CurveSettings,
}

/// Column-oriented wire form shared with the adapter layer.
#[derive(Serialize, Deserialize)]
struct CurveRecord {
    #[serde(alias = "waterlevels")]
    hydraulicload: Vec<f64>,
    failure_probability: Vec<f64>,
    #[serde(default)]
    settings: CurveSettings,
}

impl TryFrom<CurveRecord> for FragilityCurve {
    type Error = CurveError;

    fn try_from(record: CurveRecord) -> CurveResult<Self> {
        Self::with_settings(
            record.hydraulicload,
            record.failure_probability,
            record.settings,
        )
    }
}

impl From<FragilityCurve> for CurveRecord {
    fn from(curve: FragilityCurve) -> Self {
        Self {
            hydraulicload: curve.loads,
            failure_probability: curve.probabilities,
            settings: curve.settings,
        }
    }
}

impl FragilityCurve {
    /// Creates a curve with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the columns differ in length, are empty, or contain
    /// non-finite loads or NaN probabilities.
    pub fn new(loads: Vec<f64>, probabilities: Vec<f64>) -> CurveResult<Self> {
        Self::with_settings(loads, probabilities, CurveSettings::default())
    }

    /// Creates a curve with explicit normalization settings.
    pub fn with_settings(
        loads: Vec<f64>,
        probabilities: Vec<f64>,
        settings: CurveSettings,
    ) -> CurveResult<Self> {
        if loads.len() != probabilities.len() {
            return Err(CurveError::length_mismatch(loads.len(), probabilities.len()));
        }
        if loads.is_empty() {
            return Err(CurveError::insufficient_points(1, 0));
        }
        if let Some(load) = loads.iter().find(|l| !l.is_finite()) {
            return Err(CurveError::invalid_value(format!(
                "load must be finite, got {load}"
            )));
        }
        if probabilities.iter().any(|p| p.is_nan()) {
            return Err(CurveError::invalid_value("probability is NaN"));
        }

        let (loads, mut probabilities) = sort_points(&loads, &probabilities);
        for p in &mut probabilities {
            if *p < settings.lower_limit {
                *p = 0.0;
            }
            if settings.clip01 {
                *p = p.clamp(0.0, 1.0);
            }
        }
        if settings.enforce_monotonic {
            probabilities = running_maximum(&probabilities);
        }

        Ok(Self {
            loads,
            probabilities,
            settings,
        })
    }

    /// Returns the loads.
    #[must_use]
    pub fn loads(&self) -> &[f64] {
        &self.loads
    }

    /// Returns the failure probabilities.
    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Returns the normalization settings.
    #[must_use]
    pub fn settings(&self) -> &CurveSettings {
        &self.settings
    }

    /// Iterates over `(load, probability)` points.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.loads
            .iter()
            .copied()
            .zip(self.probabilities.iter().copied())
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loads.len()
    }

    /// Always false: a curve holds at least one point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    /// Returns the smallest load.
    #[must_use]
    pub fn min_load(&self) -> f64 {
        self.loads[0]
    }

    /// Returns the largest load.
    #[must_use]
    pub fn max_load(&self) -> f64 {
        self.loads[self.loads.len() - 1]
    }

    /// Sum of all probabilities.
    ///
    /// Meaningful for risk-contribution curves, where it approximates the
    /// unconditional failure probability.
    #[must_use]
    pub fn total_probability(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Log-domain interpolated probability at `load`.
    pub fn probability_at(&self, load: f64) -> CurveResult<f64> {
        Ok(self
            .settings
            .kernel()
            .interpolate(load, &self.loads, &self.probabilities)?)
    }

    /// Returns a copy with monotonic enforcement switched on.
    pub fn monotonic(&self) -> CurveResult<Self> {
        Self::with_settings(
            self.loads.clone(),
            self.probabilities.clone(),
            self.settings.with_enforce_monotonic(true),
        )
    }

    /// Indices of points that share their load with a neighbour.
    ///
    /// Such points form a vertical jump (a discontinuity in the curve) that
    /// must survive resampling.
    #[must_use]
    pub fn find_jump_indices(&self) -> Vec<usize> {
        let mut indices = Vec::new();
        for i in 1..self.loads.len() {
            if self.loads[i] == self.loads[i - 1] {
                if indices.last() != Some(&(i - 1)) {
                    indices.push(i - 1);
                }
                indices.push(i);
            }
        }
        indices
    }

    /// Resamples the curve onto `new_loads`.
    ///
    /// Probabilities are interpolated (and extrapolated) in the log domain
    /// using the curve's lower limit and clipping. With `add_steps` the
    /// points of every vertical jump are re-inserted so discontinuities
    /// survive resampling.
    ///
    /// # Errors
    ///
    /// Returns an error if `new_loads` is empty or contains non-finite loads.
    pub fn refine(&self, new_loads: &[f64], add_steps: bool) -> CurveResult<Self> {
        if new_loads.is_empty() {
            return Err(CurveError::insufficient_points(1, 0));
        }

        let probabilities =
            self.settings
                .kernel()
                .interpolate_many(new_loads, &self.loads, &self.probabilities)?;

        let mut loads = new_loads.to_vec();
        let mut probabilities = probabilities;
        if add_steps {
            for i in self.find_jump_indices() {
                loads.push(self.loads[i]);
                probabilities.push(self.probabilities[i]);
            }
            let (sorted_loads, sorted_probabilities) = sort_points(&loads, &probabilities);
            (loads, probabilities) = dedup_points(sorted_loads, sorted_probabilities);
        }

        Self::with_settings(loads, probabilities, self.settings)
    }

    /// Moves the curve along the load axis by `effect`.
    ///
    /// The translated curve is resampled on exactly the original loads, so a
    /// positive effect (a hydraulic benefit, e.g. from a mitigation measure)
    /// lowers the failure probability at every original load. Duplicated
    /// loads stay duplicated at their original indices. An effect of exactly
    /// zero returns an identical curve.
    pub fn shift(&self, effect: f64) -> CurveResult<Self> {
        if effect == 0.0 {
            return Ok(self.clone());
        }
        if !effect.is_finite() {
            return Err(CurveError::invalid_value(format!(
                "shift effect must be finite, got {effect}"
            )));
        }

        let translated = Self {
            loads: self.loads.iter().map(|l| l + effect).collect(),
            probabilities: self.probabilities.clone(),
            settings: self.settings,
        };
        translated.refine(&self.loads, false)
    }
}

/// Sorts points lexicographically by `(load, probability)`.
///
/// Curve constructors apply this to every input.
#[must_use]
pub fn sort_points(loads: &[f64], probabilities: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut points: Vec<(f64, f64)> = loads
        .iter()
        .copied()
        .zip(probabilities.iter().copied())
        .collect();
    points.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
    });
    points.into_iter().unzip()
}

/// Running maximum of a probability sequence.
#[must_use]
pub fn running_maximum(probabilities: &[f64]) -> Vec<f64> {
    let mut current = f64::NEG_INFINITY;
    probabilities
        .iter()
        .map(|&p| {
            current = current.max(p);
            current
        })
        .collect()
}

/// Drops points equal to their predecessor. Probabilities that went through
/// the log transform may differ from the original knot by a few ulps.
fn dedup_points(loads: Vec<f64>, probabilities: Vec<f64>) -> (Vec<f64>, Vec<f64>) {
    let mut points: Vec<(f64, f64)> = loads.into_iter().zip(probabilities).collect();
    points.dedup_by(|next, kept| {
        next.0 == kept.0
            && (next.1 - kept.1).abs() <= DEDUP_TOLERANCE * next.1.abs().max(kept.1.abs())
    });
    points.into_iter().unzip()
}
