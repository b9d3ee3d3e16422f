//! Combining fragility curves of several failure mechanisms.
//!
//! All input curves are refined onto one common load grid (see
//! [`common_grid`]) and then combined pointwise:
//!
//! | Method | Formula | Assumption |
//! |--------|---------|------------|
//! | [`CombineMethod::Independent`] | `1 - Π(1 - Pᵢ)` | Mechanisms fail independently |
//! | [`CombineMethod::Dependent`] | `max(Pᵢ)` | Fully correlated mechanisms |
//! | [`CombineMethod::Weighted`] | `clip(Σ wᵢ·Pᵢ, 0, 1)` | Mixture of scenarios |

use serde::{Deserialize, Serialize};

use crate::curve::FragilityCurve;
use crate::error::{CurveError, CurveResult};
use crate::grid::common_grid;

/// Pointwise combination rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CombineMethod {
    /// Failure if any mechanism fails, mechanisms independent.
    #[default]
    Independent,
    /// Governed by the weakest mechanism.
    Dependent,
    /// Weighted sum of the curves.
    Weighted,
}

/// Settings for [`CurveCombiner`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombineSettings {
    /// Combination rule.
    #[serde(default)]
    pub method: CombineMethod,

    /// Step of the common load grid.
    #[serde(default = "default_refine_step_size")]
    pub refine_step_size: f64,

    /// Distance the grid extends beyond the largest load of any curve.
    #[serde(default = "default_extend_past_max")]
    pub extend_past_max: f64,

    /// Weights for [`CombineMethod::Weighted`]; uniform when absent.
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
}

fn default_refine_step_size() -> f64 {
    0.05
}

fn default_extend_past_max() -> f64 {
    0.01
}

impl Default for CombineSettings {
    fn default() -> Self {
        Self {
            method: CombineMethod::default(),
            refine_step_size: default_refine_step_size(),
            extend_past_max: default_extend_past_max(),
            weights: None,
        }
    }
}

impl CombineSettings {
    /// Creates settings for the given method with default grid parameters.
    #[must_use]
    pub fn new(method: CombineMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Sets the grid step.
    #[must_use]
    pub fn with_refine_step_size(mut self, step: f64) -> Self {
        self.refine_step_size = step;
        self
    }

    /// Sets the grid extension beyond the largest load.
    #[must_use]
    pub fn with_extend_past_max(mut self, extend: f64) -> Self {
        self.extend_past_max = extend;
        self
    }

    /// Sets explicit weights for the weighted method.
    #[must_use]
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }
}

/// Combines fragility curves on a common grid.
///
/// # Example
///
/// ```rust
/// use fragility_curves::{CombineMethod, CombineSettings, CurveCombiner, FragilityCurve};
///
/// let a = FragilityCurve::new(vec![0.0, 1.0], vec![0.1, 0.5]).unwrap();
/// let b = FragilityCurve::new(vec![0.0, 1.0], vec![0.2, 0.4]).unwrap();
///
/// let combiner = CurveCombiner::new(
///     CombineSettings::new(CombineMethod::Dependent).with_refine_step_size(0.5),
/// );
/// let combined = combiner.combine(&[a, b]).unwrap();
/// assert!((combined.probabilities()[0] - 0.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CurveCombiner {
    settings: CombineSettings,
}

impl CurveCombiner {
    /// Creates a combiner.
    #[must_use]
    pub fn new(settings: CombineSettings) -> Self {
        Self { settings }
    }

    /// Returns the settings.
    #[must_use]
    pub fn settings(&self) -> &CombineSettings {
        &self.settings
    }

    /// Combines `curves` into a single curve on the common grid.
    ///
    /// The result carries the settings of the first curve.
    ///
    /// # Errors
    ///
    /// Returns an error if no curves are given, the grid parameters are
    /// invalid, or explicit weights do not match the number of curves.
    pub fn combine(&self, curves: &[FragilityCurve]) -> CurveResult<FragilityCurve> {
        let first = curves
            .first()
            .ok_or_else(|| CurveError::insufficient_points(1, 0))?;

        let weights = self.resolve_weights(curves.len())?;

        let grid = common_grid(
            curves.iter().map(|c| (c.min_load(), c.max_load())),
            self.settings.refine_step_size,
            self.settings.extend_past_max,
        )?;

        let refined = curves
            .iter()
            .map(|curve| curve.refine(&grid, false))
            .collect::<CurveResult<Vec<_>>>()?;

        let combined: Vec<f64> = (0..grid.len())
            .map(|i| {
                let column = refined.iter().map(|curve| curve.probabilities()[i]);
                match self.settings.method {
                    CombineMethod::Independent => {
                        1.0 - column.fold(1.0, |survival, p| survival * (1.0 - p))
                    }
                    CombineMethod::Dependent => column.fold(0.0, f64::max),
                    CombineMethod::Weighted => column
                        .zip(&weights)
                        .map(|(p, w)| w * p)
                        .sum::<f64>()
                        .clamp(0.0, 1.0),
                }
            })
            .collect();

        tracing::debug!(
            method = ?self.settings.method,
            curves = curves.len(),
            grid_points = grid.len(),
            "Combined fragility curves"
        );

        FragilityCurve::with_settings(grid, combined, *first.settings())
    }

    fn resolve_weights(&self, count: usize) -> CurveResult<Vec<f64>> {
        match &self.settings.weights {
            Some(weights) if self.settings.method == CombineMethod::Weighted => {
                if weights.len() != count {
                    return Err(CurveError::invalid_value(format!(
                        "expected {count} weights, got {}",
                        weights.len()
                    )));
                }
                Ok(weights.clone())
            }
            _ => Ok(vec![1.0 / count as f64; count]),
        }
    }
}
