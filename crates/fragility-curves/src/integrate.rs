//! Integration of a fragility curve against a load exceedance distribution.
//!
//! The unconditional failure probability is
//! `P(fail) = ∫ P(fail | h) · f(h) dh` with `f` the load density. On a grid
//! the density mass around an interior point is approximated with the
//! midpoint rule from the exceedance curve `E`:
//!
//! ```text
//! contribution[i] = P(fail | h_i) · (E(h_{i-1}) - E(h_{i+1})) / 2
//! ```
//!
//! The first and last grid points have no full interval around them and
//! contribute 0.

use serde::{Deserialize, Serialize};

use crate::curve::{CurveSettings, FragilityCurve};
use crate::error::CurveResult;
use crate::exceedance::ExceedanceFrequencyCurve;
use crate::grid::common_grid;

/// Settings for [`CurveIntegrator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegrationSettings {
    /// Step of the common load grid.
    #[serde(default = "default_refine_step_size")]
    pub refine_step_size: f64,

    /// Distance the grid extends beyond the largest load of either curve.
    #[serde(default)]
    pub extend_past_max: f64,
}

fn default_refine_step_size() -> f64 {
    0.05
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        Self {
            refine_step_size: default_refine_step_size(),
            extend_past_max: 0.0,
        }
    }
}

impl IntegrationSettings {
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
}

/// Integrates fragility curves against exceedance-frequency curves.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurveIntegrator {
    settings: IntegrationSettings,
}

impl CurveIntegrator {
    /// Creates an integrator.
    #[must_use]
    pub fn new(settings: IntegrationSettings) -> Self {
        Self { settings }
    }

    /// Returns the settings.
    #[must_use]
    pub fn settings(&self) -> &IntegrationSettings {
        &self.settings
    }

    /// Returns the per-load risk contributions.
    ///
    /// The result is a curve of `(load, contribution)` without monotonic
    /// enforcement or clipping; its
    /// [`total_probability`](FragilityCurve::total_probability) approximates
    /// the failure probability per reference period of the exceedance curve.
    pub fn integrate(
        &self,
        fragility: &FragilityCurve,
        exceedance: &ExceedanceFrequencyCurve,
    ) -> CurveResult<FragilityCurve> {
        let grid = common_grid(
            [
                (fragility.min_load(), fragility.max_load()),
                (exceedance.min_load(), exceedance.max_load()),
            ],
            self.settings.refine_step_size,
            self.settings.extend_past_max,
        )?;

        let conditional = fragility.refine(&grid, false)?;
        let frequencies = exceedance.refine(&grid)?;
        let p = conditional.probabilities();
        let e = frequencies.frequencies();

        let n = grid.len();
        let contributions: Vec<f64> = (0..n)
            .map(|i| {
                if i == 0 || i + 1 >= n {
                    0.0
                } else {
                    p[i] * (e[i - 1] - e[i + 1]) / 2.0
                }
            })
            .collect();

        tracing::debug!(
            grid_points = n,
            total = contributions.iter().sum::<f64>(),
            "Integrated fragility curve"
        );

        FragilityCurve::with_settings(grid, contributions, CurveSettings::unconstrained())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_boundaries_contribute_nothing() {
        let fragility = FragilityCurve::new(vec![0.0, 1.0], vec![0.5, 0.5]).unwrap();
        let exceedance = ExceedanceFrequencyCurve::new(vec![0.0, 1.0], vec![1e-1, 1e-3]).unwrap();
        let risk = CurveIntegrator::new(IntegrationSettings::default().with_refine_step_size(0.25))
            .integrate(&fragility, &exceedance)
            .unwrap();

        assert_eq!(risk.loads(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(risk.probabilities()[0], 0.0);
        assert_eq!(risk.probabilities()[4], 0.0);
        assert!(risk.probabilities()[1..4].iter().all(|&c| c > 0.0));
    }

    #[test]
    fn test_certain_failure_conserves_exceedance_mass() {
        let fragility = FragilityCurve::new(vec![0.0, 2.0], vec![1.0, 1.0]).unwrap();
        let exceedance =
            ExceedanceFrequencyCurve::new(vec![0.0, 1.0, 2.0], vec![1e-1, 1e-2, 1e-3]).unwrap();
        let risk = CurveIntegrator::new(IntegrationSettings::default().with_refine_step_size(0.01))
            .integrate(&fragility, &exceedance)
            .unwrap();

        // Telescoping midpoint sum: (E0 + E1 - E[n-2] - E[n-1]) / 2
        let refined = exceedance.refine(risk.loads()).unwrap();
        let e = refined.frequencies();
        let n = e.len();
        let expected = (e[0] + e[1] - e[n - 2] - e[n - 1]) / 2.0;
        assert_relative_eq!(risk.total_probability(), expected, max_relative = 1e-9);
        assert_relative_eq!(risk.total_probability(), 1e-1 - 1e-3, max_relative = 0.05);
    }

    #[test]
    fn test_midpoint_formula() {
        let fragility = FragilityCurve::new(vec![0.0, 1.0, 2.0], vec![0.1, 0.2, 0.4]).unwrap();
        let exceedance =
            ExceedanceFrequencyCurve::new(vec![0.0, 1.0, 2.0], vec![1.0, 0.1, 0.01]).unwrap();
        let risk = CurveIntegrator::new(IntegrationSettings::default().with_refine_step_size(1.0))
            .integrate(&fragility, &exceedance)
            .unwrap();

        assert_eq!(risk.len(), 3);
        assert_relative_eq!(risk.probabilities()[1], 0.2 * (1.0 - 0.01) / 2.0, max_relative = 1e-12);
    }
}
