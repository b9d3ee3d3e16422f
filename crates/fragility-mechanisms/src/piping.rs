//! Piping fragility curves from an external probabilistic solver.
//!
//! Piping is assessed with three sequential sub-mechanisms (uplift, heave
//! and Sellmeijer) and a combined result. The probabilistic computation is
//! delegated to a [`PipingSolver`]; the builder validates its output and
//! turns it into [`FragilityCurve`]s.

use fragility_curves::{CurveSettings, FragilityCurve};
use serde::{Deserialize, Serialize};

use crate::error::{MechanismError, MechanismResult};

/// Raw output of a piping solver for a list of water levels.
#[derive(Debug, Clone, PartialEq)]
pub struct PipingSolverOutput<S> {
    /// Solver settings used for the run.
    pub settings: S,
    /// Uplift failure probability per water level.
    pub uplift: Vec<f64>,
    /// Heave failure probability per water level.
    pub heave: Vec<f64>,
    /// Sellmeijer failure probability per water level.
    pub sellmeijer: Vec<f64>,
    /// Combined piping failure probability per water level.
    pub combined: Vec<f64>,
}

/// Probabilistic piping solver.
pub trait PipingSolver {
    /// Soil and geometry input of the solver.
    type Input;
    /// Settings echoed by the solver.
    type Settings;

    /// Failure probabilities at each of `waterlevels`, in the same order.
    fn fixed_waterlevel_fragilitycurve(
        &self,
        input: &Self::Input,
        waterlevels: &[f64],
    ) -> MechanismResult<PipingSolverOutput<Self::Settings>>;
}

/// A survived water level and the trust placed in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityUpdate {
    /// Survived water level (m).
    pub level: f64,
    /// Trust factor in [0, 1].
    #[serde(default = "default_trust_factor")]
    pub trust_factor: f64,
}

fn default_trust_factor() -> f64 {
    1.0
}

/// The four piping curves.
#[derive(Debug, Clone, PartialEq)]
pub struct PipingCurves<S> {
    /// Solver settings used for the run.
    pub settings: S,
    /// Uplift curve.
    pub uplift: FragilityCurve,
    /// Heave curve.
    pub heave: FragilityCurve,
    /// Sellmeijer curve.
    pub sellmeijer: FragilityCurve,
    /// Combined piping curve.
    pub combined: FragilityCurve,
}

impl<S> PipingCurves<S> {
    /// The curves with their names, in sub-mechanism order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FragilityCurve)> {
        [
            ("uplift", &self.uplift),
            ("heave", &self.heave),
            ("sellmeijer", &self.sellmeijer),
            ("combined", &self.combined),
        ]
        .into_iter()
    }
}

/// Builds piping fragility curves with a [`PipingSolver`].
#[derive(Debug, Clone)]
pub struct PipingCurveBuilder<'a, T: PipingSolver> {
    solver: &'a T,
    curve_settings: CurveSettings,
    reliability_update: Option<ReliabilityUpdate>,
}

impl<'a, T: PipingSolver> PipingCurveBuilder<'a, T> {
    /// Creates a builder with default curve settings and no reliability
    /// update.
    #[must_use]
    pub fn new(solver: &'a T) -> Self {
        Self {
            solver,
            curve_settings: CurveSettings::default(),
            reliability_update: None,
        }
    }

    /// Sets the normalization of the resulting curves.
    #[must_use]
    pub fn with_curve_settings(mut self, settings: CurveSettings) -> Self {
        self.curve_settings = settings;
        self
    }

    /// Applies a reliability update to all four curves.
    #[must_use]
    pub fn with_reliability_update(mut self, update: ReliabilityUpdate) -> Self {
        self.reliability_update = Some(update);
        self
    }

    /// Runs the solver for `waterlevels` and builds the curves.
    ///
    /// `waterlevels` must be ascending. Every curve keeps the caller's load
    /// order, with each water level paired with the solver's probability at
    /// the same index.
    ///
    /// # Errors
    ///
    /// - input validation error for an empty, non-finite or descending load
    ///   list, or solver output whose lengths do not match the load list
    /// - errors from the solver or the reliability update
    pub fn build(
        &self,
        input: &T::Input,
        waterlevels: &[f64],
    ) -> MechanismResult<PipingCurves<T::Settings>> {
        if waterlevels.is_empty() {
            return Err(MechanismError::input_validation(
                "waterlevels",
                "at least one water level is required",
            ));
        }
        if waterlevels.iter().any(|l| !l.is_finite()) {
            return Err(MechanismError::input_validation(
                "waterlevels",
                "values must be finite",
            ));
        }
        if let Some(i) = waterlevels.windows(2).position(|w| w[1] < w[0]) {
            return Err(MechanismError::input_validation(
                "waterlevels",
                format!(
                    "must be ascending, got {} after {}",
                    waterlevels[i + 1],
                    waterlevels[i]
                ),
            ));
        }

        let output = self
            .solver
            .fixed_waterlevel_fragilitycurve(input, waterlevels)?;

        let curve = |name: &str, probabilities: Vec<f64>| -> MechanismResult<FragilityCurve> {
            if probabilities.len() != waterlevels.len() {
                return Err(MechanismError::input_validation(
                    name,
                    format!(
                        "solver returned {} values for {} water levels",
                        probabilities.len(),
                        waterlevels.len()
                    ),
                ));
            }
            let curve = FragilityCurve::with_settings(
                waterlevels.to_vec(),
                probabilities,
                self.curve_settings,
            )?;
            match self.reliability_update {
                Some(update) => Ok(curve.reliability_update(update.level, update.trust_factor)?),
                None => Ok(curve),
            }
        };

        let curves = PipingCurves {
            uplift: curve("uplift", output.uplift)?,
            heave: curve("heave", output.heave)?,
            sellmeijer: curve("sellmeijer", output.sellmeijer)?,
            combined: curve("combined", output.combined)?,
            settings: output.settings,
        };

        tracing::debug!(
            waterlevels = waterlevels.len(),
            updated = self.reliability_update.is_some(),
            "Built piping fragility curves"
        );
        Ok(curves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Probabilities growing linearly with the water level; the combined
    /// curve is the smallest sub-mechanism.
    struct LinearSolver {
        truncate: bool,
    }

    impl PipingSolver for LinearSolver {
        type Input = f64;
        type Settings = &'static str;

        fn fixed_waterlevel_fragilitycurve(
            &self,
            slope: &f64,
            waterlevels: &[f64],
        ) -> MechanismResult<PipingSolverOutput<&'static str>> {
            let p = |scale: f64| -> Vec<f64> {
                waterlevels
                    .iter()
                    .map(|h| (scale * slope * h).clamp(0.0, 1.0))
                    .collect()
            };
            let uplift = p(0.3);
            let heave = p(0.2);
            let mut sellmeijer = p(0.1);
            let combined = sellmeijer.clone();
            if self.truncate {
                sellmeijer.pop();
            }
            Ok(PipingSolverOutput {
                settings: "linear",
                uplift,
                heave,
                sellmeijer,
                combined,
            })
        }
    }

    struct FailingSolver;

    impl PipingSolver for FailingSolver {
        type Input = ();
        type Settings = ();

        fn fixed_waterlevel_fragilitycurve(
            &self,
            _: &(),
            _: &[f64],
        ) -> MechanismResult<PipingSolverOutput<()>> {
            Err(MechanismError::solver("did not converge"))
        }
    }

    #[test]
    fn test_exposes_all_curves() {
        let solver = LinearSolver { truncate: false };
        let curves = PipingCurveBuilder::new(&solver)
            .build(&1.0, &[1.0, 2.0, 3.0])
            .unwrap();

        assert_eq!(curves.settings, "linear");
        assert_eq!(curves.uplift.loads(), &[1.0, 2.0, 3.0]);
        assert_relative_eq!(curves.uplift.probabilities()[2], 0.9, max_relative = 1e-12);
        assert_relative_eq!(curves.heave.probabilities()[0], 0.2, max_relative = 1e-12);
        assert_eq!(curves.sellmeijer, curves.combined);
        assert_eq!(curves.iter().count(), 4);
    }

    #[test]
    fn test_descending_loads_are_rejected_before_solving() {
        let err = PipingCurveBuilder::new(&FailingSolver)
            .build(&(), &[1.0, 3.0, 2.0])
            .unwrap_err();
        assert!(matches!(err, MechanismError::InputValidation { ref field, .. } if field == "waterlevels"));
    }

    #[test]
    fn test_load_order_is_preserved() {
        let solver = LinearSolver { truncate: false };
        let loads = [1.0, 2.0, 2.0, 3.0];
        let curves = PipingCurveBuilder::new(&solver).build(&1.0, &loads).unwrap();

        for (name, curve) in curves.iter() {
            assert_eq!(curve.loads(), &loads, "{name}");
        }
        assert_relative_eq!(curves.heave.probabilities()[3], 0.6, max_relative = 1e-12);
    }

    #[test]
    fn test_length_mismatch() {
        let solver = LinearSolver { truncate: true };
        let err = PipingCurveBuilder::new(&solver)
            .build(&1.0, &[1.0, 2.0])
            .unwrap_err();
        assert!(matches!(err, MechanismError::InputValidation { ref field, .. } if field == "sellmeijer"));
    }

    #[test]
    fn test_reliability_update_applies_to_all_curves() {
        let solver = LinearSolver { truncate: false };
        let curves = PipingCurveBuilder::new(&solver)
            .with_reliability_update(ReliabilityUpdate {
                level: 2.0,
                trust_factor: 1.0,
            })
            .build(&0.5, &[1.0, 2.0, 3.0, 4.0])
            .unwrap();

        for (name, curve) in curves.iter() {
            assert_eq!(curve.probabilities()[0], 0.0, "{name}");
            assert!(curve.probabilities()[3] > 0.0, "{name}");
        }
    }

    #[test]
    fn test_solver_failure_and_bad_input() {
        let err = PipingCurveBuilder::new(&FailingSolver).build(&(), &[1.0]).unwrap_err();
        assert!(matches!(err, MechanismError::Solver { .. }));

        let solver = LinearSolver { truncate: false };
        assert!(PipingCurveBuilder::new(&solver).build(&1.0, &[]).is_err());
        assert!(PipingCurveBuilder::new(&solver).build(&1.0, &[f64::NAN]).is_err());
    }
}
