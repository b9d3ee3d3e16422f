//! Model uncertainty of wave height and wave period.
//!
//! The wave model's `Hs` and `Tspec` carry independent, normally distributed
//! multiplicative factors. Each factor distribution is discretized on `N`
//! equidistant nodes spanning `[-R, R]` of the standard normal, with step
//! `2R / (N - 1)` and weights proportional to the density:
//!
//! ```text
//! z_k = -R + k · 2R / (N - 1),   w_k = φ(z_k) / Σ_j φ(z_j)
//! ```
//!
//! The factor at a node is `max(0, mean + stddev · z_k)`. The Cartesian
//! product of the `Hs` and `Tspec` nodes gives `N²` scenarios of weight
//! `w_i · w_j`, summing to 1.

use std::collections::BTreeMap;

use fragility_math::distributions::normal_pdf;
use serde::{Deserialize, Serialize};

use crate::closing::ClosingSituation;
use crate::error::{HydraError, HydraResult};

/// Default number of nodes per factor.
pub const DEFAULT_DISCRETIZATION: usize = 5;

/// Half-width `R` of the standard-normal range covered by the nodes.
pub const STANDARD_NORMAL_RANGE: f64 = 4.0;

/// Mean and standard deviation of the `Hs` and `Tspec` factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyParameters {
    /// Mean of the wave height factor.
    pub hs_mean: f64,
    /// Standard deviation of the wave height factor.
    pub hs_stddev: f64,
    /// Mean of the wave period factor.
    pub tspec_mean: f64,
    /// Standard deviation of the wave period factor.
    pub tspec_stddev: f64,
}

impl Default for UncertaintyParameters {
    fn default() -> Self {
        Self::deterministic()
    }
}

impl UncertaintyParameters {
    /// Creates parameters from the two factor distributions.
    #[must_use]
    pub fn new(hs_mean: f64, hs_stddev: f64, tspec_mean: f64, tspec_stddev: f64) -> Self {
        Self {
            hs_mean,
            hs_stddev,
            tspec_mean,
            tspec_stddev,
        }
    }

    /// Factors fixed at 1.
    #[must_use]
    pub fn deterministic() -> Self {
        Self::new(1.0, 0.0, 1.0, 0.0)
    }

    /// The `Hs` factor distribution.
    #[must_use]
    pub fn hs(&self) -> FactorDistribution {
        FactorDistribution::new(self.hs_mean, self.hs_stddev)
    }

    /// The `Tspec` factor distribution.
    #[must_use]
    pub fn tspec(&self) -> FactorDistribution {
        FactorDistribution::new(self.tspec_mean, self.tspec_stddev)
    }

    fn validate(&self) -> HydraResult<()> {
        for (field, value) in [
            ("hs_mean", self.hs_mean),
            ("hs_stddev", self.hs_stddev),
            ("tspec_mean", self.tspec_mean),
            ("tspec_stddev", self.tspec_stddev),
        ] {
            if !value.is_finite() {
                return Err(HydraError::input_validation(
                    field,
                    format!("must be finite, got {value}"),
                ));
            }
        }
        for (field, value) in [("hs_stddev", self.hs_stddev), ("tspec_stddev", self.tspec_stddev)] {
            if value < 0.0 {
                return Err(HydraError::input_validation(
                    field,
                    format!("must be non-negative, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

/// A normally distributed multiplicative factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorDistribution {
    mean: f64,
    stddev: f64,
}

impl FactorDistribution {
    /// Creates the distribution.
    #[must_use]
    pub fn new(mean: f64, stddev: f64) -> Self {
        Self { mean, stddev }
    }

    /// Factor and weight at each of `count` nodes, ascending in factor.
    ///
    /// Negative factors are clamped to 0.
    #[must_use]
    pub fn discretize(&self, count: usize) -> Vec<(f64, f64)> {
        standard_normal_nodes(count)
            .into_iter()
            .map(|(z, weight)| ((self.mean + self.stddev * z).max(0.0), weight))
            .collect()
    }
}

/// `count` equidistant nodes on `[-R, R]` of the standard normal with
/// normalized density weights, as `(z, weight)` pairs.
///
/// A single node sits at 0 with weight 1.
#[must_use]
pub fn standard_normal_nodes(count: usize) -> Vec<(f64, f64)> {
    if count <= 1 {
        return vec![(0.0, 1.0); count];
    }
    let step = 2.0 * STANDARD_NORMAL_RANGE / (count - 1) as f64;
    let nodes: Vec<f64> = (0..count)
        .map(|k| -STANDARD_NORMAL_RANGE + k as f64 * step)
        .collect();
    let total: f64 = nodes.iter().map(|&z| normal_pdf(z)).sum();
    nodes.into_iter().map(|z| (z, normal_pdf(z) / total)).collect()
}

/// One combination of factors and its probability weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UncertaintyScenario {
    /// Multiplier on the significant wave height.
    pub hs_factor: f64,
    /// Multiplier on the spectral period.
    pub tspec_factor: f64,
    /// Probability of the scenario.
    pub weight: f64,
}

/// Model-uncertainty parameters per closing situation.
///
/// Scenario tables are built on every call to
/// [`scenarios`](Self::scenarios); nothing is cached.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelUncertainty {
    parameters: BTreeMap<ClosingSituation, UncertaintyParameters>,
    discretization: usize,
}

impl Default for ModelUncertainty {
    fn default() -> Self {
        Self {
            parameters: BTreeMap::new(),
            discretization: DEFAULT_DISCRETIZATION,
        }
    }
}

impl ModelUncertainty {
    /// Creates an empty set with `discretization` nodes per factor.
    ///
    /// # Errors
    ///
    /// Returns an error if `discretization` is 0.
    pub fn new(discretization: usize) -> HydraResult<Self> {
        if discretization == 0 {
            return Err(HydraError::input_validation(
                "discretization",
                "needs at least one node",
            ));
        }
        Ok(Self {
            parameters: BTreeMap::new(),
            discretization,
        })
    }

    /// Adds or replaces the parameters of a closing situation.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is not finite or a standard deviation
    /// is negative.
    pub fn insert(
        &mut self,
        closing_situation: ClosingSituation,
        parameters: UncertaintyParameters,
    ) -> HydraResult<()> {
        parameters.validate()?;
        self.parameters.insert(closing_situation, parameters);
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_parameters(
        mut self,
        closing_situation: ClosingSituation,
        parameters: UncertaintyParameters,
    ) -> HydraResult<Self> {
        self.insert(closing_situation, parameters)?;
        Ok(self)
    }

    /// Number of nodes per factor.
    #[must_use]
    pub fn discretization(&self) -> usize {
        self.discretization
    }

    /// Configured closing situations, ascending.
    pub fn closing_situations(&self) -> impl Iterator<Item = ClosingSituation> + '_ {
        self.parameters.keys().copied()
    }

    /// Parameters of a closing situation.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown closing situation.
    pub fn parameters(&self, closing_situation: ClosingSituation) -> HydraResult<&UncertaintyParameters> {
        self.parameters
            .get(&closing_situation)
            .ok_or_else(|| HydraError::missing_closing_situation(closing_situation))
    }

    /// The `N²` scenarios of a closing situation, `Hs` nodes outermost.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown closing situation.
    pub fn scenarios(&self, closing_situation: ClosingSituation) -> HydraResult<Vec<UncertaintyScenario>> {
        let parameters = self.parameters(closing_situation)?;
        let n = self.discretization;
        let hs_nodes = parameters.hs().discretize(n);
        let tspec_nodes = parameters.tspec().discretize(n);

        let scenarios: Vec<UncertaintyScenario> = hs_nodes
            .iter()
            .flat_map(|&(hs_factor, hs_weight)| {
                tspec_nodes
                    .iter()
                    .map(move |&(tspec_factor, tspec_weight)| UncertaintyScenario {
                        hs_factor,
                        tspec_factor,
                        weight: hs_weight * tspec_weight,
                    })
            })
            .collect();

        tracing::debug!(
            closing_situation = closing_situation.id(),
            scenarios = scenarios.len(),
            "Built model-uncertainty scenarios"
        );
        Ok(scenarios)
    }
}
