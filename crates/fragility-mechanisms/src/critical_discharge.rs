//! Critical overtopping discharge.
//!
//! The inner slope fails when the overtopping discharge `q` exceeds the
//! critical discharge `qcr`. `qcr` is either a fixed value or log-normally
//! distributed; for grass covers the distribution depends on the sod
//! quality and the wave height.
//!
//! All discharges are in m³/s per metre.

use fragility_math::distributions::lognormal_cdf;
use serde::{Deserialize, Serialize};

use crate::error::{MechanismError, MechanismResult};

/// Sod quality of a grass cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrassQuality {
    /// Open sod.
    Open,
    /// Closed sod.
    Closed,
}

impl GrassQuality {
    /// Mean and standard deviation of `qcr` in l/s per metre for a wave
    /// height `hs`, per bucket `[0, 1)`, `[1, 2)`, `[2, ∞)` m.
    #[must_use]
    pub fn moments(self, hs: f64) -> (f64, f64) {
        let bucket = if hs < 1.0 {
            0
        } else if hs < 2.0 {
            1
        } else {
            2
        };
        match self {
            Self::Closed => [(225.0, 250.0), (100.0, 120.0), (70.0, 80.0)][bucket],
            Self::Open => [(100.0, 120.0), (70.0, 80.0), (40.0, 50.0)][bucket],
        }
    }

    /// Log-normal `(mu, sigma)` of `qcr` in m³/s per metre for a wave
    /// height `hs`.
    #[must_use]
    pub fn lognormal_parameters(self, hs: f64) -> (f64, f64) {
        let (mean, stddev) = self.moments(hs);
        let mean = mean / 1000.0;
        let stddev = stddev / 1000.0;
        let variance = (1.0 + (stddev / mean).powi(2)).ln();
        (mean.ln() - 0.5 * variance, variance.sqrt())
    }
}

/// The critical discharge of a failure criterion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticalDischarge {
    /// Fixed `qcr`: failure when the discharge exceeds it.
    Deterministic(f64),
    /// Log-normal `qcr` with parameters of `ln(qcr)`.
    Distribution {
        /// Mean of `ln(qcr)`.
        mu: f64,
        /// Standard deviation of `ln(qcr)`.
        sigma: f64,
    },
    /// Log-normal `qcr` from the grass quality table.
    GrassQuality(GrassQuality),
}

impl Default for CriticalDischarge {
    fn default() -> Self {
        Self::Deterministic(0.01)
    }
}

impl CriticalDischarge {
    /// Checks the parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if a deterministic `qcr` is not positive or a
    /// distribution has non-finite `mu` or non-positive `sigma`.
    pub fn validate(&self) -> MechanismResult<()> {
        match *self {
            Self::Deterministic(qcr) if !(qcr.is_finite() && qcr > 0.0) => Err(
                MechanismError::input_validation("qcr", format!("must be positive, got {qcr}")),
            ),
            Self::Distribution { mu, sigma } if !(mu.is_finite() && sigma.is_finite() && sigma > 0.0) => {
                Err(MechanismError::input_validation(
                    "qcr",
                    format!("invalid log-normal parameters mu={mu}, sigma={sigma}"),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Probability that `discharge` exceeds `qcr`, given the wave height
    /// `hs` (only used for grass quality).
    #[must_use]
    pub fn exceedance_probability(&self, discharge: f64, hs: f64) -> f64 {
        match *self {
            Self::Deterministic(qcr) => {
                if discharge > qcr {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Distribution { mu, sigma } => lognormal_cdf(discharge / mu.exp(), sigma),
            Self::GrassQuality(quality) => {
                let (mu, sigma) = quality.lognormal_parameters(hs);
                lognormal_cdf(discharge / mu.exp(), sigma)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_deterministic_is_a_step() {
        let qcr = CriticalDischarge::Deterministic(0.01);
        assert_eq!(qcr.exceedance_probability(0.0099, 1.0), 0.0);
        assert_eq!(qcr.exceedance_probability(0.01, 1.0), 0.0);
        assert_eq!(qcr.exceedance_probability(0.0101, 1.0), 1.0);
    }

    #[test]
    fn test_distribution_median() {
        let qcr = CriticalDischarge::Distribution {
            mu: 0.05_f64.ln(),
            sigma: 0.8,
        };
        assert_relative_eq!(qcr.exceedance_probability(0.05, 0.0), 0.5, max_relative = 1e-12);
        assert!(qcr.exceedance_probability(0.5, 0.0) > 0.99);
        assert_eq!(qcr.exceedance_probability(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_grass_lognormal_moments() {
        let (mu, sigma) = GrassQuality::Closed.lognormal_parameters(0.5);
        // Log-normal mean exp(mu + sigma²/2) reproduces the table mean
        assert_relative_eq!((mu + 0.5 * sigma * sigma).exp(), 0.225, max_relative = 1e-12);
        let variance = ((sigma * sigma).exp() - 1.0) * (2.0 * mu + sigma * sigma).exp();
        assert_relative_eq!(variance.sqrt(), 0.250, max_relative = 1e-12);
    }

    #[test]
    fn test_grass_buckets() {
        assert_eq!(GrassQuality::Open.moments(0.99), (100.0, 120.0));
        assert_eq!(GrassQuality::Open.moments(1.0), (70.0, 80.0));
        assert_eq!(GrassQuality::Open.moments(2.5), (40.0, 50.0));
        assert_eq!(GrassQuality::Closed.moments(1.5), (100.0, 120.0));

        // Open sod is weaker: more likely to fail at the same discharge
        let q = 0.05;
        let open = CriticalDischarge::GrassQuality(GrassQuality::Open).exceedance_probability(q, 0.5);
        let closed = CriticalDischarge::GrassQuality(GrassQuality::Closed).exceedance_probability(q, 0.5);
        assert!(open > closed);
    }

    #[test]
    fn test_validation() {
        assert!(CriticalDischarge::Deterministic(0.0).validate().is_err());
        assert!(CriticalDischarge::Distribution { mu: 0.0, sigma: 0.0 }.validate().is_err());
        assert!(CriticalDischarge::GrassQuality(GrassQuality::Open).validate().is_ok());
        assert!(CriticalDischarge::default().validate().is_ok());
    }

    #[test]
    fn test_serde_shape() {
        let det: CriticalDischarge = serde_json::from_str(r#"{"deterministic": 0.01}"#).unwrap();
        assert_eq!(det, CriticalDischarge::Deterministic(0.01));
        let grass: CriticalDischarge = serde_json::from_str(r#"{"grass_quality": "closed"}"#).unwrap();
        assert_eq!(grass, CriticalDischarge::GrassQuality(GrassQuality::Closed));
    }
}
