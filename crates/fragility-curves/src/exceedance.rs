//! Load exceedance-frequency curves.

use fragility_math::interpolation::{Interpolation, Transform};
use serde::{Deserialize, Serialize};

use crate::curve::{sort_points, DEFAULT_LOWER_LIMIT};
use crate::error::{CurveError, CurveResult};

/// Exceedance frequency (or probability) of a hydraulic load.
///
/// Same shape as a fragility curve but different meaning: the value at a load
/// is how often that load is exceeded per reference period. Values typically
/// decrease with the load; this is not enforced. Points are sorted by load on
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExceedanceRecord", into = "ExceedanceRecord")]
pub struct ExceedanceFrequencyCurve {
    loads: Vec<f64>,
    frequencies: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct ExceedanceRecord {
    #[serde(alias = "waterlevels")]
    hydraulicload: Vec<f64>,
    probability_exceedance: Vec<f64>,
}

impl TryFrom<ExceedanceRecord> for ExceedanceFrequencyCurve {
    type Error = CurveError;

    fn try_from(record: ExceedanceRecord) -> CurveResult<Self> {
        Self::new(record.hydraulicload, record.probability_exceedance)
    }
}

impl From<ExceedanceFrequencyCurve> for ExceedanceRecord {
    fn from(curve: ExceedanceFrequencyCurve) -> Self {
        Self {
            hydraulicload: curve.loads,
            probability_exceedance: curve.frequencies,
        }
    }
}

impl ExceedanceFrequencyCurve {
    /// Creates an exceedance curve.
    ///
    /// # Errors
    ///
    /// Returns an error if the columns differ in length, are empty, or
    /// contain non-finite values.
    pub fn new(loads: Vec<f64>, frequencies: Vec<f64>) -> CurveResult<Self> {
        if loads.len() != frequencies.len() {
            return Err(CurveError::length_mismatch(loads.len(), frequencies.len()));
        }
        if loads.is_empty() {
            return Err(CurveError::insufficient_points(1, 0));
        }
        if loads.iter().chain(&frequencies).any(|v| !v.is_finite()) {
            return Err(CurveError::invalid_value(
                "exceedance curve values must be finite",
            ));
        }

        let (loads, frequencies) = sort_points(&loads, &frequencies);
        Ok(Self { loads, frequencies })
    }

    /// Returns the loads.
    #[must_use]
    pub fn loads(&self) -> &[f64] {
        &self.loads
    }

    /// Returns the exceedance frequencies.
    #[must_use]
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
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

    /// Resamples the frequencies onto `new_loads` in the log domain.
    ///
    /// Frequencies are not clipped to [0, 1]: a yearly frequency may exceed 1.
    pub fn refine(&self, new_loads: &[f64]) -> CurveResult<Self> {
        if new_loads.is_empty() {
            return Err(CurveError::insufficient_points(1, 0));
        }
        let frequencies = Interpolation::new(Transform::Log)
            .with_lower_limit(DEFAULT_LOWER_LIMIT)
            .interpolate_many(new_loads, &self.loads, &self.frequencies)?;
        Self::new(new_loads.to_vec(), frequencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sorted_on_construction() {
        let curve = ExceedanceFrequencyCurve::new(vec![3.0, 1.0, 2.0], vec![1e-3, 1e-1, 1e-2]).unwrap();
        assert_eq!(curve.loads(), &[1.0, 2.0, 3.0]);
        assert_eq!(curve.frequencies(), &[1e-1, 1e-2, 1e-3]);
    }

    #[test]
    fn test_refine_is_log_linear_and_unclipped() {
        let curve = ExceedanceFrequencyCurve::new(vec![0.0, 1.0], vec![10.0, 0.1]).unwrap();
        let refined = curve.refine(&[-1.0, 0.5]).unwrap();
        assert_relative_eq!(refined.frequencies()[0], 1000.0, max_relative = 1e-12);
        assert_relative_eq!(refined.frequencies()[1], 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_invalid() {
        assert!(ExceedanceFrequencyCurve::new(vec![], vec![]).is_err());
        assert!(ExceedanceFrequencyCurve::new(vec![1.0], vec![f64::INFINITY]).is_err());
    }
}
