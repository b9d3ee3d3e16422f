//! Bretschneider wave growth in shallow water.

use fragility_math::interpolation::{bracketing_indices, normalize_bearing};
use serde::{Deserialize, Serialize};

use super::{WaveConditionProvider, WaveConditionSample};
use crate::error::{HydraError, HydraResult};

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Ratio of the peak period to the spectral period Tm-1,0.
pub const PEAK_TO_SPECTRAL: f64 = 1.1;

/// Significant wave height and peak period from the Bretschneider relations.
///
/// With dimensionless depth `d~ = g·d/u²` and fetch `F~ = g·F/u²`:
///
/// ```text
/// Hs = u²/g · 0.283 · tanh(0.53·d~^0.75) · tanh(0.0125·F~^0.42 / tanh(0.53·d~^0.75))
/// Tp = u/g  · 2.4π  · tanh(0.833·d~^0.375) · tanh(0.077·F~^0.25 / tanh(0.833·d~^0.375))
/// ```
///
/// Returns `(0, 0)` when depth, fetch or windspeed is not positive.
#[must_use]
pub fn bretschneider(depth: f64, fetch: f64, windspeed: f64) -> (f64, f64) {
    if depth <= 0.0 || fetch <= 0.0 || windspeed <= 0.0 {
        return (0.0, 0.0);
    }

    let u2 = windspeed * windspeed;
    let depth_nd = GRAVITY * depth / u2;
    let fetch_nd = GRAVITY * fetch / u2;

    let depth_hs = (0.53 * depth_nd.powf(0.75)).tanh();
    let hs = u2 / GRAVITY * 0.283 * depth_hs * (0.0125 * fetch_nd.powf(0.42) / depth_hs).tanh();

    let depth_tp = (0.833 * depth_nd.powf(0.375)).tanh();
    let tp = windspeed / GRAVITY
        * 2.4
        * std::f64::consts::PI
        * depth_tp
        * (0.077 * fetch_nd.powf(0.25) / depth_tp).tanh();

    (hs, tp)
}

/// Empirical wave provider: bed level and fetch per wind direction.
///
/// Bed level and fetch are interpolated circularly between the tabulated
/// directions, so a query at 355° with tables at 350° and 0° blends those
/// two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BretschneiderRecord", into = "BretschneiderRecord")]
pub struct Bretschneider {
    directions: Vec<f64>,
    bed_levels: Vec<f64>,
    fetches: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct BretschneiderRecord {
    directions: Vec<f64>,
    bed_levels: Vec<f64>,
    fetches: Vec<f64>,
}

impl TryFrom<BretschneiderRecord> for Bretschneider {
    type Error = HydraError;

    fn try_from(record: BretschneiderRecord) -> HydraResult<Self> {
        Self::new(record.directions, record.bed_levels, record.fetches)
    }
}

impl From<Bretschneider> for BretschneiderRecord {
    fn from(value: Bretschneider) -> Self {
        Self {
            directions: value.directions,
            bed_levels: value.bed_levels,
            fetches: value.fetches,
        }
    }
}

impl Bretschneider {
    /// Creates the provider from per-direction bed levels and fetch lengths.
    ///
    /// Directions are normalized onto [0, 360) and sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables are empty, differ in length, contain
    /// non-finite values, duplicate directions or negative fetches.
    pub fn new(directions: Vec<f64>, bed_levels: Vec<f64>, fetches: Vec<f64>) -> HydraResult<Self> {
        if directions.is_empty() {
            return Err(HydraError::input_validation("directions", "table is empty"));
        }
        if bed_levels.len() != directions.len() || fetches.len() != directions.len() {
            return Err(HydraError::input_validation(
                "bed_levels",
                format!(
                    "{} directions, {} bed levels and {} fetches",
                    directions.len(),
                    bed_levels.len(),
                    fetches.len()
                ),
            ));
        }
        if directions
            .iter()
            .chain(&bed_levels)
            .chain(&fetches)
            .any(|v| !v.is_finite())
        {
            return Err(HydraError::input_validation("directions", "values must be finite"));
        }
        if fetches.iter().any(|&f| f < 0.0) {
            return Err(HydraError::input_validation("fetches", "must be non-negative"));
        }

        let mut rows: Vec<(f64, f64, f64)> = directions
            .into_iter()
            .map(normalize_bearing)
            .zip(bed_levels)
            .zip(fetches)
            .map(|((d, b), f)| (d, b, f))
            .collect();
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));
        if rows.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(HydraError::input_validation("directions", "duplicate direction"));
        }

        let mut provider = Self {
            directions: Vec::with_capacity(rows.len()),
            bed_levels: Vec::with_capacity(rows.len()),
            fetches: Vec::with_capacity(rows.len()),
        };
        for (d, b, f) in rows {
            provider.directions.push(d);
            provider.bed_levels.push(b);
            provider.fetches.push(f);
        }
        Ok(provider)
    }

    /// Tabulated directions, sorted on [0, 360).
    #[must_use]
    pub fn directions(&self) -> &[f64] {
        &self.directions
    }

    /// Bed level and fetch at `direction`.
    pub fn bed_level_and_fetch(&self, direction: f64) -> HydraResult<(f64, f64)> {
        let bracket = bracketing_indices(&self.directions, direction, true)?;
        Ok((
            bracket.lerp(self.bed_levels[bracket.lower], self.bed_levels[bracket.upper]),
            bracket.lerp(self.fetches[bracket.lower], self.fetches[bracket.upper]),
        ))
    }
}

impl WaveConditionProvider for Bretschneider {
    fn sample(
        &self,
        windspeed: f64,
        direction: f64,
        waterlevel: f64,
    ) -> HydraResult<WaveConditionSample> {
        let (bed_level, fetch) = self.bed_level_and_fetch(direction)?;
        let (hs, tp) = bretschneider(waterlevel - bed_level, fetch, windspeed);
        Ok(WaveConditionSample {
            hs,
            tspec: tp / PEAK_TO_SPECTRAL,
            direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_deep_water_long_fetch_limit() {
        let (hs, tp) = bretschneider(1e5, 1e12, 20.0);
        assert_relative_eq!(hs, 0.283 * 400.0 / GRAVITY, max_relative = 1e-6);
        assert_relative_eq!(tp, 20.0 / GRAVITY * 2.4 * std::f64::consts::PI, max_relative = 1e-6);
    }

    #[test]
    fn test_degenerate_inputs_give_no_waves() {
        assert_eq!(bretschneider(0.0, 1000.0, 20.0), (0.0, 0.0));
        assert_eq!(bretschneider(-1.0, 1000.0, 20.0), (0.0, 0.0));
        assert_eq!(bretschneider(5.0, 0.0, 20.0), (0.0, 0.0));
        assert_eq!(bretschneider(5.0, 1000.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn test_waves_grow_with_depth_and_fetch() {
        let (hs_shallow, _) = bretschneider(1.0, 5000.0, 20.0);
        let (hs_deep, _) = bretschneider(5.0, 5000.0, 20.0);
        let (hs_long, _) = bretschneider(5.0, 20000.0, 20.0);
        assert!(hs_shallow < hs_deep);
        assert!(hs_deep < hs_long);
    }

    #[test]
    fn test_circular_interpolation_of_tables() {
        let provider = Bretschneider::new(
            vec![0.0, 90.0, 180.0, 270.0],
            vec![-2.0, -4.0, -6.0, -4.0],
            vec![1000.0, 2000.0, 3000.0, 2000.0],
        )
        .unwrap();

        let (bed, fetch) = provider.bed_level_and_fetch(315.0).unwrap();
        assert_relative_eq!(bed, -3.0, max_relative = 1e-12);
        assert_relative_eq!(fetch, 1500.0, max_relative = 1e-12);
    }

    #[test]
    fn test_sample_uses_depth_above_bed() {
        let provider = Bretschneider::new(vec![0.0, 180.0], vec![-3.0, -3.0], vec![4000.0, 4000.0])
            .unwrap();
        let sample = provider.sample(15.0, 45.0, 2.0).unwrap();
        let (hs, tp) = bretschneider(5.0, 4000.0, 15.0);

        assert_relative_eq!(sample.hs, hs, max_relative = 1e-12);
        assert_relative_eq!(sample.tspec, tp / PEAK_TO_SPECTRAL, max_relative = 1e-12);
        assert_eq!(sample.direction, 45.0);

        // Water below the bed: dry
        let dry = provider.sample(15.0, 45.0, -4.0).unwrap();
        assert_eq!(dry.hs, 0.0);
        assert_eq!(dry.tspec, 0.0);
    }

    #[test]
    fn test_invalid_tables() {
        assert!(Bretschneider::new(vec![], vec![], vec![]).is_err());
        assert!(Bretschneider::new(vec![0.0], vec![1.0, 2.0], vec![1.0]).is_err());
        assert!(Bretschneider::new(vec![0.0, 360.0], vec![1.0, 2.0], vec![1.0, 1.0]).is_err());
        assert!(Bretschneider::new(vec![0.0], vec![1.0], vec![-1.0]).is_err());
    }

    #[test]
    fn test_serde_validates() {
        let json = r#"{"directions": [90.0, 0.0], "bed_levels": [-1.0, -2.0], "fetches": [10.0, 20.0]}"#;
        let provider: Bretschneider = serde_json::from_str(json).unwrap();
        assert_eq!(provider.directions(), &[0.0, 90.0]);

        let bad = r#"{"directions": [0.0], "bed_levels": [], "fetches": [1.0]}"#;
        assert!(serde_json::from_str::<Bretschneider>(bad).is_err());
    }
}
