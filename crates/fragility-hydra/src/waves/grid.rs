//! Precomputed wave tables over windspeed × direction × waterlevel.

use fragility_math::interpolation::{bracketing_indices, circular_lerp, Bracket};
use ndarray::Array3;

use super::{WaveConditionProvider, WaveConditionSample};
use crate::error::{HydraError, HydraResult};

/// Wave tables indexed `[windspeed, direction, waterlevel]`.
///
/// Lookup brackets windspeed and waterlevel linearly (extrapolating outside
/// the axes) and direction circularly. Wave heights and periods blend
/// linearly, wave directions along the shorter arc. No lower limit is
/// applied: extrapolated heights may come out negative and are left to the
/// caller.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveGrid {
    windspeeds: Vec<f64>,
    directions: Vec<f64>,
    waterlevels: Vec<f64>,
    hs: Array3<f64>,
    tspec: Array3<f64>,
    wave_direction: Array3<f64>,
}

impl WaveGrid {
    /// Creates a grid from its axes and the three tables.
    ///
    /// # Errors
    ///
    /// Returns an error if an axis is empty or not strictly increasing, a
    /// table shape does not match the axes, or a table holds NaN.
    pub fn new(
        windspeeds: Vec<f64>,
        directions: Vec<f64>,
        waterlevels: Vec<f64>,
        hs: Array3<f64>,
        tspec: Array3<f64>,
        wave_direction: Array3<f64>,
    ) -> HydraResult<Self> {
        check_axis("windspeeds", &windspeeds)?;
        check_axis("directions", &directions)?;
        check_axis("waterlevels", &waterlevels)?;
        if directions.iter().any(|d| !(0.0..360.0).contains(d)) {
            return Err(HydraError::input_validation(
                "directions",
                "must lie in [0, 360)",
            ));
        }

        let shape = [windspeeds.len(), directions.len(), waterlevels.len()];
        for (name, table) in [
            ("hs", &hs),
            ("tspec", &tspec),
            ("wave_direction", &wave_direction),
        ] {
            if table.shape() != shape {
                return Err(HydraError::input_validation(
                    name,
                    format!("shape {:?} does not match axes {shape:?}", table.shape()),
                ));
            }
            if table.iter().any(|v| v.is_nan()) {
                return Err(HydraError::input_validation(name, "contains NaN"));
            }
        }

        Ok(Self {
            windspeeds,
            directions,
            waterlevels,
            hs,
            tspec,
            wave_direction,
        })
    }

    /// Windspeed axis.
    #[must_use]
    pub fn windspeeds(&self) -> &[f64] {
        &self.windspeeds
    }

    /// Direction axis.
    #[must_use]
    pub fn directions(&self) -> &[f64] {
        &self.directions
    }

    /// Waterlevel axis.
    #[must_use]
    pub fn waterlevels(&self) -> &[f64] {
        &self.waterlevels
    }

    /// Significant wave height table.
    #[must_use]
    pub fn hs(&self) -> &Array3<f64> {
        &self.hs
    }

    /// Spectral period table.
    #[must_use]
    pub fn tspec(&self) -> &Array3<f64> {
        &self.tspec
    }

    /// Wave direction table.
    #[must_use]
    pub fn wave_direction(&self) -> &Array3<f64> {
        &self.wave_direction
    }
}

fn check_axis(name: &str, axis: &[f64]) -> HydraResult<()> {
    if axis.is_empty() {
        return Err(HydraError::input_validation(name, "axis is empty"));
    }
    if axis.iter().any(|v| !v.is_finite()) {
        return Err(HydraError::input_validation(name, "values must be finite"));
    }
    if axis.windows(2).any(|w| w[0] >= w[1]) {
        return Err(HydraError::input_validation(
            name,
            "values must be strictly increasing",
        ));
    }
    Ok(())
}

/// Brackets of one query on the three axes.
struct Cell {
    windspeed: Bracket,
    direction: Bracket,
    waterlevel: Bracket,
}

impl Cell {
    /// Blends `table` over windspeed and waterlevel at direction index `d`.
    fn planar(&self, table: &Array3<f64>, d: usize, blend: fn(&Bracket, f64, f64) -> f64) -> f64 {
        let (wl, wu) = (self.waterlevel.lower, self.waterlevel.upper);
        let at_speed = |s: usize| blend(&self.waterlevel, table[[s, d, wl]], table[[s, d, wu]]);
        blend(
            &self.windspeed,
            at_speed(self.windspeed.lower),
            at_speed(self.windspeed.upper),
        )
    }

    fn value(&self, table: &Array3<f64>, blend: fn(&Bracket, f64, f64) -> f64) -> f64 {
        blend(
            &self.direction,
            self.planar(table, self.direction.lower, blend),
            self.planar(table, self.direction.upper, blend),
        )
    }
}

fn linear(bracket: &Bracket, a: f64, b: f64) -> f64 {
    bracket.lerp(a, b)
}

fn circular(bracket: &Bracket, a: f64, b: f64) -> f64 {
    circular_lerp(a, b, bracket.fraction)
}

impl WaveConditionProvider for WaveGrid {
    fn sample(
        &self,
        windspeed: f64,
        direction: f64,
        waterlevel: f64,
    ) -> HydraResult<WaveConditionSample> {
        let cell = Cell {
            windspeed: bracketing_indices(&self.windspeeds, windspeed, false)?,
            direction: bracketing_indices(&self.directions, direction, true)?,
            waterlevel: bracketing_indices(&self.waterlevels, waterlevel, false)?,
        };

        Ok(WaveConditionSample {
            hs: cell.value(&self.hs, linear),
            tspec: cell.value(&self.tspec, linear),
            direction: cell.value(&self.wave_direction, circular),
        })
    }
}
