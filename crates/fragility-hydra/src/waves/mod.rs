//! Wave conditions at the toe of a flood defence.
//!
//! A [`WaveConditionProvider`] turns a wind speed, a wind direction and a
//! water level into a significant wave height `Hs`, a spectral period
//! `Tspec` and a wave direction. Three sources exist:
//!
//! - [`Bretschneider`]: empirical shallow-water growth formulas from the
//!   bed level and fetch per direction
//! - [`WaveGrid`]: lookup in precomputed tables over
//!   windspeed × direction × waterlevel
//! - [`RawWaveData`]: a flat table of database rows assembled into a
//!   [`WaveGrid`]
//!
//! [`WaveConditionSource`] selects one of them explicitly.

mod bretschneider;
mod grid;
mod raw;

pub use bretschneider::{bretschneider, Bretschneider, GRAVITY, PEAK_TO_SPECTRAL};
pub use grid::WaveGrid;
pub use raw::{Aggregation, RawWaveData, WaveDataRow, WaveQuantity};

use crate::closing::ClosingSituation;
use crate::error::{HydraError, HydraResult};

/// Wave conditions for a single query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveConditionSample {
    /// Significant wave height (m).
    pub hs: f64,
    /// Spectral wave period Tm-1,0 (s).
    pub tspec: f64,
    /// Wave direction (degrees, nautical).
    pub direction: f64,
}

/// Wave conditions for a series of queries, as parallel columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveConditions {
    /// Significant wave heights (m).
    pub hs: Vec<f64>,
    /// Spectral wave periods (s).
    pub tspec: Vec<f64>,
    /// Wave directions (degrees).
    pub direction: Vec<f64>,
}

impl WaveConditions {
    /// Creates empty columns with room for `capacity` samples.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hs: Vec::with_capacity(capacity),
            tspec: Vec::with_capacity(capacity),
            direction: Vec::with_capacity(capacity),
        }
    }

    /// Appends a sample.
    pub fn push(&mut self, sample: WaveConditionSample) {
        self.hs.push(sample.hs);
        self.tspec.push(sample.tspec);
        self.direction.push(sample.direction);
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hs.len()
    }

    /// Returns true if there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hs.is_empty()
    }

    /// Returns the sample at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<WaveConditionSample> {
        Some(WaveConditionSample {
            hs: *self.hs.get(index)?,
            tspec: *self.tspec.get(index)?,
            direction: *self.direction.get(index)?,
        })
    }

    /// Iterates over the samples.
    pub fn iter(&self) -> impl Iterator<Item = WaveConditionSample> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

impl FromIterator<WaveConditionSample> for WaveConditions {
    fn from_iter<I: IntoIterator<Item = WaveConditionSample>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut conditions = Self::with_capacity(iter.size_hint().0);
        for sample in iter {
            conditions.push(sample);
        }
        conditions
    }
}

/// Source of wave conditions.
///
/// Implementors provide [`sample`](Self::sample); the column variants are
/// derived from it.
pub trait WaveConditionProvider {
    /// Wave conditions for one windspeed, direction and waterlevel.
    fn sample(
        &self,
        windspeed: f64,
        direction: f64,
        waterlevel: f64,
    ) -> HydraResult<WaveConditionSample>;

    /// Wave conditions for several directions at one waterlevel.
    fn conditions_for_directions(
        &self,
        windspeed: f64,
        directions: &[f64],
        waterlevel: f64,
    ) -> HydraResult<WaveConditions> {
        check_finite("windspeed", windspeed)?;
        check_finite("waterlevel", waterlevel)?;
        directions
            .iter()
            .map(|&direction| {
                check_finite("direction", direction)?;
                self.sample(windspeed, direction, waterlevel)
            })
            .collect::<HydraResult<Vec<_>>>()
            .map(|samples| samples.into_iter().collect())
    }

    /// Wave conditions for several waterlevels at one direction.
    fn conditions_for_levels(
        &self,
        windspeed: f64,
        direction: f64,
        waterlevels: &[f64],
    ) -> HydraResult<WaveConditions> {
        check_finite("windspeed", windspeed)?;
        check_finite("direction", direction)?;
        waterlevels
            .iter()
            .map(|&waterlevel| {
                check_finite("waterlevel", waterlevel)?;
                self.sample(windspeed, direction, waterlevel)
            })
            .collect::<HydraResult<Vec<_>>>()
            .map(|samples| samples.into_iter().collect())
    }
}

fn check_finite(field: &str, value: f64) -> HydraResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(HydraError::input_validation(
            field,
            format!("must be finite, got {value}"),
        ))
    }
}

/// The wave-condition source of a mechanism builder.
#[derive(Debug, Clone)]
pub enum WaveConditionSource {
    /// Bretschneider formulas from bed level and fetch.
    Empirical(Bretschneider),
    /// Lookup in precomputed tables.
    PrecomputedGrid(WaveGrid),
    /// Tables assembled from raw database rows for one closing situation.
    RawWaveData {
        /// The closing situation the rows were filtered on.
        closing_situation: Option<ClosingSituation>,
        /// The assembled tables.
        grid: WaveGrid,
    },
}

impl WaveConditionSource {
    /// Assembles raw rows into a source for `closing_situation`.
    pub fn from_raw(
        data: &RawWaveData,
        closing_situation: Option<ClosingSituation>,
    ) -> HydraResult<Self> {
        Ok(Self::RawWaveData {
            closing_situation,
            grid: data.to_grid(closing_situation)?,
        })
    }

    /// Short name of the variant, for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empirical(_) => "empirical",
            Self::PrecomputedGrid(_) => "precomputed_grid",
            Self::RawWaveData { .. } => "raw_wave_data",
        }
    }
}

impl WaveConditionProvider for WaveConditionSource {
    fn sample(
        &self,
        windspeed: f64,
        direction: f64,
        waterlevel: f64,
    ) -> HydraResult<WaveConditionSample> {
        match self {
            Self::Empirical(formula) => formula.sample(windspeed, direction, waterlevel),
            Self::PrecomputedGrid(grid) | Self::RawWaveData { grid, .. } => {
                grid.sample(windspeed, direction, waterlevel)
            }
        }
    }
}
