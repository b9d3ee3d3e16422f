//! Raw wave-data rows as stored in the hydraulic database.
//!
//! Each row holds one quantity at one `(windspeed, winddir, waterlevel)`
//! coordinate. Assembling a [`WaveGrid`] filters the rows on closing
//! situation, reduces duplicates per quantity and checks every grid cell is
//! filled.

use std::collections::BTreeMap;

use fragility_math::interpolation::normalize_bearing;
use ndarray::Array3;
use serde::{Deserialize, Serialize};

use super::grid::WaveGrid;
use crate::closing::ClosingSituation;
use crate::error::{HydraError, HydraResult};

/// Quantity stored in a wave-data row, by database type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WaveQuantity {
    /// Significant wave height (code 2).
    Hs,
    /// Spectral wave period (code 6).
    Tspec,
    /// Wave direction (code 7).
    Direction,
}

impl WaveQuantity {
    /// All quantities a grid needs.
    pub const ALL: [Self; 3] = [Self::Hs, Self::Tspec, Self::Direction];

    /// Database type code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Hs => 2,
            Self::Tspec => 6,
            Self::Direction => 7,
        }
    }
}

impl TryFrom<u8> for WaveQuantity {
    type Error = HydraError;

    fn try_from(code: u8) -> HydraResult<Self> {
        match code {
            2 => Ok(Self::Hs),
            6 => Ok(Self::Tspec),
            7 => Ok(Self::Direction),
            other => Err(HydraError::input_validation(
                "waveval_type",
                format!("unknown type code {other}, expected 2, 6 or 7"),
            )),
        }
    }
}

impl From<WaveQuantity> for u8 {
    fn from(quantity: WaveQuantity) -> Self {
        quantity.code()
    }
}

/// Reduction of several rows at one coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Arithmetic mean (circular mean for directions).
    Mean,
    /// Smallest value.
    Min,
    /// Largest value.
    Max,
    /// First row in input order.
    First,
}

impl Aggregation {
    fn apply(self, quantity: WaveQuantity, values: &[f64]) -> f64 {
        match self {
            Self::First => values[0],
            Self::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Self::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Self::Mean if quantity == WaveQuantity::Direction => {
                let (sin, cos) = values.iter().fold((0.0, 0.0), |(s, c), d| {
                    let rad = d.to_radians();
                    (s + rad.sin(), c + rad.cos())
                });
                normalize_bearing(sin.atan2(cos).to_degrees())
            }
            Self::Mean => values.iter().sum::<f64>() / values.len() as f64,
        }
    }
}

/// One row of the wave-data table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveDataRow {
    /// Stored quantity.
    pub waveval_type: WaveQuantity,
    /// Windspeed (m/s).
    pub windspeed: f64,
    /// Wind direction (degrees).
    pub winddir: f64,
    /// Waterlevel (m).
    pub waterlevel: f64,
    /// The stored value.
    pub waveval: f64,
    /// Closing situation; rows without one apply to every closing situation.
    #[serde(default)]
    pub closing_situation: Option<ClosingSituation>,
}

/// A raw wave-data table with aggregation policies per quantity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawWaveData {
    rows: Vec<WaveDataRow>,
    #[serde(default)]
    aggregation: BTreeMap<WaveQuantity, Aggregation>,
}

impl RawWaveData {
    /// Creates a table without aggregation policies.
    #[must_use]
    pub fn new(rows: Vec<WaveDataRow>) -> Self {
        Self {
            rows,
            aggregation: BTreeMap::new(),
        }
    }

    /// Sets the aggregation used for duplicate rows of `quantity`.
    #[must_use]
    pub fn with_aggregation(mut self, quantity: WaveQuantity, aggregation: Aggregation) -> Self {
        self.aggregation.insert(quantity, aggregation);
        self
    }

    /// Returns the rows.
    #[must_use]
    pub fn rows(&self) -> &[WaveDataRow] {
        &self.rows
    }

    /// Assembles the rows for `closing_situation` into a [`WaveGrid`].
    ///
    /// With `closing_situation == None` all rows are used. Grid axes are the
    /// distinct coordinates over all quantities.
    ///
    /// # Errors
    ///
    /// Returns an input validation error if a quantity has no rows, a
    /// quantity with duplicate rows has no aggregation, or a grid cell is
    /// empty.
    pub fn to_grid(&self, closing_situation: Option<ClosingSituation>) -> HydraResult<WaveGrid> {
        let rows: Vec<&WaveDataRow> = self
            .rows
            .iter()
            .filter(|row| match (closing_situation, row.closing_situation) {
                (Some(wanted), Some(have)) => wanted == have,
                _ => true,
            })
            .collect();

        if let Some(row) = rows.iter().find(|row| {
            !(row.windspeed.is_finite() && row.winddir.is_finite() && row.waterlevel.is_finite())
        }) {
            return Err(HydraError::input_validation(
                "wave data",
                format!("non-finite coordinate in row {row:?}"),
            ));
        }

        let windspeeds = distinct(rows.iter().map(|r| r.windspeed));
        let directions = distinct(rows.iter().map(|r| normalize_bearing(r.winddir)));
        let waterlevels = distinct(rows.iter().map(|r| r.waterlevel));
        let shape = (windspeeds.len(), directions.len(), waterlevels.len());

        let mut tables = Vec::with_capacity(WaveQuantity::ALL.len());
        for quantity in WaveQuantity::ALL {
            let mut cells: Array3<Vec<f64>> = Array3::from_elem(shape, Vec::new());
            let mut any = false;
            for row in rows.iter().filter(|r| r.waveval_type == quantity) {
                let index = [
                    position(&windspeeds, row.windspeed),
                    position(&directions, normalize_bearing(row.winddir)),
                    position(&waterlevels, row.waterlevel),
                ];
                cells[index].push(row.waveval);
                any = true;
            }
            if !any {
                return Err(HydraError::input_validation(
                    "wave data",
                    format!(
                        "no rows of type {} for closing situation {}",
                        quantity.code(),
                        describe(closing_situation)
                    ),
                ));
            }

            let aggregation = self.aggregation.get(&quantity).copied();
            let mut table = Array3::<f64>::zeros(shape);
            for ((index, values), slot) in cells.indexed_iter().zip(table.iter_mut()) {
                *slot = match (values.len(), aggregation) {
                    (0, _) => {
                        return Err(HydraError::input_validation(
                            "wave data",
                            format!(
                                "type {} is missing at windspeed {}, direction {}, waterlevel {}",
                                quantity.code(),
                                windspeeds[index.0],
                                directions[index.1],
                                waterlevels[index.2]
                            ),
                        ))
                    }
                    (1, _) => values[0],
                    (_, Some(aggregation)) => aggregation.apply(quantity, values),
                    (count, None) => {
                        return Err(HydraError::input_validation(
                            "wave data",
                            format!(
                                "{count} rows of type {} at one coordinate and no aggregation configured",
                                quantity.code()
                            ),
                        ))
                    }
                };
            }
            tables.push(table);
        }

        tracing::debug!(
            rows = rows.len(),
            windspeeds = windspeeds.len(),
            directions = directions.len(),
            waterlevels = waterlevels.len(),
            "Assembled wave grid from raw data"
        );

        let mut tables = tables.into_iter();
        let (Some(hs), Some(tspec), Some(wave_direction)) =
            (tables.next(), tables.next(), tables.next())
        else {
            return Err(HydraError::input_validation("wave data", "incomplete tables"));
        };
        WaveGrid::new(windspeeds, directions, waterlevels, hs, tspec, wave_direction)
    }
}

fn distinct(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}

/// Index of `value` in a sorted axis built from the same rows.
fn position(axis: &[f64], value: f64) -> usize {
    axis.partition_point(|&v| v < value)
}

fn describe(closing_situation: Option<ClosingSituation>) -> String {
    closing_situation.map_or_else(|| "(any)".to_string(), |cs| cs.to_string())
}
