//! Dike profiles and the overtopping physics collaborator.
//!
//! [`ProfileGeometry`] is the read-only description of a cross-section.
//! The discharge computation itself lives behind the [`Profile`] trait so
//! any overtopping model (EurOtop, a lookup table, a test double) can be
//! plugged into the builders.

use serde::{Deserialize, Serialize};

use crate::error::{MechanismError, MechanismResult};

/// Overtopping physics for one dike profile.
///
/// Discharges are in m³/s per metre of dike.
pub trait Profile: Send + Sync {
    /// Crest level of the profile (m).
    fn crest_level(&self) -> f64;

    /// Overtopping discharge for a water level and wave conditions.
    fn calculate_overtopping(
        &self,
        waterlevel: f64,
        hs: f64,
        tspec: f64,
        direction: f64,
    ) -> MechanismResult<f64>;

    /// Discharge of the bare profile, without foreland or breakwater.
    ///
    /// Used to rank wind directions. Defaults to
    /// [`calculate_overtopping`](Self::calculate_overtopping).
    fn baseline_overtopping(
        &self,
        waterlevel: f64,
        hs: f64,
        tspec: f64,
        direction: f64,
    ) -> MechanismResult<f64> {
        self.calculate_overtopping(waterlevel, hs, tspec, direction)
    }
}

/// Kind of an outer-slope segment, by database code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SegmentKind {
    /// Sloping segment (code 1).
    Slope,
    /// Berm (code 2).
    Berm,
}

impl TryFrom<u8> for SegmentKind {
    type Error = MechanismError;

    fn try_from(code: u8) -> MechanismResult<Self> {
        match code {
            1 => Ok(Self::Slope),
            2 => Ok(Self::Berm),
            other => Err(MechanismError::input_validation(
                "segment type",
                format!("unknown code {other}, expected 1 (slope) or 2 (berm)"),
            )),
        }
    }
}

impl From<SegmentKind> for u8 {
    fn from(kind: SegmentKind) -> Self {
        match kind {
            SegmentKind::Slope => 1,
            SegmentKind::Berm => 2,
        }
    }
}

/// A point of the outer slope or foreland (m).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    /// Horizontal position, increasing landwards.
    pub x: f64,
    /// Level.
    pub y: f64,
}

impl ProfilePoint {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Outer-slope segment between two consecutive profile points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlopeSegment {
    /// Slope or berm.
    #[serde(rename = "segment_type")]
    pub kind: SegmentKind,
    /// Roughness reduction factor in (0, 1].
    #[serde(default = "default_roughness")]
    pub roughness: f64,
}

fn default_roughness() -> f64 {
    1.0
}

/// Breakwater type in front of the dike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakwaterKind {
    /// Caisson.
    Caisson,
    /// Vertical wall.
    VerticalWall,
    /// Rubble-mound dam.
    RubbleMound,
}

/// Breakwater in front of the dike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakwater {
    /// Breakwater type.
    pub kind: BreakwaterKind,
    /// Crest level of the breakwater (m).
    pub level: f64,
}

/// Cross-section of a dike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileGeometry {
    /// Dike normal (degrees, nautical).
    pub orientation: f64,
    /// Crest level (m).
    pub crest_level: f64,
    /// Outer-slope points from toe to crest.
    pub points: Vec<ProfilePoint>,
    /// One segment per pair of consecutive points.
    pub segments: Vec<SlopeSegment>,
    /// Foreland points seaward of the toe.
    #[serde(default)]
    pub foreland: Vec<ProfilePoint>,
    /// Optional breakwater.
    #[serde(default)]
    pub breakwater: Option<Breakwater>,
}

impl ProfileGeometry {
    /// Checks the geometry.
    ///
    /// # Errors
    ///
    /// Returns an input validation error if values are not finite, fewer
    /// than two slope points are given, x does not strictly increase, the
    /// segment count does not match the points, a roughness lies outside
    /// (0, 1] or the orientation lies outside [0, 360).
    pub fn validate(&self) -> MechanismResult<()> {
        if !self.crest_level.is_finite() {
            return Err(MechanismError::input_validation(
                "crest_level",
                "must be finite",
            ));
        }
        if !(0.0..360.0).contains(&self.orientation) {
            return Err(MechanismError::input_validation(
                "orientation",
                format!("must lie in [0, 360), got {}", self.orientation),
            ));
        }
        if self.points.len() < 2 {
            return Err(MechanismError::input_validation(
                "points",
                format!("need at least 2 slope points, got {}", self.points.len()),
            ));
        }
        check_points("points", &self.points)?;
        check_points("foreland", &self.foreland)?;

        if self.segments.len() + 1 != self.points.len() {
            return Err(MechanismError::input_validation(
                "segments",
                format!(
                    "{} points need {} segments, got {}",
                    self.points.len(),
                    self.points.len() - 1,
                    self.segments.len()
                ),
            ));
        }
        if let Some(segment) = self
            .segments
            .iter()
            .find(|s| s.roughness.is_nan() || s.roughness <= 0.0 || s.roughness > 1.0)
        {
            return Err(MechanismError::input_validation(
                "segments",
                format!("roughness must lie in (0, 1], got {}", segment.roughness),
            ));
        }
        if let Some(breakwater) = &self.breakwater {
            if !breakwater.level.is_finite() {
                return Err(MechanismError::input_validation(
                    "breakwater",
                    "level must be finite",
                ));
            }
        }
        Ok(())
    }

    /// Level of the dike toe.
    #[must_use]
    pub fn toe_level(&self) -> Option<f64> {
        self.points.first().map(|p| p.y)
    }

    /// Copy without foreland and breakwater.
    #[must_use]
    pub fn without_foreland(&self) -> Self {
        Self {
            foreland: Vec::new(),
            breakwater: None,
            ..self.clone()
        }
    }

    /// Horizontal length weighted average slope `dy / dx` of the segments
    /// of `kind`.
    #[must_use]
    pub fn mean_gradient(&self, kind: SegmentKind) -> Option<f64> {
        let (dx, dy) = self
            .points
            .windows(2)
            .zip(&self.segments)
            .filter(|(_, segment)| segment.kind == kind)
            .fold((0.0, 0.0), |(dx, dy), (pair, _)| {
                (dx + pair[1].x - pair[0].x, dy + pair[1].y - pair[0].y)
            });
        (dx > 0.0).then(|| dy / dx)
    }
}

fn check_points(field: &str, points: &[ProfilePoint]) -> MechanismResult<()> {
    if points.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return Err(MechanismError::input_validation(field, "values must be finite"));
    }
    if points.windows(2).any(|w| w[1].x <= w[0].x) {
        return Err(MechanismError::input_validation(
            field,
            "x must be strictly increasing",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn geometry() -> ProfileGeometry {
        ProfileGeometry {
            orientation: 225.0,
            crest_level: 6.0,
            points: vec![
                ProfilePoint::new(0.0, 0.0),
                ProfilePoint::new(12.0, 3.0),
                ProfilePoint::new(20.0, 3.2),
                ProfilePoint::new(32.0, 6.0),
            ],
            segments: vec![
                SlopeSegment {
                    kind: SegmentKind::Slope,
                    roughness: 1.0,
                },
                SlopeSegment {
                    kind: SegmentKind::Berm,
                    roughness: 0.9,
                },
                SlopeSegment {
                    kind: SegmentKind::Slope,
                    roughness: 1.0,
                },
            ],
            foreland: vec![ProfilePoint::new(-50.0, -1.0), ProfilePoint::new(-10.0, -0.5)],
            breakwater: Some(Breakwater {
                kind: BreakwaterKind::RubbleMound,
                level: 1.0,
            }),
        }
    }

    #[test]
    fn test_valid_geometry() {
        let g = geometry();
        assert!(g.validate().is_ok());
        assert_eq!(g.toe_level(), Some(0.0));
        assert_relative_eq!(g.mean_gradient(SegmentKind::Slope).unwrap(), 5.8 / 24.0, max_relative = 1e-12);
        assert_relative_eq!(g.mean_gradient(SegmentKind::Berm).unwrap(), 0.2 / 8.0, max_relative = 1e-12);
    }

    #[test]
    fn test_without_foreland() {
        let bare = geometry().without_foreland();
        assert!(bare.foreland.is_empty());
        assert!(bare.breakwater.is_none());
        assert_eq!(bare.points, geometry().points);
    }

    #[test]
    fn test_invalid_geometry() {
        let mut g = geometry();
        g.points[2].x = 5.0;
        assert!(g.validate().is_err());

        let mut g = geometry();
        g.segments.pop();
        assert!(g.validate().is_err());

        let mut g = geometry();
        g.segments[1].roughness = 0.0;
        assert!(g.validate().is_err());

        let mut g = geometry();
        g.orientation = 360.0;
        assert!(g.validate().is_err());

        let mut g = geometry();
        g.crest_level = f64::NAN;
        assert!(g.validate().is_err());
    }

    #[test]
    fn test_segment_codes() {
        let json = r#"{"segment_type": 2}"#;
        let segment: SlopeSegment = serde_json::from_str(json).unwrap();
        assert_eq!(segment.kind, SegmentKind::Berm);
        assert_eq!(segment.roughness, 1.0);

        assert!(serde_json::from_str::<SlopeSegment>(r#"{"segment_type": 3}"#).is_err());
        assert_eq!(serde_json::to_value(segment).unwrap()["segment_type"], 2);
    }
}
