//! Bracketing: locating the two knots around a query value.

use crate::error::{MathError, MathResult};

/// Replacement width for knots that coincide numerically.
pub const KNOT_EPSILON: f64 = 1e-10;

/// Full circle in degrees, the period of circular domains.
const FULL_CIRCLE: f64 = 360.0;

/// The two knots surrounding a query value and the position between them.
///
/// `fraction` is 0 at `lower` and 1 at `upper`. Outside the knot range the
/// fraction leaves [0, 1], which turns interpolation into linear
/// extrapolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Index of the lower knot.
    pub lower: usize,
    /// Index of the upper knot.
    pub upper: usize,
    /// Relative position of the query between the two knots.
    pub fraction: f64,
}

impl Bracket {
    /// Returns the bracket as a `(lower, upper, fraction)` tuple.
    #[must_use]
    pub fn as_tuple(&self) -> (usize, usize, f64) {
        (self.lower, self.upper, self.fraction)
    }

    /// Blends two values with this bracket's fraction.
    #[must_use]
    pub fn lerp(&self, lower_value: f64, upper_value: f64) -> f64 {
        lower_value + self.fraction * (upper_value - lower_value)
    }
}

/// Finds the knots of `xp` that bracket `x`.
///
/// On a linear domain (`wrap == false`) `xp` must be non-decreasing. The
/// lower index is clamped to `[0, len - 2]` so the upper neighbour always
/// exists; queries outside the knot range get a fraction outside [0, 1].
///
/// With `wrap == true` the knots are compass bearings on a 360° circle,
/// visited in the given order with the last knot connected back to the first.
/// A bracket may therefore cross the 0/360 seam.
///
/// # Errors
///
/// Returns an error if `xp` is empty.
///
/// # Example
///
/// ```rust
/// use fragility_math::interpolation::bracketing_indices;
///
/// let b = bracketing_indices(&[1.0, 2.0, 3.0], 2.5, false).unwrap();
/// assert_eq!(b.as_tuple(), (1, 2, 0.5));
///
/// let b = bracketing_indices(&[350.0, 10.0], 355.0, true).unwrap();
/// assert_eq!((b.lower, b.upper), (0, 1));
/// assert!((b.fraction - 0.25).abs() < 1e-12);
/// ```
pub fn bracketing_indices(xp: &[f64], x: f64, wrap: bool) -> MathResult<Bracket> {
    if xp.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    if xp.len() == 1 {
        return Ok(Bracket {
            lower: 0,
            upper: 0,
            fraction: 0.0,
        });
    }

    if wrap {
        Ok(circular_bracket(xp, x))
    } else {
        Ok(linear_bracket(xp, x))
    }
}

fn linear_bracket(xp: &[f64], x: f64) -> Bracket {
    let n = xp.len();
    // Equivalent to a right-sided search sorted lookup minus one.
    let insertion = xp.partition_point(|&knot| knot <= x);
    let lower = insertion.saturating_sub(1).min(n - 2);
    let upper = lower + 1;

    let mut width = xp[upper] - xp[lower];
    if width.abs() < KNOT_EPSILON {
        width = KNOT_EPSILON;
    }

    Bracket {
        lower,
        upper,
        fraction: (x - xp[lower]) / width,
    }
}

fn circular_bracket(xp: &[f64], x: f64) -> Bracket {
    let n = xp.len();
    for lower in 0..n {
        let upper = (lower + 1) % n;
        let arc = (xp[upper] - xp[lower]).rem_euclid(FULL_CIRCLE);
        let offset = (x - xp[lower]).rem_euclid(FULL_CIRCLE);

        if arc < KNOT_EPSILON {
            if offset < KNOT_EPSILON {
                return Bracket {
                    lower,
                    upper,
                    fraction: 0.0,
                };
            }
            continue;
        }

        if offset <= arc {
            return Bracket {
                lower,
                upper,
                fraction: offset / arc,
            };
        }
    }

    // Every knot coincides; the query is away from all of them.
    Bracket {
        lower: 0,
        upper: 0,
        fraction: 0.0,
    }
}
