//! Stepped grids on the load axis.
//!
//! Load grids are built by repeated stepping, which accumulates floating-point
//! drift (`0.1 + 0.2 != 0.3`). Every grid value is therefore rounded to a
//! number of decimals derived from the step size, so two grids built from the
//! same start and step always share bit-identical knots.

use crate::error::{MathError, MathResult};

/// Relative tolerance (in units of `step`) used to decide whether the end
/// point of a range is reached.
const END_TOLERANCE: f64 = 1e-9;

/// Number of decimals used to round grid values for a given step.
///
/// Computed as `ceil(-log10(step)) + 3`: a step of `0.05` gives 5 decimals,
/// a step of `1.0` gives 3.
#[must_use]
pub fn decimals_for_step(step: f64) -> i32 {
    (-step.log10()).ceil() as i32 + 3
}

/// Rounds `x` to `decimals` decimal places (negative values round to tens,
/// hundreds, ...).
#[must_use]
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (x * scale).round() / scale
}

/// Builds a grid `start, start + step, ...` up to `stop`.
///
/// With `inclusive` the end point is part of the grid when it falls on a
/// step (within tolerance); otherwise the range is half-open. All values are
/// rounded with [`decimals_for_step`].
///
/// # Errors
///
/// Returns an error if `step` is not strictly positive or any bound is not
/// finite.
///
/// # Example
///
/// ```rust
/// use fragility_math::grid::stepped_range;
///
/// let grid = stepped_range(1.0, 1.3, 0.1, true).unwrap();
/// assert_eq!(grid, vec![1.0, 1.1, 1.2, 1.3]);
/// ```
pub fn stepped_range(start: f64, stop: f64, step: f64, inclusive: bool) -> MathResult<Vec<f64>> {
    if step <= 0.0 || !step.is_finite() {
        return Err(MathError::invalid_input(format!(
            "grid step must be positive and finite, got {step}"
        )));
    }
    if !start.is_finite() || !stop.is_finite() {
        return Err(MathError::invalid_input(format!(
            "grid bounds must be finite, got [{start}, {stop}]"
        )));
    }
    if stop < start {
        return Ok(Vec::new());
    }

    let decimals = decimals_for_step(step);
    let span = (stop - start) / step;
    let whole = span.floor();
    let mut count = whole as usize;
    if span - whole > 1.0 - END_TOLERANCE {
        // stop sits on a step boundary from below
        count += 1;
    }
    let lands_on_stop = (span - count as f64).abs() < END_TOLERANCE;
    if inclusive || !lands_on_stop {
        count += 1;
    }

    Ok((0..count)
        .map(|i| round_to(start + i as f64 * step, decimals))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimals_for_step() {
        assert_eq!(decimals_for_step(0.05), 5);
        assert_eq!(decimals_for_step(0.1), 4);
        assert_eq!(decimals_for_step(1.0), 3);
        assert_eq!(decimals_for_step(0.01), 5);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.1 + 0.2, 5), 0.3);
        assert_eq!(round_to(1234.5678, -2), 1200.0);
    }

    #[test]
    fn test_inclusive_range() {
        let grid = stepped_range(10.0, 10.5, 0.1, true).unwrap();
        assert_eq!(grid, vec![10.0, 10.1, 10.2, 10.3, 10.4, 10.5]);
    }

    #[test]
    fn test_half_open_range() {
        let grid = stepped_range(10.0, 10.5, 0.1, false).unwrap();
        assert_eq!(grid, vec![10.0, 10.1, 10.2, 10.3, 10.4]);
    }

    #[test]
    fn test_range_not_on_step() {
        let grid = stepped_range(0.0, 0.25, 0.1, true).unwrap();
        assert_eq!(grid, vec![0.0, 0.1, 0.2]);
        let grid = stepped_range(0.0, 0.25, 0.1, false).unwrap();
        assert_eq!(grid, vec![0.0, 0.1, 0.2]);
    }

    #[test]
    fn test_degenerate_ranges() {
        assert_eq!(stepped_range(1.0, 1.0, 0.1, true).unwrap(), vec![1.0]);
        assert!(stepped_range(1.0, 1.0, 0.1, false).unwrap().is_empty());
        assert!(stepped_range(2.0, 1.0, 0.1, true).unwrap().is_empty());
        assert!(stepped_range(0.0, 1.0, 0.0, true).is_err());
        assert!(stepped_range(0.0, f64::NAN, 0.1, true).is_err());
    }
}
