//! Common load grids for aligning several curves.

use fragility_math::grid::stepped_range;

use crate::error::{CurveError, CurveResult};

/// Builds the load grid shared by a set of curves.
///
/// The grid runs from the smallest minimum load over all `ranges` to the
/// largest maximum load plus `extend_past_max`, in steps of `step`. Grid
/// values are rounded to `ceil(-log10(step)) + 3` decimals so grids built for
/// different curve sets line up exactly.
///
/// # Errors
///
/// Returns an error if `ranges` is empty, the step is not positive, or the
/// extension is negative.
///
/// # Example
///
/// ```rust
/// use fragility_curves::grid::common_grid;
///
/// let grid = common_grid([(1.0, 1.2), (1.1, 1.3)], 0.1, 0.1).unwrap();
/// assert_eq!(grid, vec![1.0, 1.1, 1.2, 1.3, 1.4]);
/// ```
pub fn common_grid(
    ranges: impl IntoIterator<Item = (f64, f64)>,
    step: f64,
    extend_past_max: f64,
) -> CurveResult<Vec<f64>> {
    if extend_past_max.is_nan() || extend_past_max < 0.0 {
        return Err(CurveError::invalid_value(format!(
            "grid extension must be non-negative, got {extend_past_max}"
        )));
    }

    let mut bounds: Option<(f64, f64)> = None;
    for (lo, hi) in ranges {
        bounds = Some(match bounds {
            None => (lo, hi),
            Some((min, max)) => (min.min(lo), max.max(hi)),
        });
    }
    let (min, max) = bounds.ok_or_else(|| CurveError::insufficient_points(1, 0))?;

    Ok(stepped_range(min, max + extend_past_max, step, true)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_of_ranges() {
        let grid = common_grid([(2.0, 2.5), (1.5, 2.0)], 0.25, 0.0).unwrap();
        assert_eq!(grid, vec![1.5, 1.75, 2.0, 2.25, 2.5]);
    }

    #[test]
    fn test_rounding_suppresses_drift() {
        let grid = common_grid([(0.0, 1.0)], 0.1, 0.0).unwrap();
        assert_eq!(grid[3], 0.3);
        assert_eq!(grid[7], 0.7);
        assert_eq!(grid.len(), 11);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(common_grid(std::iter::empty(), 0.1, 0.0).is_err());
        assert!(common_grid([(0.0, 1.0)], 0.0, 0.0).is_err());
        assert!(common_grid([(0.0, 1.0)], 0.1, -1.0).is_err());
    }
}
