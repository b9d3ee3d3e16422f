//! Reliability updating with an observed (survived) load.
//!
//! A defence that survived a water level `h_u` is known not to fail below
//! that level. With full trust the curve becomes the conditional
//! distribution given survival:
//!
//! ```text
//! F'(h) = 0                              h <  h_u
//! F'(h) = (F(h) - F(h_u)) / (1 - F(h_u)) h >= h_u
//! ```
//!
//! A trust factor `t` in [0, 1] blends the prior and the conditional curve:
//! `(1 - t) · F + t · F'`.

use crate::curve::FragilityCurve;
use crate::error::{CurveError, CurveResult};

impl FragilityCurve {
    /// Updates the curve with the knowledge that `update_level` was survived.
    ///
    /// Below the level the probability shrinks towards 0 in proportion to
    /// `trust_factor`; from the level upwards the remaining probability is
    /// renormalized by `1 - F(update_level)`. A knot is inserted at the update
    /// level so the kink is represented exactly.
    ///
    /// A trust factor of 0 returns an identical curve. When no point lies
    /// below `update_level` a warning is logged and the curve is returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// - `trust_factor` outside [0, 1] or a non-finite `update_level`
    /// - [`CurveError::DegenerateUpdate`] when `F(update_level)` is so close to
    ///   1 that the renormalization would divide by (nearly) zero
    ///
    /// # Example
    ///
    /// ```rust
    /// use fragility_curves::FragilityCurve;
    ///
    /// let prior = FragilityCurve::new(vec![1.0, 2.0, 3.0], vec![0.1, 0.2, 1.0]).unwrap();
    /// let updated = prior.reliability_update(2.0, 1.0).unwrap();
    ///
    /// assert_eq!(updated.probabilities()[0], 0.0);
    /// assert_eq!(updated.probabilities()[2], 1.0);
    /// ```
    pub fn reliability_update(&self, update_level: f64, trust_factor: f64) -> CurveResult<Self> {
        if !(0.0..=1.0).contains(&trust_factor) {
            return Err(CurveError::invalid_value(format!(
                "trust factor must lie in [0, 1], got {trust_factor}"
            )));
        }
        if !update_level.is_finite() {
            return Err(CurveError::invalid_value(format!(
                "update level must be finite, got {update_level}"
            )));
        }
        if trust_factor == 0.0 {
            return Ok(self.clone());
        }
        if !self.loads().iter().any(|&load| load < update_level) {
            tracing::warn!(
                update_level,
                min_load = self.min_load(),
                "No curve points below the update level; reliability update skipped"
            );
            return Ok(self.clone());
        }

        // On a knot take the stored value (the upper one of a jump) so the
        // point at the level itself maps to exactly zero.
        let survived = match self.loads().iter().rposition(|&load| load == update_level) {
            Some(i) => self.probabilities()[i],
            None => self.probability_at(update_level)?,
        };
        let remaining = 1.0 - survived;
        if remaining <= f64::EPSILON {
            return Err(CurveError::DegenerateUpdate {
                update_level,
                probability: survived,
            });
        }

        let mut loads = self.loads().to_vec();
        let mut probabilities = self.probabilities().to_vec();
        if !loads.contains(&update_level) {
            loads.push(update_level);
            probabilities.push(survived);
        }

        let prior_weight = 1.0 - trust_factor;
        let updated = loads
            .iter()
            .zip(&probabilities)
            .map(|(&load, &p)| {
                if load < update_level {
                    prior_weight * p
                } else {
                    prior_weight * p + trust_factor * (p - survived).max(0.0) / remaining
                }
            })
            .collect();

        tracing::debug!(
            update_level,
            trust_factor,
            survived_probability = survived,
            "Applied reliability update"
        );

        Self::with_settings(loads, updated, *self.settings())
    }
}

#[cfg(test)]
mod tests {
    use crate::curve::FragilityCurve;
    use crate::error::CurveError;
    use approx::assert_relative_eq;

    fn prior() -> FragilityCurve {
        FragilityCurve::new(
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![0.01, 0.05, 0.2, 0.6, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn test_zero_trust_is_noop() {
        let curve = prior();
        assert_eq!(curve.reliability_update(3.0, 0.0).unwrap(), curve);
    }

    #[test]
    fn test_nothing_below_level_leaves_curve_unchanged() {
        let curve = prior();
        assert_eq!(curve.reliability_update(1.0, 1.0).unwrap(), curve);
        assert_eq!(curve.reliability_update(0.5, 0.7).unwrap(), curve);
    }

    #[test]
    fn test_full_trust_conditions_on_survival() {
        let curve = prior();
        let updated = curve.reliability_update(3.0, 1.0).unwrap();

        assert_eq!(updated.loads(), curve.loads());
        assert_eq!(updated.probabilities()[0], 0.0);
        assert_eq!(updated.probabilities()[1], 0.0);
        assert_eq!(updated.probabilities()[2], 0.0);
        assert_relative_eq!(updated.probabilities()[3], (0.6 - 0.2) / 0.8, epsilon = 1e-12);
        assert_relative_eq!(updated.probabilities()[4], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_partial_trust_blends() {
        let curve = prior();
        let updated = curve.reliability_update(3.0, 0.5).unwrap();

        assert_relative_eq!(updated.probabilities()[1], 0.5 * 0.05, epsilon = 1e-12);
        assert_relative_eq!(
            updated.probabilities()[3],
            0.5 * 0.6 + 0.5 * (0.6 - 0.2) / 0.8,
            epsilon = 1e-12
        );
        // Certain failure stays certain
        assert_relative_eq!(updated.probabilities()[4], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_knot_inserted_at_update_level() {
        let curve = prior();
        let updated = curve.reliability_update(2.5, 1.0).unwrap();

        assert_eq!(updated.len(), curve.len() + 1);
        assert!(updated.loads().contains(&2.5));
        let at_level = updated
            .points()
            .find(|(load, _)| *load == 2.5)
            .map(|(_, p)| p)
            .unwrap();
        assert_eq!(at_level, 0.0);
    }

    #[test]
    fn test_degenerate_update() {
        let curve = FragilityCurve::new(vec![1.0, 2.0, 3.0], vec![0.5, 1.0, 1.0]).unwrap();
        let err = curve.reliability_update(2.5, 1.0).unwrap_err();
        assert!(matches!(err, CurveError::DegenerateUpdate { .. }));
    }

    #[test]
    fn test_invalid_trust_factor() {
        let curve = prior();
        assert!(curve.reliability_update(3.0, 1.5).is_err());
        assert!(curve.reliability_update(3.0, -0.1).is_err());
        assert!(curve.reliability_update(f64::NAN, 0.5).is_err());
    }
}
