//! Property-based tests for fragility curve invariants.
//!
//! These tests verify properties that must hold for any input:
//! - Normalized curves are sorted and monotonic
//! - Refining onto the curve's own loads reproduces it
//! - A zero shift is the identity
//! - A shift keeps the original loads
//! - Combined probabilities stay within [0, 1]
//! - Self-combination follows the closed-form rules

use fragility_curves::prelude::*;
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

/// Strictly increasing loads starting somewhere between 0 and 10 m.
fn loads_strategy(len: usize) -> impl Strategy<Value = Vec<f64>> {
    (0.0f64..10.0, prop::collection::vec(0.05f64..1.0, len)).prop_map(|(start, steps)| {
        let mut load = start;
        steps
            .into_iter()
            .map(|step| {
                load += step;
                load
            })
            .collect()
    })
}

/// A monotonic curve with probabilities between 1e-12 and 1.
fn curve_strategy() -> impl Strategy<Value = FragilityCurve> {
    (2usize..15).prop_flat_map(|len| {
        (
            loads_strategy(len),
            prop::collection::vec(-12.0f64..0.0, len),
        )
            .prop_map(|(loads, mut log_p)| {
                log_p.sort_by(|a, b| a.partial_cmp(b).unwrap());
                let probabilities = log_p.into_iter().map(|e| 10f64.powf(e)).collect();
                FragilityCurve::new(loads, probabilities).unwrap()
            })
    })
}

fn any_method() -> impl Strategy<Value = CombineMethod> {
    prop_oneof![
        Just(CombineMethod::Independent),
        Just(CombineMethod::Dependent),
        Just(CombineMethod::Weighted),
    ]
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn property_normalized_curve_is_monotonic(
        raw in prop::collection::vec((0.0f64..20.0, 0.0f64..1.0), 1..40)
    ) {
        let (loads, probabilities): (Vec<f64>, Vec<f64>) = raw.into_iter().unzip();
        let curve = FragilityCurve::new(loads, probabilities).unwrap();

        for w in curve.loads().windows(2) {
            prop_assert!(w[0] <= w[1]);
        }
        for i in 0..curve.len() {
            for j in i..curve.len() {
                prop_assert!(curve.probabilities()[i] <= curve.probabilities()[j]);
            }
        }
    }

    #[test]
    fn property_refine_round_trip(curve in curve_strategy()) {
        let refined = curve.refine(curve.loads(), false).unwrap();
        for (a, b) in curve.probabilities().iter().zip(refined.probabilities()) {
            prop_assert!((a - b).abs() <= 1e-9 * a.abs().max(1e-300));
        }
    }

    #[test]
    fn property_zero_shift_is_identity(curve in curve_strategy()) {
        prop_assert_eq!(curve.shift(0.0).unwrap(), curve);
    }

    #[test]
    fn property_positive_shift_never_increases_probability(
        curve in curve_strategy(),
        effect in 0.01f64..2.0,
    ) {
        let shifted = curve.shift(effect).unwrap();
        prop_assert_eq!(shifted.loads(), curve.loads());
        for (load, p) in shifted.points() {
            let before = curve.probability_at(load).unwrap();
            prop_assert!(p <= before * (1.0 + 1e-9) + 1e-300);
        }
    }

    #[test]
    fn property_combination_bounds(
        a in curve_strategy(),
        b in curve_strategy(),
        method in any_method(),
    ) {
        let combiner = CurveCombiner::new(
            CombineSettings::new(method).with_refine_step_size(0.1),
        );
        let combined = combiner.combine(&[a, b]).unwrap();
        for &p in combined.probabilities() {
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn property_independent_self_combination(curve in curve_strategy()) {
        let combiner = CurveCombiner::new(
            CombineSettings::new(CombineMethod::Independent).with_refine_step_size(0.1),
        );
        let combined = combiner.combine(&[curve.clone(), curve.clone()]).unwrap();
        let refined = curve.refine(combined.loads(), false).unwrap();

        for (p, q) in refined.probabilities().iter().zip(combined.probabilities()) {
            let expected = 1.0 - (1.0 - p).powi(2);
            prop_assert!((q - expected).abs() <= 1e-12);
        }
    }

    #[test]
    fn property_dependent_self_combination(curve in curve_strategy()) {
        let combiner = CurveCombiner::new(
            CombineSettings::new(CombineMethod::Dependent).with_refine_step_size(0.1),
        );
        let combined = combiner.combine(&[curve.clone(), curve.clone()]).unwrap();
        let refined = curve.refine(combined.loads(), false).unwrap();

        prop_assert_eq!(combined.probabilities(), refined.probabilities());
    }
}
