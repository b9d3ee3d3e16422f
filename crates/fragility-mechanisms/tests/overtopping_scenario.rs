//! End-to-end overtopping scenario on a dam-free trapezoidal dike.
//!
//! Crest at 14.63 m, windspeed 20 m/s, wind sector [180°, 270°], 31 model
//! uncertainty nodes per factor.

use approx::assert_abs_diff_eq;
use fragility_curves::prelude::*;
use fragility_hydra::prelude::*;
use fragility_mechanisms::prelude::*;

const GRAVITY: f64 = 9.81;
const CREST: f64 = 14.63;
const NODES: usize = 31;

/// Deterministic-qcr probabilities over the fine grid, 12.63 m to 15.63 m
/// in steps of 0.05 m.
const FINE_GRID_REFERENCE: [f64; 61] = [
    1.679562427e-06, 2.460244888e-06, 3.932948956e-06, 5.947154886e-06,
    8.621738598e-06, 1.119016839e-05, 1.625255637e-05, 2.350397060e-05,
    3.206819430e-05, 4.739757954e-05, 5.544072727e-05, 9.133346457e-05,
    1.067010740e-04, 1.398311984e-04, 1.970326519e-04, 2.420180137e-04,
    3.514800806e-04, 4.327109369e-04, 5.674893225e-04, 7.417881798e-04,
    9.253560496e-04, 1.147119747e-03, 1.542888001e-03, 1.873398002e-03,
    2.484788601e-03, 2.863693961e-03, 3.636263596e-03, 4.486144149e-03,
    5.568461236e-03, 6.343447074e-03, 7.453069312e-03, 9.485649786e-03,
    1.087188092e-02, 1.381331505e-02, 1.559783240e-02, 1.939756173e-02,
    2.180949994e-02, 2.693857293e-02, 3.086251824e-02, 3.669513956e-02,
    4.406715357e-02, 4.907123264e-02, 5.923719355e-02, 6.390442255e-02,
    7.647520312e-02, 8.147596186e-02, 9.816218065e-02, 1.141912894e-01,
    1.245604363e-01, 1.440800477e-01, 1.528030895e-01, 1.771006265e-01,
    1.970284364e-01, 2.150349939e-01, 2.406283605e-01, 2.720743482e-01,
    2.865235981e-01, 3.227347963e-01, 3.422783636e-01, 3.772759256e-01,
    4.002491444e-01,
];

/// Breaking-wave discharge with an exponential freeboard law that continues
/// across the crest:
///
/// ```text
/// q = A · √(g·Hs³) · ξ · exp(-B · Rc / (ξ · Hs)),   ξ = tan α / √(Hs / L0)
/// ```
///
/// with freeboard `Rc = crest − h`, deep-water wave length
/// `L0 = g·Tspec² / 2π` and `tan α` the outer slope gradient.
struct TrapezoidalDike {
    geometry: ProfileGeometry,
}

impl TrapezoidalDike {
    const A: f64 = 0.0021;
    const B: f64 = 0.4;

    /// Uniform 1:3 outer slope from the bed at 9 m up to the crest.
    fn new() -> Self {
        let geometry = ProfileGeometry {
            orientation: 225.0,
            crest_level: CREST,
            points: vec![ProfilePoint::new(0.0, 9.0), ProfilePoint::new(16.89, CREST)],
            segments: vec![SlopeSegment {
                kind: SegmentKind::Slope,
                roughness: 1.0,
            }],
            foreland: Vec::new(),
            breakwater: None,
        };
        geometry.validate().unwrap();
        Self { geometry }
    }
}

impl Profile for TrapezoidalDike {
    fn crest_level(&self) -> f64 {
        self.geometry.crest_level
    }

    fn calculate_overtopping(&self, level: f64, hs: f64, tspec: f64, _: f64) -> MechanismResult<f64> {
        if hs <= 0.0 || tspec <= 0.0 {
            return Ok(0.0);
        }
        let tan_alpha = self
            .geometry
            .mean_gradient(SegmentKind::Slope)
            .ok_or_else(|| MechanismError::physics("profile has no slope"))?;
        let wave_length = GRAVITY * tspec * tspec / (2.0 * std::f64::consts::PI);
        let breaker = tan_alpha / (hs / wave_length).sqrt();
        let freeboard = self.geometry.crest_level - level;

        Ok(Self::A
            * (GRAVITY * hs.powi(3)).sqrt()
            * breaker
            * (-Self::B * freeboard / (breaker * hs)).exp())
    }
}

fn waves() -> WaveConditionSource {
    WaveConditionSource::Empirical(
        Bretschneider::new(
            vec![0.0, 90.0, 180.0, 240.0, 300.0],
            vec![9.0, 9.0, 9.0, 9.0, 9.0],
            vec![800.0, 600.0, 2000.0, 3500.0, 1500.0],
        )
        .unwrap(),
    )
}

fn uncertainty() -> ModelUncertainty {
    ModelUncertainty::new(NODES)
        .unwrap()
        .with_parameters(
            ClosingSituation::new(1),
            UncertaintyParameters::new(0.96, 0.27, 1.03, 0.13),
        )
        .unwrap()
}

fn settings(critical_discharge: CriticalDischarge) -> OvertoppingSettings {
    OvertoppingSettings::new(20.0, WindSector::new(180.0, 270.0))
        .with_critical_discharge(critical_discharge)
}

fn build(critical_discharge: CriticalDischarge) -> FragilityCurve {
    let profile = TrapezoidalDike::new();
    let waves = waves();
    let uncertainty = uncertainty();
    OvertoppingCurveBuilder::new(&profile, &waves, &uncertainty, settings(critical_discharge))
        .unwrap()
        .build()
        .unwrap()
}

/// Indices of the fine part of the load grid.
fn fine_part(curve: &FragilityCurve) -> std::ops::Range<usize> {
    let start = curve
        .loads()
        .iter()
        .position(|&h| h >= CREST - 2.0 - 1e-9)
        .unwrap();
    start..curve.len()
}

#[test]
fn test_dominant_direction_has_longest_fetch() {
    let profile = TrapezoidalDike::new();
    let waves = waves();
    let uncertainty = uncertainty();
    let builder = OvertoppingCurveBuilder::new(
        &profile,
        &waves,
        &uncertainty,
        settings(CriticalDischarge::Deterministic(0.01)),
    )
    .unwrap();

    assert_eq!(builder.dominant_direction().unwrap(), 240.0);
}

#[test]
fn test_deterministic_qcr_strictly_increases_over_fine_grid() {
    let curve = build(CriticalDischarge::Deterministic(0.01));

    assert_eq!(curve.len(), 81);
    assert_eq!(curve.min_load(), 10.63);
    assert_eq!(curve.max_load(), 15.63);

    let fine = fine_part(&curve);
    assert_eq!(fine.len(), 61);
    assert_eq!(curve.loads()[fine.start], 12.63);
    let p = &curve.probabilities()[fine];
    assert!(p[0] > 1e-7 && p[0] < 1e-5, "bottom of fine grid: {}", p[0]);
    assert!(p[60] > 0.35 && p[60] < 0.45, "top of fine grid: {}", p[60]);
    for (i, w) in p.windows(2).enumerate() {
        assert!(w[0] < w[1], "step {i}: {} !< {}", w[0], w[1]);
    }
}

#[test]
fn test_deterministic_qcr_matches_reference_vector() {
    let curve = build(CriticalDischarge::Deterministic(0.01));
    let fine = fine_part(&curve);
    let loads = &curve.loads()[fine.clone()];
    let p = &curve.probabilities()[fine];

    assert_eq!(p.len(), FINE_GRID_REFERENCE.len());
    for (i, (&actual, &expected)) in p.iter().zip(&FINE_GRID_REFERENCE).enumerate() {
        assert_abs_diff_eq!(loads[i], 12.63 + 0.05 * i as f64, epsilon = 1e-9);
        assert_abs_diff_eq!(actual, expected, epsilon = 1e-6);
    }
}

#[test]
fn test_coarse_grid_stays_below_fine_grid() {
    let curve = build(CriticalDischarge::Deterministic(0.01));
    let fine = fine_part(&curve);
    let p = curve.probabilities();

    assert_eq!(fine.start, 20);
    assert_eq!(p[0], 0.0);
    assert!(p[..fine.start].iter().all(|&v| v < p[fine.start]));
    for w in p[..fine.start].windows(2) {
        assert!(w[0] <= w[1]);
    }
}

#[test]
fn test_probabilistic_qcr_strictly_increases_over_fine_grid() {
    let curve = build(CriticalDischarge::Distribution {
        mu: 1.0_f64.ln(),
        sigma: 1.5,
    });

    let fine = fine_part(&curve);
    let p = &curve.probabilities()[fine];
    assert!(p[0] > 0.0);
    assert!(p[0] < 1e-2);
    for w in p.windows(2) {
        assert!(w[0] < w[1], "{} !< {}", w[0], w[1]);
    }
    assert!(p.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn test_grass_quality_open_fails_earlier_than_closed() {
    let open = build(CriticalDischarge::GrassQuality(GrassQuality::Open));
    let closed = build(CriticalDischarge::GrassQuality(GrassQuality::Closed));

    assert_eq!(open.loads(), closed.loads());
    for (o, c) in open.probabilities().iter().zip(closed.probabilities()) {
        assert!(o >= c);
    }
}

#[test]
fn test_curve_feeds_combination_and_integration() {
    let overtopping = build(CriticalDischarge::Deterministic(0.01));
    let piping = FragilityCurve::new(vec![10.0, 13.0, 16.0], vec![1e-6, 1e-3, 0.1]).unwrap();

    let combined = CurveCombiner::new(CombineSettings::default())
        .combine(&[overtopping, piping])
        .unwrap();
    let exceedance = ExceedanceFrequencyCurve::new(
        vec![10.0, 12.0, 14.0, 16.0],
        vec![1e-1, 1e-2, 1e-3, 1e-4],
    )
    .unwrap();
    let risk = CurveIntegrator::new(IntegrationSettings::default())
        .integrate(&combined, &exceedance)
        .unwrap();

    assert!(risk.total_probability() > 0.0);
    assert!(risk.total_probability() < 0.1);
}
