//! Curve evaluator properties over the standard catalog.
//!
//! Inputs are drawn from a seeded RNG so failures are reproducible.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use relay_curves::{CurveCatalog, CurveDefinition, CurveError, OperatingTime, evaluate, evaluate_point};

const SEED: u64 = 0x51_A751;

fn seconds(times: &[OperatingTime]) -> Vec<f64> {
    times
        .iter()
        .map(|t| t.seconds().expect("defined operating time"))
        .collect()
}

fn curve(name: &str) -> CurveDefinition {
    CurveCatalog::standard()
        .resolve(name)
        .expect("catalog curve")
        .definition
}

/// Sorted, well-separated multiples above pickup.
fn trip_multiples(rng: &mut StdRng) -> Vec<f64> {
    let mut m = rng.gen_range(1.01..1.2);
    let mut out = Vec::new();
    while m < 500.0 {
        out.push(m);
        m *= rng.gen_range(1.05..1.6);
    }
    out
}

// =======================================================================
// Reference values
// =======================================================================

#[test]
fn us_moderately_inverse_reference_point() {
    // 0.2256 + 0.0104 / (2^0.02 - 1) = 0.2256 + 0.0104 / 0.0139595
    let t = evaluate_point(1.0, 2.0, &curve("US Moderately Inverse")).unwrap();
    assert_relative_eq!(t.seconds().unwrap(), 0.970_61, epsilon = 1e-4);
}

#[test]
fn iec_standard_inverse_reference_points() {
    let c = curve("IEC Standard Inverse");
    let times = seconds(&evaluate(1.0, &[10.0, 0.5], &c).unwrap());
    // 0.14 / (10^0.02 - 1) = 0.14 / 0.047129
    assert_relative_eq!(times[0], 2.9706, epsilon = 1e-3);
    assert_relative_eq!(times[1], 18.0, epsilon = 1e-12);
}

#[test]
fn iec_very_inverse_catalogued_exponent() {
    // Catalogued with p = 2: 13.5 / (10^2 - 1).
    let t = evaluate_point(0.5, 10.0, &curve("C2")).unwrap();
    assert_relative_eq!(t.seconds().unwrap(), 0.5 * 13.5 / 99.0, max_relative = 1e-12);
}

// =======================================================================
// Shape
// =======================================================================

#[test]
fn trip_time_strictly_decreases_toward_tds_times_a() {
    let mut rng = StdRng::seed_from_u64(SEED);
    for entry in CurveCatalog::standard().entries() {
        let tds = rng.gen_range(0.5..15.0);
        let multiples = trip_multiples(&mut rng);
        let times = seconds(&evaluate(tds, &multiples, &entry.definition).unwrap());

        for w in times.windows(2) {
            assert!(w[1] < w[0], "{}: {} !< {}", entry.name, w[1], w[0]);
        }
        let floor = tds * entry.definition.a;
        assert!(times.iter().all(|&t| t > floor), "{}", entry.name);
    }
}

#[test]
fn reset_time_strictly_increases_below_pickup() {
    let mut rng = StdRng::seed_from_u64(SEED + 1);
    let multiples: Vec<f64> = (0..100).map(|i| i as f64 / 100.0).collect();
    for entry in CurveCatalog::standard().entries() {
        let tds = rng.gen_range(0.5..15.0);
        let times = seconds(&evaluate(tds, &multiples, &entry.definition).unwrap());

        assert_relative_eq!(times[0], tds * entry.definition.c, max_relative = 1e-12);
        for w in times.windows(2) {
            assert!(w[1] > w[0], "{}: {} !> {}", entry.name, w[1], w[0]);
        }
    }
}

#[test]
fn times_diverge_on_both_sides_of_pickup() {
    for entry in CurveCatalog::standard().entries() {
        let times = seconds(&evaluate(1.0, &[1.0 - 1e-9, 1.0 + 1e-9], &entry.definition).unwrap());
        assert!(times[0] > 1e6, "{} reset near pickup: {}", entry.name, times[0]);
        assert!(times[1] > 1e3, "{} trip near pickup: {}", entry.name, times[1]);
    }
}

#[test]
fn one_ulp_from_pickup_is_finite_and_positive() {
    let no_b = CurveDefinition::new(0.05, 0.0, 2.0, 0.02).unwrap();
    let curves = CurveCatalog::standard()
        .entries()
        .iter()
        .map(|e| (e.name.as_str(), e.definition))
        .chain([("custom b = 0", no_b)]);
    let near = [1.0 + f64::EPSILON, 1.0 - f64::EPSILON / 2.0];

    for (name, def) in curves {
        let times = evaluate(1.0, &near, &def).unwrap();
        for (&m, t) in near.iter().zip(&times) {
            match t {
                OperatingTime::Time(t) => assert!(t.is_finite() && *t > 0.0, "{name} at {m}: {t}"),
                OperatingTime::Undefined => panic!("{name} at {m}: undefined"),
            }
            assert_eq!(*t, evaluate_point(1.0, m, &def).unwrap(), "{name} at {m}");
        }
    }
}

#[test]
fn unity_multiple_is_undefined_for_every_curve() {
    let mut rng = StdRng::seed_from_u64(SEED + 2);
    for entry in CurveCatalog::standard().entries() {
        let tds = rng.gen_range(0.5..15.0);
        assert_eq!(
            evaluate(tds, &[1.0], &entry.definition).unwrap(),
            vec![OperatingTime::Undefined],
            "{}",
            entry.name
        );
    }
}

// =======================================================================
// Algebraic properties
// =======================================================================

#[test]
fn operating_time_is_linear_in_tds() {
    let mut rng = StdRng::seed_from_u64(SEED + 3);
    let multiples: Vec<f64> = (0..64).map(|_| rng.gen_range(0.0..50.0)).chain([1.0]).collect();

    for entry in CurveCatalog::standard().entries() {
        let tds = rng.gen_range(0.5..15.0);
        let k = rng.gen_range(0.01..20.0);
        let base = evaluate(tds, &multiples, &entry.definition).unwrap();
        let scaled = evaluate(k * tds, &multiples, &entry.definition).unwrap();

        for (s, b) in scaled.iter().zip(&base) {
            match (s, b.scale(k)) {
                (OperatingTime::Time(s), OperatingTime::Time(b)) => {
                    assert_relative_eq!(*s, b, max_relative = 1e-12);
                }
                (OperatingTime::Undefined, OperatingTime::Undefined) => {}
                other => panic!("{}: mismatched definedness {other:?}", entry.name),
            }
        }
    }
}

#[test]
fn batch_and_point_evaluation_agree_exactly() {
    let mut rng = StdRng::seed_from_u64(SEED + 4);
    let multiples: Vec<f64> = (0..64)
        .map(|_| rng.gen_range(0.0..100.0))
        .chain([0.0, 1.0, 2.0])
        .collect();

    for entry in CurveCatalog::standard().entries() {
        let tds = rng.gen_range(0.5..15.0);
        let batch = evaluate(tds, &multiples, &entry.definition).unwrap();
        assert_eq!(batch.len(), multiples.len());
        for (i, &m) in multiples.iter().enumerate() {
            assert_eq!(batch[i], evaluate_point(tds, m, &entry.definition).unwrap());
        }
    }
}

#[test]
fn evaluation_is_order_independent() {
    let c = curve("U4");
    let forward = [0.2, 1.0, 3.0, 7.5];
    let reversed = [7.5, 3.0, 1.0, 0.2];
    let a = evaluate(2.0, &forward, &c).unwrap();
    let mut b = evaluate(2.0, &reversed, &c).unwrap();
    b.reverse();
    assert_eq!(a, b);
}

// =======================================================================
// Domain errors
// =======================================================================

#[test]
fn invalid_inputs_raise_invalid_domain() {
    let c = curve("U1");
    let cases: Vec<(f64, Vec<f64>, CurveDefinition)> = vec![
        (1.0, vec![2.0, -0.5], c),
        (0.0, vec![2.0], c),
        (-2.0, vec![2.0], c),
        (1.0, vec![2.0], CurveDefinition { a: -0.1, ..c }),
        (1.0, vec![2.0], CurveDefinition { b: -0.1, ..c }),
        (1.0, vec![0.5], CurveDefinition { c: -0.1, ..c }),
    ];
    for (tds, multiples, def) in cases {
        match evaluate(tds, &multiples, &def) {
            Err(CurveError::InvalidDomain { .. }) => {}
            other => panic!("tds={tds} multiples={multiples:?} def={def:?}: {other:?}"),
        }
    }
}

// =======================================================================
// Concurrency
// =======================================================================

#[test]
fn concurrent_callers_see_identical_results() {
    let multiples: Vec<f64> = (1..=400).map(|i| i as f64 * 0.05).collect();
    let expected: Vec<Vec<OperatingTime>> = CurveCatalog::standard()
        .entries()
        .iter()
        .map(|e| evaluate(3.0, &multiples, &e.definition).unwrap())
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    CurveCatalog::standard()
                        .entries()
                        .iter()
                        .map(|e| evaluate(3.0, &multiples, &e.definition).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}
