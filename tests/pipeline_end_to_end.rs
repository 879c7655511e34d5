//! Catalog loading, pipeline, exports and plotting through the public API.

use approx::assert_relative_eq;

use relay_curves::app::pipeline::run_curves;
use relay_curves::domain::{GridKind, GridSpec, OperatingTime, PlotConfig, TimeScale};
use relay_curves::io::{curve_file_from_run, parse_catalog, write_curves};
use relay_curves::plot::{render_ascii_plot, render_ascii_plot_from_curve_file};
use relay_curves::{CurveCatalog, evaluate_point};

const USER_CURVES: &str = r#"[
    {"name": "Feeder 7 Custom", "code": "F7", "a": 0.05, "b": 2.5, "c": 3.0, "p": 1.5}
]"#;

fn user_catalog() -> CurveCatalog {
    let extra = parse_catalog(USER_CURVES.as_bytes()).unwrap();
    CurveCatalog::standard().extended(extra).unwrap()
}

#[test]
fn user_curve_overlays_a_standard_curve() {
    let catalog = user_catalog();
    let config = PlotConfig {
        curve: "f7".to_string(),
        overlays: vec!["IEC Extremely Inverse".to_string()],
        tds: 2.0,
        pickup_amps: 100.0,
        overcurrent_amps: Some(400.0),
        ..PlotConfig::default()
    };
    let run = run_curves(&config, &catalog).unwrap();

    assert_eq!(run.series.len(), 2);
    assert_eq!(run.primary().curve.name, "Feeder 7 Custom");

    // 2 * (0.05 + 2.5 / (4^1.5 - 1)) = 2 * (0.05 + 2.5 / 7)
    let op = run.operating_point.unwrap();
    assert!(!op.clamped);
    assert_relative_eq!(op.multiple, 4.0);
    assert_relative_eq!(op.time.seconds().unwrap(), 2.0 * (0.05 + 2.5 / 7.0), max_relative = 1e-12);
}

#[test]
fn stepped_grid_exports_every_point_including_pickup() {
    let config = PlotConfig {
        curve: "U3".to_string(),
        pickup_amps: 50.0,
        grid: GridSpec {
            kind: GridKind::Linear,
            min: 1.0,
            max: 100.0,
            points: 0,
            step: 1.0,
        },
        ..PlotConfig::default()
    };
    let run = run_curves(&config, CurveCatalog::standard()).unwrap();

    let mut buf = Vec::new();
    write_curves(&mut buf, &run).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let rows: Vec<&str> = text.lines().skip(1).collect();

    assert_eq!(rows.len(), 99);
    assert!(rows[0].ends_with(",pickup,"), "{}", rows[0]);
    assert!(rows[0].contains(",50.000000,"));
    assert!(rows[1..].iter().all(|r| r.contains(",trip,") && !r.ends_with(',')));
}

#[test]
fn saved_curve_file_plots_like_the_live_run() {
    let config = PlotConfig {
        curve: "C2".to_string(),
        overlays: vec!["U4".to_string()],
        overcurrent_amps: Some(3.0),
        ..PlotConfig::default()
    };
    let run = run_curves(&config, CurveCatalog::standard()).unwrap();
    let file = curve_file_from_run(&run);

    for scale in [TimeScale::Log, TimeScale::Linear] {
        let live = render_ascii_plot(&run, scale, 60, 15);
        let saved = render_ascii_plot_from_curve_file(&file, scale, 60, 15);
        assert_eq!(live, saved);
        assert!(live.contains('X'));
    }
}

#[test]
fn operating_point_agrees_with_the_evaluator() {
    let catalog = CurveCatalog::standard();
    for entry in catalog.entries() {
        let config = PlotConfig {
            curve: entry.name.clone(),
            tds: 3.5,
            pickup_amps: 200.0,
            overcurrent_amps: Some(1500.0),
            ..PlotConfig::default()
        };
        let run = run_curves(&config, catalog).unwrap();
        let op = run.operating_point.unwrap();
        let expected = evaluate_point(3.5, 7.5, &entry.definition).unwrap();
        assert_eq!(op.time, expected, "{}", entry.name);
        assert_ne!(op.time, OperatingTime::Undefined);
    }
}
