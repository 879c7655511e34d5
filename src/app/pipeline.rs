//! Shared "curve pipeline" logic used by the CLI, the exporters and the TUI.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! resolve curves -> build multiples grid -> evaluate -> operating point
//!
//! The front-ends can then focus on presentation (printing vs widgets).

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::curves::{CurveCatalog, evaluate, evaluate_point};
use crate::domain::{CurvePoint, NamedCurve, OperatingPoint, PlotConfig};
use crate::error::AppError;
use crate::math::build_grid;

/// One evaluated curve.
#[derive(Debug, Clone)]
pub struct CurveSeries {
    pub curve: NamedCurve,
    pub points: Vec<CurvePoint>,
}

impl CurveSeries {
    /// Points with a defined time, as `(multiple, seconds)` pairs.
    pub fn defined_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.time.seconds().map(|t| (p.multiple, t)))
    }
}

/// All computed outputs of a single curve run.
#[derive(Debug, Clone)]
pub struct CurveRun {
    pub tds: f64,
    pub pickup_amps: f64,
    /// Primary curve first, then overlays in the requested order.
    pub series: Vec<CurveSeries>,
    /// Operating point on the primary curve, if an overcurrent was requested.
    pub operating_point: Option<OperatingPoint>,
}

impl CurveRun {
    pub fn primary(&self) -> &CurveSeries {
        &self.series[0]
    }
}

/// Execute the full pipeline and return the evaluated series.
pub fn run_curves(config: &PlotConfig, catalog: &CurveCatalog) -> Result<CurveRun, AppError> {
    if !(config.pickup_amps.is_finite() && config.pickup_amps > 0.0) {
        return Err(AppError::input(format!(
            "Pickup current must be > 0 A (got {}).",
            config.pickup_amps
        )));
    }

    // 1) Resolve curves; the primary is never repeated as an overlay.
    let primary = catalog.resolve(&config.curve)?.clone();
    let mut curves = vec![primary];
    for name in &config.overlays {
        let overlay = catalog.resolve(name)?;
        if curves.iter().any(|c| c.name == overlay.name) {
            debug!(curve = %overlay.name, "skipping duplicate overlay");
            continue;
        }
        curves.push(overlay.clone());
    }

    // 2) Multiples grid.
    let multiples = build_grid(&config.grid)?;
    info!(
        curves = curves.len(),
        points = multiples.len(),
        tds = config.tds,
        "evaluating curves"
    );

    // 3) Evaluate every curve on the same grid.
    let series = curves
        .into_par_iter()
        .map(|curve| evaluate_series(curve, config.tds, &multiples))
        .collect::<Result<Vec<_>, AppError>>()?;

    // 4) Operating point on the primary curve.
    let operating_point = match config.overcurrent_amps {
        Some(amps) => Some(operating_point(
            &series[0].curve,
            config.tds,
            config.pickup_amps,
            amps,
        )?),
        None => None,
    };

    Ok(CurveRun {
        tds: config.tds,
        pickup_amps: config.pickup_amps,
        series,
        operating_point,
    })
}

/// Evaluate one curve on a prepared multiples grid.
pub fn evaluate_series(
    curve: NamedCurve,
    tds: f64,
    multiples: &[f64],
) -> Result<CurveSeries, AppError> {
    let times = evaluate(tds, multiples, &curve.definition)?;
    let points = multiples
        .iter()
        .zip(times)
        .map(|(&multiple, time)| CurvePoint { multiple, time })
        .collect();
    Ok(CurveSeries { curve, points })
}

/// Locate a requested overcurrent on a curve.
///
/// Currents below pickup are raised to the pickup current: highlighting a
/// reset time as an operating point is not meaningful. At pickup the time is
/// undefined and front-ends draw no marker.
pub fn operating_point(
    curve: &NamedCurve,
    tds: f64,
    pickup_amps: f64,
    overcurrent_amps: f64,
) -> Result<OperatingPoint, AppError> {
    if !overcurrent_amps.is_finite() {
        return Err(AppError::input(format!(
            "Overcurrent must be finite (got {overcurrent_amps})."
        )));
    }

    let clamped = overcurrent_amps < pickup_amps;
    let current_amps = if clamped {
        warn!(
            requested = overcurrent_amps,
            pickup = pickup_amps,
            "overcurrent below pickup; using the pickup current"
        );
        pickup_amps
    } else {
        overcurrent_amps
    };

    let multiple = current_amps / pickup_amps;
    let time = evaluate_point(tds, multiple, &curve.definition)?;
    Ok(OperatingPoint {
        current_amps,
        multiple,
        time,
        clamped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GridKind, GridSpec, OperatingTime};

    fn config(curve: &str) -> PlotConfig {
        PlotConfig {
            curve: curve.to_string(),
            ..PlotConfig::default()
        }
    }

    #[test]
    fn run_evaluates_primary_and_overlays_on_one_grid() {
        let mut cfg = config("U1");
        cfg.overlays = vec!["C1".to_string(), "u1".to_string(), "IEC Very Inverse".to_string()];
        let run = run_curves(&cfg, CurveCatalog::standard()).unwrap();

        let names: Vec<&str> = run.series.iter().map(|s| s.curve.name.as_str()).collect();
        assert_eq!(
            names,
            ["US Moderately Inverse", "IEC Standard Inverse", "IEC Very Inverse"]
        );
        for s in &run.series {
            assert_eq!(s.points.len(), cfg.grid.points);
        }
        assert!(run.operating_point.is_none());
    }

    #[test]
    fn stepped_grid_yields_one_undefined_point() {
        let mut cfg = config("C1");
        cfg.grid = GridSpec {
            kind: GridKind::Linear,
            min: 1.0,
            max: 100.0,
            points: 0,
            step: 1.0,
        };
        let run = run_curves(&cfg, CurveCatalog::standard()).unwrap();
        let primary = run.primary();
        assert_eq!(primary.points.len(), 99);
        assert_eq!(primary.points[0].time, OperatingTime::Undefined);
        assert_eq!(primary.defined_points().count(), 98);
    }

    #[test]
    fn operating_point_is_clamped_to_pickup() {
        let mut cfg = config("U3");
        cfg.pickup_amps = 2.0;
        cfg.overcurrent_amps = Some(1.0);
        let run = run_curves(&cfg, CurveCatalog::standard()).unwrap();
        let op = run.operating_point.unwrap();
        assert!(op.clamped);
        assert_eq!(op.current_amps, 2.0);
        assert_eq!(op.multiple, 1.0);
        assert_eq!(op.time, OperatingTime::Undefined);
    }

    #[test]
    fn operating_point_matches_series_evaluation() {
        let curve = CurveCatalog::standard().resolve("C2").unwrap().clone();
        let op = operating_point(&curve, 2.5, 4.0, 20.0).unwrap();
        assert!(!op.clamped);
        assert_eq!(op.multiple, 5.0);

        let series = evaluate_series(curve, 2.5, &[5.0]).unwrap();
        assert_eq!(series.points[0].time, op.time);
    }

    #[test]
    fn bad_inputs_are_reported() {
        let mut cfg = config("no such curve");
        assert!(run_curves(&cfg, CurveCatalog::standard()).is_err());

        cfg = config("U1");
        cfg.tds = 0.0;
        let err = run_curves(&cfg, CurveCatalog::standard()).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        cfg = config("U1");
        cfg.pickup_amps = 0.0;
        assert!(run_curves(&cfg, CurveCatalog::standard()).is_err());
    }
}
