//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of an evaluated run:
//! - each curve's name, code and coefficients
//! - run settings (TDS, pickup current)
//! - the evaluated `(multiple, time)` points, `null` where undefined
//! - the highlighted operating point, if any
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::app::pipeline::CurveRun;
use crate::domain::{CurveFile, CurveFileSeries};
use crate::error::AppError;

/// Convert a run into its file representation.
pub fn curve_file_from_run(run: &CurveRun) -> CurveFile {
    CurveFile {
        tool: "tcc".to_string(),
        generated_at: chrono::Utc::now(),
        tds: run.tds,
        pickup_amps: run.pickup_amps,
        series: run
            .series
            .iter()
            .map(|s| CurveFileSeries {
                curve: s.curve.clone(),
                points: s.points.clone(),
            })
            .collect(),
        operating_point: run.operating_point,
    }
}

/// Write a curve JSON file.
///
/// JSON has no infinity or NaN (serde_json writes them as `null`, which would
/// read back as undefined), so non-finite times are refused before anything
/// is created on disk.
pub fn write_curve_json(path: &Path, run: &CurveRun) -> Result<(), AppError> {
    let curve = curve_file_from_run(run);
    ensure_finite_times(&curve)?;

    let file = File::create(path).map_err(|e| {
        AppError::input(format!("Failed to create curve JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(BufWriter::new(file), &curve)
        .map_err(|e| AppError::input(format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

fn ensure_finite_times(curve: &CurveFile) -> Result<(), AppError> {
    for s in &curve.series {
        if let Some(p) = s.points.iter().find(|p| p.time.seconds().is_some_and(|t| !t.is_finite())) {
            return Err(AppError::runtime(format!(
                "Curve '{}' has a non-finite time at multiple {}; not writing JSON.",
                s.curve.name, p.multiple
            )));
        }
    }
    if let Some(op) = &curve.operating_point {
        if op.time.seconds().is_some_and(|t| !t.is_finite()) {
            return Err(AppError::runtime(
                "Operating point has a non-finite time; not writing JSON.",
            ));
        }
    }
    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Failed to open curve JSON '{}': {e}", path.display()))
    })?;
    let curve: CurveFile = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::input(format!("Invalid curve JSON: {e}")))?;
    if curve.series.is_empty() {
        return Err(AppError::input("Curve JSON contains no series."));
    }
    Ok(curve)
}
