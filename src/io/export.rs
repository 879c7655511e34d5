//! Export evaluated curves to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts:
//! one row per (curve, multiple), with an empty `time_s` where the time is undefined.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::app::pipeline::CurveRun;
use crate::domain::Regime;
use crate::error::AppError;

/// Write all series of a run to a CSV file.
pub fn write_curves_csv(path: &Path, run: &CurveRun) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;
    let mut out = BufWriter::new(file);
    write_curves(&mut out, run)?;
    out.flush()
        .map_err(|e| AppError::input(format!("Failed to write export CSV: {e}")))
}

/// Write the CSV body to any writer.
pub fn write_curves(out: &mut impl Write, run: &CurveRun) -> Result<(), AppError> {
    writeln!(out, "curve,code,tds,multiple,current_a,regime,time_s")
        .map_err(|e| AppError::input(format!("Failed to write export CSV header: {e}")))?;

    for series in &run.series {
        let name = csv_field(&series.curve.name);
        let code = series.curve.code.as_deref().map(csv_field).unwrap_or_default();
        for p in &series.points {
            writeln!(
                out,
                "{},{},{},{:.6},{:.6},{},{}",
                name,
                code,
                run.tds,
                p.multiple,
                p.multiple * run.pickup_amps,
                Regime::of(p.multiple).label(),
                p.time.seconds().map(|t| format!("{t:.6}")).unwrap_or_default(),
            )
            .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
        }
    }

    Ok(())
}

/// Quote a field when it contains CSV metacharacters.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
