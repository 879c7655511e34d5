//! Current-multiple grids.
//!
//! Inverse-time curves are hyperbolic in the multiple, so plots normally use a
//! log-spaced grid on a log axis. A stepped grid (`1, 2, ..., 99`) is also
//! available; note that it contains the pickup multiple itself, which
//! evaluates to an undefined time.

use crate::domain::{GridKind, GridSpec};
use crate::error::AppError;

/// Hard cap on generated points, to keep a typo from allocating gigabytes.
pub const MAX_GRID_POINTS: usize = 100_000;

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0 && max > min) {
        return Err(AppError::input(format!(
            "Invalid multiple range: min={min}, max={max} (must be finite, >0, and max>min)."
        )));
    }
    if !(2..=MAX_GRID_POINTS).contains(&steps) {
        return Err(AppError::input(format!(
            "Grid points must be between 2 and {MAX_GRID_POINTS} (got {steps})."
        )));
    }

    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push((ln_min + step * i as f64).exp());
    }
    // Pin the endpoints so the caller sees exactly the range it asked for.
    out[0] = min;
    out[steps - 1] = max;
    Ok(out)
}

/// Generate `min, min + step, ...` strictly below `max`.
///
/// Points are computed as `min + i * step` (no accumulated rounding), so with
/// `min = 1, step = 1` the grid hits the pickup multiple exactly.
pub fn linear_space(min: f64, max: f64, step: f64) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && min >= 0.0 && max > min) {
        return Err(AppError::input(format!(
            "Invalid multiple range: min={min}, max={max} (must be finite, >=0, and max>min)."
        )));
    }
    if !(step.is_finite() && step > 0.0) {
        return Err(AppError::input(format!("Grid step must be > 0 (got {step}).")));
    }

    let count = ((max - min) / step).ceil() as usize;
    if count > MAX_GRID_POINTS {
        return Err(AppError::input(format!(
            "Grid would have {count} points (max {MAX_GRID_POINTS}); use a larger step."
        )));
    }

    Ok((0..count)
        .map(|i| min + step * i as f64)
        .filter(|&m| m < max)
        .collect())
}

/// Build the multiples described by a [`GridSpec`].
pub fn build_grid(spec: &GridSpec) -> Result<Vec<f64>, AppError> {
    match spec.kind {
        GridKind::Log => log_space(spec.min, spec.max, spec.points),
        GridKind::Linear => linear_space(spec.min, spec.max, spec.step),
    }
}
