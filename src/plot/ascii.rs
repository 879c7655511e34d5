//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The multiple axis is always logarithmic. The time axis is linear or
//! logarithmic. Points that cannot be placed on the axes (undefined time,
//! non-positive values on a log axis) break the curve line.
//!
//! Plot elements:
//! - curves: one glyph per series (`-`, `+`, `~`, ...)
//! - operating point: `X`

use crate::app::pipeline::CurveRun;
use crate::domain::{CurveFile, CurvePoint, NamedCurve, OperatingPoint, TimeScale};

/// Glyphs assigned to series in order; the primary curve gets `-`.
const SERIES_GLYPHS: [char; 8] = ['-', '+', '~', '=', '#', '%', '&', '@'];
const OPERATING_GLYPH: char = 'X';

/// Render a plot for an in-memory curve run.
pub fn render_ascii_plot(run: &CurveRun, time_scale: TimeScale, width: usize, height: usize) -> String {
    let series: Vec<(&NamedCurve, &[CurvePoint])> = run
        .series
        .iter()
        .map(|s| (&s.curve, s.points.as_slice()))
        .collect();
    render_plot(&series, run.operating_point.as_ref(), time_scale, width, height)
}

/// Render a plot from a saved curve JSON file.
pub fn render_ascii_plot_from_curve_file(
    curve: &CurveFile,
    time_scale: TimeScale,
    width: usize,
    height: usize,
) -> String {
    let series: Vec<(&NamedCurve, &[CurvePoint])> = curve
        .series
        .iter()
        .map(|s| (&s.curve, s.points.as_slice()))
        .collect();
    render_plot(&series, curve.operating_point.as_ref(), time_scale, width, height)
}

/// One plot axis (log or linear) over `[min, max]`.
#[derive(Debug, Clone, Copy)]
struct Axis {
    min: f64,
    max: f64,
    log: bool,
}

impl Axis {
    fn accepts(&self, v: f64) -> bool {
        v.is_finite() && (!self.log || v > 0.0)
    }

    fn transform(&self, v: f64) -> f64 {
        if self.log { v.ln() } else { v }
    }

    /// Position in `[0, 1]`.
    fn unit(&self, v: f64) -> f64 {
        let (lo, hi) = (self.transform(self.min), self.transform(self.max));
        ((self.transform(v) - lo) / (hi - lo)).clamp(0.0, 1.0)
    }

    /// Widen the axis by `frac` of its (transformed) span on both sides.
    fn padded(self, frac: f64) -> Self {
        let (lo, hi) = (self.transform(self.min), self.transform(self.max));
        let pad = ((hi - lo).abs() * frac).max(1e-12);
        let (lo, hi) = (lo - pad, hi + pad);
        if self.log {
            Self { min: lo.exp(), max: hi.exp(), ..self }
        } else {
            Self { min: lo, max: hi, ..self }
        }
    }

    fn label(&self) -> &'static str {
        if self.log { "log" } else { "linear" }
    }
}

fn render_plot(
    series: &[(&NamedCurve, &[CurvePoint])],
    operating_point: Option<&OperatingPoint>,
    time_scale: TimeScale,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let x_probe = Axis { min: 0.0, max: 0.0, log: true };
    let y_probe = Axis { min: 0.0, max: 0.0, log: time_scale == TimeScale::Log };

    let Some((x_axis, y_axis)) = axes(series, x_probe, y_probe) else {
        return "Plot: no plottable points\n".to_string();
    };
    let y_axis = y_axis.padded(0.05);

    let mut grid = vec![vec![' '; width]; height];

    for (i, (_, points)) in series.iter().enumerate() {
        let glyph = SERIES_GLYPHS[i % SERIES_GLYPHS.len()];
        draw_series(&mut grid, points, x_axis, y_axis, glyph);
    }

    // Operating point overlays everything; no marker when the time is undefined.
    if let Some(op) = operating_point {
        if let Some(t) = op.time.seconds() {
            if x_axis.accepts(op.multiple) && y_axis.accepts(t) {
                let x = map_x(op.multiple, x_axis, width);
                let y = map_y(t, y_axis, height);
                grid[y][x] = OPERATING_GLYPH;
            }
        }
    }

    // Build final string. We include a small header with ranges and a legend.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: multiple=[{:.3}, {:.3}] ({}) | time=[{:.3}, {:.3}]s ({})\n",
        x_axis.min,
        x_axis.max,
        x_axis.label(),
        y_axis.min,
        y_axis.max,
        y_axis.label(),
    ));

    let mut legend: Vec<String> = series
        .iter()
        .enumerate()
        .map(|(i, (curve, _))| {
            format!("{} {}", SERIES_GLYPHS[i % SERIES_GLYPHS.len()], curve.short_label())
        })
        .collect();
    if let Some(op) = operating_point {
        legend.push(match op.time.seconds() {
            Some(t) => format!("{OPERATING_GLYPH} I={:.2}A t={t:.3}s", op.current_amps),
            None => format!("{OPERATING_GLYPH} I={:.2}A (at pickup, undefined)", op.current_amps),
        });
    }
    out.push_str(&legend.join("  "));
    out.push('\n');

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

/// Data bounds over every point that can be placed on both axes.
fn axes(series: &[(&NamedCurve, &[CurvePoint])], x: Axis, y: Axis) -> Option<(Axis, Axis)> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for (_, points) in series {
        for (m, t) in plottable(points, x, y) {
            x_min = x_min.min(m);
            x_max = x_max.max(m);
            y_min = y_min.min(t);
            y_max = y_max.max(t);
        }
    }

    if !(x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite()) {
        return None;
    }
    if x_max <= x_min {
        return None;
    }
    // A flat curve still gets a usable time axis.
    if y_max <= y_min {
        if y.log {
            y_min /= 2.0;
            y_max *= 2.0;
        } else {
            y_min -= 0.5;
            y_max += 0.5;
        }
    }

    Some((
        Axis { min: x_min, max: x_max, ..x },
        Axis { min: y_min, max: y_max, ..y },
    ))
}

fn plottable(points: &[CurvePoint], x: Axis, y: Axis) -> impl Iterator<Item = (f64, f64)> + '_ {
    points.iter().filter_map(move |p| {
        let t = p.time.seconds()?;
        (x.accepts(p.multiple) && y.accepts(t)).then_some((p.multiple, t))
    })
}

fn map_x(m: f64, axis: Axis, width: usize) -> usize {
    let width = width.max(2);
    (axis.unit(m) * (width as f64 - 1.0)).round() as usize
}

fn map_y(t: f64, axis: Axis, height: usize) -> usize {
    let height = height.max(2);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (axis.unit(t) * (height as f64 - 1.0))).round() as usize
}

fn draw_series(grid: &mut [Vec<char>], points: &[CurvePoint], x_axis: Axis, y_axis: Axis, ch: char) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for p in points {
        let placed = p
            .time
            .seconds()
            .filter(|&t| x_axis.accepts(p.multiple) && y_axis.accepts(t));
        let Some(t) = placed else {
            prev = None;
            continue;
        };

        let x = map_x(p.multiple, x_axis, width);
        let y = map_y(t, y_axis, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, x, y, ch),
            None => {
                if grid[y][x] == ' ' {
                    grid[y][x] = ch;
                }
            }
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
