//! Formatted terminal output: catalog listing, evaluation tables, run summary.
//!
//! We keep formatting code in one place so:
//! - the evaluation code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::app::pipeline::CurveRun;
use crate::curves::CurveCatalog;
use crate::domain::{NamedCurve, OperatingTime, Regime};

/// Format the curve catalog as a table.
pub fn format_catalog(catalog: &CurveCatalog) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<5} {:<28} {:<7} {:>9} {:>9} {:>8} {:>6}",
            "code", "name", "std", "a", "b", "c", "p"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&format!(
        "{:-<5} {:-<28} {:-<7} {:-<9} {:-<9} {:-<8} {:-<6}\n",
        "", "", "", "", "", "", ""
    ));

    for e in catalog.entries() {
        let d = &e.definition;
        out.push_str(&format!(
            "{:<5} {:<28} {:<7} {:>9} {:>9} {:>8} {:>6}\n",
            e.code.as_deref().unwrap_or("-"),
            truncate(&e.name, 28),
            e.standard.display_name(),
            d.a,
            d.b,
            d.c,
            d.p
        ));
    }
    out
}

/// Format per-multiple evaluation results.
///
/// When `pickup_amps` is given, a current column (`multiple * pickup`) is added.
pub fn format_eval_table(
    curve: &NamedCurve,
    tds: f64,
    pickup_amps: Option<f64>,
    multiples: &[f64],
    times: &[OperatingTime],
) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} | TDS={tds}", curve_label(curve)));
    if let Some(pickup) = pickup_amps {
        out.push_str(&format!(" | pickup={pickup} A"));
    }
    out.push('\n');

    match pickup_amps {
        Some(_) => out.push_str(&format!(
            "{:>12} {:>10} {:<7} {:>12}\n",
            "current_a", "multiple", "regime", "time_s"
        )),
        None => out.push_str(&format!("{:>10} {:<7} {:>12}\n", "multiple", "regime", "time_s")),
    }

    for (&m, &t) in multiples.iter().zip(times) {
        let regime = Regime::of(m).label();
        match pickup_amps {
            Some(pickup) => out.push_str(&format!(
                "{:>12.3} {:>10.4} {:<7} {:>12.4}\n",
                m * pickup,
                m,
                regime,
                t
            )),
            None => out.push_str(&format!("{:>10.4} {:<7} {:>12.4}\n", m, regime, t)),
        }
    }
    out.trim_end().to_string()
}

/// Summary header for a curve run (curves, settings, operating point).
pub fn format_run_summary(run: &CurveRun) -> String {
    let mut out = String::new();

    out.push_str("=== tcc - inverse-time overcurrent curves ===\n");
    out.push_str(&format!(
        "TDS: {} | pickup: {} A | points: {}\n",
        run.tds,
        run.pickup_amps,
        run.primary().points.len()
    ));

    out.push_str("\nCurves:\n");
    for (i, s) in run.series.iter().enumerate() {
        let marker = if i == 0 { "*" } else { " " };
        let d = &s.curve.definition;
        let (t_min, t_max) = time_span(s.defined_points().map(|(_, t)| t));
        out.push_str(&format!(
            "{marker} {:<32} a={} b={} c={} p={} | t=[{}, {}]s\n",
            curve_label(&s.curve),
            d.a,
            d.b,
            d.c,
            d.p,
            fmt_seconds(t_min),
            fmt_seconds(t_max),
        ));
    }

    if let Some(op) = &run.operating_point {
        out.push_str("\nOperating point:\n");
        if op.clamped {
            out.push_str("- requested current below pickup; clamped to pickup\n");
        }
        out.push_str(&format!(
            "- I={:.3} A (M={:.4}) -> {}\n",
            op.current_amps,
            op.multiple,
            match op.time {
                OperatingTime::Time(t) => format!("{t:.4} s"),
                OperatingTime::Undefined => "undefined at pickup".to_string(),
            }
        ));
    }

    out
}

fn curve_label(curve: &NamedCurve) -> String {
    match &curve.code {
        Some(code) => format!("{} ({code})", curve.name),
        None => curve.name.clone(),
    }
}

fn time_span(times: impl Iterator<Item = f64>) -> (Option<f64>, Option<f64>) {
    times.fold((None, None), |(lo, hi), t| {
        (
            Some(lo.map_or(t, |v: f64| v.min(t))),
            Some(hi.map_or(t, |v: f64| v.max(t))),
        )
    })
}

fn fmt_seconds(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v:.3}"),
        _ => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
