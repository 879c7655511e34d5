//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during evaluation and plotting
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Smallest time-dial setting offered by the interactive front-ends.
pub const TDS_MIN: f64 = 0.5;
/// Largest time-dial setting offered by the interactive front-ends.
pub const TDS_MAX: f64 = 15.0;
/// Time-dial increment used by the interactive front-ends.
pub const TDS_STEP: f64 = 0.5;

/// Inverse-time curve coefficients `(a, b, c, p)`.
///
/// - trip time (multiple `M > 1`): `TDS * (a + b / (M^p - 1))`
/// - reset time (multiple `M < 1`): `TDS * c / (1 - M^2)`
///
/// Published curves always carry non-negative `a`, `b`, `c` and a positive `p`.
/// Use [`CurveDefinition::new`] to build a validated definition from untrusted
/// input; the evaluator re-validates on every call regardless.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveDefinition {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub p: f64,
}

/// Which standard body a catalog curve comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveStandard {
    /// IEEE C37.112 "US" curves (U1..U5).
    Us,
    /// IEC 60255-151 curves (C1..C5).
    Iec,
    /// User-supplied curve loaded from a catalog file.
    Custom,
}

impl CurveStandard {
    pub fn display_name(self) -> &'static str {
        match self {
            CurveStandard::Us => "US",
            CurveStandard::Iec => "IEC",
            CurveStandard::Custom => "custom",
        }
    }
}

/// A catalog entry: a named curve definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedCurve {
    /// Display name, e.g. `US Moderately Inverse`.
    pub name: String,
    /// Short relay code, e.g. `U1` or `C3`.
    pub code: Option<String>,
    pub standard: CurveStandard,
    pub definition: CurveDefinition,
}

impl NamedCurve {
    /// Lookup key derived from the display name (`us-moderately-inverse`).
    pub fn key(&self) -> String {
        slug(&self.name)
    }

    /// `code` if present, otherwise the display name.
    pub fn short_label(&self) -> &str {
        self.code.as_deref().unwrap_or(&self.name)
    }
}

/// Lower-case, dash-separated form of a curve name.
///
/// `"US Short-Time Inverse"` becomes `"us-short-time-inverse"`.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Operating time for a single current multiple.
///
/// Exactly at pickup (`M == 1`) both formulas have a zero denominator and the
/// time is [`OperatingTime::Undefined`]. Callers must handle that case before
/// plotting or comparing values.
///
/// Serializes as a JSON number, or `null` when undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperatingTime {
    /// Operating time in seconds.
    Time(f64),
    /// No finite value (current exactly at pickup).
    Undefined,
}

impl OperatingTime {
    /// Seconds, or `None` when undefined.
    pub fn seconds(self) -> Option<f64> {
        match self {
            OperatingTime::Time(t) => Some(t),
            OperatingTime::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, OperatingTime::Time(_))
    }

    /// Multiply a defined time by `k`; undefined stays undefined.
    pub fn scale(self, k: f64) -> Self {
        match self {
            OperatingTime::Time(t) => OperatingTime::Time(t * k),
            OperatingTime::Undefined => OperatingTime::Undefined,
        }
    }
}

impl fmt::Display for OperatingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatingTime::Time(t) => fmt::Display::fmt(t, f),
            OperatingTime::Undefined => f.pad("-"),
        }
    }
}

/// Which branch of the curve a multiple falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Below pickup: the relay is resetting.
    Reset,
    /// Exactly at pickup.
    Pickup,
    /// Above pickup: the relay is timing toward a trip.
    Trip,
}

impl Regime {
    pub fn of(multiple: f64) -> Self {
        if multiple < 1.0 {
            Regime::Reset
        } else if multiple == 1.0 {
            Regime::Pickup
        } else {
            Regime::Trip
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Regime::Reset => "reset",
            Regime::Pickup => "pickup",
            Regime::Trip => "trip",
        }
    }
}

/// One evaluated point of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub multiple: f64,
    pub time: OperatingTime,
}

/// How to space the sampled current multiples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GridKind {
    /// Log-spaced multiples (matches the usual log multiple axis).
    Log,
    /// Evenly stepped multiples, `min, min + step, ...` below `max`.
    Linear,
}

/// Scale of the time axis in plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeScale {
    Linear,
    Log,
}

/// Sampling domain for the curve plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub kind: GridKind,
    /// Smallest multiple (inclusive).
    pub min: f64,
    /// Largest multiple (inclusive for `Log`, exclusive for `Linear`).
    pub max: f64,
    /// Number of points for `Log`.
    pub points: usize,
    /// Step for `Linear`.
    pub step: f64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            kind: GridKind::Log,
            min: 1.05,
            max: 100.0,
            points: 200,
            step: 1.0,
        }
    }
}

/// A full run’s configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults), or from the TUI settings panel.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Primary curve (catalog name, key, or code).
    pub curve: String,
    /// Additional curves drawn on the same axes.
    pub overlays: Vec<String>,
    pub tds: f64,
    /// Pickup current in amperes.
    pub pickup_amps: f64,
    /// Overcurrent to highlight, in amperes.
    pub overcurrent_amps: Option<f64>,
    pub grid: GridSpec,

    pub time_scale: TimeScale,
    pub plot_width: usize,
    pub plot_height: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            curve: "US Moderately Inverse".to_string(),
            overlays: Vec::new(),
            tds: 1.0,
            pickup_amps: 1.0,
            overcurrent_amps: None,
            grid: GridSpec::default(),
            time_scale: TimeScale::Log,
            plot_width: 100,
            plot_height: 25,
        }
    }
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub tds: f64,
    pub pickup_amps: f64,
    pub series: Vec<CurveFileSeries>,
    pub operating_point: Option<OperatingPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFileSeries {
    pub curve: NamedCurve,
    pub points: Vec<CurvePoint>,
}

/// The highlighted operating condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    /// Overcurrent after clamping to the pickup current, in amperes.
    pub current_amps: f64,
    pub multiple: f64,
    pub time: OperatingTime,
    /// `true` when the requested current was below pickup and got raised to it.
    pub clamped: bool,
}
