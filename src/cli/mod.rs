//! Command-line parsing for the time-current curve tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the evaluation code.
//!
//! Frequently used settings can also come from the environment (or a `.env`
//! file): `TCC_CURVE`, `TCC_TDS`, `TCC_PICKUP`, `TCC_CATALOG`.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{GridKind, GridSpec, PlotConfig, TimeScale};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "tcc",
    version,
    about = "Inverse-time overcurrent relay curves (US / IEC)"
)]
pub struct Cli {
    /// JSON file with additional user-defined curves.
    #[arg(long, global = true, env = "TCC_CATALOG", value_name = "JSON")]
    pub catalog: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the available curves and their coefficients.
    List,
    /// Evaluate operating times for explicit multiples (or currents).
    Eval(EvalArgs),
    /// Render curves as an ASCII plot.
    Plot(PlotArgs),
    /// Write evaluated curves to CSV and/or JSON.
    Export(ExportArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `tcc plot`, but renders results
    /// in a terminal UI using Ratatui.
    Tui(CurveArgs),
}

/// Curve selection and settings shared by every curve-producing command.
#[derive(Debug, Args, Clone)]
pub struct CurveArgs {
    /// Curve name, key or code (e.g. "US Very Inverse", us-very-inverse, U3).
    #[arg(short = 'c', long, env = "TCC_CURVE", default_value = "US Moderately Inverse")]
    pub curve: String,

    /// Additional curves to overlay (repeatable).
    #[arg(short = 'o', long = "overlay", value_name = "CURVE")]
    pub overlays: Vec<String>,

    /// Time-dial setting.
    #[arg(short = 't', long, env = "TCC_TDS", default_value_t = 1.0)]
    pub tds: f64,

    /// Pickup current (A).
    #[arg(short = 'p', long, env = "TCC_PICKUP", default_value_t = 1.0)]
    pub pickup: f64,

    /// Overcurrent (A) to highlight on the primary curve.
    #[arg(short = 'i', long)]
    pub overcurrent: Option<f64>,

    /// Multiple grid spacing.
    #[arg(long, value_enum, default_value_t = GridKind::Log)]
    pub grid: GridKind,

    /// Smallest multiple sampled.
    #[arg(long, default_value_t = 1.05)]
    pub min_multiple: f64,

    /// Largest multiple sampled.
    #[arg(long, default_value_t = 100.0)]
    pub max_multiple: f64,

    /// Number of points for a log grid.
    #[arg(long, default_value_t = 200)]
    pub points: usize,

    /// Step for a linear grid.
    #[arg(long, default_value_t = 1.0)]
    pub step: f64,
}

/// Options for `tcc eval`.
#[derive(Debug, Parser)]
pub struct EvalArgs {
    /// Curve name, key or code.
    #[arg(short = 'c', long, env = "TCC_CURVE", default_value = "US Moderately Inverse")]
    pub curve: String,

    /// Time-dial setting.
    #[arg(short = 't', long, env = "TCC_TDS", default_value_t = 1.0)]
    pub tds: f64,

    /// Pickup current (A); used with `--currents`.
    #[arg(short = 'p', long, env = "TCC_PICKUP", default_value_t = 1.0)]
    pub pickup: f64,

    /// Interpret VALUES as currents in amperes instead of multiples.
    #[arg(long)]
    pub currents: bool,

    /// Multiples of pickup (or currents with `--currents`).
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true, value_name = "VALUES")]
    pub values: Vec<f64>,
}

/// Options for `tcc plot`.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    #[command(flatten)]
    pub curve: CurveArgs,

    /// Plot a curve JSON file produced by `tcc export --json` instead.
    #[arg(long, value_name = "JSON")]
    pub curve_file: Option<PathBuf>,

    /// Time axis scale.
    #[arg(long, value_enum, default_value_t = TimeScale::Log)]
    pub time_scale: TimeScale,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for `tcc export`.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    #[command(flatten)]
    pub curve: CurveArgs,

    /// Write the curve table as CSV.
    #[arg(long, value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Write the curve file as JSON.
    #[arg(long, value_name = "JSON")]
    pub json: Option<PathBuf>,
}

impl CurveArgs {
    pub fn grid_spec(&self) -> GridSpec {
        GridSpec {
            kind: self.grid,
            min: self.min_multiple,
            max: self.max_multiple,
            points: self.points,
            step: self.step,
        }
    }

    /// Build the pipeline configuration from these flags.
    pub fn plot_config(&self) -> PlotConfig {
        PlotConfig {
            curve: self.curve.clone(),
            overlays: self.overlays.clone(),
            tds: self.tds,
            pickup_amps: self.pickup,
            overcurrent_amps: self.overcurrent,
            grid: self.grid_spec(),
            ..PlotConfig::default()
        }
    }
}
