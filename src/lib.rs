//! `relay-curves` library crate.
//!
//! Inverse-time overcurrent relay curves (US / IEC families): a pure curve
//! evaluator plus the catalog, sampling, plotting and export layers built on it.
//!
//! The binary (`tcc`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the evaluator is reusable without any of the terminal front-ends

pub mod app;
pub mod cli;
pub mod curves;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;

pub use curves::{CurveCatalog, CurveError, evaluate, evaluate_point};
pub use domain::{CurveDefinition, OperatingTime};
