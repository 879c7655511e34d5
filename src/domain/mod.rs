//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - curve coefficients and catalog entries (`CurveDefinition`, `NamedCurve`)
//! - evaluation outputs (`OperatingTime`, `Regime`, `CurvePoint`)
//! - run configuration and the saved curve file (`PlotConfig`, `CurveFile`)

pub mod types;

pub use types::*;
