//! Inverse-time overcurrent curves: evaluation and the curve catalog.
//!
//! The evaluator is a pure function; everything else in the crate is a
//! caller of it and never re-implements the curve formulas.

pub mod catalog;
pub mod error;
pub mod evaluate;

pub use catalog::CurveCatalog;
pub use error::CurveError;
pub use evaluate::{evaluate, evaluate_point};
