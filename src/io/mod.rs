//! Input/output helpers.
//!
//! - user curve catalog JSON (`catalog`)
//! - CSV exports (`export`)
//! - curve JSON read/write (`curve`)

pub mod catalog;
pub mod curve;
pub mod export;

pub use catalog::*;
pub use curve::*;
pub use export::*;
