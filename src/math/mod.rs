//! Mathematical utilities: sampling grids for current multiples.

pub mod grid;

pub use grid::*;
