//! Mathematical utilities: linear solves and sampling grids.

pub mod grid;
pub mod linalg;

pub use grid::*;
pub use linalg::*;
