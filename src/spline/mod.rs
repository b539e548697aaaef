//! Piecewise-cubic interpolation through observed points.

pub mod cubic;

pub use cubic::*;
