//! Curve fitting.
//!
//! Responsibilities:
//!
//! - generic Levenberg–Marquardt solver (`lm`)
//! - Nelson–Siegel calibration and covariance estimate (`fitter`)

pub mod fitter;
pub mod lm;

pub use fitter::*;
pub use lm::*;
