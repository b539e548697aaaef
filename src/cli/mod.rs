//! Command-line parsing for `nsfit`.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! modeling/math code. Flags only tune the run; the datasets are fixed.

use clap::Parser;

use crate::domain::SplineBoundary;

/// Top-level CLI.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "nsfit",
    version,
    about = "Nelson–Siegel yield-curve fit and cubic spline interpolation"
)]
pub struct Cli {
    /// Maximum Levenberg–Marquardt iterations before giving up.
    #[arg(long, default_value_t = 200)]
    pub max_iterations: usize,

    /// Relative SSE reduction tolerance.
    #[arg(long, default_value_t = 1e-8)]
    pub ftol: f64,

    /// Relative step-size tolerance.
    #[arg(long, default_value_t = 1e-8)]
    pub xtol: f64,

    /// Number of evenly spaced points used to sample the spline.
    #[arg(long, default_value_t = 100)]
    pub spline_points: usize,

    /// Number of evenly spaced points used to sample the fitted curve.
    #[arg(long, default_value_t = 100)]
    pub curve_points: usize,

    /// Spline boundary condition.
    #[arg(long, value_enum, default_value_t = SplineBoundary::NotAKnot)]
    pub boundary: SplineBoundary,

    /// Print every output (parameters, covariance, sampled series) as JSON.
    #[arg(long)]
    pub json: bool,
}
