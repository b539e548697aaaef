//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - validated observation sets (`Observations`)
//! - model parameters and fit outputs (`NelsonSiegelParams`, `FitResult`)
//! - spline configuration and sampled output (`SplineBoundary`, `CurveGrid`)

pub mod types;

pub use types::*;
