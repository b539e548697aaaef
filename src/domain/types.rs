//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting and interpolation
//! - dumped to JSON for an external plotting step

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Number of Nelson–Siegel parameters `(β0, β1, β2, τ)`.
pub const PARAM_COUNT: usize = 4;

/// A validated set of `(maturity, rate)` observations.
///
/// Maturities are in years, rates in percentage points. Both vectors have the
/// same length, are non-empty and contain only finite values. Ordering is not
/// enforced here; the spline builder checks it separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observations {
    maturities: Vec<f64>,
    rates: Vec<f64>,
}

impl Observations {
    pub fn new(maturities: Vec<f64>, rates: Vec<f64>) -> Result<Self, AppError> {
        if maturities.len() != rates.len() {
            return Err(AppError::precondition(format!(
                "Observation length mismatch: {} maturities vs {} rates.",
                maturities.len(),
                rates.len()
            )));
        }
        if maturities.is_empty() {
            return Err(AppError::precondition("No observations supplied."));
        }
        if let Some(t) = maturities.iter().find(|t| !t.is_finite()) {
            return Err(AppError::precondition(format!("Non-finite maturity: {t}.")));
        }
        if let Some(y) = rates.iter().find(|y| !y.is_finite()) {
            return Err(AppError::precondition(format!("Non-finite rate: {y}.")));
        }
        Ok(Self { maturities, rates })
    }

    pub fn maturities(&self) -> &[f64] {
        &self.maturities
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn len(&self) -> usize {
        self.maturities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maturities.is_empty()
    }
}

/// Nelson–Siegel coefficients.
///
/// - `beta0`: long-run level
/// - `beta1`: short-end slope contribution
/// - `beta2`: curvature contribution
/// - `tau`: decay scale (must be non-zero)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NelsonSiegelParams {
    pub beta0: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub tau: f64,
}

impl NelsonSiegelParams {
    pub fn new(beta0: f64, beta1: f64, beta2: f64, tau: f64) -> Self {
        Self {
            beta0,
            beta1,
            beta2,
            tau,
        }
    }

    pub fn to_array(self) -> [f64; PARAM_COUNT] {
        [self.beta0, self.beta1, self.beta2, self.tau]
    }

    /// Build from a parameter vector in `(β0, β1, β2, τ)` order.
    ///
    /// # Panics
    /// Panics if `p` has fewer than four elements.
    pub fn from_slice(p: &[f64]) -> Self {
        Self::new(p[0], p[1], p[2], p[3])
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

/// Why the Levenberg–Marquardt loop stopped successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Gradient `Jᵀr` vanished (within `gtol`).
    Gradient,
    /// Relative SSE reduction of an accepted step fell below `ftol`.
    CostReduction,
    /// Step size fell below `xtol` relative to the parameter norm.
    StepSize,
}

/// Output of a successful Nelson–Siegel fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    pub params: NelsonSiegelParams,
    pub initial_guess: NelsonSiegelParams,
    /// Parameter covariance in `(β0, β1, β2, τ)` order.
    pub covariance: [[f64; PARAM_COUNT]; PARAM_COUNT],
    pub sse: f64,
    pub rmse: f64,
    pub iterations: usize,
    pub termination: Termination,
}

impl FitResult {
    /// One-sigma parameter uncertainties (square root of the covariance diagonal).
    pub fn standard_errors(&self) -> [f64; PARAM_COUNT] {
        let mut out = [0.0; PARAM_COUNT];
        for (i, v) in out.iter_mut().enumerate() {
            *v = self.covariance[i][i].sqrt();
        }
        out
    }
}

/// Boundary condition closing the cubic spline system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SplineBoundary {
    /// Third derivative continuous across the first and last interior knots.
    #[default]
    NotAKnot,
    /// Zero second derivative at both end knots.
    Natural,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub max_iterations: usize,
    pub ftol: f64,
    pub xtol: f64,
    pub spline_points: usize,
    pub curve_points: usize,
    pub boundary: SplineBoundary,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            ftol: 1e-8,
            xtol: 1e-8,
            spline_points: 100,
            curve_points: 100,
            boundary: SplineBoundary::NotAKnot,
        }
    }
}

/// A sampled `(x, y)` series handed to an external plotting step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn observations_reject_length_mismatch() {
        let err = Observations::new(vec![1.0, 2.0], vec![0.5]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
    }

    #[test]
    fn observations_reject_non_finite() {
        let err = Observations::new(vec![1.0, f64::NAN], vec![0.5, 0.6]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert!(Observations::new(vec![], vec![]).is_err());
    }

    #[test]
    fn standard_errors_are_sqrt_of_diagonal() {
        let mut covariance = [[0.0; PARAM_COUNT]; PARAM_COUNT];
        covariance[0][0] = 4.0;
        covariance[1][1] = 9.0;
        covariance[2][2] = 0.25;
        covariance[3][3] = 1.0;
        let fit = FitResult {
            params: NelsonSiegelParams::new(1.0, 0.0, 0.0, 1.0),
            initial_guess: NelsonSiegelParams::new(1.0, 0.0, 0.0, 1.0),
            covariance,
            sse: 0.0,
            rmse: 0.0,
            iterations: 0,
            termination: Termination::Gradient,
        };
        assert_eq!(fit.standard_errors(), [2.0, 3.0, 0.5, 1.0]);
    }
}
