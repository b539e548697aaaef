//! Nelson–Siegel calibration.
//!
//! Given:
//! - maturities `t_i`
//! - observed rates `y_i`
//! - an initial guess `p0 = (β0, β1, β2, τ)`
//!
//! we minimize `Σ (y_i - y(t_i; p))²` jointly over all four parameters with
//! Levenberg–Marquardt, then estimate the parameter covariance at the optimum
//! as `pinv(JᵀJ) · SSE / (m - 4)`.
//!
//! The objective is non-convex in `τ`, so the initial guess matters: a poor
//! guess may land in a different local optimum (for example `|τ| → ∞`, where
//! the curve degenerates to a straight line).

use nalgebra::DMatrix;
use tracing::{debug, warn};

use crate::domain::{FitResult, NelsonSiegelParams, Observations, PARAM_COUNT};
use crate::error::AppError;
use crate::fit::lm::{LmOptions, levenberg_marquardt};
use crate::math::normal_pseudo_inverse;
use crate::models::{gradient, predict};

/// Fit the Nelson–Siegel model to `observations` starting from `initial`.
pub fn fit_nelson_siegel(
    observations: &Observations,
    initial: NelsonSiegelParams,
    options: &LmOptions,
) -> Result<FitResult, AppError> {
    if !initial.is_finite() {
        return Err(AppError::precondition(format!(
            "Initial guess must be finite, got {initial:?}."
        )));
    }
    if initial.tau == 0.0 {
        return Err(AppError::precondition(
            "Initial tau must be non-zero (t/tau is undefined).",
        ));
    }
    let m = observations.len();
    if m < PARAM_COUNT {
        return Err(AppError::precondition(format!(
            "Need at least {PARAM_COUNT} observations to fit {PARAM_COUNT} parameters, got {m}."
        )));
    }

    let tenors = observations.maturities();
    let rates = observations.rates();

    let residual_fn = |p: &[f64]| -> Vec<f64> {
        let params = NelsonSiegelParams::from_slice(p);
        tenors
            .iter()
            .zip(rates)
            .map(|(&t, &y)| y - predict(t, &params))
            .collect()
    };
    // Residuals are `y - model`, so the residual Jacobian is the negated model gradient.
    let jacobian_fn = |p: &[f64]| -> DMatrix<f64> {
        let params = NelsonSiegelParams::from_slice(p);
        let mut jac = DMatrix::<f64>::zeros(m, PARAM_COUNT);
        for (i, &t) in tenors.iter().enumerate() {
            let g = gradient(t, &params);
            for (j, gj) in g.iter().enumerate() {
                jac[(i, j)] = -gj;
            }
        }
        jac
    };

    let solution = levenberg_marquardt(&initial.to_array(), options, residual_fn, jacobian_fn)?;

    let params = NelsonSiegelParams::from_slice(&solution.x);
    if !params.is_finite() || params.tau == 0.0 {
        return Err(AppError::convergence(format!(
            "Fit did not converge to a usable optimum: {params:?}."
        )));
    }
    debug!(
        iterations = solution.iterations,
        sse = solution.sse,
        termination = ?solution.termination,
        "nelson-siegel fit converged"
    );

    let covariance = estimate_covariance(&solution.jacobian, solution.sse, m);

    Ok(FitResult {
        params,
        initial_guess: initial,
        covariance,
        sse: solution.sse,
        rmse: (solution.sse / m as f64).sqrt(),
        iterations: solution.iterations,
        termination: solution.termination,
    })
}

/// Covariance `pinv(JᵀJ) · SSE / (m - n)`.
///
/// With no residual degrees of freedom (`m == n`) the variance of the
/// residuals is unknown and every entry is `+inf`.
fn estimate_covariance(
    jacobian: &DMatrix<f64>,
    sse: f64,
    m: usize,
) -> [[f64; PARAM_COUNT]; PARAM_COUNT] {
    let mut out = [[f64::INFINITY; PARAM_COUNT]; PARAM_COUNT];
    if m <= PARAM_COUNT {
        warn!(m, "no residual degrees of freedom; covariance is undefined");
        return out;
    }

    let (pinv, rank) = normal_pseudo_inverse(jacobian);
    if rank < PARAM_COUNT {
        warn!(rank, "jacobian is rank deficient at the optimum; covariance uses a pseudo-inverse");
    }

    let sigma2 = sse / (m - PARAM_COUNT) as f64;
    for (i, row) in out.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = pinv[(i, j)] * sigma2;
        }
    }
    out
}
