//! Levenberg–Marquardt nonlinear least squares.
//!
//! Minimizes `Σ r_i(x)²` given closures for the residual vector and its
//! Jacobian `∂r/∂x`. Each iteration solves the damped normal equations
//!
//! ```text
//! (JᵀJ + λ · diag(JᵀJ)) δ = -Jᵀr
//! ```
//!
//! and accepts `x + δ` only if it lowers the sum of squares. Accepted steps
//! shrink `λ` (towards Gauss–Newton), rejected steps grow it (towards scaled
//! gradient descent).
//!
//! Non-convergence is always an error: the caller never receives the last
//! iterate dressed up as an optimum.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::Termination;
use crate::error::AppError;

/// Floor for diagonal entries used in Marquardt scaling (keeps flat directions damped).
const DIAG_FLOOR: f64 = 1e-12;

#[derive(Debug, Clone, Copy)]
pub struct LmOptions {
    /// Maximum number of Jacobian evaluations (outer iterations).
    pub max_iterations: usize,
    pub initial_lambda: f64,
    pub lambda_up: f64,
    pub lambda_down: f64,
    pub min_lambda: f64,
    /// Damping ceiling; exceeding it means no acceptable step exists.
    pub max_lambda: f64,
    /// Relative SSE reduction tolerance.
    pub ftol: f64,
    /// Relative step-size tolerance.
    pub xtol: f64,
    /// Gradient infinity-norm tolerance.
    pub gtol: f64,
}

impl Default for LmOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            initial_lambda: 1e-3,
            lambda_up: 10.0,
            lambda_down: 0.1,
            min_lambda: 1e-12,
            max_lambda: 1e16,
            ftol: 1e-8,
            xtol: 1e-8,
            gtol: 1e-12,
        }
    }
}

/// A converged least-squares solution.
#[derive(Debug, Clone)]
pub struct LmSolution {
    pub x: Vec<f64>,
    pub residuals: Vec<f64>,
    /// Residual Jacobian evaluated at `x`.
    pub jacobian: DMatrix<f64>,
    pub sse: f64,
    pub iterations: usize,
    pub termination: Termination,
}

#[inline]
fn sum_of_squares(residuals: &[f64]) -> f64 {
    residuals.iter().map(|r| r * r).sum()
}

/// Run Levenberg–Marquardt from `initial`.
pub fn levenberg_marquardt<R, J>(
    initial: &[f64],
    options: &LmOptions,
    mut residual_fn: R,
    mut jacobian_fn: J,
) -> Result<LmSolution, AppError>
where
    R: FnMut(&[f64]) -> Vec<f64>,
    J: FnMut(&[f64]) -> DMatrix<f64>,
{
    if initial.is_empty() {
        return Err(AppError::precondition("LM needs at least one parameter."));
    }

    let mut x = initial.to_vec();
    let mut residuals = residual_fn(&x);
    if residuals.is_empty() {
        return Err(AppError::precondition("LM residual function returned no residuals."));
    }
    let mut sse = sum_of_squares(&residuals);
    if !sse.is_finite() {
        return Err(AppError::convergence(
            "Sum of squared residuals is not finite at the initial guess.",
        ));
    }

    let mut lambda = options.initial_lambda.max(options.min_lambda);

    for iteration in 1..=options.max_iterations {
        let jacobian = jacobian_fn(&x);
        if jacobian.iter().any(|v| !v.is_finite()) {
            return Err(AppError::convergence(format!(
                "Jacobian is not finite at iteration {iteration}."
            )));
        }

        let jt = jacobian.transpose();
        let a = &jt * &jacobian;
        let g = &jt * DVector::from_column_slice(&residuals);

        if g.amax() <= options.gtol {
            return Ok(LmSolution {
                x,
                residuals,
                jacobian,
                sse,
                iterations: iteration,
                termination: Termination::Gradient,
            });
        }

        let x_norm = DVector::from_column_slice(&x).norm();
        let neg_g = -&g;

        // Inner loop: raise damping until a step lowers the SSE.
        loop {
            let mut damped = a.clone();
            for i in 0..damped.nrows() {
                damped[(i, i)] += lambda * a[(i, i)].max(DIAG_FLOOR);
            }

            let Some(delta) = damped.lu().solve(&neg_g) else {
                lambda *= options.lambda_up;
                if lambda > options.max_lambda {
                    return Err(AppError::convergence(
                        "Damped normal equations are singular; fit did not converge.",
                    ));
                }
                continue;
            };

            let step_norm = delta.norm();
            let step_small = step_norm <= options.xtol * (options.xtol + x_norm);

            let candidate: Vec<f64> = x.iter().zip(delta.iter()).map(|(a, b)| a + b).collect();
            let candidate_residuals = residual_fn(&candidate);
            let candidate_sse = sum_of_squares(&candidate_residuals);

            if candidate_sse.is_finite() && candidate_sse < sse {
                let reduction = (sse - candidate_sse) / sse;
                x = candidate;
                residuals = candidate_residuals;
                sse = candidate_sse;
                lambda = (lambda * options.lambda_down).max(options.min_lambda);
                debug!(iteration, sse, lambda, step_norm, "lm step accepted");

                let termination = if reduction <= options.ftol {
                    Some(Termination::CostReduction)
                } else if step_small {
                    Some(Termination::StepSize)
                } else {
                    None
                };
                if let Some(termination) = termination {
                    let jacobian = jacobian_fn(&x);
                    return Ok(LmSolution {
                        x,
                        residuals,
                        jacobian,
                        sse,
                        iterations: iteration,
                        termination,
                    });
                }
                break;
            }

            // No improvement even for a negligible step: we sit at a minimum.
            if step_small {
                return Ok(LmSolution {
                    x,
                    residuals,
                    jacobian,
                    sse,
                    iterations: iteration,
                    termination: Termination::StepSize,
                });
            }

            lambda *= options.lambda_up;
            debug!(iteration, candidate_sse, lambda, "lm step rejected");
            if lambda > options.max_lambda {
                return Err(AppError::convergence(format!(
                    "Damping exceeded {:e} without reducing the SSE; fit did not converge.",
                    options.max_lambda
                )));
            }
        }
    }

    Err(AppError::convergence(format!(
        "Fit did not converge within {} iterations (last SSE {sse:e}).",
        options.max_iterations
    )))
}
