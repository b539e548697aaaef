//! Small dense/banded linear algebra helpers.
//!
//! - `solve_tridiagonal`: Thomas algorithm for the spline second-derivative system.
//! - `normal_pseudo_inverse`: `pinv(JᵀJ)` via the SVD of `J`, used for the
//!   parameter covariance at the optimum.
//!
//! For the covariance we go through the SVD of the Jacobian rather than
//! inverting `JᵀJ` directly. Nelson–Siegel fits can end up with nearly
//! collinear columns (large `|τ|` makes the slope and curvature loadings
//! almost proportional), and forming `JᵀJ` squares the condition number.

use nalgebra::DMatrix;

use crate::error::AppError;

/// Pivot magnitude below which the tridiagonal system is treated as singular.
const PIVOT_EPS: f64 = 1e-14;

/// Solve a tridiagonal system with the Thomas algorithm.
///
/// `lower[0]` and `upper[n - 1]` are ignored. All slices must have the same length.
pub fn solve_tridiagonal(
    lower: &[f64],
    diag: &[f64],
    upper: &[f64],
    rhs: &[f64],
) -> Result<Vec<f64>, AppError> {
    let n = diag.len();
    if lower.len() != n || upper.len() != n || rhs.len() != n {
        return Err(AppError::precondition(
            "Tridiagonal input lengths must match.",
        ));
    }
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut c_star = vec![0.0; n];
    let mut d_star = vec![0.0; n];

    if diag[0].abs() <= PIVOT_EPS {
        return Err(AppError::precondition("Tridiagonal system is singular."));
    }
    c_star[0] = if n > 1 { upper[0] / diag[0] } else { 0.0 };
    d_star[0] = rhs[0] / diag[0];

    for i in 1..n {
        let denom = diag[i] - lower[i] * c_star[i - 1];
        if denom.abs() <= PIVOT_EPS {
            return Err(AppError::precondition("Tridiagonal system is singular."));
        }
        c_star[i] = if i < n - 1 { upper[i] / denom } else { 0.0 };
        d_star[i] = (rhs[i] - lower[i] * d_star[i - 1]) / denom;
    }

    let mut out = vec![0.0; n];
    out[n - 1] = d_star[n - 1];
    for i in (0..n - 1).rev() {
        out[i] = d_star[i] - c_star[i] * out[i + 1];
    }
    Ok(out)
}

/// Pseudo-inverse of `JᵀJ` computed from the SVD of `J`.
///
/// Singular values below `ε · max(m, n) · s_max` are discarded. Returns the
/// matrix together with the numerical rank that was kept.
pub fn normal_pseudo_inverse(jacobian: &DMatrix<f64>) -> (DMatrix<f64>, usize) {
    let (m, n) = jacobian.shape();
    let svd = jacobian.clone().svd(false, true);
    let Some(v_t) = svd.v_t else {
        return (DMatrix::from_element(n, n, f64::INFINITY), 0);
    };

    let s_max = svd.singular_values.iter().cloned().fold(0.0_f64, f64::max);
    let threshold = f64::EPSILON * m.max(n) as f64 * s_max;

    let mut out = DMatrix::<f64>::zeros(n, n);
    let mut rank = 0;
    for (k, &s) in svd.singular_values.iter().enumerate() {
        if !(s > threshold) {
            continue;
        }
        rank += 1;
        let inv_s2 = 1.0 / (s * s);
        let row = v_t.row(k);
        for i in 0..n {
            for j in 0..n {
                out[(i, j)] += row[i] * row[j] * inv_s2;
            }
        }
    }
    (out, rank)
}
