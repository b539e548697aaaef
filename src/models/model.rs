//! Nelson–Siegel model evaluation.
//!
//! The curve is
//!
//! ```text
//! y(t) = β0 + exp(-t/τ) · (β1 + β2 · t/τ)
//! ```
//!
//! The fitter relies on two primitive operations:
//! - predict `y(t)` given the parameters (for residuals/plots)
//! - the gradient of `y(t)` with respect to `(β0, β1, β2, τ)` (Jacobian rows)
//!
//! No guard is applied for `τ = 0`: the result follows IEEE semantics and
//! callers validate `τ` at their own boundary.

use crate::domain::{NelsonSiegelParams, PARAM_COUNT};

/// Evaluate the model at a single maturity.
pub fn nelson_siegel(t: f64, beta0: f64, beta1: f64, beta2: f64, tau: f64) -> f64 {
    let x = t / tau;
    beta0 + (-x).exp() * (beta1 + beta2 * x)
}

/// Evaluate the model for a parameter set.
pub fn predict(t: f64, params: &NelsonSiegelParams) -> f64 {
    nelson_siegel(t, params.beta0, params.beta1, params.beta2, params.tau)
}

/// Evaluate the model elementwise over a slice of maturities.
pub fn nelson_siegel_curve(maturities: &[f64], params: &NelsonSiegelParams) -> Vec<f64> {
    maturities.iter().map(|&t| predict(t, params)).collect()
}

/// Partial derivatives `∂y/∂(β0, β1, β2, τ)` at maturity `t`.
pub fn gradient(t: f64, params: &NelsonSiegelParams) -> [f64; PARAM_COUNT] {
    let tau = params.tau;
    let x = t / tau;
    let e = (-x).exp();
    [
        1.0,
        e,
        e * x,
        e * (t / (tau * tau)) * (params.beta1 + params.beta2 * (x - 1.0)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_at_zero_is_level_plus_slope() {
        for &tau in &[0.3, 1.0, 4.0, -2.0] {
            let y = nelson_siegel(0.0, 2.0, -1.5, 0.7, tau);
            assert!((y - 0.5).abs() < 1e-15, "tau={tau}: got {y}");
        }
    }

    #[test]
    fn long_end_tends_to_level() {
        let y = nelson_siegel(500.0, 2.25, -1.8, 3.0, 1.5);
        assert!((y - 2.25).abs() < 1e-12, "got {y}");
    }

    #[test]
    fn zero_tau_is_not_finite() {
        assert!(!nelson_siegel(1.0, 1.0, 1.0, 1.0, 0.0).is_finite());
        assert!(nelson_siegel(0.0, 1.0, 1.0, 1.0, 0.0).is_nan());
    }

    #[test]
    fn curve_is_elementwise() {
        let params = NelsonSiegelParams::new(2.0, -1.0, 0.5, 2.0);
        let ts = [0.5, 1.0, 10.0];
        let ys = nelson_siegel_curve(&ts, &params);
        assert_eq!(ys.len(), ts.len());
        for (t, y) in ts.iter().zip(&ys) {
            assert_eq!(*y, predict(*t, &params));
        }
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let params = NelsonSiegelParams::new(2.5, -2.0, 1.0, 2.0);
        let h = 1e-6;
        for &t in &[0.5, 3.0, 10.0] {
            let g = gradient(t, &params);
            for k in 0..PARAM_COUNT {
                let mut up = params.to_array();
                let mut dn = params.to_array();
                up[k] += h;
                dn[k] -= h;
                let fd = (predict(t, &NelsonSiegelParams::from_slice(&up))
                    - predict(t, &NelsonSiegelParams::from_slice(&dn)))
                    / (2.0 * h);
                assert!((g[k] - fd).abs() < 1e-7, "t={t} k={k}: {} vs {fd}", g[k]);
            }
        }
    }
}
