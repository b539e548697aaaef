//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::RunOutput;
use crate::domain::{FitResult, NelsonSiegelParams};
use crate::error::AppError;

/// The one-line parameter summary printed by every run.
pub fn format_parameters(params: &NelsonSiegelParams) -> String {
    format!(
        "Estimated parameters: beta0={}, beta1={}, beta2={}, tau={}",
        params.beta0, params.beta1, params.beta2, params.tau
    )
}

/// Fit diagnostics: quality, uncertainties, solver stats.
pub fn format_fit_diagnostics(fit: &FitResult) -> String {
    let mut out = String::new();
    let se = fit.standard_errors();
    out.push_str(&format!(
        "SSE: {:.6e}  RMSE: {:.6e}  iterations: {} ({:?})\n",
        fit.sse, fit.rmse, fit.iterations, fit.termination
    ));
    out.push_str(&format!(
        "Std errors: beta0={:.4e}, beta1={:.4e}, beta2={:.4e}, tau={:.4e}",
        se[0], se[1], se[2], se[3]
    ));
    out
}

/// Full text summary of a run.
pub fn format_run_summary(run: &RunOutput) -> String {
    let mut out = String::new();
    out.push_str(&format_parameters(&run.fit.params));
    out.push('\n');
    out.push_str(&format_fit_diagnostics(&run.fit));
    out.push('\n');
    out.push_str(&format!(
        "Cubic spline ({:?}): {} knots, {} samples on [{}, {}]",
        run.spline.boundary(),
        run.spline.knots().len(),
        run.spline_curve.x.len(),
        run.spline.x_min(),
        run.spline.x_max()
    ));
    out
}

/// Pretty JSON dump of every output in a run.
pub fn format_run_json(run: &RunOutput) -> Result<String, AppError> {
    serde_json::to_string_pretty(run)
        .map_err(|e| AppError::precondition(format!("Failed to serialize run output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_line_has_reference_shape() {
        let line = format_parameters(&NelsonSiegelParams::new(2.5, -2.0, 1.0, 0.5));
        assert_eq!(line, "Estimated parameters: beta0=2.5, beta1=-2, beta2=1, tau=0.5");
    }
}
