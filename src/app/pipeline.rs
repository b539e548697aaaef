//! Shared run logic, independent of how results are presented.
//!
//! The two procedures are independent:
//! reference set A -> Nelson–Siegel fit -> fitted samples
//! reference set B -> cubic spline -> spline samples
//!
//! Either failing aborts the run.

use serde::Serialize;
use tracing::info;

use crate::data::{
    SPLINE_GRID_END, SPLINE_GRID_START, initial_guess, spline_observations,
    yield_curve_observations,
};
use crate::domain::{CurveGrid, FitResult, Observations, RunConfig};
use crate::error::AppError;
use crate::fit::{LmOptions, fit_nelson_siegel};
use crate::math::lin_space;
use crate::models::nelson_siegel_curve;
use crate::spline::CubicSpline;

/// All computed outputs of a single run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    pub fit_observations: Observations,
    pub fit: FitResult,
    /// Fitted curve at the observed maturities.
    pub fitted_at_observations: CurveGrid,
    /// Fitted curve on an even grid spanning the observed maturities.
    pub fitted_curve: CurveGrid,
    pub spline_observations: Observations,
    pub spline: CubicSpline,
    pub spline_curve: CurveGrid,
}

/// Translate run configuration into solver options.
pub fn lm_options(config: &RunConfig) -> LmOptions {
    LmOptions {
        max_iterations: config.max_iterations,
        ftol: config.ftol,
        xtol: config.xtol,
        ..LmOptions::default()
    }
}

/// Execute both procedures on the reference datasets.
pub fn run(config: &RunConfig) -> Result<RunOutput, AppError> {
    run_with(
        config,
        yield_curve_observations()?,
        spline_observations()?,
    )
}

/// Execute both procedures on caller-supplied datasets.
pub fn run_with(
    config: &RunConfig,
    fit_observations: Observations,
    spline_observations: Observations,
) -> Result<RunOutput, AppError> {
    // 1) Nelson–Siegel fit.
    let fit = fit_nelson_siegel(&fit_observations, initial_guess(), &lm_options(config))?;
    info!(
        beta0 = fit.params.beta0,
        beta1 = fit.params.beta1,
        beta2 = fit.params.beta2,
        tau = fit.params.tau,
        iterations = fit.iterations,
        "nelson-siegel fit complete"
    );

    let maturities = fit_observations.maturities();
    let fitted_at_observations = CurveGrid {
        x: maturities.to_vec(),
        y: nelson_siegel_curve(maturities, &fit.params),
    };
    let (t_min, t_max) = range(maturities);
    let curve_x = lin_space(t_min, t_max, config.curve_points)?;
    let fitted_curve = CurveGrid {
        y: nelson_siegel_curve(&curve_x, &fit.params),
        x: curve_x,
    };

    // 2) Cubic spline.
    let spline = CubicSpline::new(
        spline_observations.maturities(),
        spline_observations.rates(),
        config.boundary,
    )?;
    let spline_x = lin_space(SPLINE_GRID_START, SPLINE_GRID_END, config.spline_points)?;
    let spline_curve = CurveGrid {
        y: spline.evaluate(&spline_x),
        x: spline_x,
    };
    info!(
        knots = spline.knots().len(),
        samples = spline_curve.x.len(),
        boundary = ?config.boundary,
        "cubic spline built"
    );

    Ok(RunOutput {
        fit_observations,
        fit,
        fitted_at_observations,
        fitted_curve,
        spline_observations,
        spline,
        spline_curve,
    })
}

fn range(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SplineBoundary;
    use crate::error::ErrorKind;

    #[test]
    fn reference_run_produces_every_series() {
        let out = run(&RunConfig::default()).unwrap();

        assert!(out.fit.params.is_finite());
        assert_eq!(out.fitted_at_observations.y.len(), 7);
        assert_eq!(out.fitted_curve.x.len(), 100);
        assert_eq!(out.fitted_curve.x[0], 0.5);
        assert_eq!(out.fitted_curve.x[99], 10.0);

        assert_eq!(out.spline_curve.x.len(), 100);
        assert_eq!(out.spline_curve.y[0], 0.5);
        assert_eq!(out.spline_curve.y[99], 2.0);
        assert_eq!(out.spline.boundary(), SplineBoundary::NotAKnot);
    }

    #[test]
    fn run_output_serializes_to_json() {
        let out = run(&RunConfig::default()).unwrap();
        let json = serde_json::to_value(&out).unwrap();
        assert!(json["fit"]["params"]["tau"].is_number());
        assert_eq!(json["spline"]["boundary"], "not-a-knot");
        assert_eq!(json["spline_curve"]["x"].as_array().unwrap().len(), 100);
    }

    #[test]
    fn malformed_spline_set_aborts_the_run() {
        let bad = Observations::new(vec![1.0, 1.0, 5.0], vec![0.5, 1.0, 1.5]).unwrap();
        let err = run_with(
            &RunConfig::default(),
            yield_curve_observations().unwrap(),
            bad,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
    }

    #[test]
    fn tiny_iteration_budget_aborts_the_run() {
        let config = RunConfig {
            max_iterations: 1,
            ..RunConfig::default()
        };
        assert_eq!(run(&config).unwrap_err().kind(), ErrorKind::Convergence);
    }
}
