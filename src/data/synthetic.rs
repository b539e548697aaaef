//! Synthetic observations drawn from a known Nelson–Siegel curve.
//!
//! Used to check the fitter on perfectly specified problems: with
//! `noise_sd = 0` the rates are exact model values, otherwise i.i.d. Gaussian
//! noise from a seeded RNG is added so runs stay reproducible.

use rand::rngs::StdRng;
use rand::prelude::*;
use rand_distr::Normal;

use crate::domain::{NelsonSiegelParams, Observations};
use crate::error::AppError;
use crate::models::nelson_siegel_curve;

pub fn synthetic_observations(
    params: &NelsonSiegelParams,
    maturities: &[f64],
    noise_sd: f64,
    seed: u64,
) -> Result<Observations, AppError> {
    if !(noise_sd.is_finite() && noise_sd >= 0.0) {
        return Err(AppError::precondition(format!(
            "Noise standard deviation must be finite and >= 0, got {noise_sd}."
        )));
    }

    let mut rates = nelson_siegel_curve(maturities, params);
    if noise_sd > 0.0 {
        let mut rng = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, noise_sd)
            .map_err(|e| AppError::precondition(format!("Noise distribution error: {e}")))?;
        for y in rates.iter_mut() {
            *y += normal.sample(&mut rng);
        }
    }

    Observations::new(maturities.to_vec(), rates)
}
