//! Reference datasets.
//!
//! Maturities are in years, rates in percentage points (hundreds of bp).

use crate::domain::{NelsonSiegelParams, Observations};
use crate::error::AppError;

/// Maturities of the Nelson–Siegel fitting set.
pub const FIT_MATURITIES: [f64; 7] = [0.5, 1.0, 2.0, 3.0, 5.0, 7.0, 10.0];
/// Rates of the Nelson–Siegel fitting set.
pub const FIT_RATES: [f64; 7] = [0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];

/// Knots of the spline set.
pub const SPLINE_MATURITIES: [f64; 5] = [1.0, 3.0, 5.0, 7.0, 10.0];
/// Values of the spline set.
pub const SPLINE_RATES: [f64; 5] = [0.5, 1.0, 1.5, 1.75, 2.0];

/// Starting point `(β0, β1, β2, τ)` for the reference fit.
pub const INITIAL_GUESS: [f64; 4] = [0.03, -0.02, 0.02, 1.0];

/// Spline sampling range and density used for plotting.
pub const SPLINE_GRID_START: f64 = 1.0;
pub const SPLINE_GRID_END: f64 = 10.0;
pub const SPLINE_GRID_POINTS: usize = 100;

/// Observation set used for the Nelson–Siegel fit.
pub fn yield_curve_observations() -> Result<Observations, AppError> {
    Observations::new(FIT_MATURITIES.to_vec(), FIT_RATES.to_vec())
}

/// Observation set used for the cubic spline.
pub fn spline_observations() -> Result<Observations, AppError> {
    Observations::new(SPLINE_MATURITIES.to_vec(), SPLINE_RATES.to_vec())
}

pub fn initial_guess() -> NelsonSiegelParams {
    NelsonSiegelParams::from_slice(&INITIAL_GUESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_sets_are_strictly_increasing() {
        for obs in [yield_curve_observations().unwrap(), spline_observations().unwrap()] {
            assert!(obs.maturities().windows(2).all(|w| w[1] > w[0]));
            assert!(obs.rates().windows(2).all(|w| w[1] > w[0]));
        }
    }
}
