//! Sampling grids for plotting series.

use crate::error::AppError;

/// Generate `steps` evenly spaced points between `start` and `end` (inclusive).
pub fn lin_space(start: f64, end: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(start.is_finite() && end.is_finite()) {
        return Err(AppError::precondition(format!(
            "Invalid grid range: start={start}, end={end} (must be finite)."
        )));
    }
    if steps < 2 {
        return Err(AppError::precondition("Grid steps must be >= 2."));
    }

    let step = (end - start) / (steps as f64 - 1.0);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps - 1 {
        out.push(start + step * i as f64);
    }
    // Pin the last point so the endpoint is exact.
    out.push(end);
    Ok(out)
}
