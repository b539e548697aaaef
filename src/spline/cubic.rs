//! C2 cubic spline interpolation.
//!
//! For knots `x_0 < … < x_{n-1}` each interval `[x_i, x_{i+1}]` carries
//!
//! ```text
//! p_i(x) = a_i + b_i·dx + c_i·dx² + d_i·dx³,   dx = x - x_i
//! ```
//!
//! Construction uses the second-derivative formulation: with `M_i = s''(x_i)`,
//! `h_i = x_{i+1} - x_i` and secant slopes `δ_i`, every interior knot gives
//!
//! ```text
//! h_{i-1} M_{i-1} + 2 (h_{i-1} + h_i) M_i + h_i M_{i+1} = 6 (δ_i - δ_{i-1})
//! ```
//!
//! The boundary condition supplies `M_0` and `M_{n-1}` in terms of interior
//! unknowns, so the remaining system is tridiagonal.
//!
//! Degenerate sizes: two knots give the straight line. Three knots under
//! not-a-knot give the single parabola through them (both extra conditions
//! collapse onto the middle knot).

use serde::Serialize;

use crate::domain::SplineBoundary;
use crate::error::AppError;
use crate::math::solve_tridiagonal;

#[derive(Debug, Clone, Serialize)]
pub struct CubicSpline {
    knots: Vec<f64>,
    values: Vec<f64>,
    /// `[a, b, c, d]` per segment, local coordinate `x - knots[i]`.
    coefficients: Vec<[f64; 4]>,
    boundary: SplineBoundary,
}

impl CubicSpline {
    /// Build the interpolant through `(x[i], y[i])`.
    ///
    /// `x` must be strictly increasing with at least two points.
    pub fn new(x: &[f64], y: &[f64], boundary: SplineBoundary) -> Result<Self, AppError> {
        validate_knots(x, y)?;

        let n = x.len();
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let slopes: Vec<f64> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / h[i]).collect();

        let m = second_derivatives(&h, &slopes, boundary)?;

        let coefficients = (0..n - 1)
            .map(|i| {
                [
                    y[i],
                    slopes[i] - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0,
                    m[i] / 2.0,
                    (m[i + 1] - m[i]) / (6.0 * h[i]),
                ]
            })
            .collect();

        Ok(Self {
            knots: x.to_vec(),
            values: y.to_vec(),
            coefficients,
            boundary,
        })
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn coefficients(&self) -> &[[f64; 4]] {
        &self.coefficients
    }

    pub fn boundary(&self) -> SplineBoundary {
        self.boundary
    }

    pub fn x_min(&self) -> f64 {
        self.knots[0]
    }

    pub fn x_max(&self) -> f64 {
        self.knots[self.knots.len() - 1]
    }

    /// Evaluate at each query point. Points outside the knot range are
    /// extrapolated with the boundary segments.
    pub fn evaluate(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.extrapolate(x)).collect()
    }

    /// Evaluate at `x`, extending the boundary cubics beyond the knot range.
    pub fn extrapolate(&self, x: f64) -> f64 {
        if x == self.x_max() {
            return self.values[self.values.len() - 1];
        }
        self.derivative(x, 0)
    }

    /// Evaluate at `x`, rejecting points outside `[x_min, x_max]`.
    pub fn interpolate(&self, x: f64) -> Result<f64, AppError> {
        if !(x >= self.x_min() && x <= self.x_max()) {
            return Err(AppError::precondition(format!(
                "Query point {x} is outside the spline range [{}, {}].",
                self.x_min(),
                self.x_max()
            )));
        }
        Ok(self.extrapolate(x))
    }

    /// `order`-th derivative at `x` (order 0 is the value itself).
    pub fn derivative(&self, x: f64, order: u32) -> f64 {
        let i = self.locate(x);
        let [a, b, c, d] = self.coefficients[i];
        let dx = x - self.knots[i];
        match order {
            0 => a + dx * (b + dx * (c + dx * d)),
            1 => b + dx * (2.0 * c + dx * 3.0 * d),
            2 => 2.0 * c + 6.0 * d * dx,
            3 => 6.0 * d,
            _ => 0.0,
        }
    }

    /// Segment index `i` with `knots[i] <= x < knots[i + 1]`, clamped to the end segments.
    fn locate(&self, x: f64) -> usize {
        let segments = self.coefficients.len();
        self.knots
            .partition_point(|&k| k <= x)
            .saturating_sub(1)
            .min(segments - 1)
    }
}

fn validate_knots(x: &[f64], y: &[f64]) -> Result<(), AppError> {
    if x.len() != y.len() {
        return Err(AppError::precondition(format!(
            "Spline length mismatch: {} x values vs {} y values.",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(AppError::precondition(format!(
            "Spline needs at least 2 knots, got {}.",
            x.len()
        )));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(AppError::precondition("Spline inputs must be finite."));
    }
    if let Some(i) = x.windows(2).position(|w| w[1] <= w[0]) {
        return Err(AppError::precondition(format!(
            "Spline knots must be strictly increasing: x[{i}]={} >= x[{}]={}.",
            x[i],
            i + 1,
            x[i + 1]
        )));
    }
    Ok(())
}

/// Solve for `M_i = s''(x_i)` at every knot.
fn second_derivatives(
    h: &[f64],
    slopes: &[f64],
    boundary: SplineBoundary,
) -> Result<Vec<f64>, AppError> {
    let n = h.len() + 1;
    if n == 2 {
        return Ok(vec![0.0; 2]);
    }
    if n == 3 && boundary == SplineBoundary::NotAKnot {
        let curvature = 2.0 * (slopes[1] - slopes[0]) / (h[0] + h[1]);
        return Ok(vec![curvature; 3]);
    }

    let k = n - 2;
    let mut lower = vec![0.0; k];
    let mut diag = vec![0.0; k];
    let mut upper = vec![0.0; k];
    let mut rhs = vec![0.0; k];
    for r in 0..k {
        let i = r + 1;
        lower[r] = h[i - 1];
        diag[r] = 2.0 * (h[i - 1] + h[i]);
        upper[r] = h[i];
        rhs[r] = 6.0 * (slopes[i] - slopes[i - 1]);
    }

    match boundary {
        SplineBoundary::Natural => {
            let interior = solve_tridiagonal(&lower, &diag, &upper, &rhs)?;
            let mut m = Vec::with_capacity(n);
            m.push(0.0);
            m.extend(interior);
            m.push(0.0);
            Ok(m)
        }
        SplineBoundary::NotAKnot => {
            // Left: (M1 - M0)/h0 = (M2 - M1)/h1, eliminated from the first row.
            let (h0, h1) = (h[0], h[1]);
            diag[0] = (h0 + h1) * (h0 + 2.0 * h1) / h1;
            upper[0] = (h1 * h1 - h0 * h0) / h1;
            // Right: mirror image on the last two intervals.
            let (ha, hb) = (h[n - 3], h[n - 2]);
            lower[k - 1] = (ha * ha - hb * hb) / ha;
            diag[k - 1] = (ha + hb) * (2.0 * ha + hb) / ha;

            let interior = solve_tridiagonal(&lower, &diag, &upper, &rhs)?;
            let m_first = ((h0 + h1) * interior[0] - h0 * interior[1]) / h1;
            let m_last = ((ha + hb) * interior[k - 1] - hb * interior[k - 2]) / ha;

            let mut m = Vec::with_capacity(n);
            m.push(m_first);
            m.extend(interior);
            m.push(m_last);
            Ok(m)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SPLINE_MATURITIES, SPLINE_RATES};
    use crate::error::ErrorKind;
    use crate::math::lin_space;

    fn reference_spline(boundary: SplineBoundary) -> CubicSpline {
        CubicSpline::new(&SPLINE_MATURITIES, &SPLINE_RATES, boundary).unwrap()
    }

    #[test]
    fn reproduces_reference_knots() {
        let s = reference_spline(SplineBoundary::NotAKnot);
        assert_eq!(s.extrapolate(5.0), 1.5);
        assert_eq!(s.extrapolate(1.0), 0.5);
        assert_eq!(s.extrapolate(10.0), 2.0);

        let ys = s.evaluate(&SPLINE_MATURITIES);
        for (got, want) in ys.iter().zip(SPLINE_RATES) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn natural_spline_hits_knots_with_flat_ends() {
        let s = reference_spline(SplineBoundary::Natural);
        for (x, y) in SPLINE_MATURITIES.iter().zip(SPLINE_RATES) {
            assert!((s.interpolate(*x).unwrap() - y).abs() < 1e-9);
        }
        assert!(s.derivative(1.0, 2).abs() < 1e-12);
        assert!(s.derivative(10.0, 2).abs() < 1e-12);
    }

    #[test]
    fn derivatives_are_continuous_across_interior_knots() {
        for boundary in [SplineBoundary::NotAKnot, SplineBoundary::Natural] {
            let s = reference_spline(boundary);
            let eps = 1e-9;
            for &k in &SPLINE_MATURITIES[1..SPLINE_MATURITIES.len() - 1] {
                for order in 0..=2 {
                    let left = s.derivative(k - eps, order);
                    let right = s.derivative(k + eps, order);
                    assert!(
                        (left - right).abs() < 1e-6,
                        "{boundary:?} order {order} at {k}: {left} vs {right}"
                    );
                }
            }
        }
    }

    #[test]
    fn not_a_knot_has_single_cubic_over_end_pairs() {
        let s = reference_spline(SplineBoundary::NotAKnot);
        let c = s.coefficients();
        let last = c.len() - 1;
        assert!((c[0][3] - c[1][3]).abs() < 1e-12);
        assert!((c[last][3] - c[last - 1][3]).abs() < 1e-12);
    }

    #[test]
    fn not_a_knot_reproduces_cubic_polynomials() {
        let f = |t: f64| 0.3 * t * t * t - 2.0 * t * t + t - 4.0;
        let xs = [0.0, 0.5, 2.0, 2.2, 4.0, 7.5];
        let ys: Vec<f64> = xs.iter().map(|&t| f(t)).collect();
        let s = CubicSpline::new(&xs, &ys, SplineBoundary::NotAKnot).unwrap();
        for q in lin_space(-1.0, 8.0, 91).unwrap() {
            assert!((s.extrapolate(q) - f(q)).abs() < 1e-9, "at {q}");
        }
    }

    #[test]
    fn small_knot_sets_degrade_gracefully() {
        let line = CubicSpline::new(&[1.0, 3.0], &[1.0, 2.0], SplineBoundary::NotAKnot).unwrap();
        assert!((line.extrapolate(2.0) - 1.5).abs() < 1e-12);
        assert!((line.extrapolate(5.0) - 3.0).abs() < 1e-12);

        let g = |t: f64| 1.0 - t + 0.5 * t * t;
        let xs = [0.0, 1.0, 3.0];
        let ys: Vec<f64> = xs.iter().map(|&t| g(t)).collect();
        let parabola = CubicSpline::new(&xs, &ys, SplineBoundary::NotAKnot).unwrap();
        for q in [-1.0, 0.5, 2.0, 4.0] {
            assert!((parabola.extrapolate(q) - g(q)).abs() < 1e-12, "at {q}");
        }
    }

    #[test]
    fn grid_evaluation_has_one_value_per_point() {
        let s = reference_spline(SplineBoundary::NotAKnot);
        let grid = lin_space(1.0, 10.0, 100).unwrap();
        let ys = s.evaluate(&grid);
        assert_eq!(ys.len(), 100);
        assert!(ys.iter().all(|y| y.is_finite()));
        assert_eq!(ys[99], 2.0);
    }

    #[test]
    fn interpolate_rejects_out_of_range() {
        let s = reference_spline(SplineBoundary::NotAKnot);
        assert_eq!(s.interpolate(0.5).unwrap_err().kind(), ErrorKind::Precondition);
        assert!(s.interpolate(f64::NAN).is_err());
        assert!(s.extrapolate(11.0).is_finite());
    }

    #[test]
    fn duplicate_knots_are_rejected() {
        let err = CubicSpline::new(&[1.0, 1.0, 5.0], &[0.5, 1.0, 1.5], SplineBoundary::NotAKnot)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        let nak = SplineBoundary::NotAKnot;
        assert!(CubicSpline::new(&[1.0], &[0.5], nak).is_err());
        assert!(CubicSpline::new(&[1.0, 2.0], &[0.5], nak).is_err());
        assert!(CubicSpline::new(&[3.0, 2.0, 1.0], &[0.5, 0.6, 0.7], nak).is_err());
        assert!(CubicSpline::new(&[1.0, f64::NAN], &[0.5, 0.6], nak).is_err());
    }
}
