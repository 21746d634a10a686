//! Piecewise polynomial spline in B-spline form.

use num_traits::Zero;
use tracing::trace;

use super::bspline::bspldnev_single;
use crate::math::linalg::LuFactors;
use crate::types::{InterpolationError, Number};

/// Spline `s(x) = Σ c_i B_{i,k}(x)` over a fixed knot sequence.
///
/// Knots are plain `f64`; coefficients are [`Number`]s so a spline fitted
/// to dual data carries the sensitivities of every value it produces.
///
/// # Example
///
/// ```
/// use fxsmile_core::math::splines::PPSpline;
/// use fxsmile_core::types::Number;
///
/// // Natural cubic through (0, 0), (0.5, 1), (1, 0)
/// let t = vec![0.0, 0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0, 1.0];
/// let mut spline = PPSpline::new(4, t).unwrap();
///
/// let tau = [0.0, 0.0, 0.5, 1.0, 1.0];
/// let y: Vec<Number> = [0.0, 0.0, 1.0, 0.0, 0.0].iter().map(|v| Number::Float(*v)).collect();
/// spline.csolve(&tau, &y, 2, 2).unwrap();
///
/// assert!((spline.ppev_single(0.5).unwrap().real() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct PPSpline {
    k: usize,
    t: Vec<f64>,
    n: usize,
    c: Option<Vec<Number>>,
}

impl PPSpline {
    /// Creates an unsolved spline of order `k` on knots `t`.
    ///
    /// # Errors
    /// - `InvalidInput` for `k == 0` or decreasing knots
    /// - `InsufficientData` for fewer than `2k` knots
    pub fn new(k: usize, t: Vec<f64>) -> Result<Self, InterpolationError> {
        if k == 0 {
            return Err(InterpolationError::InvalidInput(
                "spline order must be positive".to_string(),
            ));
        }
        if t.len() < 2 * k {
            return Err(InterpolationError::InsufficientData {
                got: t.len(),
                need: 2 * k,
            });
        }
        if t.windows(2).any(|w| !(w[0] <= w[1])) {
            return Err(InterpolationError::InvalidInput(
                "knot sequence must be non-decreasing".to_string(),
            ));
        }
        let n = t.len() - k;
        Ok(Self { k, t, n, c: None })
    }

    /// Creates a spline with known coefficients.
    ///
    /// # Errors
    /// As [`PPSpline::new`], plus `InvalidInput` when `c` has the wrong length.
    pub fn with_coefficients(
        k: usize,
        t: Vec<f64>,
        c: Vec<Number>,
    ) -> Result<Self, InterpolationError> {
        let mut spline = Self::new(k, t)?;
        if c.len() != spline.n {
            return Err(InterpolationError::InvalidInput(format!(
                "expected {} coefficients, got {}",
                spline.n,
                c.len()
            )));
        }
        spline.c = Some(c);
        Ok(spline)
    }

    /// Spline order.
    pub fn order(&self) -> usize {
        self.k
    }

    /// Knot sequence.
    pub fn knots(&self) -> &[f64] {
        &self.t
    }

    /// Number of coefficients, `len(t) - k`.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Fitted coefficients, if solved.
    pub fn coefficients(&self) -> Option<&[Number]> {
        self.c.as_deref()
    }

    /// Fits the coefficients to data.
    ///
    /// Row 0 of the collocation system matches the `left_n`-th derivative at
    /// `tau[0]` and the final row the `right_n`-th derivative at the last
    /// `tau`; every other row matches the spline value. Order zero at either
    /// end is a plain value constraint.
    ///
    /// # Errors
    /// - `InvalidInput` if `tau` and `y` do not both have `n` entries
    /// - `SingularSystem` if the collocation matrix cannot be factorised
    pub fn csolve(
        &mut self,
        tau: &[f64],
        y: &[Number],
        left_n: usize,
        right_n: usize,
    ) -> Result<(), InterpolationError> {
        if tau.len() != self.n || y.len() != self.n {
            return Err(InterpolationError::InvalidInput(format!(
                "spline with {} coefficients needs {} data points, got tau={} y={}",
                self.n,
                self.n,
                tau.len(),
                y.len()
            )));
        }

        let last = self.n - 1;
        let matrix: Vec<Vec<f64>> = tau
            .iter()
            .enumerate()
            .map(|(row, &x)| {
                let m = match row {
                    0 => left_n,
                    r if r == last => right_n,
                    _ => 0,
                };
                (0..self.n)
                    .map(|i| bspldnev_single(x, i, self.k, &self.t, m))
                    .collect()
            })
            .collect();

        let lu = LuFactors::factorise(&matrix)?;
        self.c = Some(lu.solve(y)?);
        trace!(n = self.n, left_n, right_n, "spline coefficients solved");
        Ok(())
    }

    fn solved(&self) -> Result<&[Number], InterpolationError> {
        self.c.as_deref().ok_or_else(|| {
            InterpolationError::InvalidInput("spline coefficients have not been solved".to_string())
        })
    }

    fn check_domain(&self, x: f64) -> Result<(), InterpolationError> {
        let (min, max) = (self.t[0], self.t[self.t.len() - 1]);
        if x.is_nan() || x < min || x > max {
            return Err(InterpolationError::OutOfBounds { x, min, max });
        }
        Ok(())
    }

    /// Spline value at `x`.
    pub fn ppev_single(&self, x: f64) -> Result<Number, InterpolationError> {
        self.ppdnev_single(x, 0)
    }

    /// Spline values at each of `xs`.
    pub fn ppev(&self, xs: &[f64]) -> Result<Vec<Number>, InterpolationError> {
        xs.iter().map(|&x| self.ppev_single(x)).collect()
    }

    /// `m`-th derivative of the spline at `x`.
    pub fn ppdnev_single(&self, x: f64, m: usize) -> Result<Number, InterpolationError> {
        let c = self.solved()?;
        self.check_domain(x)?;
        let mut acc = Number::zero();
        for (i, ci) in c.iter().enumerate() {
            let b = bspldnev_single(x, i, self.k, &self.t, m);
            if b != 0.0 {
                acc = acc + ci * b;
            }
        }
        Ok(acc)
    }

    /// Spline value at a differentiable `x`.
    ///
    /// Second-order Taylor expansion about `x.real()`, exact in value and
    /// in first and second derivatives with respect to `x`:
    /// `s(x0) + s'(x0) dx + s''(x0) dx² / 2`.
    pub fn ppev_single_number(&self, x: &Number) -> Result<Number, InterpolationError> {
        self.ppdnev_single_number(x, 0)
    }

    /// `m`-th derivative of the spline at a differentiable `x`.
    pub fn ppdnev_single_number(&self, x: &Number, m: usize) -> Result<Number, InterpolationError> {
        let x0 = x.real();
        let value = self.ppdnev_single(x0, m)?;
        if let Number::Float(_) = x {
            return Ok(value);
        }
        let dx = x - x0;
        let slope = self.ppdnev_single(x0, m + 1)?;
        let mut out = value + &slope * &dx;
        if let Number::Dual2(_) = x {
            let curvature = self.ppdnev_single(x0, m + 2)?;
            out = out + &curvature * &(&dx * &dx) * 0.5;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AdOrder;
    use approx::assert_relative_eq;

    fn floats(xs: &[f64]) -> Vec<Number> {
        xs.iter().map(|x| Number::Float(*x)).collect()
    }

    fn natural(t: Vec<f64>, tau: &[f64], y: &[Number]) -> PPSpline {
        let mut s = PPSpline::new(4, t).unwrap();
        s.csolve(tau, y, 2, 2).unwrap();
        s
    }

    #[test]
    fn test_new_validates_knots() {
        assert!(matches!(
            PPSpline::new(4, vec![0.0; 7]),
            Err(InterpolationError::InsufficientData { got: 7, need: 8 })
        ));
        assert!(matches!(
            PPSpline::new(4, vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.5, 1.0, 1.0, 1.0]),
            Err(InterpolationError::InvalidInput(_))
        ));
        assert!(PPSpline::new(0, vec![0.0, 1.0]).is_err());
        assert_eq!(PPSpline::new(4, vec![0.0; 8]).unwrap().n(), 4);
    }

    #[test]
    fn test_unsolved_evaluation_fails() {
        let s = PPSpline::new(4, vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]).unwrap();
        assert!(matches!(s.ppev_single(0.5), Err(InterpolationError::InvalidInput(_))));
    }

    #[test]
    fn test_csolve_interpolates_and_has_natural_ends() {
        let t = vec![0.0, 0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0, 1.0];
        let tau = [0.0, 0.25, 0.5, 0.75, 1.0];
        let y = floats(&[0.0, 10.0, 9.0, 10.5, 0.0]);
        let s = natural(t, &tau, &y);

        assert_relative_eq!(s.ppev_single(0.25).unwrap().real(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(s.ppev_single(0.5).unwrap().real(), 9.0, epsilon = 1e-12);
        assert_relative_eq!(s.ppev_single(0.75).unwrap().real(), 10.5, epsilon = 1e-12);
        assert_relative_eq!(s.ppdnev_single(0.0, 2).unwrap().real(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(s.ppdnev_single(1.0, 2).unwrap().real(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_csolve_size_mismatch() {
        let mut s = PPSpline::new(4, vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]).unwrap();
        let err = s.csolve(&[0.0, 1.0], &floats(&[0.0, 1.0]), 0, 0).unwrap_err();
        assert!(matches!(err, InterpolationError::InvalidInput(_)));
    }

    #[test]
    fn test_out_of_domain() {
        let t = vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        let s = PPSpline::with_coefficients(4, t, floats(&[1.0, 1.0, 1.0, 1.0])).unwrap();
        assert!(matches!(
            s.ppev_single(1.01),
            Err(InterpolationError::OutOfBounds { .. })
        ));
        assert!(s.ppev_single(-0.01).is_err());
        assert!(s.ppev_single(f64::NAN).is_err());
        assert_relative_eq!(s.ppev_single(1.0).unwrap().real(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_ppev_sequence() {
        let t = vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        // Bernstein coefficients of p(x) = x
        let c = floats(&[0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0]);
        let s = PPSpline::with_coefficients(4, t, c).unwrap();
        let ys = s.ppev(&[0.0, 0.3, 1.0]).unwrap();
        assert_relative_eq!(ys[0].real(), 0.0, epsilon = 1e-15);
        assert_relative_eq!(ys[1].real(), 0.3, epsilon = 1e-15);
        assert_relative_eq!(ys[2].real(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_data_sensitivities_flow_through_solve() {
        // Value at a node depends only on that node's data
        let t = vec![0.0, 0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0, 1.0];
        let tau = [0.0, 0.25, 0.5, 0.75, 1.0];
        let y = vec![
            Number::Float(0.0),
            Number::variable(10.0, "v0", AdOrder::One),
            Number::variable(9.0, "v1", AdOrder::One),
            Number::variable(10.5, "v2", AdOrder::One),
            Number::Float(0.0),
        ];
        let s = natural(t, &tau, &y);
        let g = s.ppev_single(0.5).unwrap().gradient(&["v0", "v1", "v2"]);
        assert_relative_eq!(g[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(g[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(g[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_number_argument_taylor_terms() {
        // s(x) = x^3 in Bernstein form: coefficients 0, 0, 0, 1
        let t = vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
        let s = PPSpline::with_coefficients(4, t, floats(&[0.0, 0.0, 0.0, 1.0])).unwrap();

        let x = Number::variable(0.5, "x", AdOrder::Two);
        let y = s.ppev_single_number(&x).unwrap();
        assert_relative_eq!(y.real(), 0.125, epsilon = 1e-14);
        assert_relative_eq!(y.gradient(&["x"])[0], 0.75, epsilon = 1e-14);
        assert_relative_eq!(y.gradient2(&["x"]).unwrap()[0][0], 3.0, epsilon = 1e-12);

        let plain = s.ppev_single_number(&Number::Float(0.5)).unwrap();
        assert_eq!(plain.order(), AdOrder::Zero);
    }
}
