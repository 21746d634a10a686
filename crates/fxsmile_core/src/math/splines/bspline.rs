//! B-spline basis functions by the Cox-de Boor recursion.
//!
//! `i` indexes the basis function, `k` is its order (degree + 1) and `t` the
//! knot sequence. The right end of the knot range belongs to the last
//! non-degenerate interval so that a clamped spline is defined at its upper
//! bound.

/// Value of the `i`-th B-spline of order `k` at `x`.
pub fn bsplev_single(x: f64, i: usize, k: usize, t: &[f64]) -> f64 {
    if k == 1 {
        let (lo, hi) = (t[i], t[i + 1]);
        if lo <= x && x < hi {
            return 1.0;
        }
        let last = t[t.len() - 1];
        if x == hi && lo != hi && hi == last {
            return 1.0;
        }
        return 0.0;
    }

    let mut value = 0.0;
    let div1 = t[i + k - 1] - t[i];
    if div1 != 0.0 {
        value += (x - t[i]) / div1 * bsplev_single(x, i, k - 1, t);
    }
    let div2 = t[i + k] - t[i + 1];
    if div2 != 0.0 {
        value += (t[i + k] - x) / div2 * bsplev_single(x, i + 1, k - 1, t);
    }
    value
}

/// `m`-th derivative of the `i`-th B-spline of order `k` at `x`.
pub fn bspldnev_single(x: f64, i: usize, k: usize, t: &[f64], m: usize) -> f64 {
    if m == 0 {
        return bsplev_single(x, i, k, t);
    }
    if k == 1 || m >= k {
        return 0.0;
    }

    let scale = (k - 1) as f64;
    let mut value = 0.0;
    let div1 = t[i + k - 1] - t[i];
    if div1 != 0.0 {
        value += bspldnev_single(x, i, k - 1, t, m - 1) / div1;
    }
    let div2 = t[i + k] - t[i + 1];
    if div2 != 0.0 {
        value -= bspldnev_single(x, i + 1, k - 1, t, m - 1) / div2;
    }
    scale * value
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BEZIER: [f64; 8] = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];

    #[test]
    fn test_partition_of_unity() {
        let t = [0.0, 0.0, 0.0, 0.0, 0.3, 0.6, 1.0, 1.0, 1.0, 1.0];
        let n = t.len() - 4;
        for &x in &[0.0, 0.1, 0.3, 0.45, 0.8, 1.0] {
            let total: f64 = (0..n).map(|i| bsplev_single(x, i, 4, &t)).sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_bernstein_basis_on_clamped_knots() {
        // Clamped knots on [0, 1] give the cubic Bernstein polynomials
        let x: f64 = 0.25;
        let expected = [
            (1.0 - x).powi(3),
            3.0 * x * (1.0 - x).powi(2),
            3.0 * x * x * (1.0 - x),
            x.powi(3),
        ];
        for (i, e) in expected.iter().enumerate() {
            assert_relative_eq!(bsplev_single(x, i, 4, &BEZIER), *e, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_right_end_is_included() {
        assert_eq!(bsplev_single(1.0, 3, 4, &BEZIER), 1.0);
        assert_eq!(bsplev_single(1.0, 0, 4, &BEZIER), 0.0);
    }

    #[test]
    fn test_outside_support_is_zero() {
        assert_eq!(bsplev_single(1.5, 3, 4, &BEZIER), 0.0);
        assert_eq!(bsplev_single(-0.1, 0, 4, &BEZIER), 0.0);
    }

    #[test]
    fn test_derivatives_of_bernstein_basis() {
        // B0 = (1-x)^3: B0' = -3(1-x)^2, B0'' = 6(1-x)
        let x: f64 = 0.4;
        assert_relative_eq!(
            bspldnev_single(x, 0, 4, &BEZIER, 1),
            -3.0 * (1.0 - x).powi(2),
            epsilon = 1e-14
        );
        assert_relative_eq!(
            bspldnev_single(x, 0, 4, &BEZIER, 2),
            6.0 * (1.0 - x),
            epsilon = 1e-14
        );
        // B3 = x^3: third derivative constant 6, fourth vanishes
        assert_relative_eq!(bspldnev_single(x, 3, 4, &BEZIER, 3), 6.0, epsilon = 1e-12);
        assert_eq!(bspldnev_single(x, 3, 4, &BEZIER, 4), 0.0);
    }

    #[test]
    fn test_derivative_order_zero_is_value() {
        assert_eq!(
            bspldnev_single(0.7, 2, 4, &BEZIER, 0),
            bsplev_single(0.7, 2, 4, &BEZIER)
        );
    }
}
