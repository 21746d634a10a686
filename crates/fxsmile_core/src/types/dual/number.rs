//! The `Number` sum type and its arithmetic.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_traits::{One, Zero};

use super::{AdOrder, Dual, Dual2};
use crate::math::distributions::{norm_cdf, norm_inv_cdf, norm_pdf};

/// A scalar that may carry first or second derivatives.
///
/// Arithmetic between mixed orders promotes to the higher order. Arithmetic
/// with `f64` never promotes.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// Plain value.
    Float(f64),
    /// Value with first derivatives.
    Dual(Dual),
    /// Value with first and second derivatives.
    Dual2(Dual2),
}

impl Number {
    /// A labelled variable of the given order.
    ///
    /// `AdOrder::Zero` yields a plain `Float` and discards the label.
    pub fn variable(real: f64, name: impl Into<String>, order: AdOrder) -> Self {
        match order {
            AdOrder::Zero => Number::Float(real),
            AdOrder::One => Number::Dual(Dual::variable(real, name)),
            AdOrder::Two => Number::Dual2(Dual2::variable(real, name)),
        }
    }

    /// Value.
    #[inline]
    pub fn real(&self) -> f64 {
        match self {
            Number::Float(x) => *x,
            Number::Dual(d) => d.real(),
            Number::Dual2(d) => d.real(),
        }
    }

    /// Derivative order carried.
    #[inline]
    pub fn order(&self) -> AdOrder {
        match self {
            Number::Float(_) => AdOrder::Zero,
            Number::Dual(_) => AdOrder::One,
            Number::Dual2(_) => AdOrder::Two,
        }
    }

    /// Variable labels in order, empty for `Float`.
    pub fn vars(&self) -> Vec<&str> {
        match self {
            Number::Float(_) => Vec::new(),
            Number::Dual(d) => d.vars().iter().map(String::as_str).collect(),
            Number::Dual2(d) => d.vars().iter().map(String::as_str).collect(),
        }
    }

    /// Converts to the requested order.
    ///
    /// Promotion zero-fills missing derivatives; demotion drops them.
    pub fn to_order(&self, order: AdOrder) -> Number {
        match (self, order) {
            (Number::Float(x), AdOrder::Zero) => Number::Float(*x),
            (Number::Float(x), AdOrder::One) => Number::Dual(Dual::constant(*x)),
            (Number::Float(x), AdOrder::Two) => Number::Dual2(Dual2::constant(*x)),
            (Number::Dual(d), AdOrder::Zero) => Number::Float(d.real()),
            (Number::Dual(d), AdOrder::One) => Number::Dual(d.clone()),
            (Number::Dual(d), AdOrder::Two) => Number::Dual2(Dual2::from_first(d)),
            (Number::Dual2(d), AdOrder::Zero) => Number::Float(d.real()),
            (Number::Dual2(d), AdOrder::One) => Number::Dual(d.to_first()),
            (Number::Dual2(d), AdOrder::Two) => Number::Dual2(d.clone()),
        }
    }

    /// First derivatives for the requested labels. Zero for `Float`.
    pub fn gradient(&self, vars: &[&str]) -> Vec<f64> {
        match self {
            Number::Float(_) => vec![0.0; vars.len()],
            Number::Dual(d) => d.gradient(vars),
            Number::Dual2(d) => d.gradient(vars),
        }
    }

    /// Hessian for the requested labels; `None` below second order.
    pub fn gradient2(&self, vars: &[&str]) -> Option<Vec<Vec<f64>>> {
        match self {
            Number::Dual2(d) => Some(d.gradient2(vars)),
            _ => None,
        }
    }

    /// Applies a scalar function given its value and first two derivatives
    /// at `self.real()`.
    pub(crate) fn chain(&self, f0: f64, f1: f64, f2: f64) -> Number {
        match self {
            Number::Float(_) => Number::Float(f0),
            Number::Dual(d) => Number::Dual(d.chain(f0, f1)),
            Number::Dual2(d) => Number::Dual2(d.chain(f0, f1, f2)),
        }
    }

    /// Natural exponential.
    pub fn exp(&self) -> Number {
        let e = self.real().exp();
        self.chain(e, e, e)
    }

    /// Natural logarithm.
    pub fn ln(&self) -> Number {
        let x = self.real();
        self.chain(x.ln(), 1.0 / x, -1.0 / (x * x))
    }

    /// Square root.
    pub fn sqrt(&self) -> Number {
        let x = self.real();
        let s = x.sqrt();
        self.chain(s, 0.5 / s, -0.25 / (s * x))
    }

    /// Real power.
    pub fn powf(&self, p: f64) -> Number {
        let x = self.real();
        self.chain(
            x.powf(p),
            p * x.powf(p - 1.0),
            p * (p - 1.0) * x.powf(p - 2.0),
        )
    }

    /// Reciprocal.
    pub fn recip(&self) -> Number {
        let x = self.real();
        self.chain(1.0 / x, -1.0 / (x * x), 2.0 / (x * x * x))
    }

    /// Standard normal CDF.
    pub fn norm_cdf(&self) -> Number {
        let x = self.real();
        let pdf = norm_pdf(x);
        self.chain(norm_cdf(x), pdf, -x * pdf)
    }

    /// Standard normal PDF.
    pub fn norm_pdf(&self) -> Number {
        let x = self.real();
        let pdf = norm_pdf(x);
        self.chain(pdf, -x * pdf, (x * x - 1.0) * pdf)
    }

    /// Inverse standard normal CDF.
    pub fn norm_inv_cdf(&self) -> Number {
        let y = norm_inv_cdf(self.real());
        let pdf = norm_pdf(y);
        self.chain(y, 1.0 / pdf, y / (pdf * pdf))
    }

    /// Applies the binary op at the higher of the two orders.
    fn combine(
        &self,
        rhs: &Number,
        ff: fn(f64, f64) -> f64,
        fd: fn(&Dual, &Dual) -> Dual,
        fd2: fn(&Dual2, &Dual2) -> Dual2,
    ) -> Number {
        match (self, rhs) {
            (Number::Float(a), Number::Float(b)) => Number::Float(ff(*a, *b)),
            (Number::Dual(a), Number::Dual(b)) => Number::Dual(fd(a, b)),
            (Number::Dual2(a), Number::Dual2(b)) => Number::Dual2(fd2(a, b)),
            _ => {
                let order = self.order().max(rhs.order());
                self.to_order(order)
                    .combine(&rhs.to_order(order), ff, fd, fd2)
            }
        }
    }

    fn add_number(&self, rhs: &Number) -> Number {
        self.combine(rhs, |a, b| a + b, |a, b| a + b, |a, b| a + b)
    }

    fn sub_number(&self, rhs: &Number) -> Number {
        self.combine(rhs, |a, b| a - b, |a, b| a - b, |a, b| a - b)
    }

    fn mul_number(&self, rhs: &Number) -> Number {
        self.combine(rhs, |a, b| a * b, |a, b| a * b, |a, b| a * b)
    }

    fn div_number(&self, rhs: &Number) -> Number {
        match (self, rhs) {
            (Number::Float(a), Number::Float(b)) => Number::Float(a / b),
            (_, Number::Float(b)) => self.mul_scalar(1.0 / b),
            _ => self.mul_number(&rhs.recip()),
        }
    }

    fn add_scalar(&self, s: f64) -> Number {
        match self {
            Number::Float(x) => Number::Float(x + s),
            Number::Dual(d) => Number::Dual(d.shift(s)),
            Number::Dual2(d) => Number::Dual2(d.shift(s)),
        }
    }

    fn sub_scalar(&self, s: f64) -> Number {
        self.add_scalar(-s)
    }

    fn mul_scalar(&self, s: f64) -> Number {
        match self {
            Number::Float(x) => Number::Float(x * s),
            Number::Dual(d) => Number::Dual(d.scale(s)),
            Number::Dual2(d) => Number::Dual2(d.scale(s)),
        }
    }

    fn div_scalar(&self, s: f64) -> Number {
        self.mul_scalar(1.0 / s)
    }

    fn radd_scalar(&self, s: f64) -> Number {
        self.add_scalar(s)
    }

    fn rsub_scalar(&self, s: f64) -> Number {
        self.mul_scalar(-1.0).add_scalar(s)
    }

    fn rmul_scalar(&self, s: f64) -> Number {
        self.mul_scalar(s)
    }

    fn rdiv_scalar(&self, s: f64) -> Number {
        self.recip().mul_scalar(s)
    }
}

macro_rules! impl_number_op {
    ($trait:ident, $method:ident, $core:ident, $scalar:ident, $rscalar:ident) => {
        impl $trait<&Number> for &Number {
            type Output = Number;
            fn $method(self, rhs: &Number) -> Number {
                self.$core(rhs)
            }
        }

        impl $trait<Number> for Number {
            type Output = Number;
            fn $method(self, rhs: Number) -> Number {
                (&self).$core(&rhs)
            }
        }

        impl $trait<&Number> for Number {
            type Output = Number;
            fn $method(self, rhs: &Number) -> Number {
                (&self).$core(rhs)
            }
        }

        impl $trait<Number> for &Number {
            type Output = Number;
            fn $method(self, rhs: Number) -> Number {
                self.$core(&rhs)
            }
        }

        impl $trait<f64> for &Number {
            type Output = Number;
            fn $method(self, rhs: f64) -> Number {
                self.$scalar(rhs)
            }
        }

        impl $trait<f64> for Number {
            type Output = Number;
            fn $method(self, rhs: f64) -> Number {
                (&self).$scalar(rhs)
            }
        }

        impl $trait<&Number> for f64 {
            type Output = Number;
            fn $method(self, rhs: &Number) -> Number {
                rhs.$rscalar(self)
            }
        }

        impl $trait<Number> for f64 {
            type Output = Number;
            fn $method(self, rhs: Number) -> Number {
                rhs.$rscalar(self)
            }
        }
    };
}

impl_number_op!(Add, add, add_number, add_scalar, radd_scalar);
impl_number_op!(Sub, sub, sub_number, sub_scalar, rsub_scalar);
impl_number_op!(Mul, mul, mul_number, mul_scalar, rmul_scalar);
impl_number_op!(Div, div, div_number, div_scalar, rdiv_scalar);

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Number {
        self.mul_scalar(-1.0)
    }
}

impl Neg for Number {
    type Output = Number;

    fn neg(self) -> Number {
        self.mul_scalar(-1.0)
    }
}

impl Zero for Number {
    fn zero() -> Self {
        Number::Float(0.0)
    }

    fn is_zero(&self) -> bool {
        match self {
            Number::Float(x) => *x == 0.0,
            Number::Dual(d) => d.real() == 0.0 && d.dual().iter().all(|g| *g == 0.0),
            Number::Dual2(d) => {
                d.real() == 0.0
                    && d.dual().iter().all(|g| *g == 0.0)
                    && d.dual2().iter().all(|h| *h == 0.0)
            }
        }
    }
}

impl One for Number {
    fn one() -> Self {
        Number::Float(1.0)
    }
}

impl Sum for Number {
    fn sum<I: Iterator<Item = Number>>(iter: I) -> Self {
        iter.fold(Number::zero(), |acc, x| acc + x)
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::Float(x)
    }
}

impl From<&Number> for Number {
    fn from(x: &Number) -> Self {
        x.clone()
    }
}

impl From<Dual> for Number {
    fn from(d: Dual) -> Self {
        Number::Dual(d)
    }
}

impl From<Dual2> for Number {
    fn from(d: Dual2) -> Self {
        Number::Dual2(d)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Float(x) => write!(f, "{}", x),
            Number::Dual(d) => write!(f, "{}", d),
            Number::Dual2(d) => write!(f, "{}", d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn x1(v: f64) -> Number {
        Number::variable(v, "x", AdOrder::One)
    }

    fn x2(v: f64) -> Number {
        Number::variable(v, "x", AdOrder::Two)
    }

    #[test]
    fn test_variable_order_zero_is_float() {
        assert_eq!(Number::variable(1.5, "x", AdOrder::Zero), Number::Float(1.5));
    }

    #[test]
    fn test_mixed_order_promotes() {
        let a = x1(2.0);
        let b = x2(3.0);
        let c = &a + &b;
        assert_eq!(c.order(), AdOrder::Two);
        assert_eq!(c.gradient(&["x"]), vec![2.0]);

        let f = Number::Float(4.0) * &a;
        assert_eq!(f.order(), AdOrder::One);
        assert_eq!(f.gradient(&["x"]), vec![4.0]);
    }

    #[test]
    fn test_to_order_demotion_keeps_real() {
        let a = x2(2.5);
        assert_eq!(a.to_order(AdOrder::Zero), Number::Float(2.5));
        let d = a.to_order(AdOrder::One);
        assert_eq!(d.order(), AdOrder::One);
        assert_eq!(d.gradient(&["x"]), vec![1.0]);
    }

    #[test]
    fn test_division_quotient_rule() {
        let x = x2(2.0);
        let y = 1.0 / &x;
        assert_relative_eq!(y.real(), 0.5);
        assert_relative_eq!(y.gradient(&["x"])[0], -0.25);
        assert_relative_eq!(y.gradient2(&["x"]).unwrap()[0][0], 0.25);
    }

    #[test]
    fn test_exp_ln_inverse() {
        let x = x2(1.3);
        let y = x.exp().ln();
        assert_relative_eq!(y.real(), 1.3, epsilon = 1e-14);
        assert_relative_eq!(y.gradient(&["x"])[0], 1.0, epsilon = 1e-14);
        assert_relative_eq!(y.gradient2(&["x"]).unwrap()[0][0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sqrt_derivatives() {
        let x = x2(4.0);
        let y = x.sqrt();
        assert_relative_eq!(y.real(), 2.0);
        assert_relative_eq!(y.gradient(&["x"])[0], 0.25);
        assert_relative_eq!(y.gradient2(&["x"]).unwrap()[0][0], -1.0 / 32.0);
    }

    #[test]
    fn test_norm_inv_cdf_inverts_norm_cdf() {
        let x = x2(0.7);
        let y = x.norm_cdf().norm_inv_cdf();
        assert_relative_eq!(y.real(), 0.7, epsilon = 1e-10);
        assert_relative_eq!(y.gradient(&["x"])[0], 1.0, epsilon = 1e-8);
        assert_relative_eq!(y.gradient2(&["x"]).unwrap()[0][0], 0.0, epsilon = 1e-7);
    }

    #[test]
    fn test_norm_cdf_gradient_is_pdf() {
        let x = x1(0.3);
        let y = x.norm_cdf();
        assert_relative_eq!(y.gradient(&["x"])[0], norm_pdf(0.3), epsilon = 1e-15);
    }

    #[test]
    fn test_scalar_ops() {
        let x = x1(2.0);
        assert_eq!((&x - 1.0).real(), 1.0);
        assert_eq!((5.0 - &x).gradient(&["x"]), vec![-1.0]);
        assert_eq!((&x / 4.0).gradient(&["x"]), vec![0.25]);
        assert_eq!((-x).real(), -2.0);
    }

    #[test]
    fn test_sum_and_zero() {
        let terms = vec![x1(1.0), Number::Float(2.0), x1(3.0)];
        let s: Number = terms.into_iter().sum();
        assert_eq!(s.real(), 6.0);
        assert_eq!(s.gradient(&["x"]), vec![2.0]);
        assert!(Number::zero().is_zero());
        assert!(!s.is_zero());
    }

    #[test]
    fn test_float_gradient2_is_none() {
        assert!(Number::Float(1.0).gradient2(&["x"]).is_none());
        assert_eq!(Number::Float(1.0).gradient(&["x", "y"]), vec![0.0, 0.0]);
    }
}
