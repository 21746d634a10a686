//! Standard normal distribution functions.
//!
//! This module provides plain `f64` implementations of:
//! - `norm_cdf`: Cumulative distribution function (CDF)
//! - `norm_pdf`: Probability density function (PDF)
//! - `norm_inv_cdf`: Inverse CDF (quantile)
//!
//! The differentiable versions live on [`Number`](crate::types::Number) and
//! are built from these via the chain rule.

use statrs::function::erf::{erfc, erfc_inv};

/// Square root of 2.
const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Standard normal cumulative distribution function.
///
/// # Mathematical Definition
/// Φ(x) = 0.5 * erfc(-x / √2)
///
/// # Examples
/// ```
/// use fxsmile_core::math::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0) - 0.5).abs() < 1e-15);
/// ```
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal probability density function.
///
/// # Mathematical Definition
/// φ(x) = (1/√(2π)) * exp(-x²/2)
#[inline]
pub fn norm_pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Inverse standard normal CDF.
///
/// Φ⁻¹(p) = -√2 * erfc⁻¹(2p). Saturates to ±∞ at and beyond the endpoints.
///
/// # Examples
/// ```
/// use fxsmile_core::math::distributions::{norm_cdf, norm_inv_cdf};
///
/// let x = norm_inv_cdf(0.975);
/// assert!((x - 1.959964).abs() < 1e-6);
/// assert!((norm_cdf(x) - 0.975).abs() < 1e-12);
/// ```
#[inline]
pub fn norm_inv_cdf(p: f64) -> f64 {
    -SQRT_2 * erfc_inv(2.0 * p)
}
