//! Numerical building blocks.
//!
//! - `distributions`: standard normal CDF, PDF and inverse CDF
//! - `linalg`: LU factorisation with a differentiable right-hand side
//! - `splines`: B-spline basis and `PPSpline`
//! - `solvers`: Newton-Raphson root finding

pub mod distributions;
pub mod linalg;
pub mod solvers;
pub mod splines;
