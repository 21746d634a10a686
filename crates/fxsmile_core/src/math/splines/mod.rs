//! B-spline basis and piecewise polynomial splines.
//!
//! - [`bspline`]: Cox-de Boor basis values and derivatives
//! - [`PPSpline`]: coefficient fitting by collocation and evaluation, with
//!   [`Number`](crate::types::Number) coefficients

pub mod bspline;
mod ppspline;

pub use ppspline::PPSpline;
