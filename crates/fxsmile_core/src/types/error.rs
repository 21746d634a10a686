//! Error types for structured error handling.
//!
//! This module provides:
//! - `DateError`: Errors from date construction and parsing
//! - `DualError`: Errors from the automatic differentiation engine
//! - `InterpolationError`: Errors from spline construction and evaluation
//! - `SolverError`: Errors from root-finding solvers

use std::fmt;
use thiserror::Error;

/// Date-related errors.
///
/// # Variants
/// - `InvalidDate`: Invalid date components (e.g., February 30th)
/// - `ParseError`: Failed to parse date string
///
/// # Examples
/// ```
/// use fxsmile_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse date string.
    ParseError(String),
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::InvalidDate { year, month, day } => {
                write!(f, "Invalid date: {}-{}-{}", year, month, day)
            }
            DateError::ParseError(msg) => write!(f, "Date parse error: {}", msg),
        }
    }
}

impl std::error::Error for DateError {}

/// Automatic differentiation errors.
///
/// # Examples
/// ```
/// use fxsmile_core::types::DualError;
///
/// let err = DualError::InvalidOrder(3);
/// assert!(format!("{}", err).contains("{0, 1, 2}"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DualError {
    /// Derivative order outside {0, 1, 2}.
    #[error("AD order must be in {{0, 1, 2}}, got {0}")]
    InvalidOrder(u8),

    /// Gradient and variable labels have different lengths.
    #[error("Dual has {vars} vars but {dual} derivative coefficients")]
    ShapeMismatch {
        /// Number of variable labels
        vars: usize,
        /// Number of derivative coefficients
        dual: usize,
    },
}

/// Spline and interpolation errors.
///
/// # Variants
/// - `OutOfBounds`: Query point outside the knot range
/// - `InsufficientData`: Not enough knots or data points
/// - `SingularSystem`: Collocation matrix could not be factorised
/// - `InvalidInput`: General invalid input error
///
/// # Examples
/// ```
/// use fxsmile_core::types::InterpolationError;
///
/// let err = InterpolationError::OutOfBounds { x: 5.0, min: 0.0, max: 3.0 };
/// assert!(format!("{}", err).contains("outside valid domain"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationError {
    /// Query point outside valid interpolation domain.
    #[error("Query point {x} outside valid domain [{min}, {max}]")]
    OutOfBounds {
        /// The query point that was out of bounds
        x: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },

    /// Insufficient data points for interpolation.
    #[error("Insufficient data points: got {got}, need at least {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// The spline collocation matrix is singular.
    #[error("Singular collocation matrix at pivot {pivot}")]
    SingularSystem {
        /// Row at which elimination failed
        pivot: usize,
    },

    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Root-finding solver errors.
///
/// # Variants
/// - `MaxIterationsExceeded`: Solver failed to converge within iteration limit
/// - `DerivativeNearZero`: Derivative too small for Newton-Raphson
/// - `NumericalInstability`: Non-finite iterate
/// - `InvalidConfig`: Non-positive tolerance or zero iteration cap
///
/// # Examples
/// ```
/// use fxsmile_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 50 };
/// assert!(format!("{}", err).contains("50 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// Derivative near zero (division by zero risk in Newton-Raphson).
    #[error("Derivative near zero at x = {x}")]
    DerivativeNearZero {
        /// The x value where derivative was near zero
        x: f64,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),

    /// Rejected solver settings.
    #[error("Invalid solver configuration: {0}")]
    InvalidConfig(String),
}
