//! Market data error types.
//!
//! This module provides structured error handling for smile construction,
//! lookup, delta conversion and strike inversion.

use crate::types::{DualError, InterpolationError, SolverError};
use thiserror::Error;

/// Market data operation errors.
///
/// # Variants
///
/// - `InvalidConvention`: Unrecognised delta type or option type
/// - `OutOfRange`: Index delta outside the smile domain
/// - `NotImplemented`: Conversion between adjusted and unadjusted deltas
/// - `SolverDivergence`: Newton iteration cap exceeded
/// - `InvalidExpiry`: Expiry before evaluation, or zero time where time is needed
/// - `InvalidNodes`: Unordered, non-finite or out-of-domain nodes
/// - `InsufficientData`: Not enough nodes
/// - `MissingInput`: Spot conversion without basis factors
/// - `InvalidGrid`: Unusable grid size
///
/// # Examples
///
/// ```
/// use fxsmile_core::market_data::MarketDataError;
///
/// let err = MarketDataError::OutOfRange { x: 1.5, min: 0.0, max: 1.0 };
/// assert!(format!("{}", err).contains("1.5"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Unrecognised convention string.
    #[error("Invalid convention: {0}")]
    InvalidConvention(String),

    /// Query point outside the smile domain.
    #[error("Index delta out of range: {x} not in [{min}, {max}]")]
    OutOfRange {
        /// The query point
        x: f64,
        /// Lower bound of the domain
        min: f64,
        /// Upper bound of the domain
        max: f64,
    },

    /// Unsupported conversion.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Newton solver failed to converge.
    #[error("Solver diverged: no convergence within {iterations} iterations")]
    SolverDivergence {
        /// Iteration cap that was exceeded
        iterations: usize,
    },

    /// Invalid expiry relative to the evaluation date.
    #[error("Invalid expiry: {days} days from evaluation")]
    InvalidExpiry {
        /// Signed days from evaluation to expiry
        days: i64,
    },

    /// Invalid node set.
    #[error("Invalid nodes: {0}")]
    InvalidNodes(String),

    /// Insufficient data for construction.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// A required input was not supplied.
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// Unusable grid request.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Interpolation error.
    #[error("Interpolation error: {0}")]
    Interpolation(InterpolationError),

    /// Solver error other than divergence.
    #[error("Solver error: {0}")]
    Solver(SolverError),

    /// Automatic differentiation error.
    #[error("AD error: {0}")]
    Dual(#[from] DualError),
}

impl From<InterpolationError> for MarketDataError {
    fn from(err: InterpolationError) -> Self {
        match err {
            InterpolationError::OutOfBounds { x, min, max } => {
                MarketDataError::OutOfRange { x, min, max }
            }
            other => MarketDataError::Interpolation(other),
        }
    }
}

impl From<SolverError> for MarketDataError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::MaxIterationsExceeded { iterations } => {
                MarketDataError::SolverDivergence { iterations }
            }
            other => MarketDataError::Solver(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_display() {
        let err = MarketDataError::OutOfRange {
            x: 1.5,
            min: 0.0,
            max: 1.0,
        };
        assert_eq!(
            format!("{}", err),
            "Index delta out of range: 1.5 not in [0, 1]"
        );
    }

    #[test]
    fn test_invalid_expiry_display() {
        let err = MarketDataError::InvalidExpiry { days: -3 };
        assert_eq!(format!("{}", err), "Invalid expiry: -3 days from evaluation");
    }

    #[test]
    fn test_insufficient_data_display() {
        let err = MarketDataError::InsufficientData { got: 0, need: 1 };
        assert_eq!(format!("{}", err), "Insufficient data: got 0, need 1");
    }

    #[test]
    fn test_out_of_bounds_maps_to_out_of_range() {
        let interp_err = InterpolationError::OutOfBounds {
            x: 5.0,
            min: 0.0,
            max: 3.0,
        };
        let mkt_err: MarketDataError = interp_err.into();
        assert_eq!(
            mkt_err,
            MarketDataError::OutOfRange {
                x: 5.0,
                min: 0.0,
                max: 3.0
            }
        );
    }

    #[test]
    fn test_other_interpolation_errors_are_wrapped() {
        let mkt_err: MarketDataError = InterpolationError::SingularSystem { pivot: 2 }.into();
        match mkt_err {
            MarketDataError::Interpolation(InterpolationError::SingularSystem { pivot }) => {
                assert_eq!(pivot, 2)
            }
            other => panic!("Expected Interpolation variant, got {:?}", other),
        }
    }

    #[test]
    fn test_max_iterations_maps_to_divergence() {
        let err: MarketDataError = SolverError::MaxIterationsExceeded { iterations: 50 }.into();
        assert_eq!(err, MarketDataError::SolverDivergence { iterations: 50 });

        let err: MarketDataError = SolverError::DerivativeNearZero { x: 0.1 }.into();
        assert!(matches!(err, MarketDataError::Solver(_)));
    }

    #[test]
    fn test_from_dual_error() {
        let err: MarketDataError = DualError::InvalidOrder(4).into();
        assert!(err.to_string().contains("got 4"));
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = MarketDataError::NotImplemented("x".into());
        let _: &dyn std::error::Error = &err;
    }
}
