//! Core numeric, time, and error types.
//!
//! This module provides:
//! - `dual`: labelled forward-mode AD (`Number`, `Dual`, `Dual2`)
//! - `time`: `Date` and Act/365F time to expiry
//! - `error`: Structured error types for dates, AD, interpolation, and solvers
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`AdOrder`], [`Dual`], [`Dual2`], [`Number`] from `dual`
//! - [`Date`], [`time_to_expiry`] from `time`
//! - [`DateError`], [`DualError`], [`InterpolationError`], [`SolverError`] from `error`

pub mod dual;
pub mod error;
pub mod time;

// Re-export commonly used types at module level
pub use dual::{AdOrder, Dual, Dual2, Number};
pub use error::{DateError, DualError, InterpolationError, SolverError};
pub use time::{time_to_expiry, Date};
