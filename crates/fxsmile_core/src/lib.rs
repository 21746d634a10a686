//! # fxsmile_core: Delta-Indexed FX Volatility Smiles
//!
//! ## Layer 1 (Foundation) Role
//!
//! fxsmile_core provides everything needed to calibrate and query a single
//! expiry FX volatility smile:
//! - Numbers carrying first and second order sensitivities (`types::dual`)
//! - Normal distribution, LU solves and B-splines (`math`)
//! - Newton root finding with a corrective AD step (`math::solvers`)
//! - Delta conventions, the smile and strike inversion (`market_data::smiles`)
//! - Time types: `Date`, Act365F year fractions (`types::time`)
//! - Error types: `MarketDataError`, `InterpolationError`, `SolverError`
//!
//! ## Usage Examples
//!
//! ```rust
//! use fxsmile_core::market_data::smiles::{DeltaType, FxDeltaVolSmile, OptionType};
//! use fxsmile_core::types::{AdOrder, Date, Number};
//!
//! let smile = FxDeltaVolSmile::new(
//!     vec![(0.25, 10.15), (0.5, 7.8), (0.75, 8.9)],
//!     Date::from_ymd(2024, 1, 1).unwrap(),
//!     Date::from_ymd(2024, 7, 1).unwrap(),
//!     DeltaType::Forward,
//!     AdOrder::One,
//! )
//! .unwrap()
//! .with_id("eurusd_")
//! .unwrap();
//!
//! // Volatility and its sensitivity to each node
//! let vol = smile.lookup(0.4).unwrap();
//! let grad = vol.gradient(&["eurusd_0", "eurusd_1", "eurusd_2"]);
//! assert!((grad.iter().sum::<f64>() - 1.0).abs() < 1e-9);
//!
//! // Strike to delta
//! let res = smile
//!     .get_from_strike(&Number::Float(1.12), OptionType::Call, &Number::Float(1.10), None)
//!     .unwrap();
//! assert!(res.delta_index.real() > 0.5);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Serialisation for `Date`, `DeltaType`, `SolverConfig` and grid rows
//! - `parallel` (default): Parallel strike resolution with rayon

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;
