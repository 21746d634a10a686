//! Market data structures for FX option volatility.
//!
//! # Components
//!
//! - [`smiles`]: the delta-indexed smile, delta conventions and strike inversion
//! - [`error`]: market data error types ([`MarketDataError`])
//!
//! # Example
//!
//! ```
//! use fxsmile_core::market_data::smiles::{DeltaType, FxDeltaVolSmile};
//! use fxsmile_core::market_data::MarketDataError;
//! use fxsmile_core::types::{AdOrder, Date};
//!
//! let smile = FxDeltaVolSmile::new(
//!     vec![(0.25, 10.0), (0.5, 9.0), (0.75, 10.5)],
//!     Date::from_ymd(2024, 1, 1).unwrap(),
//!     Date::from_ymd(2025, 1, 1).unwrap(),
//!     DeltaType::Forward,
//!     AdOrder::Zero,
//! )
//! .unwrap();
//!
//! assert!((smile.lookup(0.5).unwrap().real() - 9.0).abs() < 1e-12);
//! assert!(matches!(smile.lookup(1.5), Err(MarketDataError::OutOfRange { .. })));
//! ```

pub mod error;
pub mod smiles;

pub use error::MarketDataError;
pub use smiles::{DeltaType, FxDeltaVolSmile, OptionType};
