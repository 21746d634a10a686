//! Delta-indexed FX volatility smiles.
//!
//! - [`delta_type`]: delta conventions and the conversions between them
//! - [`FxDeltaVolSmile`]: calibration, lookup and delta queries
//! - strike inversion via [`FxDeltaVolSmile::get_from_strike`]
//! - [`PricingRecord`]: moneyness and `d` terms from a delta and a vol
//! - [`FxDeltaVolSmile::grid`]: tabulation over the unit delta range

mod delta_smile;
pub mod delta_type;
mod grid;
mod pricing;
mod strike;

pub use delta_smile::FxDeltaVolSmile;
pub use delta_type::{
    call_to_put_delta, convert_same_adjustment_delta, delta_index_from_call_or_put_delta,
    BasisFactors, DeltaType, OptionType,
};
pub use grid::{SmileGridRow, DEFAULT_GRID_ROWS};
pub use pricing::{PricingRecord, VolInput};
pub use strike::StrikeDeltaVol;
