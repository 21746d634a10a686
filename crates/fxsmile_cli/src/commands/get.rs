//! Get command implementation
//!
//! Reads the volatility for a call or put delta in any unadjusted convention.

use fxsmile_core::market_data::smiles::{DeltaType, FxDeltaVolSmile, OptionType};
use tracing::info;

use super::{basis_from_args, print_with_sensitivities};
use crate::Result;

/// Run the get command
pub fn run(
    smile: &FxDeltaVolSmile,
    delta: f64,
    delta_type: &str,
    option: &str,
    w_deli: Option<f64>,
    w_spot: Option<f64>,
) -> Result<()> {
    let delta_type: DeltaType = delta_type.parse()?;
    let option: OptionType = option.parse()?;
    let basis = basis_from_args(w_deli, w_spot)?;
    info!(delta, %delta_type, %option, "get");

    let vol = smile.get(delta, delta_type, option, basis.as_ref())?;
    print_with_sensitivities("vol", &vol, smile);
    Ok(())
}
