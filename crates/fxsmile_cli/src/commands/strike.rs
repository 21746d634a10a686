//! Strike command implementation
//!
//! Resolves the index delta and volatility consistent with a strike.

use fxsmile_core::market_data::smiles::{FxDeltaVolSmile, OptionType};
use fxsmile_core::types::Number;
use tracing::info;

use super::{basis_from_args, print_with_sensitivities};
use crate::{CliError, Result};

/// Run the strike command
pub fn run(
    smile: &FxDeltaVolSmile,
    strike: f64,
    forward: f64,
    option: &str,
    w_deli: Option<f64>,
    w_spot: Option<f64>,
) -> Result<()> {
    if !(strike > 0.0 && forward > 0.0) {
        return Err(CliError::InvalidArgument(format!(
            "strike and forward must be positive, got {} and {}",
            strike, forward
        )));
    }
    let option: OptionType = option.parse()?;
    let basis = basis_from_args(w_deli, w_spot)?;
    info!(strike, forward, %option, "strike");

    let res = smile.get_from_strike(
        &Number::Float(strike),
        option,
        &Number::Float(forward),
        basis.as_ref(),
    )?;
    println!("{:<12} {:>14.8}", "strike", strike);
    print_with_sensitivities("index_delta", &res.delta_index, smile);
    print_with_sensitivities("vol", &res.vol, smile);
    Ok(())
}
