//! Lookup command implementation
//!
//! Reads the volatility at an index delta.

use fxsmile_core::market_data::smiles::FxDeltaVolSmile;
use tracing::info;

use super::print_with_sensitivities;
use crate::Result;

/// Run the lookup command
pub fn run(smile: &FxDeltaVolSmile, delta: f64) -> Result<()> {
    info!(delta, "lookup");
    let vol = smile.lookup(delta)?;
    print_with_sensitivities("vol", &vol, smile);
    Ok(())
}
