//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod get;
pub mod grid;
pub mod lookup;
pub mod strike;

use fxsmile_core::market_data::smiles::{BasisFactors, FxDeltaVolSmile};
use fxsmile_core::types::Number;

use crate::{CliError, Result};

/// Basis factors from the optional `--w-deli` and `--w-spot` pair.
pub(crate) fn basis_from_args(w_deli: Option<f64>, w_spot: Option<f64>) -> Result<Option<BasisFactors>> {
    match (w_deli, w_spot) {
        (Some(d), Some(s)) => Ok(Some(BasisFactors::new(d, s))),
        (None, None) => Ok(None),
        _ => Err(CliError::InvalidArgument(
            "--w-deli and --w-spot must be given together".to_string(),
        )),
    }
}

/// Prints a value and, when it carries them, its node sensitivities.
pub(crate) fn print_with_sensitivities(label: &str, value: &Number, smile: &FxDeltaVolSmile) {
    println!("{:<12} {:>14.8}", label, value.real());
    if value.vars().is_empty() {
        return;
    }
    let names: Vec<String> = (0..smile.nodes().len())
        .map(|i| format!("{}{}", smile.id(), i))
        .collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    for (name, g) in names.iter().zip(value.gradient(&refs)) {
        println!("  d/d{:<8} {:>14.8}", name, g);
    }
}
