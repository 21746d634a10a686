//! Grid command implementation
//!
//! Tabulates the smile in table, JSON or CSV form on stdout.

use fxsmile_core::market_data::smiles::{FxDeltaVolSmile, SmileGridRow};
use std::io::Write;
use tracing::info;

use crate::{CliError, Result};

/// Run the grid command
pub fn run(smile: &FxDeltaVolSmile, rows: usize, format: &str) -> Result<()> {
    info!(rows, format, "grid");
    let grid = smile.grid(rows)?;
    let stdout = std::io::stdout();
    write_grid(&grid, format, stdout.lock())
}

/// Writes `grid` to `out` in the requested format.
pub(crate) fn write_grid<W: Write>(grid: &[SmileGridRow], format: &str, mut out: W) -> Result<()> {
    match format {
        "json" => {
            serde_json::to_writer_pretty(&mut out, grid)?;
            writeln!(out)?;
        }
        "csv" => {
            let mut writer = csv::Writer::from_writer(out);
            for row in grid {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        "table" => {
            writeln!(
                out,
                "{:>10} {:>9} {:>10} {:>10} {:>10} {:>10} {:>12}",
                "index", "vol", "d_plus", "d_min", "vol_sqrt_t", "moneyness", "put_fwd_pa"
            )?;
            for r in grid {
                writeln!(
                    out,
                    "{:>10.4} {:>9.4} {:>10.5} {:>10.5} {:>10.6} {:>10.6} {:>12.6}",
                    r.index_delta,
                    r.vol,
                    r.d_plus,
                    r.d_min,
                    r.vol_sqrt_t,
                    r.moneyness,
                    r.put_delta_forward_pa
                )?;
            }
        }
        other => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: json, csv, table",
                other
            )));
        }
    }
    Ok(())
}
