//! Check command implementation
//!
//! Reports the configuration and the calibrated smile's domain.

use fxsmile_core::market_data::smiles::FxDeltaVolSmile;
use tracing::info;

use crate::config::CliConfig;
use crate::Result;

/// Run the check command
pub fn run(config: &CliConfig, smile: &FxDeltaVolSmile) -> Result<()> {
    info!("Checking configuration...");

    println!("fxsmile v{}", env!("CARGO_PKG_VERSION"));
    println!("  Log level:     {}", config.log_level);
    println!("  Smile id:      {}", smile.id());
    println!("  Delta type:    {}", smile.delta_type());
    println!("  AD order:      {:?}", smile.ad_order());
    println!(
        "  Expiry:        {} -> {} ({:.6} years)",
        smile.eval_date(),
        smile.expiry(),
        smile.t_expiry()
    );
    println!(
        "  Domain:        [{}, {:.6}]",
        smile.lower_bound(),
        smile.upper_bound()
    );
    println!("  Nodes:         {}", smile.nodes().len());
    for (k, v) in smile.nodes() {
        println!("    {:>8.4} -> {:>8.4}", k, v);
    }
    let solver = smile.solver().config();
    println!(
        "  Solver:        tolerance {:e}, max {} iterations",
        solver.tolerance, solver.max_iterations
    );

    info!("Configuration OK");
    Ok(())
}
