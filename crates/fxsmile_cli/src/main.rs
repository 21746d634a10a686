//! fxsmile CLI - Command Line Operations for Delta Volatility Smiles
//!
//! Builds the smile described in a TOML file and queries it.
//!
//! # Commands
//!
//! - `fxsmile lookup --delta <index>` - Volatility at an index delta
//! - `fxsmile get --delta <d> --delta-type <t> --option <call|put>` - Volatility for an option delta
//! - `fxsmile strike --strike <k> --forward <f> --option <call|put>` - Strike to delta and volatility
//! - `fxsmile grid --rows <n> --format <table|json|csv>` - Tabulate the smile
//! - `fxsmile check` - Validate the configuration and calibrate

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use config::{CliConfig, LogLevel};

/// fxsmile delta volatility smile CLI
#[derive(Parser)]
#[command(name = "fxsmile")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "fxsmile.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Volatility at an index delta
    Lookup {
        /// Index delta
        #[arg(short, long, allow_hyphen_values = true)]
        delta: f64,
    },

    /// Volatility for a call or put delta
    Get {
        /// Option delta, negative for puts
        #[arg(short, long, allow_hyphen_values = true)]
        delta: f64,

        /// Delta convention of the input (forward, spot)
        #[arg(short = 't', long, default_value = "forward")]
        delta_type: String,

        /// Option type (call, put)
        #[arg(short, long, default_value = "put")]
        option: String,

        /// Discount factor to delivery, for spot deltas
        #[arg(long)]
        w_deli: Option<f64>,

        /// Discount factor to spot, for spot deltas
        #[arg(long)]
        w_spot: Option<f64>,
    },

    /// Delta and volatility for a strike
    Strike {
        /// Strike
        #[arg(short = 'k', long)]
        strike: f64,

        /// Forward rate to expiry
        #[arg(short, long)]
        forward: f64,

        /// Option type (call, put)
        #[arg(short, long, default_value = "call")]
        option: String,

        /// Discount factor to delivery, for spot smiles
        #[arg(long)]
        w_deli: Option<f64>,

        /// Discount factor to spot, for spot smiles
        #[arg(long)]
        w_spot: Option<f64>,
    },

    /// Tabulate the smile over the unit delta range
    Grid {
        /// Number of rows (odd, at least 3)
        #[arg(short, long, default_value_t = fxsmile_core::market_data::smiles::DEFAULT_GRID_ROWS)]
        rows: usize,

        /// Output format (table, json, csv)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Validate the configuration and calibrate the smile
    Check,
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !cli.config.exists() {
        return Err(CliError::FileNotFound(cli.config.display().to_string()).into());
    }
    let config = CliConfig::from_file(&cli.config)
        .map_err(CliError::from)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        config.log_level
    };
    init_tracing(level.as_filter_str());
    info!(config = %cli.config.display(), log_level = %level, "fxsmile starting");

    let smile = config.build_smile()?;
    debug!(id = smile.id(), nodes = smile.nodes().len(), "smile built");

    match cli.command {
        Commands::Lookup { delta } => commands::lookup::run(&smile, delta)?,
        Commands::Get {
            delta,
            delta_type,
            option,
            w_deli,
            w_spot,
        } => commands::get::run(&smile, delta, &delta_type, &option, w_deli, w_spot)?,
        Commands::Strike {
            strike,
            forward,
            option,
            w_deli,
            w_spot,
        } => commands::strike::run(&smile, strike, forward, &option, w_deli, w_spot)?,
        Commands::Grid { rows, format } => commands::grid::run(&smile, rows, &format)?,
        Commands::Check => commands::check::run(&config, &smile)?,
    }
    Ok(())
}
