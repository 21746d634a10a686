//! CLI error types.

use fxsmile_core::market_data::MarketDataError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Bad command line argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Smile construction or query failed.
    #[error("Smile error: {0}")]
    Smile(#[from] MarketDataError),

    /// I/O failure writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output could not be serialised.
    #[error("Serialisation error: {0}")]
    Serialisation(String),
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Serialisation(err.to_string())
    }
}

impl From<csv::Error> for CliError {
    fn from(err: csv::Error) -> Self {
        CliError::Serialisation(err.to_string())
    }
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
