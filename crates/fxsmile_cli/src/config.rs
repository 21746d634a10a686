//! CLI configuration management
//!
//! Loads the smile definition and logging settings from a TOML file, with
//! environment variable overrides.

use fxsmile_core::market_data::smiles::{DeltaType, FxDeltaVolSmile};
use fxsmile_core::math::solvers::SolverConfig;
use fxsmile_core::types::{AdOrder, Date};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable overriding the configured log level.
pub const LOG_LEVEL_ENV: &str = "FXSMILE_LOG_LEVEL";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid smile definition: {0}")]
    InvalidSmile(String),

    #[error("Invalid solver settings: {0}")]
    InvalidSolver(String),

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

/// The `[smile]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct SmileSection {
    /// Evaluation date, `YYYY-MM-DD`
    pub eval_date: Date,
    /// Expiry date, `YYYY-MM-DD`
    pub expiry: Date,
    /// Delta convention of the node keys
    pub delta_type: DeltaType,
    /// Sensitivity order, 0 to 2
    #[serde(default)]
    pub ad_order: AdOrder,
    /// `[index_delta, vol_percent]` pairs
    pub nodes: Vec<(f64, f64)>,
    /// Prefix for node sensitivity labels
    #[serde(default)]
    pub id: Option<String>,
}

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Log level
    #[serde(default, deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Smile definition
    pub smile: SmileSection,
    /// Newton settings, library defaults when absent
    #[serde(default)]
    pub solver: Option<SolverConfig>,
}

impl CliConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        let mut config = Self::from_toml(&content)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Override settings from environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            self.log_level = LogLevel::from_str(&level)?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smile.nodes.is_empty() {
            return Err(ConfigError::InvalidSmile(
                "at least one node is required".to_string(),
            ));
        }
        if self.smile.expiry < self.smile.eval_date {
            return Err(ConfigError::InvalidSmile(format!(
                "expiry {} is before evaluation date {}",
                self.smile.expiry, self.smile.eval_date
            )));
        }
        if let Some(solver) = &self.solver {
            solver
                .validate()
                .map_err(|e| ConfigError::InvalidSolver(e.to_string()))?;
        }
        Ok(())
    }

    /// Calibrates the configured smile.
    pub fn build_smile(&self) -> Result<FxDeltaVolSmile, crate::CliError> {
        let s = &self.smile;
        let mut smile = FxDeltaVolSmile::new(
            s.nodes.clone(),
            s.eval_date,
            s.expiry,
            s.delta_type,
            s.ad_order,
        )?;
        if let Some(id) = &s.id {
            smile = smile.with_id(id.clone())?;
        }
        if let Some(solver) = self.solver {
            smile = smile.with_solver_config(solver);
        }
        Ok(smile)
    }
}
