//! Main application configuration
//!
//! This module defines the configuration of a ranking run: service settings,
//! ELO parameters, where the classifications come from and where the results
//! go. Values are layered as defaults, then an optional TOML file, then
//! environment variables; the CLI applies its own overrides on top.

use crate::config::{ColumnMap, EloConfig};
use crate::error::RankingError;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub elo: EloConfig,
    pub input: InputSettings,
    pub output: OutputSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Where the classification table is read from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Path to the classifications table
    pub path: Option<PathBuf>,
    /// Field delimiter of the table
    pub delimiter: char,
    /// Column names of the three match roles
    pub columns: ColumnMap,
}

/// Encoding of the results table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow!("Unknown output format: {}", other)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Where and how the final ratings are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Results file
    pub path: PathBuf,
    /// Results encoding
    pub format: OutputFormat,
    /// Field delimiter for CSV output
    pub delimiter: char,
    /// Write the results file at the end of the run
    pub save_to_disk: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "sunspotter-elo".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            path: None,
            delimiter: ';',
            columns: ColumnMap::default(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("run_results.csv"),
            format: OutputFormat::Csv,
            delimiter: ',',
            save_to_disk: true,
        }
    }
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid {} value: {}", name, value))
}

fn parse_delimiter(name: &str, value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ if value == "\\t" => Ok('\t'),
        _ => Err(anyhow!(
            "Invalid {} value: {} (expected a single character)",
            name,
            value
        )),
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;

        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // ELO settings
        if let Ok(value) = env::var("ELO_DEFAULT_SCORE") {
            self.elo.default_score = parse_env("ELO_DEFAULT_SCORE", &value)?;
        }
        if let Ok(value) = env::var("ELO_INITIAL_K") {
            self.elo.initial_k = parse_env("ELO_INITIAL_K", &value)?;
        }
        if let Ok(value) = env::var("ELO_K_MIN") {
            self.elo.k_min = parse_env("ELO_K_MIN", &value)?;
        }
        if let Ok(value) = env::var("ELO_K_MAX") {
            self.elo.k_max = parse_env("ELO_K_MAX", &value)?;
        }
        if let Ok(value) = env::var("ELO_SCORE_MEMORY") {
            self.elo.score_memory = parse_env("ELO_SCORE_MEMORY", &value)?;
        }

        // Input settings
        if let Ok(path) = env::var("CLASSIFICATIONS_PATH") {
            self.input.path = Some(PathBuf::from(path));
        }
        if let Ok(value) = env::var("INPUT_DELIMITER") {
            self.input.delimiter = parse_delimiter("INPUT_DELIMITER", &value)?;
        }

        // Output settings
        if let Ok(path) = env::var("OUTPUT_PATH") {
            self.output.path = PathBuf::from(path);
        }
        if let Ok(value) = env::var("OUTPUT_FORMAT") {
            self.output.format = parse_env("OUTPUT_FORMAT", &value)?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => {
            return Err(RankingError::config(format!(
                "Invalid log level: {}",
                config.service.log_level
            ))
            .into())
        }
    }

    config.elo.validate()?;

    // Validate input settings
    if !config.input.delimiter.is_ascii() {
        return Err(RankingError::config("Input delimiter must be an ASCII character").into());
    }
    let names = config.input.columns.names();
    if names.iter().any(|name| name.trim().is_empty()) {
        return Err(RankingError::config("Column map entries cannot be empty").into());
    }
    if names[0] == names[1] || names[0] == names[2] || names[1] == names[2] {
        return Err(RankingError::config(format!(
            "Column map entries must be distinct: {}",
            names.join(", ")
        ))
        .into());
    }

    // Validate output settings
    if !config.output.delimiter.is_ascii() {
        return Err(RankingError::config("Output delimiter must be an ASCII character").into());
    }
    if config.output.save_to_disk && config.output.path.as_os_str().is_empty() {
        return Err(RankingError::config("Output path cannot be empty").into());
    }

    Ok(())
}
