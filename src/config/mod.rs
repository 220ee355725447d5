//! Configuration management for the ranking tool
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values.

pub mod app;
pub mod columns;
pub mod rating;

// Re-export commonly used types
pub use app::{
    validate_config, AppConfig, InputSettings, OutputFormat, OutputSettings, ServiceSettings,
};
pub use columns::ColumnMap;
pub use rating::EloConfig;
