//! Sunspotter ELO - complexity ranking for solar active-region images
//!
//! This crate ranks Sunspotter images from crowdsourced pairwise
//! "which is more complex" classifications using an ELO rating system whose
//! per-image K-value adapts to the volatility of the image's recent scores.

pub mod config;
pub mod error;
pub mod rating;
pub mod table;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RankingError, Result};
pub use types::*;

// Re-export key components
pub use config::{AppConfig, ColumnMap, EloConfig};
pub use rating::{AdaptiveEloCalculator, BatchRunner, RatingRecord, RatingSnapshot};
pub use table::MatchSource;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
