//! Adaptive ELO rating engine
//!
//! This module provides the per-entity rating store, the pairwise update
//! protocol and the batch runner that replays a classification table.

pub mod elo;
pub mod record;
pub mod runner;
pub mod storage;

// Re-export commonly used types
pub use elo::{expected_score, new_rating, AdaptiveEloCalculator};
pub use record::{RatingRecord, ScoreHistory};
pub use runner::{BatchRunner, RatingSnapshot};
pub use storage::{InMemoryRatingStorage, RatingStorage};
