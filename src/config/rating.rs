//! Adaptive ELO configuration

use crate::error::RankingError;
use serde::{Deserialize, Serialize};

/// Parameters of the adaptive ELO rating system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EloConfig {
    /// Initial rating for every entity
    pub default_score: f64,
    /// Initial K-value for every entity
    pub initial_k: f64,
    /// Lower bound of the adaptive K-value
    pub k_min: f64,
    /// Upper bound of the adaptive K-value
    pub k_max: f64,
    /// Number of recent scores kept per entity for the standard deviation
    pub score_memory: usize,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            default_score: 1400.0,
            initial_k: 32.0,
            k_min: 16.0,
            k_max: 32.0,
            score_memory: 10,
        }
    }
}

impl EloConfig {
    /// Classical ELO: the K-value never moves
    pub fn fixed_k(k: f64) -> Self {
        Self {
            initial_k: k,
            k_min: k,
            k_max: k,
            ..Self::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.default_score.is_finite() {
            return Err(RankingError::config("Default score must be finite").into());
        }

        if !(self.k_min.is_finite() && self.k_max.is_finite()) {
            return Err(RankingError::config("K bounds must be finite").into());
        }

        if self.k_min <= 0.0 {
            return Err(RankingError::config("Minimum K-value must be positive").into());
        }

        if self.k_min > self.k_max {
            return Err(RankingError::config(format!(
                "Minimum K-value {} exceeds maximum K-value {}",
                self.k_min, self.k_max
            ))
            .into());
        }

        if !(self.k_min..=self.k_max).contains(&self.initial_k) {
            return Err(RankingError::config(format!(
                "Initial K-value {} must lie within [{}, {}]",
                self.initial_k, self.k_min, self.k_max
            ))
            .into());
        }

        if self.score_memory == 0 {
            return Err(RankingError::config("Score memory must be at least 1").into());
        }

        Ok(())
    }
}
