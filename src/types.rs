//! Common types used throughout the ranking engine

use crate::error::RankingError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unique identifier for a ranked entity (a Sunspotter image id)
pub type EntityId = String;

/// Result of a single pairwise comparison, from the point of view of entity A
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// Entity A was judged more complex
    AWins,
    /// Entity B was judged more complex
    BWins,
}

impl MatchOutcome {
    /// Actual score for entity A (1 for a win, 0 for a loss)
    pub fn score_for_a(self) -> f64 {
        match self {
            MatchOutcome::AWins => 1.0,
            MatchOutcome::BWins => 0.0,
        }
    }

    /// Actual score for entity B
    pub fn score_for_b(self) -> f64 {
        1.0 - self.score_for_a()
    }
}

impl From<bool> for MatchOutcome {
    fn from(a_wins: bool) -> Self {
        if a_wins {
            MatchOutcome::AWins
        } else {
            MatchOutcome::BWins
        }
    }
}

impl FromStr for MatchOutcome {
    type Err = RankingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "1.0" | "true" => Ok(MatchOutcome::AWins),
            "0" | "0.0" | "false" => Ok(MatchOutcome::BWins),
            other => Err(RankingError::InvalidMatchRecord {
                reason: format!("outcome must be 0 or 1, got '{}'", other),
            }),
        }
    }
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchOutcome::AWins => write!(f, "1"),
            MatchOutcome::BWins => write!(f, "0"),
        }
    }
}

/// One crowdsourced pairwise comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    pub outcome: MatchOutcome,
}

impl MatchRecord {
    pub fn new(
        entity_a: impl Into<EntityId>,
        entity_b: impl Into<EntityId>,
        outcome: MatchOutcome,
    ) -> Self {
        Self {
            entity_a: entity_a.into(),
            entity_b: entity_b.into(),
            outcome,
        }
    }

    /// A comparison of an entity against itself carries no information
    pub fn is_self_match(&self) -> bool {
        self.entity_a == self.entity_b
    }
}
