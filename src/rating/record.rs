//! Per-entity rating state
//!
//! A [`RatingRecord`] is a plain value: the store hands out copies and takes
//! whole records back, so an update is always "read, compute, commit".

use crate::types::EntityId;
use crate::utils::population_std_dev;
use serde::Serialize;
use std::collections::VecDeque;

/// Fixed-capacity FIFO of an entity's most recent scores
///
/// Only constructed through [`ScoreHistory::new`], which keeps the capacity
/// at least one and the length within it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreHistory {
    scores: VecDeque<f64>,
    capacity: usize,
}

impl ScoreHistory {
    /// Create a history holding only `initial`
    ///
    /// A capacity of zero is treated as one so the history is never empty.
    pub fn new(initial: f64, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut scores = VecDeque::with_capacity(capacity);
        scores.push_back(initial);
        Self { scores, capacity }
    }

    /// Append a score, evicting the oldest one when full
    pub fn push(&mut self, score: f64) {
        if self.scores.len() == self.capacity {
            self.scores.pop_front();
        }
        self.scores.push_back(score);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Scores from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &f64> + Clone {
        self.scores.iter()
    }

    /// Population standard deviation of the retained scores
    pub fn std_dev(&self) -> f64 {
        population_std_dev(&self.scores)
    }
}

/// Rating state of a single entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingRecord {
    pub entity_id: EntityId,
    pub score: f64,
    pub k_value: f64,
    pub count: u64,
    pub std_dev: f64,
    pub recent_scores: ScoreHistory,
}

impl RatingRecord {
    /// Create a record for an entity that has not played any match yet
    ///
    /// `std_dev` starts at `max_k`: nothing is known about the entity.
    pub fn new(
        entity_id: EntityId,
        default_score: f64,
        default_k: f64,
        max_k: f64,
        score_memory: usize,
    ) -> Self {
        Self {
            entity_id,
            score: default_score,
            k_value: default_k,
            count: 0,
            std_dev: max_k,
            recent_scores: ScoreHistory::new(default_score, score_memory),
        }
    }
}
