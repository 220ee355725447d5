//! Adaptive ELO update protocol
//!
//! Classical ELO with one twist: after every match each entity's K-value is
//! reset to the standard deviation of its last `score_memory` scores, clamped
//! into `[k_min, k_max]`. Volatile entities keep moving quickly, settled ones
//! slow down.

use crate::config::EloConfig;
use crate::error::RankingError;
use crate::rating::record::RatingRecord;
use crate::rating::storage::{InMemoryRatingStorage, RatingStorage};
use crate::types::{EntityId, MatchOutcome};
use tracing::trace;

/// Logistic scale of the ELO model
pub const ELO_SCALE: f64 = 400.0;

/// Saturation point for the rolling standard deviation
pub const MAX_STD_DEV: f64 = 1_000_000.0;

/// Probability that an entity rated `rating_a` beats one rated `rating_b`
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_b - rating_a) / ELO_SCALE))
}

/// ELO rating after one match
///
/// `actual` is 1.0 for a win and 0.0 for a loss.
pub fn new_rating(old_rating: f64, k_value: f64, actual: f64, expected: f64) -> f64 {
    old_rating + k_value * (actual - expected)
}

/// Applies pairwise matches to a rating store
#[derive(Debug, Clone)]
pub struct AdaptiveEloCalculator {
    config: EloConfig,
}

impl AdaptiveEloCalculator {
    /// Create a new calculator, rejecting invalid configuration
    pub fn new(config: EloConfig) -> crate::error::Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    /// Build an in-memory store holding a fresh record for every id
    pub fn initialize_storage<I>(
        &self,
        entity_ids: I,
    ) -> crate::error::Result<InMemoryRatingStorage>
    where
        I: IntoIterator<Item = EntityId>,
    {
        InMemoryRatingStorage::initialize(
            entity_ids,
            self.config.default_score,
            self.config.initial_k,
            self.config.k_max,
            self.config.score_memory,
        )
    }

    /// Compute the post-match state of one entity
    ///
    /// Pure: `record` is consumed and the updated value returned.
    pub fn update_record(
        &self,
        mut record: RatingRecord,
        actual: f64,
        expected: f64,
    ) -> RatingRecord {
        let score = new_rating(record.score, record.k_value, actual, expected);
        record.recent_scores.push(score);

        let std_dev = record.recent_scores.std_dev().min(MAX_STD_DEV);

        record.score = score;
        record.std_dev = std_dev;
        record.k_value = std_dev.clamp(self.config.k_min, self.config.k_max);
        record.count += 1;
        record
    }

    /// Apply one comparison and commit both entities
    ///
    /// The read, the update of both records and the commit happen under one
    /// store lock, so an unknown id leaves the store untouched and threads
    /// sharing a store never lose each other's updates. Self-matches are
    /// rejected; callers replaying a table should filter them first.
    pub fn apply_match(
        &self,
        storage: &dyn RatingStorage,
        entity_a: &str,
        entity_b: &str,
        outcome: MatchOutcome,
    ) -> crate::error::Result<(RatingRecord, RatingRecord)> {
        if entity_a == entity_b {
            return Err(RankingError::InvalidMatchRecord {
                reason: format!("entity {} cannot be matched against itself", entity_a),
            }
            .into());
        }

        storage.update_pair(entity_a, entity_b, &mut |record_a, record_b| {
            let expected_a = expected_score(record_a.score, record_b.score);
            let expected_b = 1.0 - expected_a;

            let updated_a = self.update_record(record_a, outcome.score_for_a(), expected_a);
            let updated_b = self.update_record(record_b, outcome.score_for_b(), expected_b);

            trace!(
                entity_a,
                entity_b,
                %outcome,
                score_a = updated_a.score,
                score_b = updated_b.score,
                "Applied match"
            );

            Ok((updated_a, updated_b))
        })
    }
}
