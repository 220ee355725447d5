//! Batch replay of pairwise comparisons
//!
//! Matches are applied strictly in input order. K-values and standard
//! deviations depend on each entity's history, so reordering the input
//! changes the result.

use crate::config::EloConfig;
use crate::rating::elo::AdaptiveEloCalculator;
use crate::rating::record::RatingRecord;
use crate::rating::storage::RatingStorage;
use crate::types::{EntityId, MatchRecord};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Final (or interim) state of every rated entity
#[derive(Debug, Clone, Default, Serialize)]
pub struct RatingSnapshot {
    /// Records keyed by entity id, in id order
    pub ratings: BTreeMap<EntityId, RatingRecord>,
    /// Matches that updated the store
    pub matches_applied: usize,
    /// Self-matches that were skipped
    pub self_matches_skipped: usize,
}

impl RatingSnapshot {
    pub fn get(&self, entity_id: &str) -> Option<&RatingRecord> {
        self.ratings.get(entity_id)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Sum of match counts over all entities (twice the applied matches)
    pub fn total_count(&self) -> u64 {
        self.ratings.values().map(|r| r.count).sum()
    }

    /// Records by descending score, ties broken by id
    pub fn ranked(&self) -> Vec<&RatingRecord> {
        let mut records: Vec<&RatingRecord> = self.ratings.values().collect();
        records.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.entity_id.cmp(&b.entity_id))
        });
        records
    }
}

/// Replays match records through the adaptive ELO calculator
pub struct BatchRunner {
    calculator: AdaptiveEloCalculator,
    storage: Arc<dyn RatingStorage>,
}

impl std::fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRunner")
            .field("calculator", &self.calculator)
            .finish_non_exhaustive()
    }
}

impl BatchRunner {
    /// Create a runner over an already initialised store
    pub fn new(calculator: AdaptiveEloCalculator, storage: Arc<dyn RatingStorage>) -> Self {
        Self {
            calculator,
            storage,
        }
    }

    /// Create a runner whose store holds every entity seen in `matches`
    ///
    /// Fails with a configuration error when the configuration is invalid or
    /// `matches` names no entity at all.
    pub fn for_matches(config: EloConfig, matches: &[MatchRecord]) -> crate::error::Result<Self> {
        let calculator = AdaptiveEloCalculator::new(config)?;

        let entity_ids: BTreeSet<EntityId> = matches
            .iter()
            .flat_map(|m| [m.entity_a.clone(), m.entity_b.clone()])
            .collect();
        debug!(entities = entity_ids.len(), "Initializing rating storage");

        let storage = calculator.initialize_storage(entity_ids)?;

        Ok(Self::new(calculator, Arc::new(storage)))
    }

    pub fn storage(&self) -> &Arc<dyn RatingStorage> {
        &self.storage
    }

    /// Apply every match in order and return the resulting snapshot
    ///
    /// Self-matches are skipped. The first failing match aborts the batch;
    /// matches before it stay committed, the failing one is not applied.
    /// Runs sharing one runner from several threads interleave per match and
    /// never lose an update.
    pub fn run(&self, matches: &[MatchRecord]) -> crate::error::Result<RatingSnapshot> {
        info!(matches = matches.len(), "Starting ELO run");

        let mut applied = 0;
        let mut skipped = 0;

        for (index, record) in matches.iter().enumerate() {
            if record.is_self_match() {
                debug!(index, entity = %record.entity_a, "Skipping self-match");
                skipped += 1;
                continue;
            }

            self.calculator.apply_match(
                self.storage.as_ref(),
                &record.entity_a,
                &record.entity_b,
                record.outcome,
            )?;
            applied += 1;
            trace!(index, "Match done");
        }

        let mut snapshot = self.snapshot()?;
        snapshot.matches_applied = applied;
        snapshot.self_matches_skipped = skipped;

        info!(
            applied,
            skipped,
            entities = snapshot.len(),
            "ELO run completed"
        );

        Ok(snapshot)
    }

    /// Current state of the store
    ///
    /// Usable between runs; match counters are left at zero.
    pub fn snapshot(&self) -> crate::error::Result<RatingSnapshot> {
        let ratings = self.storage.snapshot()?.into_iter().collect();

        Ok(RatingSnapshot {
            ratings,
            ..RatingSnapshot::default()
        })
    }
}
