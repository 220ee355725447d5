//! Rating storage interface and implementations
//!
//! This module defines the interface for holding per-entity rating records
//! during a run, with an in-memory implementation. Every write replaces whole
//! records; a match reads, updates and commits both of its records under one
//! write lock through [`RatingStorage::update_pair`].

use crate::error::RankingError;
use crate::rating::record::RatingRecord;
use crate::types::EntityId;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Trait for rating storage operations
pub trait RatingStorage: Send + Sync {
    /// Get an entity's current record
    ///
    /// Fails with [`RankingError::EntityNotFound`] for an unknown id.
    fn get(&self, entity_id: &str) -> crate::error::Result<RatingRecord>;

    /// Replace the stored record for `entity_id`
    ///
    /// Fails with [`RankingError::EntityNotFound`] for an unknown id.
    fn set(&self, entity_id: &str, record: RatingRecord) -> crate::error::Result<()>;

    /// Replace two records as one unit
    ///
    /// Nothing is written unless both ids are already known.
    fn set_pair(&self, first: RatingRecord, second: RatingRecord) -> crate::error::Result<()>;

    /// Read two records, transform them and commit the result as one unit
    ///
    /// The store stays locked from the read to the commit, so concurrent
    /// updates of the same entities are serialized. Nothing is written when
    /// either id is unknown or `update` fails.
    fn update_pair(
        &self,
        first_id: &str,
        second_id: &str,
        update: &mut dyn FnMut(
            RatingRecord,
            RatingRecord,
        ) -> crate::error::Result<(RatingRecord, RatingRecord)>,
    ) -> crate::error::Result<(RatingRecord, RatingRecord)>;

    /// Copy of every stored record
    fn snapshot(&self) -> crate::error::Result<HashMap<EntityId, RatingRecord>>;

    /// Number of stored entities
    fn len(&self) -> crate::error::Result<usize>;

    fn is_empty(&self) -> crate::error::Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// In-memory rating storage implementation
#[derive(Debug, Default)]
pub struct InMemoryRatingStorage {
    records: RwLock<HashMap<EntityId, RatingRecord>>,
}

impl InMemoryRatingStorage {
    /// Create storage with one fresh record per distinct id
    ///
    /// Every record starts at `default_score` with K `default_k`, zero matches,
    /// `std_dev = max_k` and a score history holding only `default_score`.
    pub fn initialize<I>(
        entity_ids: I,
        default_score: f64,
        default_k: f64,
        max_k: f64,
        score_memory: usize,
    ) -> crate::error::Result<Self>
    where
        I: IntoIterator<Item = EntityId>,
    {
        let records: HashMap<EntityId, RatingRecord> = entity_ids
            .into_iter()
            .map(|id| {
                let record =
                    RatingRecord::new(id.clone(), default_score, default_k, max_k, score_memory);
                (id, record)
            })
            .collect();

        if records.is_empty() {
            return Err(
                RankingError::config("cannot initialize rating storage without entities").into(),
            );
        }

        Ok(Self {
            records: RwLock::new(records),
        })
    }

    fn read(&self) -> crate::error::Result<RwLockReadGuard<'_, HashMap<EntityId, RatingRecord>>> {
        self.records.read().map_err(|_| {
            RankingError::InternalError {
                message: "Failed to acquire ratings read lock".to_string(),
            }
            .into()
        })
    }

    fn write(
        &self,
    ) -> crate::error::Result<RwLockWriteGuard<'_, HashMap<EntityId, RatingRecord>>> {
        self.records.write().map_err(|_| {
            RankingError::InternalError {
                message: "Failed to acquire ratings write lock".to_string(),
            }
            .into()
        })
    }
}

/// Insert both records, or neither when one of them is unknown
fn commit_pair(
    records: &mut HashMap<EntityId, RatingRecord>,
    first: RatingRecord,
    second: RatingRecord,
) -> crate::error::Result<()> {
    for record in [&first, &second] {
        if !records.contains_key(&record.entity_id) {
            return Err(RankingError::not_found(record.entity_id.clone()).into());
        }
    }

    records.insert(first.entity_id.clone(), first);
    records.insert(second.entity_id.clone(), second);
    Ok(())
}

impl RatingStorage for InMemoryRatingStorage {
    fn get(&self, entity_id: &str) -> crate::error::Result<RatingRecord> {
        let records = self.read()?;

        records
            .get(entity_id)
            .cloned()
            .ok_or_else(|| RankingError::not_found(entity_id).into())
    }

    fn set(&self, entity_id: &str, mut record: RatingRecord) -> crate::error::Result<()> {
        let mut records = self.write()?;

        let slot = records
            .get_mut(entity_id)
            .ok_or_else(|| RankingError::not_found(entity_id))?;
        record.entity_id = entity_id.to_string();
        *slot = record;
        Ok(())
    }

    fn set_pair(&self, first: RatingRecord, second: RatingRecord) -> crate::error::Result<()> {
        let mut records = self.write()?;

        commit_pair(&mut records, first, second)
    }

    fn update_pair(
        &self,
        first_id: &str,
        second_id: &str,
        update: &mut dyn FnMut(
            RatingRecord,
            RatingRecord,
        ) -> crate::error::Result<(RatingRecord, RatingRecord)>,
    ) -> crate::error::Result<(RatingRecord, RatingRecord)> {
        let mut records = self.write()?;

        let lookup = |id: &str| {
            records
                .get(id)
                .cloned()
                .ok_or_else(|| RankingError::not_found(id))
        };
        let first = lookup(first_id)?;
        let second = lookup(second_id)?;

        let (first, second) = update(first, second)?;
        commit_pair(&mut records, first.clone(), second.clone())?;

        Ok((first, second))
    }

    fn snapshot(&self) -> crate::error::Result<HashMap<EntityId, RatingRecord>> {
        Ok(self.read()?.clone())
    }

    fn len(&self) -> crate::error::Result<usize> {
        Ok(self.read()?.len())
    }
}
