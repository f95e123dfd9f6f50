//! In-memory [`Collection`] used by tests and the `memory` store mode.
//!
//! Records live in a `BTreeMap` behind a `tokio` read-write lock. Nothing
//! survives a restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use fieldwatch_types::RecordId;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::schema::Record;
use crate::store::Collection;

/// A process-local collection of records.
#[derive(Debug)]
pub struct MemoryCollection<R> {
    records: RwLock<BTreeMap<RecordId, R>>,
}

impl<R> MemoryCollection<R> {
    /// An empty collection.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<R> Default for MemoryCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Newest first, ties broken by id descending.
fn newest_first<R: Record>(records: &mut [R]) {
    records.sort_by(|a, b| {
        let (a, b) = (a.stamps(), b.stamps());
        b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
    });
}

#[async_trait]
impl<R: Record> Collection<R> for MemoryCollection<R> {
    async fn insert(&self, record: &R) -> Result<(), StoreError> {
        let id = record.stamps().id;
        let mut records = self.records.write().await;
        if records.contains_key(&id) {
            return Err(StoreError::Duplicate(format!("_id {id}")));
        }
        records.insert(id, record.clone());
        drop(records);
        Ok(())
    }

    async fn find(&self, id: RecordId) -> Result<Option<R>, StoreError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list(&self, filter: Option<&R::Key>) -> Result<Vec<R>, StoreError> {
        let mut matched: Vec<R> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| filter.is_none_or(|key| r.key() == *key))
            .cloned()
            .collect();
        newest_first(&mut matched);
        Ok(matched)
    }

    async fn replace(&self, record: &R) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let Some(slot) = records.get_mut(&record.stamps().id) else {
            return Ok(false);
        };
        *slot = record.clone();
        drop(records);
        Ok(true)
    }

    async fn delete(&self, id: RecordId) -> Result<bool, StoreError> {
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let len = self.records.read().await.len();
        Ok(u64::try_from(len).unwrap_or(u64::MAX))
    }

    async fn count_by_key(&self) -> Result<Vec<(String, u64)>, StoreError> {
        let mut groups: BTreeMap<String, u64> = BTreeMap::new();
        for record in self.records.read().await.values() {
            let key = record.key();
            let count = groups.entry(R::key_label(&key).to_owned()).or_insert(0);
            *count = count.saturating_add(1);
        }
        Ok(groups.into_iter().collect())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<R>, StoreError> {
        let mut all = self.list(None).await?;
        all.truncate(limit);
        Ok(all)
    }
}
