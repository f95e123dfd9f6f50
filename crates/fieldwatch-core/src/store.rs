//! The persistence seam.
//!
//! A [`Collection`] holds every record of one kind. The CRUD service only
//! talks to this trait, so the same service runs over the in-memory store
//! in tests and over `PostgreSQL` in production.

use std::sync::Arc;

use async_trait::async_trait;
use fieldwatch_types::{
    AnimalObservation, HumanActivityObservation, PhotoConsent, PlantObservation, RecordId,
};

use crate::error::StoreError;
use crate::memory::MemoryCollection;
use crate::schema::Record;

/// Storage for all records of one kind.
///
/// Every method is a single-record or single-query operation. Listing
/// methods return records newest first (`createdAt` descending, then id
/// descending).
#[async_trait]
pub trait Collection<R: Record>: Send + Sync {
    /// Persist a new record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if the identifier is taken.
    async fn insert(&self, record: &R) -> Result<(), StoreError>;

    /// Look up a record by identifier.
    async fn find(&self, id: RecordId) -> Result<Option<R>, StoreError>;

    /// All records, optionally restricted to one filter value.
    async fn list(&self, filter: Option<&R::Key>) -> Result<Vec<R>, StoreError>;

    /// Overwrite an existing record. Returns `false` if nothing had its id.
    async fn replace(&self, record: &R) -> Result<bool, StoreError>;

    /// Remove a record. Returns `false` if nothing had this id.
    async fn delete(&self, id: RecordId) -> Result<bool, StoreError>;

    /// Number of stored records.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Record counts grouped by the filter field's string form.
    ///
    /// Order is unspecified.
    async fn count_by_key(&self) -> Result<Vec<(String, u64)>, StoreError>;

    /// The `limit` newest records.
    async fn recent(&self, limit: usize) -> Result<Vec<R>, StoreError>;
}

/// One collection per record kind, as handed to the API layer.
#[derive(Clone)]
pub struct RecordStores {
    /// Plant observations.
    pub plants: Arc<dyn Collection<PlantObservation>>,
    /// Animal observations.
    pub animals: Arc<dyn Collection<AnimalObservation>>,
    /// Human-activity observations.
    pub activities: Arc<dyn Collection<HumanActivityObservation>>,
    /// Photo-consent submissions.
    pub consents: Arc<dyn Collection<PhotoConsent>>,
}

impl RecordStores {
    /// Fresh, empty in-memory collections.
    pub fn in_memory() -> Self {
        Self {
            plants: Arc::new(MemoryCollection::new()),
            animals: Arc::new(MemoryCollection::new()),
            activities: Arc::new(MemoryCollection::new()),
            consents: Arc::new(MemoryCollection::new()),
        }
    }
}

impl core::fmt::Debug for RecordStores {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecordStores").finish_non_exhaustive()
    }
}
