//! The CRUD service shared by every record kind.
//!
//! [`RecordService`] accepts client JSON, validates it through the kind's
//! [`Record`] schema, and persists it through a [`Collection`]. Each
//! operation is one store call (two for update: read then write). Nothing
//! is cached and nothing is retried.

use std::sync::Arc;

use fieldwatch_types::{ObservationStats, RecordId, RecordStamps};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::error::{ServiceError, StoreError, Violations};
use crate::schema::{timestamp_now, Record};
use crate::stats::{bucket_counts, exact_counts, Sighting, RECENT_LIMIT};
use crate::store::Collection;

/// CRUD and filter operations over one record kind.
pub struct RecordService<R: Record> {
    store: Arc<dyn Collection<R>>,
}

impl<R: Record> Clone for RecordService<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<R: Record> core::fmt::Debug for RecordService<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecordService")
            .field("kind", &R::KIND)
            .finish_non_exhaustive()
    }
}

impl<R: Record> RecordService<R> {
    /// Wrap a store.
    pub const fn new(store: Arc<dyn Collection<R>>) -> Self {
        Self { store }
    }

    /// Validate and persist a new record.
    ///
    /// # Errors
    ///
    /// [`ServiceError::InvalidInput`] if the body is not an object or fails
    /// validation; nothing is persisted in that case.
    pub async fn create(&self, body: Value) -> Result<R, ServiceError> {
        let object = into_object(body)?;
        let draft = parse_draft::<R::Draft>(object)?;
        let now = timestamp_now();
        let record = R::from_draft(draft, RecordStamps::new(now))
            .map_err(rejected::<R>)?;

        self.store.insert(&record).await.map_err(failed::<R>)?;
        info!(kind = R::KIND.as_str(), id = %record.stamps().id, "Record created");
        Ok(record)
    }

    /// Every record, newest first.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Store`] if the store fails.
    pub async fn list(&self) -> Result<Vec<R>, ServiceError> {
        self.store.list(None).await.map_err(failed::<R>)
    }

    /// Records whose filter field equals `raw`, newest first.
    ///
    /// A value outside the kind's vocabulary matches nothing.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Store`] if the store fails.
    pub async fn list_by(&self, raw: &str) -> Result<Vec<R>, ServiceError> {
        let Some(key) = R::parse_key(raw) else {
            return Ok(Vec::new());
        };
        self.store.list(Some(&key)).await.map_err(failed::<R>)
    }

    /// One record by identifier.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] if the id is malformed or unknown.
    pub async fn get(&self, raw_id: &str) -> Result<R, ServiceError> {
        let id = parse_id::<R>(raw_id)?;
        self.store
            .find(id)
            .await
            .map_err(failed::<R>)?
            .ok_or(ServiceError::NotFound(R::KIND))
    }

    /// Merge `patch` over the stored record, re-validate, and persist.
    ///
    /// The merge is shallow: each top-level key replaces the stored value
    /// and `null` clears it. Identity, timestamps and `category` cannot be
    /// changed through a patch.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] if no record has the id.
    /// [`ServiceError::InvalidInput`] if the merged record fails
    /// validation; the stored record is left unchanged.
    pub async fn update(&self, raw_id: &str, patch: Value) -> Result<R, ServiceError> {
        let id = parse_id::<R>(raw_id)?;
        let patch = into_object(patch)?;
        let existing = self
            .store
            .find(id)
            .await
            .map_err(failed::<R>)?
            .ok_or(ServiceError::NotFound(R::KIND))?;

        let merged = merge(draft_object(&existing.to_draft())?, patch);
        let draft = parse_draft::<R::Draft>(merged)?;
        let mut stamps = *existing.stamps();
        stamps.touch(timestamp_now());
        let record = R::from_draft(draft, stamps).map_err(rejected::<R>)?;

        if !self.store.replace(&record).await.map_err(failed::<R>)? {
            return Err(ServiceError::NotFound(R::KIND));
        }
        info!(kind = R::KIND.as_str(), %id, "Record updated");
        Ok(record)
    }

    /// Remove a record.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] if the id is malformed or unknown.
    pub async fn delete(&self, raw_id: &str) -> Result<(), ServiceError> {
        let id = parse_id::<R>(raw_id)?;
        if !self.store.delete(id).await.map_err(failed::<R>)? {
            return Err(ServiceError::NotFound(R::KIND));
        }
        info!(kind = R::KIND.as_str(), %id, "Record deleted");
        Ok(())
    }
}

impl<R: Sighting> RecordService<R> {
    /// Totals, per-type and per-bucket counts, and the newest sightings.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Store`] if any of the reads fails.
    pub async fn stats(&self) -> Result<ObservationStats<R::Recent>, ServiceError> {
        let total = self.store.count().await.map_err(failed::<R>)?;
        let groups = self.store.count_by_key().await.map_err(failed::<R>)?;
        let recent = self.store.recent(RECENT_LIMIT).await.map_err(failed::<R>)?;

        let by_exact_type = exact_counts(groups);
        let by_category_bucket = bucket_counts::<R>(&by_exact_type);
        Ok(ObservationStats {
            total,
            by_exact_type,
            by_category_bucket,
            recent: recent.iter().map(R::recent_entry).collect(),
        })
    }
}

/// Shallow merge: `null` removes the key, anything else replaces it.
fn merge(mut base: Map<String, Value>, patch: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in patch {
        if value.is_null() {
            base.remove(&key);
        } else {
            base.insert(key, value);
        }
    }
    base
}

fn into_object(body: Value) -> Result<Map<String, Value>, ServiceError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(ServiceError::InvalidInput(Violations::single(
            "Request body must be a JSON object",
        ))),
    }
}

fn draft_object<D: serde::Serialize>(draft: &D) -> Result<Map<String, Value>, ServiceError> {
    match serde_json::to_value(draft) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ServiceError::Store("stored record is not an object".to_owned())),
        Err(e) => Err(ServiceError::Store(format!("stored record unreadable: {e}"))),
    }
}

/// Deserialize a JSON object into a draft. Type mismatches such as a
/// number where text is expected become violations.
fn parse_draft<D: DeserializeOwned>(object: Map<String, Value>) -> Result<D, ServiceError> {
    serde_json::from_value(Value::Object(object))
        .map_err(|e| ServiceError::InvalidInput(Violations::single(format!("Invalid field: {e}"))))
}

fn parse_id<R: Record>(raw: &str) -> Result<RecordId, ServiceError> {
    RecordId::parse(raw).ok_or(ServiceError::NotFound(R::KIND))
}

fn rejected<R: Record>(violations: Violations) -> ServiceError {
    warn!(kind = R::KIND.as_str(), %violations, "Validation rejected submission");
    ServiceError::InvalidInput(violations)
}

fn failed<R: Record>(err: StoreError) -> ServiceError {
    error!(kind = R::KIND.as_str(), error = %err, "Store operation failed");
    ServiceError::from(err)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn merge_replaces_and_clears() {
        let base = object(json!({ "photo": "a", "description": "old", "date": "2024-01-01" }));
        let patch = object(json!({ "photo": "b", "description": null }));
        let merged = merge(base, patch);
        assert_eq!(
            Value::Object(merged),
            json!({ "photo": "b", "date": "2024-01-01" })
        );
    }

    #[test]
    fn merge_replaces_nested_objects_whole() {
        let base = object(json!({ "location": { "latitude": 1.0, "longitude": 2.0 } }));
        let patch = object(json!({ "location": { "latitude": 3.0 } }));
        assert_eq!(
            Value::Object(merge(base, patch)),
            json!({ "location": { "latitude": 3.0 } })
        );
    }

    #[test]
    fn non_object_body_is_invalid_input() {
        assert!(matches!(
            into_object(json!([1, 2])),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn type_mismatch_is_a_violation() {
        let parsed = parse_draft::<fieldwatch_types::PlantDraft>(object(json!({ "photo": 5 })));
        assert!(matches!(parsed, Err(ServiceError::InvalidInput(_))));
    }
}
