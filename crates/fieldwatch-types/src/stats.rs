//! Aggregate statistics payloads for sightings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ActivityType, AnimalType};
use crate::ids::RecordId;

/// One `(label, count)` pair of a grouped count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CountEntry {
    /// The group label (exact type or bucket name).
    pub label: String,
    /// Number of records in the group.
    pub count: u64,
}

/// Statistics over all records of one sighting kind.
///
/// `total`, the grouped counts and `recent` come from separate reads and
/// are not guaranteed to agree when writes race with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ObservationStats<P> {
    /// Number of records of the kind.
    pub total: u64,
    /// Counts per exact discriminator value, largest first.
    pub by_exact_type: Vec<CountEntry>,
    /// Counts per coarse category bucket, largest first.
    pub by_category_bucket: Vec<CountEntry>,
    /// The newest records, projected to a few fields.
    pub recent: Vec<P>,
}

/// Compact projection of an animal sighting for the recent feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct RecentAnimal {
    /// Record identifier.
    #[serde(rename = "_id")]
    pub id: RecordId,
    /// What was seen.
    pub animal_type: AnimalType,
    /// Date of the sighting.
    pub date: NaiveDate,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Compact projection of a human-activity report for the recent feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct RecentActivity {
    /// Record identifier.
    #[serde(rename = "_id")]
    pub id: RecordId,
    /// What was observed.
    pub activity_type: ActivityType,
    /// Date of the observation.
    pub date: NaiveDate,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}
