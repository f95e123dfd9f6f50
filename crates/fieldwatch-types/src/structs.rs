//! Stored record types.
//!
//! Each struct is the full document of one record kind as it is persisted
//! and returned by the API. Field names are `camelCase` on the wire and the
//! identifier is exposed as `_id` so existing clients keep working.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    ActivityType, AnimalType, Category, ObservationStatus, PhotoPermission, TimeOfDay,
};
use crate::ids::{RecordId, UserId};

/// Identity and bookkeeping timestamps shared by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct RecordStamps {
    /// Immutable record identifier.
    #[serde(rename = "_id")]
    pub id: RecordId,
    /// When the record was first persisted.
    pub created_at: DateTime<Utc>,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl RecordStamps {
    /// Stamps for a record first persisted at `now`, with a fresh identifier.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a write at `now`, keeping identity and creation time.
    pub const fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Optional coordinates attached to a sighting.
///
/// Either half may be missing; the client sends whatever the device
/// reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl GeoPoint {
    /// Whether neither coordinate is set.
    pub const fn is_empty(&self) -> bool {
        self.latitude.is_none() && self.longitude.is_none()
    }
}

/// A plant sighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PlantObservation {
    /// Identity and timestamps.
    #[serde(flatten)]
    pub stamps: RecordStamps,
    /// Always [`Category::Plant`].
    pub category: Category,
    /// Free-form grouping key (tree, flower family, ...).
    pub plant_category: String,
    /// Free-form species or type name.
    pub plant_type: String,
    /// Photo URI or encoded image.
    pub photo: String,
    /// Calendar date of the sighting.
    pub date: NaiveDate,
    /// Time of day of the sighting.
    pub time_of_day: TimeOfDay,
    /// Optional free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An animal sighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct AnimalObservation {
    /// Identity and timestamps.
    #[serde(flatten)]
    pub stamps: RecordStamps,
    /// Always [`Category::Animal`].
    pub category: Category,
    /// What was seen.
    pub animal_type: AnimalType,
    /// Photo URI or encoded image.
    pub photo: String,
    /// Calendar date of the sighting.
    pub date: NaiveDate,
    /// Time of day of the sighting.
    pub time_of_day: TimeOfDay,
    /// Optional free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    /// Moderation status, `pending` on creation.
    pub status: ObservationStatus,
    /// Submitting user, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

/// A human-impact activity report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct HumanActivityObservation {
    /// Identity and timestamps.
    #[serde(flatten)]
    pub stamps: RecordStamps,
    /// Always [`Category::HumanActivity`].
    pub category: Category,
    /// What kind of activity was observed.
    pub activity_type: ActivityType,
    /// Photo URI or encoded image.
    pub photo: String,
    /// Calendar date of the observation.
    pub date: NaiveDate,
    /// Time of day of the observation.
    pub time_of_day: TimeOfDay,
    /// Optional free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    /// Moderation status, `pending` on creation.
    pub status: ObservationStatus,
    /// Submitting user, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

/// Photo-usage consent given alongside a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PhotoConsent {
    /// Identity and timestamps.
    #[serde(flatten)]
    pub stamps: RecordStamps,
    /// How to reach the submitter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    /// Whether the photo may be reused.
    pub can_use_photo: PhotoPermission,
    /// Credit line to print with the photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_credit: Option<String>,
    /// When the consent was given.
    pub submitted_at: DateTime<Utc>,
}
