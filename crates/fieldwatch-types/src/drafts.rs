//! Loosely typed record drafts as submitted by clients.
//!
//! A draft holds raw field values before validation. Every field is
//! optional and vocabulary fields are plain strings, so a bad submission
//! produces a list of readable violations instead of a deserialization
//! failure. Drafts are also the merge target for partial updates: the
//! stored record is turned back into its draft, the patch is laid over it,
//! and the result is validated again.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::structs::GeoPoint;

/// Raw input for a plant observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PlantDraft {
    /// Grouping key, required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_category: Option<String>,
    /// Species or type name, required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_type: Option<String>,
    /// Photo reference, required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Calendar date, required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Time of day, required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    /// Free text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Raw input for an animal or human-activity sighting.
///
/// Both kinds share the same shape apart from the discriminator, which is
/// carried by the wrapping draft type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SightingFields {
    /// Photo reference, required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Calendar date, required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Time of day, required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    /// Free text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    /// Moderation status; defaults to `pending`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Submitting user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Raw input for an animal observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct AnimalDraft {
    /// Animal type, required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animal_type: Option<String>,
    /// Shared sighting fields.
    #[serde(flatten)]
    pub fields: SightingFields,
}

/// Raw input for a human-activity observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct HumanActivityDraft {
    /// Activity type, required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    /// Shared sighting fields.
    #[serde(flatten)]
    pub fields: SightingFields,
}

/// Raw input for a photo-consent submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PhotoConsentDraft {
    /// Contact details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    /// `Yes` or `No`; defaults to `Yes`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_use_photo: Option<String>,
    /// Credit line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_credit: Option<String>,
    /// RFC 3339 timestamp; defaults to the creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
}
