//! Record schemas: how each kind is validated, built, and filtered.
//!
//! [`Record`] ties a stored document type to its draft form and to the
//! field it can be filtered on. The service layer is generic over this
//! trait, so the four kinds share one implementation of every CRUD
//! operation.

use chrono::{DateTime, SubsecRound, Utc};
use fieldwatch_types::{
    ActivityType, AnimalDraft, AnimalObservation, AnimalType, Category, HumanActivityDraft,
    HumanActivityObservation, ObservationStatus, PhotoConsent, PhotoConsentDraft, PhotoPermission,
    PlantDraft, PlantObservation, RecordKind, RecordStamps, SightingFields, TimeOfDay,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Violations;
use crate::validation::{trimmed, Checker};

/// Current time at the precision the stores keep (microseconds).
///
/// Truncating up front keeps a freshly created record equal to the same
/// record read back from `PostgreSQL`.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A persisted record kind.
pub trait Record: Clone + Serialize + Send + Sync + 'static {
    /// Unvalidated input form, also used as the update merge target.
    type Draft: Serialize + DeserializeOwned + Send;

    /// Value of the field this kind can be filtered on.
    type Key: Clone + PartialEq + Send + Sync + 'static;

    /// Which family this record belongs to.
    const KIND: RecordKind;

    /// Identity and timestamps.
    fn stamps(&self) -> &RecordStamps;

    /// Validate a draft and build the record around the given stamps.
    fn from_draft(draft: Self::Draft, stamps: RecordStamps) -> Result<Self, Violations>;

    /// Turn the record back into its draft form.
    fn to_draft(&self) -> Self::Draft;

    /// Parse a filter value from a request path segment.
    ///
    /// `None` means no record can match.
    fn parse_key(raw: &str) -> Option<Self::Key>;

    /// The record's value of the filter field.
    fn key(&self) -> Self::Key;

    /// String form of a filter value, as stored and grouped.
    fn key_label(key: &Self::Key) -> &str;
}

// ---------------------------------------------------------------------------
// Sighting fields shared by animals and human activities
// ---------------------------------------------------------------------------

/// Validated form of [`SightingFields`].
struct ValidSighting {
    photo: String,
    date: chrono::NaiveDate,
    time_of_day: TimeOfDay,
    description: Option<String>,
    location: Option<fieldwatch_types::GeoPoint>,
    status: ObservationStatus,
    user_id: Option<fieldwatch_types::UserId>,
}

/// Check the shared sighting fields after the discriminator has been read.
fn check_sighting(check: &mut Checker, fields: SightingFields) -> Option<ValidSighting> {
    let photo = check.required("photo", fields.photo);
    let date = check.required_date("date", fields.date);
    let time_of_day = check.required_member("timeOfDay", TimeOfDay::LABEL, fields.time_of_day);
    let status = check.member_or_default("status", ObservationStatus::LABEL, fields.status);
    let user_id = check.optional_user("userId", fields.user_id);

    Some(ValidSighting {
        photo: photo?,
        date: date?,
        time_of_day: time_of_day?,
        description: trimmed(fields.description),
        location: fields.location.filter(|loc| !loc.is_empty()),
        status: status?,
        user_id: user_id?,
    })
}

fn sighting_fields(
    photo: &str,
    date: chrono::NaiveDate,
    time_of_day: TimeOfDay,
    description: Option<&String>,
    location: Option<fieldwatch_types::GeoPoint>,
    status: ObservationStatus,
    user_id: Option<fieldwatch_types::UserId>,
) -> SightingFields {
    SightingFields {
        photo: Some(photo.to_owned()),
        date: Some(date.to_string()),
        time_of_day: Some(time_of_day.as_str().to_owned()),
        description: description.cloned(),
        location,
        status: Some(status.as_str().to_owned()),
        user_id: user_id.map(|id| id.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Plant
// ---------------------------------------------------------------------------

impl Record for PlantObservation {
    type Draft = PlantDraft;
    type Key = String;

    const KIND: RecordKind = RecordKind::Plant;

    fn stamps(&self) -> &RecordStamps {
        &self.stamps
    }

    fn from_draft(draft: PlantDraft, stamps: RecordStamps) -> Result<Self, Violations> {
        let mut check = Checker::new();
        let plant_category = check.required("plantCategory", draft.plant_category);
        let plant_type = check.required("plantType", draft.plant_type);
        let photo = check.required("photo", draft.photo);
        let date = check.required_date("date", draft.date);
        let time_of_day = check.required_member("timeOfDay", TimeOfDay::LABEL, draft.time_of_day);

        let (Some(plant_category), Some(plant_type), Some(photo), Some(date), Some(time_of_day)) =
            (plant_category, plant_type, photo, date, time_of_day)
        else {
            return Err(check.into_violations());
        };
        check.finish()?;

        Ok(Self {
            stamps,
            category: Category::Plant,
            plant_category,
            plant_type,
            photo,
            date,
            time_of_day,
            description: trimmed(draft.description),
        })
    }

    fn to_draft(&self) -> PlantDraft {
        PlantDraft {
            plant_category: Some(self.plant_category.clone()),
            plant_type: Some(self.plant_type.clone()),
            photo: Some(self.photo.clone()),
            date: Some(self.date.to_string()),
            time_of_day: Some(self.time_of_day.as_str().to_owned()),
            description: self.description.clone(),
        }
    }

    fn parse_key(raw: &str) -> Option<String> {
        Some(raw.to_owned())
    }

    fn key(&self) -> String {
        self.plant_category.clone()
    }

    fn key_label(key: &String) -> &str {
        key
    }
}

// ---------------------------------------------------------------------------
// Animal
// ---------------------------------------------------------------------------

impl Record for AnimalObservation {
    type Draft = AnimalDraft;
    type Key = AnimalType;

    const KIND: RecordKind = RecordKind::Animal;

    fn stamps(&self) -> &RecordStamps {
        &self.stamps
    }

    fn from_draft(draft: AnimalDraft, stamps: RecordStamps) -> Result<Self, Violations> {
        let mut check = Checker::new();
        let animal_type = check.required_member("animalType", AnimalType::LABEL, draft.animal_type);
        let sighting = check_sighting(&mut check, draft.fields);

        let (Some(animal_type), Some(s)) = (animal_type, sighting) else {
            return Err(check.into_violations());
        };
        check.finish()?;

        Ok(Self {
            stamps,
            category: Category::Animal,
            animal_type,
            photo: s.photo,
            date: s.date,
            time_of_day: s.time_of_day,
            description: s.description,
            location: s.location,
            status: s.status,
            user_id: s.user_id,
        })
    }

    fn to_draft(&self) -> AnimalDraft {
        AnimalDraft {
            animal_type: Some(self.animal_type.as_str().to_owned()),
            fields: sighting_fields(
                &self.photo,
                self.date,
                self.time_of_day,
                self.description.as_ref(),
                self.location,
                self.status,
                self.user_id,
            ),
        }
    }

    fn parse_key(raw: &str) -> Option<AnimalType> {
        raw.parse().ok()
    }

    fn key(&self) -> AnimalType {
        self.animal_type
    }

    fn key_label(key: &AnimalType) -> &str {
        key.as_str()
    }
}

// ---------------------------------------------------------------------------
// Human activity
// ---------------------------------------------------------------------------

impl Record for HumanActivityObservation {
    type Draft = HumanActivityDraft;
    type Key = ActivityType;

    const KIND: RecordKind = RecordKind::HumanActivity;

    fn stamps(&self) -> &RecordStamps {
        &self.stamps
    }

    fn from_draft(draft: HumanActivityDraft, stamps: RecordStamps) -> Result<Self, Violations> {
        let mut check = Checker::new();
        let activity_type =
            check.required_member("activityType", ActivityType::LABEL, draft.activity_type);
        let sighting = check_sighting(&mut check, draft.fields);

        let (Some(activity_type), Some(s)) = (activity_type, sighting) else {
            return Err(check.into_violations());
        };
        check.finish()?;

        Ok(Self {
            stamps,
            category: Category::HumanActivity,
            activity_type,
            photo: s.photo,
            date: s.date,
            time_of_day: s.time_of_day,
            description: s.description,
            location: s.location,
            status: s.status,
            user_id: s.user_id,
        })
    }

    fn to_draft(&self) -> HumanActivityDraft {
        HumanActivityDraft {
            activity_type: Some(self.activity_type.as_str().to_owned()),
            fields: sighting_fields(
                &self.photo,
                self.date,
                self.time_of_day,
                self.description.as_ref(),
                self.location,
                self.status,
                self.user_id,
            ),
        }
    }

    fn parse_key(raw: &str) -> Option<ActivityType> {
        raw.parse().ok()
    }

    fn key(&self) -> ActivityType {
        self.activity_type
    }

    fn key_label(key: &ActivityType) -> &str {
        key.as_str()
    }
}

// ---------------------------------------------------------------------------
// Photo consent
// ---------------------------------------------------------------------------

impl Record for PhotoConsent {
    type Draft = PhotoConsentDraft;
    type Key = PhotoPermission;

    const KIND: RecordKind = RecordKind::PhotoConsent;

    fn stamps(&self) -> &RecordStamps {
        &self.stamps
    }

    fn from_draft(draft: PhotoConsentDraft, stamps: RecordStamps) -> Result<Self, Violations> {
        let mut check = Checker::new();
        let can_use_photo =
            check.member_or_default("canUsePhoto", PhotoPermission::LABEL, draft.can_use_photo);
        let submitted_at = check.optional_timestamp("submittedAt", draft.submitted_at);

        let (Some(can_use_photo), Some(submitted_at)) = (can_use_photo, submitted_at) else {
            return Err(check.into_violations());
        };
        check.finish()?;

        Ok(Self {
            stamps,
            contact_info: trimmed(draft.contact_info),
            can_use_photo,
            photo_credit: trimmed(draft.photo_credit),
            submitted_at: submitted_at.unwrap_or(stamps.created_at),
        })
    }

    fn to_draft(&self) -> PhotoConsentDraft {
        PhotoConsentDraft {
            contact_info: self.contact_info.clone(),
            can_use_photo: Some(self.can_use_photo.as_str().to_owned()),
            photo_credit: self.photo_credit.clone(),
            submitted_at: Some(self.submitted_at.to_rfc3339()),
        }
    }

    fn parse_key(raw: &str) -> Option<PhotoPermission> {
        raw.parse().ok()
    }

    fn key(&self) -> PhotoPermission {
        self.can_use_photo
    }

    fn key_label(key: &PhotoPermission) -> &str {
        key.as_str()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use fieldwatch_types::GeoPoint;

    use super::*;

    fn stamps() -> RecordStamps {
        RecordStamps::new(timestamp_now())
    }

    fn fox_draft() -> AnimalDraft {
        AnimalDraft {
            animal_type: Some("Fox".to_owned()),
            fields: SightingFields {
                photo: Some("img://1".to_owned()),
                date: Some("2024-05-01".to_owned()),
                time_of_day: Some("Evening".to_owned()),
                ..SightingFields::default()
            },
        }
    }

    #[test]
    fn animal_defaults_status_and_category() {
        let animal = AnimalObservation::from_draft(fox_draft(), stamps());
        let animal = animal.ok();
        assert_eq!(animal.as_ref().map(|a| a.status), Some(ObservationStatus::Pending));
        assert_eq!(animal.as_ref().map(|a| a.category), Some(Category::Animal));
        assert_eq!(
            animal.map(|a| a.date),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
    }

    #[test]
    fn animal_missing_fields_reported_together() {
        let draft = AnimalDraft {
            animal_type: Some("Fox".to_owned()),
            fields: SightingFields::default(),
        };
        let err = AnimalObservation::from_draft(draft, stamps()).err();
        assert_eq!(
            err.map(Violations::into_messages),
            Some(vec![
                "Please provide all required fields: photo, date, timeOfDay".to_owned()
            ])
        );
    }

    #[test]
    fn animal_rejects_unknown_type() {
        let mut draft = fox_draft();
        draft.animal_type = Some("Dragon".to_owned());
        let err = AnimalObservation::from_draft(draft, stamps()).err();
        assert_eq!(
            err.map(Violations::into_messages),
            Some(vec!["Invalid animal type: Dragon".to_owned()])
        );
    }

    #[test]
    fn invalid_optional_field_rejects_otherwise_valid_draft() {
        let mut draft = fox_draft();
        draft.fields.status = Some("archived".to_owned());
        let err = AnimalObservation::from_draft(draft, stamps()).err();
        assert_eq!(
            err.map(Violations::into_messages),
            Some(vec!["Invalid status: archived".to_owned()])
        );
    }

    #[test]
    fn empty_location_is_dropped() {
        let mut draft = fox_draft();
        draft.fields.location = Some(GeoPoint::default());
        let animal = AnimalObservation::from_draft(draft, stamps()).ok();
        assert_eq!(animal.and_then(|a| a.location), None);
    }

    #[test]
    fn draft_roundtrip_preserves_record() {
        let mut draft = fox_draft();
        draft.fields.description = Some("  near the river ".to_owned());
        draft.fields.location = Some(GeoPoint {
            latitude: Some(7.29),
            longitude: Some(80.63),
        });
        let s = stamps();
        let animal = AnimalObservation::from_draft(draft, s).ok();
        assert_eq!(
            animal.as_ref().and_then(|a| a.description.as_deref()),
            Some("near the river")
        );
        let rebuilt = animal
            .as_ref()
            .and_then(|a| AnimalObservation::from_draft(a.to_draft(), s).ok());
        assert!(rebuilt.is_some());
        assert_eq!(rebuilt, animal);
    }

    #[test]
    fn human_activity_validates_vocabulary() {
        let draft = HumanActivityDraft {
            activity_type: Some("Picnic".to_owned()),
            fields: SightingFields {
                photo: Some("img://2".to_owned()),
                date: Some("2024-06-11".to_owned()),
                time_of_day: Some("Noon".to_owned()),
                ..SightingFields::default()
            },
        };
        let err = HumanActivityObservation::from_draft(draft, stamps()).err();
        assert_eq!(
            err.map(Violations::into_messages),
            Some(vec!["Invalid activity type: Picnic".to_owned()])
        );
    }

    #[test]
    fn plant_requires_category_and_type() {
        let draft = PlantDraft {
            photo: Some("img://3".to_owned()),
            date: Some("2024-06-11".to_owned()),
            time_of_day: Some("Morning".to_owned()),
            ..PlantDraft::default()
        };
        let err = PlantObservation::from_draft(draft, stamps()).err();
        assert_eq!(
            err.map(Violations::into_messages),
            Some(vec![
                "Please provide all required fields: plantCategory, plantType".to_owned()
            ])
        );
    }

    #[test]
    fn consent_defaults() {
        let s = stamps();
        let consent = PhotoConsent::from_draft(PhotoConsentDraft::default(), s).ok();
        assert_eq!(
            consent.as_ref().map(|c| c.can_use_photo),
            Some(PhotoPermission::Yes)
        );
        assert_eq!(consent.map(|c| c.submitted_at), Some(s.created_at));
    }

    #[test]
    fn consent_rejects_unknown_permission() {
        let draft = PhotoConsentDraft {
            can_use_photo: Some("Maybe".to_owned()),
            ..PhotoConsentDraft::default()
        };
        let err = PhotoConsent::from_draft(draft, stamps()).err();
        assert_eq!(
            err.map(Violations::into_messages),
            Some(vec!["Invalid photo permission: Maybe".to_owned()])
        );
    }

    #[test]
    fn keys_parse_from_path_segments() {
        assert_eq!(
            AnimalObservation::parse_key("Bird of Prey"),
            Some(AnimalType::BirdOfPrey)
        );
        assert_eq!(AnimalObservation::parse_key("Dragon"), None);
        assert_eq!(PlantObservation::parse_key("Orchid").as_deref(), Some("Orchid"));
    }
}
