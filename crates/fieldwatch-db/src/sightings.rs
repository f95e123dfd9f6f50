//! The `animal_observations` and `human_activity_observations` tables.
//!
//! Both tables share every column except the discriminator
//! (`animal_type` or `activity_type`). Location is stored as two nullable
//! columns and read back as `None` when both are null.

use chrono::{DateTime, NaiveDate, Utc};
use fieldwatch_types::{
    AnimalObservation, Category, GeoPoint, HumanActivityObservation, ObservationStatus,
    RecordStamps, TimeOfDay, UserId,
};
use uuid::Uuid;

use crate::error::DbError;
use crate::table::{decode, stamps, PgQuery, Table};

/// Columns following the discriminator, in bind order.
macro_rules! sighting_columns {
    ($discriminator:literal) => {
        &[
            $discriminator,
            "photo",
            "date",
            "time_of_day",
            "description",
            "latitude",
            "longitude",
            "status",
            "user_id",
            "created_at",
            "updated_at",
        ]
    };
}

/// A row from the `animal_observations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnimalRow {
    /// Record UUID.
    pub id: Uuid,
    /// Animal type wire string.
    pub animal_type: String,
    /// Shared sighting columns.
    #[sqlx(flatten)]
    pub sighting: SightingRow,
}

/// A row from the `human_activity_observations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityRow {
    /// Record UUID.
    pub id: Uuid,
    /// Activity type wire string.
    pub activity_type: String,
    /// Shared sighting columns.
    #[sqlx(flatten)]
    pub sighting: SightingRow,
}

/// Columns shared by both sighting tables.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SightingRow {
    /// Photo reference.
    pub photo: String,
    /// Calendar date.
    pub date: NaiveDate,
    /// Time-of-day wire string.
    pub time_of_day: String,
    /// Optional free text.
    pub description: Option<String>,
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// Moderation status wire string.
    pub status: String,
    /// Submitting user.
    pub user_id: Option<Uuid>,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
}

/// Decoded shared columns.
struct Sighting {
    time_of_day: TimeOfDay,
    status: ObservationStatus,
    location: Option<GeoPoint>,
    user_id: Option<UserId>,
}

impl SightingRow {
    fn decode(&self, table: &'static str) -> Result<Sighting, DbError> {
        let location = GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        };
        Ok(Sighting {
            time_of_day: decode(table, "time_of_day", &self.time_of_day)?,
            status: decode(table, "status", &self.status)?,
            location: (!location.is_empty()).then_some(location),
            user_id: self.user_id.map(UserId),
        })
    }
}

/// Borrowed shared columns of a record, bound after the discriminator in
/// `sighting_columns!` order.
struct SharedColumns<'a> {
    photo: &'a str,
    date: NaiveDate,
    time_of_day: TimeOfDay,
    description: Option<&'a str>,
    location: Option<GeoPoint>,
    status: ObservationStatus,
    user_id: Option<UserId>,
    stamps: RecordStamps,
}

impl<'a> SharedColumns<'a> {
    fn bind(self, query: PgQuery<'a>) -> PgQuery<'a> {
        query
            .bind(self.photo)
            .bind(self.date)
            .bind(self.time_of_day.as_str())
            .bind(self.description)
            .bind(self.location.and_then(|l| l.latitude))
            .bind(self.location.and_then(|l| l.longitude))
            .bind(self.status.as_str())
            .bind(self.user_id.map(UserId::into_inner))
            .bind(self.stamps.created_at)
            .bind(self.stamps.updated_at)
    }
}

impl Table for AnimalObservation {
    type Row = AnimalRow;

    const TABLE: &'static str = "animal_observations";
    const KEY_COLUMN: &'static str = "animal_type";
    const COLUMNS: &'static [&'static str] = sighting_columns!("animal_type");

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        let shared = SharedColumns {
            photo: &self.photo,
            date: self.date,
            time_of_day: self.time_of_day,
            description: self.description.as_deref(),
            location: self.location,
            status: self.status,
            user_id: self.user_id,
            stamps: self.stamps,
        };
        shared.bind(query.bind(self.animal_type.as_str()))
    }

    fn from_row(row: AnimalRow) -> Result<Self, DbError> {
        let shared = row.sighting.decode(Self::TABLE)?;
        Ok(Self {
            stamps: stamps(row.id, row.sighting.created_at, row.sighting.updated_at),
            category: Category::Animal,
            animal_type: decode(Self::TABLE, "animal_type", &row.animal_type)?,
            photo: row.sighting.photo,
            date: row.sighting.date,
            time_of_day: shared.time_of_day,
            description: row.sighting.description,
            location: shared.location,
            status: shared.status,
            user_id: shared.user_id,
        })
    }
}

impl Table for HumanActivityObservation {
    type Row = ActivityRow;

    const TABLE: &'static str = "human_activity_observations";
    const KEY_COLUMN: &'static str = "activity_type";
    const COLUMNS: &'static [&'static str] = sighting_columns!("activity_type");

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        let shared = SharedColumns {
            photo: &self.photo,
            date: self.date,
            time_of_day: self.time_of_day,
            description: self.description.as_deref(),
            location: self.location,
            status: self.status,
            user_id: self.user_id,
            stamps: self.stamps,
        };
        shared.bind(query.bind(self.activity_type.as_str()))
    }

    fn from_row(row: ActivityRow) -> Result<Self, DbError> {
        let shared = row.sighting.decode(Self::TABLE)?;
        Ok(Self {
            stamps: stamps(row.id, row.sighting.created_at, row.sighting.updated_at),
            category: Category::HumanActivity,
            activity_type: decode(Self::TABLE, "activity_type", &row.activity_type)?,
            photo: row.sighting.photo,
            date: row.sighting.date,
            time_of_day: shared.time_of_day,
            description: row.sighting.description,
            location: shared.location,
            status: shared.status,
            user_id: shared.user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(latitude: Option<f64>, longitude: Option<f64>) -> SightingRow {
        let now = Utc::now();
        SightingRow {
            photo: "img://1".to_owned(),
            date: now.date_naive(),
            time_of_day: "Night".to_owned(),
            description: None,
            latitude,
            longitude,
            status: "approved".to_owned(),
            user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn null_coordinates_read_as_no_location() {
        let shared = row(None, None).decode("t").ok();
        assert!(shared.is_some_and(|s| s.location.is_none()));
    }

    #[test]
    fn partial_coordinates_are_kept() {
        let shared = row(Some(7.0), None).decode("t").ok();
        let location = shared.and_then(|s| s.location);
        assert_eq!(location.and_then(|l| l.latitude), Some(7.0));
        assert_eq!(location.and_then(|l| l.longitude), None);
    }

    #[test]
    fn stored_vocabulary_is_decoded() {
        let shared = row(None, None).decode("t").ok();
        assert_eq!(
            shared.map(|s| (s.time_of_day, s.status)),
            Some((TimeOfDay::Night, ObservationStatus::Approved))
        );
    }

    #[test]
    fn unknown_stored_status_is_an_error() {
        let mut bad = row(None, None);
        bad.status = "archived".to_owned();
        assert!(matches!(
            bad.decode("t"),
            Err(DbError::Decode {
                column: "status",
                ..
            })
        ));
    }
}
