//! The `plant_observations` table.

use chrono::{DateTime, NaiveDate, Utc};
use fieldwatch_types::{Category, PlantObservation};
use uuid::Uuid;

use crate::error::DbError;
use crate::table::{decode, stamps, PgQuery, Table};

/// A row from the `plant_observations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlantRow {
    /// Record UUID.
    pub id: Uuid,
    /// Grouping key.
    pub plant_category: String,
    /// Species or type name.
    pub plant_type: String,
    /// Photo reference.
    pub photo: String,
    /// Calendar date of the sighting.
    pub date: NaiveDate,
    /// Time-of-day wire string.
    pub time_of_day: String,
    /// Optional free text.
    pub description: Option<String>,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
}

impl Table for PlantObservation {
    type Row = PlantRow;

    const TABLE: &'static str = "plant_observations";
    const KEY_COLUMN: &'static str = "plant_category";
    const COLUMNS: &'static [&'static str] = &[
        "plant_category",
        "plant_type",
        "photo",
        "date",
        "time_of_day",
        "description",
        "created_at",
        "updated_at",
    ];

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.plant_category.as_str())
            .bind(self.plant_type.as_str())
            .bind(self.photo.as_str())
            .bind(self.date)
            .bind(self.time_of_day.as_str())
            .bind(self.description.as_deref())
            .bind(self.stamps.created_at)
            .bind(self.stamps.updated_at)
    }

    fn from_row(row: PlantRow) -> Result<Self, DbError> {
        Ok(Self {
            stamps: stamps(row.id, row.created_at, row.updated_at),
            category: Category::Plant,
            plant_category: row.plant_category,
            plant_type: row.plant_type,
            photo: row.photo,
            date: row.date,
            time_of_day: decode(Self::TABLE, "time_of_day", &row.time_of_day)?,
            description: row.description,
        })
    }
}
