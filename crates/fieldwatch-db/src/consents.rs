//! The `photo_consents` table.

use chrono::{DateTime, Utc};
use fieldwatch_types::PhotoConsent;
use uuid::Uuid;

use crate::error::DbError;
use crate::table::{decode, stamps, PgQuery, Table};

/// A row from the `photo_consents` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConsentRow {
    /// Record UUID.
    pub id: Uuid,
    /// Contact details.
    pub contact_info: Option<String>,
    /// `Yes` or `No`.
    pub can_use_photo: String,
    /// Credit line.
    pub photo_credit: Option<String>,
    /// When the consent was given.
    pub submitted_at: DateTime<Utc>,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
}

impl Table for PhotoConsent {
    type Row = ConsentRow;

    const TABLE: &'static str = "photo_consents";
    const KEY_COLUMN: &'static str = "can_use_photo";
    const COLUMNS: &'static [&'static str] = &[
        "contact_info",
        "can_use_photo",
        "photo_credit",
        "submitted_at",
        "created_at",
        "updated_at",
    ];

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.contact_info.as_deref())
            .bind(self.can_use_photo.as_str())
            .bind(self.photo_credit.as_deref())
            .bind(self.submitted_at)
            .bind(self.stamps.created_at)
            .bind(self.stamps.updated_at)
    }

    fn from_row(row: ConsentRow) -> Result<Self, DbError> {
        Ok(Self {
            stamps: stamps(row.id, row.created_at, row.updated_at),
            contact_info: row.contact_info,
            can_use_photo: decode(Self::TABLE, "can_use_photo", &row.can_use_photo)?,
            photo_credit: row.photo_credit,
            submitted_at: row.submitted_at,
        })
    }
}
