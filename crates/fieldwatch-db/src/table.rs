//! Generic `PostgreSQL` collection over one table per record kind.
//!
//! Each kind describes its table through [`Table`]: the column list in
//! bind order, the filter column, and how a fetched row becomes a record.
//! [`PgCollection`] turns that description into the queries behind every
//! [`Collection`] method.
//!
//! Uses runtime query construction (not compile-time checked) so no live
//! database is needed at build time. All values are bound as parameters;
//! only table and column names, which are constants, are formatted in.

use std::marker::PhantomData;

use async_trait::async_trait;
use fieldwatch_core::{Collection, Record, StoreError};
use fieldwatch_types::{RecordId, RecordStamps};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::error::DbError;

/// A query with positional `PostgreSQL` arguments.
pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// How one record kind maps onto its table.
pub trait Table: Record {
    /// Row shape returned by `SELECT id, <COLUMNS>`.
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;

    /// Table name.
    const TABLE: &'static str;

    /// Column the kind is filtered and grouped on.
    const KEY_COLUMN: &'static str;

    /// Every column except `id`, in the order [`Table::bind_columns`]
    /// binds them.
    const COLUMNS: &'static [&'static str];

    /// Bind the values of [`Table::COLUMNS`] onto `query`.
    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q>;

    /// Convert a fetched row into a record.
    fn from_row(row: Self::Row) -> Result<Self, DbError>;
}

/// A [`Collection`] backed by one `PostgreSQL` table.
pub struct PgCollection<R> {
    pool: PgPool,
    kind: PhantomData<fn() -> R>,
}

impl<R> PgCollection<R> {
    /// Create a collection bound to a connection pool.
    pub const fn new(pool: PgPool) -> Self {
        Self {
            pool,
            kind: PhantomData,
        }
    }
}

impl<R> core::fmt::Debug for PgCollection<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PgCollection").finish_non_exhaustive()
    }
}

/// Column list as used in `SELECT` and `INSERT`.
fn column_list<R: Table>() -> String {
    R::COLUMNS.join(", ")
}

/// `$first, $first+1, ...` placeholders for every column.
fn placeholders<R: Table>(first: usize) -> String {
    (0..R::COLUMNS.len())
        .map(|offset| format!("${}", first.saturating_add(offset)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn select_sql<R: Table>(tail: &str) -> String {
    format!(
        "SELECT id, {} FROM {} {tail}",
        column_list::<R>(),
        R::TABLE
    )
}

/// Build the shared stamps from the columns every table carries.
pub const fn stamps(
    id: Uuid,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
) -> RecordStamps {
    RecordStamps {
        id: RecordId(id),
        created_at,
        updated_at,
    }
}

/// Parse a vocabulary column read back from a table.
pub fn decode<T: core::str::FromStr>(
    table: &'static str,
    column: &'static str,
    value: &str,
) -> Result<T, DbError> {
    value.parse().ok().ok_or_else(|| DbError::Decode {
        table,
        column,
        value: value.to_owned(),
    })
}

fn count_from_db(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

#[async_trait]
impl<R: Table> Collection<R> for PgCollection<R> {
    async fn insert(&self, record: &R) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO {} (id, {}) VALUES ($1, {})",
            R::TABLE,
            column_list::<R>(),
            placeholders::<R>(2)
        );
        let query = sqlx::query(&sql).bind(record.stamps().id.into_inner());
        record
            .bind_columns(query)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;
        Ok(())
    }

    async fn find(&self, id: RecordId) -> Result<Option<R>, StoreError> {
        let sql = select_sql::<R>("WHERE id = $1");
        let row = sqlx::query_as::<_, R::Row>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?;
        Ok(row.map(R::from_row).transpose()?)
    }

    async fn list(&self, filter: Option<&R::Key>) -> Result<Vec<R>, StoreError> {
        let sql = select_sql::<R>(&format!(
            "WHERE ($1::TEXT IS NULL OR {} = $1) ORDER BY created_at DESC, id DESC",
            R::KEY_COLUMN
        ));
        let rows = sqlx::query_as::<_, R::Row>(&sql)
            .bind(filter.map(R::key_label))
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(R::from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn replace(&self, record: &R) -> Result<bool, StoreError> {
        let sql = format!(
            "UPDATE {} SET ({}) = ({}) WHERE id = $1",
            R::TABLE,
            column_list::<R>(),
            placeholders::<R>(2)
        );
        let query = sqlx::query(&sql).bind(record.stamps().id.into_inner());
        let result = record
            .bind_columns(query)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: RecordId) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", R::TABLE);
        let result = sqlx::query(&sql)
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE);
        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::from)?;
        Ok(count_from_db(count))
    }

    async fn count_by_key(&self) -> Result<Vec<(String, u64)>, StoreError> {
        let sql = format!(
            "SELECT {key} AS label, COUNT(*) AS count FROM {table} GROUP BY {key}",
            key = R::KEY_COLUMN,
            table = R::TABLE
        );
        let rows: Vec<(String, i64)> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(|(label, count)| (label, count_from_db(count)))
            .collect())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<R>, StoreError> {
        let sql = select_sql::<R>("ORDER BY created_at DESC, id DESC LIMIT $1");
        let rows = sqlx::query_as::<_, R::Row>(&sql)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(R::from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use fieldwatch_types::AnimalObservation;

    use super::*;

    #[test]
    fn placeholders_follow_id() {
        let expected: Vec<String> = (2..=AnimalObservation::COLUMNS.len().saturating_add(1))
            .map(|n| format!("${n}"))
            .collect();
        assert_eq!(placeholders::<AnimalObservation>(2), expected.join(", "));
    }

    #[test]
    fn select_lists_id_then_columns() {
        let sql = select_sql::<AnimalObservation>("WHERE id = $1");
        assert!(sql.starts_with("SELECT id, animal_type, photo, "));
        assert!(sql.ends_with("FROM animal_observations WHERE id = $1"));
    }

    #[test]
    fn decode_reports_column() {
        let err = decode::<fieldwatch_types::TimeOfDay>("t", "time_of_day", "Dusk").err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("invalid time_of_day in t: \"Dusk\"")
        );
    }
}
