//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! [`sqlx`] errors. The service layer only sees [`StoreError`]; the
//! conversion keeps uniqueness conflicts distinguishable.

use fieldwatch_core::StoreError;

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored column holds a value the record type cannot represent.
    #[error("invalid {column} in {table}: {value:?}")]
    Decode {
        /// Table the row came from.
        table: &'static str,
        /// Offending column.
        column: &'static str,
        /// The stored value.
        value: String,
    },

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Whether this is a unique-constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Postgres(err) => err
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation()),
            _ => false,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        if err.is_unique_violation() {
            Self::Duplicate(err.to_string())
        } else {
            Self::Backend(err.to_string())
        }
    }
}
