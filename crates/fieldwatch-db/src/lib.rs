//! `PostgreSQL` persistence for Fieldwatch records.
//!
//! Every record kind lives in its own table. The tables implement the
//! [`Collection`](fieldwatch_core::Collection) seam from `fieldwatch-core`,
//! so the service layer never sees SQL.
//!
//! ```text
//! RecordService<R>
//!     |
//!     +-- Arc<dyn Collection<R>> --> PgCollection<R> (one per table)
//!         |-- plant_observations
//!         |-- animal_observations
//!         |-- human_activity_observations
//!         +-- photo_consents
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool, configuration, and migrations
//! - [`table`] -- The [`Table`] mapping trait and generic [`PgCollection`]
//! - [`plants`], [`sightings`], [`consents`] -- Row types per table
//! - [`error`] -- Shared error types

pub mod consents;
pub mod error;
pub mod plants;
pub mod postgres;
pub mod sightings;
pub mod table;

// Re-export primary types for convenience.
pub use error::DbError;
pub use postgres::{PostgresConfig, PostgresPool};
pub use table::{PgCollection, Table};
