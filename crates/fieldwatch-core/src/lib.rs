//! Validation, CRUD, and statistics for Fieldwatch observation records.
//!
//! This crate holds everything between the HTTP layer and persistence:
//! turning client JSON into validated records, the uniform CRUD service,
//! the statistics report for sightings, and the store seam.
//!
//! # Modules
//!
//! - [`config`] -- [`AppConfig`] loading from YAML and the environment.
//! - [`error`] -- [`ServiceError`], [`StoreError`], and [`Violations`].
//! - [`validation`] -- Field checks shared by every record schema.
//! - [`schema`] -- The [`Record`] trait and its impl for each kind.
//! - [`store`] -- The async [`Collection`] trait and [`RecordStores`].
//! - [`memory`] -- In-memory [`Collection`] for tests and local runs.
//! - [`service`] -- The generic [`RecordService`].
//! - [`stats`] -- Bucket tables and count folding for sightings.
//!
//! [`AppConfig`]: config::AppConfig
//! [`ServiceError`]: error::ServiceError
//! [`StoreError`]: error::StoreError
//! [`Violations`]: error::Violations
//! [`Record`]: schema::Record
//! [`Collection`]: store::Collection
//! [`RecordStores`]: store::RecordStores
//! [`RecordService`]: service::RecordService

pub mod config;
pub mod error;
pub mod memory;
pub mod schema;
pub mod service;
pub mod stats;
pub mod store;
pub mod validation;

pub use error::{ServiceError, StoreError, Violations};
pub use schema::Record;
pub use service::RecordService;
pub use stats::Sighting;
pub use store::{Collection, RecordStores};
