//! Shared type definitions for the Fieldwatch observation backend.
//!
//! This crate is the single source of truth for the records the API
//! stores and returns. Types flow to `TypeScript` via `ts-rs` so the
//! mobile client can share them.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for record and user identifiers
//! - [`enums`] -- Closed vocabularies (animal types, activity types, time of day, ...)
//! - [`structs`] -- Stored record documents
//! - [`drafts`] -- Unvalidated client input and update merge targets
//! - [`stats`] -- Aggregate statistics payloads

pub mod drafts;
pub mod enums;
pub mod ids;
pub mod stats;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use drafts::{AnimalDraft, HumanActivityDraft, PhotoConsentDraft, PlantDraft, SightingFields};
pub use enums::{
    ActivityType, AnimalType, Category, ObservationStatus, PhotoPermission, RecordKind, TimeOfDay,
    UnknownVariant,
};
pub use ids::{RecordId, UserId};
pub use stats::{CountEntry, ObservationStats, RecentActivity, RecentAnimal};
pub use structs::{
    AnimalObservation, GeoPoint, HumanActivityObservation, PhotoConsent, PlantObservation,
    RecordStamps,
};
