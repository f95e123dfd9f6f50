//! REST API for the Fieldwatch observation backend.
//!
//! This crate exposes the record services of `fieldwatch-core` over HTTP:
//!
//! - **Plants** (`/api/plants`) with a category filter
//! - **Animals** and **human activities** (`/api/animals`,
//!   `/api/human-activities`) with a type filter and statistics
//! - **Photo consent** (`/api/credit`)
//!
//! Every response, success or failure, is a JSON [`Envelope`].
//! Handlers are generic over [`Resource`] and instantiated once per kind
//! in [`build_router`].
//!
//! [`Envelope`]: envelope::Envelope
//! [`Resource`]: state::Resource

pub mod envelope;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use envelope::Envelope;
pub use error::ApiError;
pub use router::{build_router, App};
pub use server::{start_server, ServerConfig, ServerError};
pub use state::{AppState, Resource};
