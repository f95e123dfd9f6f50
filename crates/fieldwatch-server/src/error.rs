//! Startup and runtime failures of the server binary.

use fieldwatch_api::ServerError as HttpError;
use fieldwatch_core::config::ConfigError;
use fieldwatch_db::DbError;

/// Errors that end the process.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration could not be loaded or is inconsistent.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The database could not be reached or migrated.
    #[error("database error: {0}")]
    Database(#[from] DbError),

    /// The HTTP listener failed to bind or serve.
    #[error(transparent)]
    Http(#[from] HttpError),
}
