//! Entry point for the Fieldwatch observation backend.
//!
//! Loads `.env` and the YAML config, opens the selected record stores
//! (`PostgreSQL` with migrations, or in-memory), and serves the REST API
//! until `Ctrl-C`.

mod error;

use std::sync::Arc;

use fieldwatch_api::{start_server, AppState, ServerConfig};
use fieldwatch_core::config::{AppConfig, StoreBackend};
use fieldwatch_db::{PostgresConfig, PostgresPool};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::ServerError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, database setup, or the HTTP
/// server fails.
#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // A missing .env file is normal outside development.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    if let Err(e) = &dotenv
        && !e.not_found()
    {
        warn!(error = %e, "failed to load .env");
    }

    info!("fieldwatch-server starting");

    let config = AppConfig::load()?;
    info!(
        bind = config.bind_address(),
        backend = ?config.store.backend,
        max_body_bytes = config.server.max_body_bytes,
        "configuration loaded"
    );

    let server = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        max_body_bytes: config.server.max_body_bytes,
    };

    match config.store.backend {
        StoreBackend::Memory => {
            warn!("using in-memory stores; records are lost on restart");
            start_server(&server, Arc::new(AppState::in_memory())).await?;
        }
        StoreBackend::Postgres => {
            let pg = PostgresConfig::from_settings(&config.store)?;
            let pool = PostgresPool::connect(&pg).await?;
            pool.run_migrations().await?;

            let state = Arc::new(AppState::new(pool.record_stores()));
            let served = start_server(&server, state).await;
            pool.close().await;
            served?;
        }
    }

    info!("fieldwatch-server stopped");
    Ok(())
}
