//! DevCamper API server
//!
//! Serves the bootcamp directory REST API over a SQLite document store.

use std::sync::Arc;

use clap::Parser;
use devcamper_rest::geocoder::MapQuestGeocoder;
use devcamper_rest::{AppState, ServerConfig, bootstrap, create_app_with_state, init_logging};
use tracing::info;

#[cfg(feature = "sqlite")]
use devcamper_persistence::backends::sqlite::SqliteBackend;

/// Creates and initializes a SQLite backend from the server configuration.
#[cfg(feature = "sqlite")]
fn create_sqlite_backend(config: &ServerConfig) -> anyhow::Result<SqliteBackend> {
    info!(database = %config.database_url, "Initializing SQLite backend");

    let backend = if config.is_memory_database() {
        SqliteBackend::in_memory()?
    } else {
        SqliteBackend::open(&config.database_url)?
    };
    backend.init_schema()?;

    Ok(backend)
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        database = %config.database_url,
        filtered_total = config.filtered_total,
        "Starting DevCamper API server"
    );

    start_sqlite(config).await
}

/// Starts the server with the SQLite backend.
#[cfg(feature = "sqlite")]
async fn start_sqlite(config: ServerConfig) -> anyhow::Result<()> {
    let backend = create_sqlite_backend(&config)?;

    let mut state = AppState::new(Arc::new(backend), config.clone());
    match MapQuestGeocoder::from_config(&config) {
        Some(geocoder) => {
            info!("Geocoding enabled");
            state = state.with_geocoder(Arc::new(geocoder));
        }
        None => info!("Geocoding disabled; bootcamp addresses are stored as given"),
    }

    bootstrap::ensure_indexes(&state)
        .await
        .map_err(|e| anyhow::anyhow!("failed to install unique indexes: {}", e))?;
    bootstrap::ensure_admin(&state)
        .await
        .map_err(|e| anyhow::anyhow!("failed to create bootstrap admin: {}", e))?;

    let app = create_app_with_state(state);
    serve(app, &config).await
}

/// Fallback when sqlite feature is not enabled.
#[cfg(not(feature = "sqlite"))]
async fn start_sqlite(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The server requires the 'sqlite' feature. \
         Build with: cargo build -p devcamper-server --features sqlite"
    )
}
