//! # devcamper-rest - DevCamper REST API
//!
//! This crate provides the HTTP API of DevCamper, a directory of coding
//! bootcamps. Bootcamps, courses, reviews and users are stored as JSON
//! documents through [`devcamper_persistence`]; collection routes accept the
//! advanced query syntax compiled there.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use devcamper_rest::{create_app_with_config, ServerConfig};
//! use devcamper_persistence::backends::sqlite::SqliteBackend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SqliteBackend::open("devcamper.db")?;
//!     backend.init_schema()?;
//!
//!     let app = create_app_with_config(backend, ServerConfig::default());
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! Everything is mounted under `/api/v1`.
//!
//! | Resource | Routes |
//! |----------|--------|
//! | bootcamps | `GET/POST /bootcamps`, `GET/PUT/DELETE /bootcamps/{id}` |
//! | courses | `GET /courses`, `GET/POST /bootcamps/{id}/courses`, `GET/PUT/DELETE /courses/{id}` |
//! | reviews | `GET /reviews`, `GET/POST /bootcamps/{id}/reviews`, `GET/PUT/DELETE /reviews/{id}` |
//! | auth | `/auth/register`, `/auth/login`, `/auth/logout`, `/auth/me`, `/auth/updatedetails`, `/auth/updatepassword`, `/auth/forgotpassword`, `/auth/resetpassword/{token}` |
//! | users (admin) | `GET/POST /users`, `GET/PUT/DELETE /users/{id}` |
//! | health | `GET /health` |
//!
//! ## Advanced Queries
//!
//! ```text
//! GET /api/v1/bootcamps?averageCost[lte]=10000&careers[in]=Business&select=name&sort=-averageCost&page=2&limit=5
//! ```
//!
//! List responses carry `count` and `pagination` next to `data`.
//!
//! ## Responses
//!
//! | Outcome | Body |
//! |---------|------|
//! | success | `{"success": true, "data": ...}` |
//! | list | `{"success": true, "count": n, "pagination": {...}, "data": [...]}` |
//! | failure | `{"success": false, "error": "...", "data": null}` |
//!
//! ## Configuration
//!
//! See [`ServerConfig`]; every option has a `DEVCAMPER_*` environment
//! variable.
//!
//! ## Architecture
//!
//! - [`auth`] - session tokens, password hashing, reset tokens, roles
//! - [`config`] - server configuration
//! - [`error`] - error types and the failure envelope
//! - [`extractors`] - query, body and current-user extractors
//! - [`geocoder`] - address geocoding
//! - [`handlers`] - HTTP request handlers
//! - [`models`] - bootcamp, course, review and user models
//! - [`responses`] - success envelope and token responses
//! - [`routing`] - route configuration
//! - [`state`] - application state

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extractors;
pub mod geocoder;
pub mod handlers;
pub mod models;
pub mod responses;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use devcamper_persistence::DocumentStore;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::geocoder::MapQuestGeocoder;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(storage: S) -> Router
where
    S: DocumentStore + Send + Sync + 'static,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// A MapQuest geocoder is attached when `geocoder_url` is set.
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: DocumentStore + Send + Sync + 'static,
{
    let geocoder = MapQuestGeocoder::from_config(&config);
    let mut state = AppState::new(Arc::new(storage), config);
    if let Some(geocoder) = geocoder {
        state = state.with_geocoder(Arc::new(geocoder));
    }
    create_app_with_state(state)
}

/// Creates the Axum application around prepared state.
///
/// Run [`bootstrap::ensure_indexes`] on the state first so the store itself
/// rejects duplicate bootcamp names and emails.
pub fn create_app_with_state<S>(state: AppState<S>) -> Router
where
    S: DocumentStore + Send + Sync + 'static,
{
    let config = state.config().clone();
    info!(
        backend = state.storage().backend_name(),
        geocoding = state.geocoder().is_some(),
        "Creating REST API server"
    );

    let router = routing::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        // Outside the timeout: the timeout needs a body type with a default.
        .layer(RequestBodyLimitLayer::new(config.max_body_size))
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins when set; otherwise both DevCamper crates log at `level`.
/// Call once at startup.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "devcamper_rest={level},devcamper_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
