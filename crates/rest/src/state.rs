//! Application state for the DevCamper REST API.
//!
//! This module defines the shared state available to all request handlers:
//! the document store, configuration, the session token service, the query
//! compiler and the optional geocoder.

use std::sync::Arc;

use devcamper_persistence::DocumentStore;
use devcamper_persistence::query::{CountMode, QueryCompiler};

use crate::auth::TokenService;
use crate::config::ServerConfig;
use crate::geocoder::Geocoder;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`DocumentStore`])
///
/// # Example
///
/// ```rust,ignore
/// use devcamper_rest::{AppState, ServerConfig};
/// use devcamper_persistence::backends::sqlite::SqliteBackend;
/// use std::sync::Arc;
///
/// let backend = SqliteBackend::in_memory()?;
/// let state = AppState::new(Arc::new(backend), ServerConfig::default());
/// ```
pub struct AppState<S> {
    storage: Arc<S>,
    config: Arc<ServerConfig>,
    tokens: Arc<TokenService>,
    geocoder: Option<Arc<dyn Geocoder>>,
    compiler: QueryCompiler,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: Arc::clone(&self.config),
            tokens: Arc::clone(&self.tokens),
            geocoder: self.geocoder.clone(),
            compiler: self.compiler,
        }
    }
}

impl<S: DocumentStore> AppState<S> {
    /// Creates state without a geocoder.
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, config.jwt_expire_minutes);
        let compiler = QueryCompiler::with_default_limit(config.default_limit);
        Self {
            storage,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            geocoder: None,
            compiler,
        }
    }

    /// Enables address geocoding for bootcamps.
    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the session token service.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Returns the geocoder, if one is configured.
    pub fn geocoder(&self) -> Option<&dyn Geocoder> {
        self.geocoder.as_deref()
    }

    /// Returns the advanced-query compiler.
    pub fn compiler(&self) -> &QueryCompiler {
        &self.compiler
    }

    /// Returns which documents pagination totals count.
    pub fn count_mode(&self) -> CountMode {
        self.config.count_mode()
    }
}
