//! Server configuration for the DevCamper API.
//!
//! Configuration is read once at startup from command line arguments or
//! environment variables and then shared read-only through
//! [`AppState`](crate::state::AppState).
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DEVCAMPER_PORT` | 5000 | Server port |
//! | `DEVCAMPER_HOST` | 127.0.0.1 | Host to bind |
//! | `DEVCAMPER_LOG_LEVEL` | info | Log level |
//! | `DEVCAMPER_MAX_BODY_SIZE` | 1048576 | Max request body (bytes) |
//! | `DEVCAMPER_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `DEVCAMPER_ENABLE_CORS` | true | Enable CORS |
//! | `DEVCAMPER_CORS_ORIGINS` | * | Allowed origins |
//! | `DEVCAMPER_CORS_METHODS` | GET,POST,PUT,DELETE,OPTIONS | Allowed methods |
//! | `DEVCAMPER_CORS_HEADERS` | Content-Type,Authorization | Allowed headers |
//! | `DEVCAMPER_DATABASE_URL` | devcamper.db | SQLite path or `:memory:` |
//! | `DEVCAMPER_JWT_SECRET` | change-me | Secret for tokens and reset hashes |
//! | `DEVCAMPER_JWT_EXPIRE` | 43200 | Token lifetime (minutes) |
//! | `DEVCAMPER_RESET_TOKEN_EXPIRE` | 10 | Reset token lifetime (minutes) |
//! | `DEVCAMPER_DEFAULT_LIMIT` | 100 | Page size when `limit` is absent |
//! | `DEVCAMPER_FILTERED_TOTAL` | false | Count pagination totals with the full filter |
//! | `DEVCAMPER_GEOCODER_URL` | (none) | MapQuest-compatible geocoding endpoint |
//! | `DEVCAMPER_GEOCODER_API_KEY` | (none) | Geocoder API key |
//! | `DEVCAMPER_ADMIN_EMAIL` | (none) | Bootstrap admin email |
//! | `DEVCAMPER_ADMIN_PASSWORD` | (none) | Bootstrap admin password |
//!
//! # Example
//!
//! ```rust
//! use devcamper_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     ..Default::default()
//! };
//! assert_eq!(config.socket_addr(), "0.0.0.0:3000");
//! ```

use clap::Parser;
use devcamper_persistence::query::CountMode;

/// Server configuration for the DevCamper API.
#[derive(Debug, Clone, Parser)]
#[command(name = "devcamper")]
#[command(about = "DevCamper bootcamp directory API")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "DEVCAMPER_PORT", default_value = "5000")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "DEVCAMPER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "DEVCAMPER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "DEVCAMPER_MAX_BODY_SIZE", default_value = "1048576")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "DEVCAMPER_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "DEVCAMPER_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "DEVCAMPER_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "DEVCAMPER_CORS_METHODS",
        default_value = "GET,POST,PUT,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "DEVCAMPER_CORS_HEADERS",
        default_value = "Content-Type,Authorization"
    )]
    pub cors_headers: String,

    /// SQLite database path, or `:memory:`.
    #[arg(long, env = "DEVCAMPER_DATABASE_URL", default_value = "devcamper.db")]
    pub database_url: String,

    /// Secret used to sign tokens and hash reset tokens.
    #[arg(long, env = "DEVCAMPER_JWT_SECRET", default_value = "change-me")]
    pub jwt_secret: String,

    /// Token lifetime in minutes.
    #[arg(long, env = "DEVCAMPER_JWT_EXPIRE", default_value = "43200")]
    pub jwt_expire_minutes: u64,

    /// Password reset token lifetime in minutes.
    #[arg(long, env = "DEVCAMPER_RESET_TOKEN_EXPIRE", default_value = "10")]
    pub reset_token_expire_minutes: u64,

    /// Page size used when a list request has no `limit`.
    #[arg(long, env = "DEVCAMPER_DEFAULT_LIMIT", default_value = "100")]
    pub default_limit: u64,

    /// Count pagination totals with the full compiled filter instead of
    /// every live document.
    #[arg(long, env = "DEVCAMPER_FILTERED_TOTAL", default_value = "false")]
    pub filtered_total: bool,

    /// Geocoding endpoint; geocoding is disabled when unset.
    #[arg(long, env = "DEVCAMPER_GEOCODER_URL")]
    pub geocoder_url: Option<String>,

    /// Geocoder API key.
    #[arg(long, env = "DEVCAMPER_GEOCODER_API_KEY")]
    pub geocoder_api_key: Option<String>,

    /// Email of an admin account to create at startup.
    #[arg(long, env = "DEVCAMPER_ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    /// Password of the bootstrap admin account.
    #[arg(long, env = "DEVCAMPER_ADMIN_PASSWORD")]
    pub admin_password: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 1024 * 1024, // 1MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization".to_string(),
            database_url: "devcamper.db".to_string(),
            jwt_secret: "change-me".to_string(),
            jwt_expire_minutes: 30 * 24 * 60,
            reset_token_expire_minutes: 10,
            default_limit: 100,
            filtered_total: false,
            geocoder_url: None,
            geocoder_api_key: None,
            admin_email: None,
            admin_password: None,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    pub fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns true if the database lives in memory.
    pub fn is_memory_database(&self) -> bool {
        self.database_url == ":memory:"
    }

    /// Which documents the pagination total counts.
    pub fn count_mode(&self) -> CountMode {
        if self.filtered_total {
            CountMode::Filtered
        } else {
            CountMode::LiveOnly
        }
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.jwt_secret.trim().is_empty() {
            errors.push("JWT secret cannot be empty".to_string());
        }

        if self.jwt_expire_minutes == 0 {
            errors.push("JWT expiry cannot be 0".to_string());
        }

        if self.default_limit == 0 {
            errors.push("Default limit cannot be 0".to_string());
        }

        if self.admin_email.is_some() && self.admin_password.is_none() {
            errors.push("Admin email requires an admin password".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Uses an in-memory database, ephemeral port 0 and no geocoder.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            database_url: ":memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_expire_minutes: 60,
            ..Default::default()
        }
    }
}
