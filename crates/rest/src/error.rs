//! Error types for the DevCamper REST API.
//!
//! Every error renders as the failure envelope
//! `{"success": false, "error": "<message>", "data": null}` with the status
//! code of its variant. Validation errors join their messages with `", "`.
//!
//! # Error Mapping
//!
//! | Source | HTTP Status | Message |
//! |--------|-------------|---------|
//! | QueryError | 400 | compiler message |
//! | ResourceError::NotFound | 404 | document not found |
//! | ResourceError::AlreadyExists / Duplicate | 400 | duplicate field value entered |
//! | BackendError | 500 | `server error` (detail logged) |
//! | AuthError::MissingToken / InvalidToken | 401 | `unauthorized` |
//! | AuthError::Hashing / Signing | 500 | `server error` (detail logged) |
//! | GeocodeError::NoMatch | 400 | provider message |
//! | GeocodeError::Request | 500 | `server error` (detail logged) |
//! | Body over `max_body_size` | 413 | `request body too large` |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use devcamper_persistence::error::{QueryError, ResourceError, StorageError};
use serde_json::json;
use std::fmt;
use tracing::error;

use crate::auth::AuthError;
use crate::geocoder::GeocodeError;

/// Message returned for every server-side failure.
pub const SERVER_ERROR: &str = "server error";

const PAYLOAD_TOO_LARGE: &str = "request body too large";

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Malformed request or unusable input (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// One or more field constraints failed (HTTP 400).
    Validation {
        /// Every failed constraint, in field order.
        errors: Vec<String>,
    },

    /// Missing or invalid credentials (HTTP 401).
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// Authenticated but not allowed (HTTP 403).
    Forbidden {
        /// Error message.
        message: String,
    },

    /// Missing or soft-deleted record (HTTP 404).
    NotFound {
        /// Error message.
        message: String,
    },

    /// Request body over the configured limit (HTTP 413).
    PayloadTooLarge,

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error detail; logged, never sent to the client.
        message: String,
    },
}

impl RestError {
    /// Creates a 400 error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a 401 error with the standard message.
    pub fn unauthorized() -> Self {
        RestError::Unauthorized {
            message: "unauthorized".to_string(),
        }
    }

    /// Creates a 403 error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        RestError::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a 404 error.
    pub fn not_found(message: impl Into<String>) -> Self {
        RestError::NotFound {
            message: message.into(),
        }
    }

    /// Creates a 500 error.
    pub fn internal(message: impl Into<String>) -> Self {
        RestError::InternalError {
            message: message.into(),
        }
    }

    /// Creates a 400 error from a list of failed constraints.
    pub fn validation(errors: Vec<String>) -> Self {
        RestError::Validation { errors }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } | RestError::Validation { .. } => StatusCode::BAD_REQUEST,
            RestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RestError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message placed in the response envelope.
    pub fn client_message(&self) -> String {
        match self {
            RestError::BadRequest { message }
            | RestError::Unauthorized { message }
            | RestError::Forbidden { message }
            | RestError::NotFound { message } => message.clone(),
            RestError::Validation { errors } => errors.join(", "),
            RestError::PayloadTooLarge => PAYLOAD_TOO_LARGE.to_string(),
            RestError::InternalError { .. } => SERVER_ERROR.to_string(),
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::Validation { errors } => {
                write!(f, "Validation failed: {}", errors.join(", "))
            }
            RestError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            RestError::Forbidden { message } => write!(f, "Forbidden: {}", message),
            RestError::NotFound { message } => write!(f, "Not found: {}", message),
            RestError::PayloadTooLarge => f.write_str(PAYLOAD_TOO_LARGE),
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        if let RestError::InternalError { message } = &self {
            error!(error = %message, "Request failed with a server error");
        }

        let body = json!({
            "success": false,
            "error": self.client_message(),
            "data": null,
        });

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Resource(e) => e.into(),
            StorageError::Query(e) => e.into(),
            StorageError::Backend(e) => RestError::internal(e.to_string()),
        }
    }
}

impl From<ResourceError> for RestError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { .. } => RestError::not_found(err.to_string()),
            ResourceError::AlreadyExists { .. } | ResourceError::Duplicate { .. } => {
                RestError::bad_request("duplicate field value entered")
            }
        }
    }
}

impl From<QueryError> for RestError {
    fn from(err: QueryError) -> Self {
        RestError::bad_request(err.to_string())
    }
}

impl From<AuthError> for RestError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken | AuthError::InvalidToken(_) => RestError::unauthorized(),
            AuthError::MalformedResetToken => RestError::bad_request("invalid reset token"),
            AuthError::Hashing(_) | AuthError::Signing(_) => RestError::internal(err.to_string()),
        }
    }
}

impl From<GeocodeError> for RestError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::NoMatch(_) => RestError::bad_request(err.to_string()),
            GeocodeError::Request(_) => RestError::internal(err.to_string()),
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
