//! Error types for the persistence layer.
//!
//! Errors are split into three families: document state errors, query
//! compilation errors (caller input that cannot be interpreted) and backend
//! errors (anything the storage engine itself reports).

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Document state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Query compilation errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors related to document state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The requested document was not found.
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// A document with the given ID already exists.
    #[error("document already exists: {collection}/{id}")]
    AlreadyExists { collection: String, id: String },

    /// A write would give a unique field a value another document holds.
    #[error("duplicate value for unique field {collection}.{field}")]
    Duplicate { collection: String, field: String },
}

/// Errors raised while compiling raw query parameters.
///
/// These always classify as a bad request: the caller sent a reserved
/// parameter whose value has the wrong shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A reserved parameter could not be interpreted.
    #[error("invalid value for '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },
}

impl QueryError {
    pub(crate) fn invalid(parameter: &str, message: impl Into<String>) -> Self {
        QueryError::InvalidParameter {
            parameter: parameter.to_string(),
            message: message.into(),
        }
    }
}

/// Backend-specific errors.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryError { message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
