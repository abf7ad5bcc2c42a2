//! Authentication primitives.
//!
//! - [`TokenService`] - signed session tokens (JWT, HS256)
//! - [`password`] - Argon2id password hashing
//! - [`reset`] - password reset tokens
//! - [`Role`] - user roles used for route authorization

pub mod password;
pub mod reset;
mod roles;
mod token;

pub use roles::Role;
pub use token::{Claims, TokenService};

use thiserror::Error;

/// Failures raised by the authentication primitives.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No token in the `Authorization` header or the `token` cookie.
    #[error("no session token supplied")]
    MissingToken,

    /// The token failed signature, format or expiry checks.
    #[error("invalid session token: {0}")]
    InvalidToken(String),

    /// A reset token that is not valid hex.
    #[error("malformed reset token")]
    MalformedResetToken,

    /// Password hashing or verification failed internally.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Token or reset-hash signing failed internally.
    #[error("token signing failed: {0}")]
    Signing(String),
}
