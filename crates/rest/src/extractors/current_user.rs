//! Authenticated-caller extractor.
//!
//! Reads the session token from `Authorization: Bearer <token>` or, failing
//! that, the `token` cookie, verifies it and loads the live user it names.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use devcamper_persistence::DocumentStore;
use tracing::debug;

use crate::auth::{AuthError, Role};
use crate::error::{RestError, RestResult};
use crate::models::{Entity, User};
use crate::state::AppState;

/// Name of the session cookie.
pub const TOKEN_COOKIE: &str = "token";

/// The user making the request.
///
/// # Example
///
/// ```rust,ignore
/// use devcamper_rest::extractors::CurrentUser;
///
/// async fn me(current: CurrentUser) -> String {
///     current.user.name
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The loaded account.
    pub user: User,
}

impl CurrentUser {
    /// The caller's id.
    pub fn id(&self) -> &str {
        &self.user.id
    }

    /// The caller's role.
    pub fn role(&self) -> Role {
        self.user.role
    }

    /// Returns true if the caller is an admin.
    pub fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }

    /// Fails with 403 unless the caller holds one of `roles`.
    pub fn require_role(&self, roles: &[Role]) -> RestResult<()> {
        if roles.contains(&self.user.role) {
            Ok(())
        } else {
            Err(RestError::forbidden(format!(
                "user with {} role is not authorized to access this route",
                self.user.role
            )))
        }
    }

    /// Fails with 403 unless the caller owns the record or is an admin.
    pub fn authorize_owner(&self, owner_id: &str) -> RestResult<()> {
        if self.is_admin() || self.user.id == owner_id {
            Ok(())
        } else {
            Err(RestError::forbidden("you do not have permission"))
        }
    }
}

/// Extracts the raw session token from the request headers.
///
/// The bearer header wins over the cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == TOKEN_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
    S: DocumentStore + Send + Sync + 'static,
{
    type Rejection = RestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(AuthError::MissingToken)?;
        let claims = state.tokens().verify(&token)?;

        let stored = state
            .storage()
            .find_by_id(User::COLLECTION, &claims.id)
            .await?
            .filter(|doc| !doc.is_deleted());
        let Some(stored) = stored else {
            debug!(user_id = %claims.id, "Session token names a missing or deleted user");
            return Err(RestError::unauthorized());
        };

        let user = User::from_document(stored.into_content())?;
        Ok(CurrentUser { user })
    }
}
