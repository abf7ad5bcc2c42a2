//! Authentication handlers.
//!
//! Register and login answer with a session token (body and `token` cookie).
//! Password resets hand out a one-time token whose HMAC is stored with an
//! expiry.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{Duration, Utc};
use devcamper_persistence::{DocumentStore, Filter};
use serde_json::json;
use tracing::{debug, info};

use super::accounts::{create_account, ensure_email_available, save_account, set_password};
use super::records::{ensure_valid, save_record};
use crate::auth::password::verify_password;
use crate::auth::{Role, reset};
use crate::error::{RestError, RestResult};
use crate::extractors::{CurrentUser, JsonBody};
use crate::models::{Entity, User};
use crate::responses::{Envelope, TokenResponse};
use crate::state::AppState;

fn token_response<S: DocumentStore>(
    state: &AppState<S>,
    status: StatusCode,
    user: &User,
) -> RestResult<TokenResponse> {
    let tokens = state.tokens();
    let token = tokens.issue(&user.id)?;
    Ok(TokenResponse::issued(status, token, tokens.lifetime_secs()))
}

/// `POST /auth/register`
pub async fn register<S>(
    State(state): State<AppState<S>>,
    JsonBody(body): JsonBody,
) -> RestResult<TokenResponse>
where
    S: DocumentStore + Send + Sync,
{
    debug!("Processing register request");
    let user = create_account(&state, body, &Role::SELF_ASSIGNABLE).await?;
    token_response(&state, StatusCode::CREATED, &user)
}

/// `POST /auth/login`
pub async fn login<S>(
    State(state): State<AppState<S>>,
    body: JsonBody,
) -> RestResult<TokenResponse>
where
    S: DocumentStore + Send + Sync,
{
    let (Some(email), Some(password)) = (body.required_str("email"), body.str_field("password"))
    else {
        return Err(RestError::bad_request("please provide email and password"));
    };
    if password.is_empty() {
        return Err(RestError::bad_request("please provide email and password"));
    }
    debug!(email = %email, "Processing login request");

    let invalid = || RestError::Unauthorized {
        message: "invalid email or password".to_string(),
    };
    let filter = Filter::live().with("email", email);
    let stored = state
        .storage()
        .find_one(User::COLLECTION, &filter)
        .await?
        .ok_or_else(invalid)?;
    let user = User::from_document(stored.into_content())?;
    if !verify_password(password, &user.password)? {
        return Err(invalid());
    }

    token_response(&state, StatusCode::OK, &user)
}

/// `GET /auth/logout`
pub async fn logout() -> TokenResponse {
    TokenResponse::cleared()
}

/// `GET /auth/me`
pub async fn me(current: CurrentUser) -> RestResult<Envelope> {
    Ok(Envelope::ok(current.user.to_response()?))
}

/// `PUT /auth/updatedetails`
///
/// Only `name` and `email` change; blank values leave the field as is.
pub async fn update_details<S>(
    State(state): State<AppState<S>>,
    current: CurrentUser,
    body: JsonBody,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    debug!(user_id = %current.id(), "Processing update details request");
    let mut user = current.user;
    if let Some(name) = body.required_str("name") {
        user.name = name.to_string();
    }
    if let Some(email) = body.required_str("email") {
        user.email = email.to_string();
    }
    ensure_valid(user.validate())?;
    ensure_email_available(&state, &user.email, Some(&user.id)).await?;

    let user = save_account(&state, &user).await?;
    Ok(Envelope::ok(user.to_response()?))
}

/// `PUT /auth/updatepassword`
pub async fn update_password<S>(
    State(state): State<AppState<S>>,
    current: CurrentUser,
    body: JsonBody,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    let (Some(current_password), Some(new_password)) = (
        body.str_field("currentPassword").filter(|p| !p.is_empty()),
        body.str_field("newPassword").filter(|p| !p.is_empty()),
    ) else {
        return Err(RestError::bad_request(
            "please provide current password and new password",
        ));
    };
    debug!(user_id = %current.id(), "Processing update password request");

    let mut user = current.user;
    if !verify_password(current_password, &user.password)? {
        return Err(RestError::forbidden("current password not match"));
    }
    set_password(&mut user, new_password)?;

    let user = save_record(&state, &user).await?;
    Ok(Envelope::ok(user.to_response()?))
}

/// `POST /auth/forgotpassword`
///
/// Responds with the reset URL; mail delivery is not performed.
pub async fn forgot_password<S>(
    State(state): State<AppState<S>>,
    body: JsonBody,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    let Some(email) = body.required_str("email") else {
        return Err(RestError::bad_request("please provide email"));
    };
    debug!(email = %email, "Processing forgot password request");

    let filter = Filter::live().with("email", email);
    let stored = state
        .storage()
        .find_one(User::COLLECTION, &filter)
        .await?
        .ok_or_else(|| RestError::not_found(format!("there is no user with email {}", email)))?;
    let mut user = User::from_document(stored.into_content())?;

    let config = state.config();
    let reset = reset::generate(&config.jwt_secret)?;
    let lifetime = i64::try_from(config.reset_token_expire_minutes).unwrap_or(i64::MAX / 60);
    user.reset_password_token = Some(reset.digest);
    user.reset_password_expire =
        Utc::now().checked_add_signed(Duration::try_minutes(lifetime).unwrap_or(Duration::MAX));
    save_record(&state, &user).await?;

    info!(user_id = %user.id, "Password reset token issued");
    Ok(Envelope::ok(json!(format!(
        "/api/v1/auth/resetpassword/{}",
        reset.token
    ))))
}

/// `PUT /auth/resetpassword/{token}`
pub async fn reset_password<S>(
    State(state): State<AppState<S>>,
    Path(token): Path<String>,
    body: JsonBody,
) -> RestResult<TokenResponse>
where
    S: DocumentStore + Send + Sync,
{
    debug!("Processing reset password request");
    let digest = reset::digest(&state.config().jwt_secret, &token)?;

    let filter = Filter::live().with("resetPasswordToken", digest);
    let expired = || RestError::bad_request("your token is expired");
    let stored = state
        .storage()
        .find_one(User::COLLECTION, &filter)
        .await?
        .ok_or_else(expired)?;
    let mut user = User::from_document(stored.into_content())?;
    if !user.reset_token_active(Utc::now()) {
        return Err(expired());
    }

    let Some(password) = body.str_field("password").filter(|p| !p.is_empty()) else {
        return Err(RestError::bad_request("please provide a new password"));
    };
    set_password(&mut user, password)?;
    user.clear_reset_token();
    let user = save_record(&state, &user).await?;

    info!(user_id = %user.id, "Password reset");
    token_response(&state, StatusCode::OK, &user)
}
