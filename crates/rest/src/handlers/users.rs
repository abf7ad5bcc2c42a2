//! Admin user management.
//!
//! Every route requires the admin role.

use axum::extract::{Path, State};
use devcamper_persistence::DocumentStore;
use serde_json::Value;
use tracing::{debug, info};

use super::accounts::{
    CREDENTIAL_FIELDS, create_account, ensure_email_available, save_account, set_password,
};
use super::listing::advanced_list;
use super::records::{build_record, delete_record, ensure_valid, fetch_live};
use crate::auth::Role;
use crate::error::{RestError, RestResult};
use crate::extractors::{AdvancedQuery, CurrentUser, JsonBody, record_id};
use crate::models::{Entity, User};
use crate::responses::Envelope;
use crate::state::AppState;

const ADMINS: [Role; 1] = [Role::Admin];

const ALL_ROLES: [Role; 3] = [Role::User, Role::Publisher, Role::Admin];

/// `GET /users`
pub async fn list_users<S>(
    State(state): State<AppState<S>>,
    current: CurrentUser,
    AdvancedQuery(params): AdvancedQuery,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    current.require_role(&ADMINS)?;
    advanced_list::<User, S>(&state, &params, None).await
}

/// `GET /users/{id}`
pub async fn get_user<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    current: CurrentUser,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    current.require_role(&ADMINS)?;
    let id = record_id::<User>(&id)?;
    debug!(user_id = %id, "Processing get user request");
    let user: User = fetch_live(&state, &id).await?;
    Ok(Envelope::ok(user.to_response()?))
}

/// `POST /users`
pub async fn create_user<S>(
    State(state): State<AppState<S>>,
    current: CurrentUser,
    JsonBody(body): JsonBody,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    current.require_role(&ADMINS)?;
    debug!(admin_id = %current.id(), "Processing create user request");
    let user = create_account(&state, body, &ALL_ROLES).await?;
    Ok(Envelope::created(user.to_response()?))
}

/// `PUT /users/{id}`
///
/// Admins may change the role and set a new password.
pub async fn update_user<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    current: CurrentUser,
    JsonBody(mut body): JsonBody,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    current.require_role(&ADMINS)?;
    let id = record_id::<User>(&id)?;
    debug!(user_id = %id, admin_id = %current.id(), "Processing update user request");

    let existing: User = fetch_live(&state, &id).await?;
    let role = body.remove("role");
    let password = body.remove("password");

    let mut user: User = build_record(Some(&existing), body, &CREDENTIAL_FIELDS)?;
    match role {
        None | Some(Value::Null) => {}
        Some(Value::String(name)) => {
            user.role = name.parse().map_err(|_| {
                RestError::validation(vec![
                    "please select a role in [ user, publisher, admin ]".to_string(),
                ])
            })?;
        }
        Some(_) => {
            return Err(RestError::validation(vec![
                "please select a role in [ user, publisher, admin ]".to_string(),
            ]));
        }
    }
    ensure_valid(user.validate())?;
    if user.email != existing.email {
        ensure_email_available(&state, &user.email, Some(&user.id)).await?;
    }
    if let Some(password) = password.as_ref().and_then(Value::as_str) {
        set_password(&mut user, password)?;
    }

    let user = save_account(&state, &user).await?;
    Ok(Envelope::ok(user.to_response()?))
}

/// `DELETE /users/{id}`
pub async fn delete_user<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    current: CurrentUser,
) -> RestResult<Envelope>
where
    S: DocumentStore + Send + Sync,
{
    current.require_role(&ADMINS)?;
    let id = record_id::<User>(&id)?;
    debug!(user_id = %id, admin_id = %current.id(), "Processing delete user request");

    let user: User = fetch_live(&state, &id).await?;
    delete_record(&state, &user).await?;
    info!(user_id = %id, "User deleted");
    Ok(Envelope::empty())
}
