//! Account helpers shared by the auth and admin user handlers.

use devcamper_persistence::error::{ResourceError, StorageError};
use devcamper_persistence::{DocumentStore, Filter};
use serde_json::{Map, Value};
use tracing::info;

use super::records::{build_record, ensure_valid};
use crate::auth::Role;
use crate::auth::password::{MIN_PASSWORD_LEN, hash_password};
use crate::error::{RestError, RestResult};
use crate::models::{Entity, User};
use crate::state::AppState;

/// Body keys that only dedicated code paths may write.
pub const CREDENTIAL_FIELDS: [&str; 4] = ["role", "password", "resetPasswordToken", "resetPasswordExpire"];

/// Message for a password that is too short, or `None` if it is acceptable.
pub fn password_problem(password: &str) -> Option<String> {
    (password.chars().count() < MIN_PASSWORD_LEN)
        .then(|| format!("password should be at least {} characters", MIN_PASSWORD_LEN))
}

fn email_taken(email: &str) -> RestError {
    RestError::bad_request(format!("email {} was taken, please use the new one", email))
}

/// Reports a write rejected by the email index like the availability check.
fn account_write_error(email: &str, err: StorageError) -> RestError {
    match err {
        StorageError::Resource(ResourceError::Duplicate { ref field, .. }) if field == "email" => {
            email_taken(email)
        }
        other => other.into(),
    }
}

/// Stores a new account.
pub async fn insert_account<S: DocumentStore>(state: &AppState<S>, user: &User) -> RestResult<User> {
    let stored = state
        .storage()
        .insert(User::COLLECTION, user.to_document()?)
        .await
        .map_err(|e| account_write_error(&user.email, e))?;
    User::from_document(stored.into_content())
}

/// Writes back an account whose email may have changed.
pub async fn save_account<S: DocumentStore>(state: &AppState<S>, user: &User) -> RestResult<User> {
    let stored = state
        .storage()
        .replace(User::COLLECTION, &user.id, user.to_document()?)
        .await
        .map_err(|e| account_write_error(&user.email, e))?;
    User::from_document(stored.into_content())
}

/// Fails unless no other user, deleted or not, has `email`.
pub async fn ensure_email_available<S: DocumentStore>(
    state: &AppState<S>,
    email: &str,
    except_id: Option<&str>,
) -> RestResult<()> {
    let filter = Filter::new().with("email", email);
    match state.storage().find_one(User::COLLECTION, &filter).await? {
        Some(other) if Some(other.id()) != except_id => Err(email_taken(email)),
        _ => Ok(()),
    }
}

/// Hashes and stores a new password on `user` after checking its length.
pub fn set_password(user: &mut User, password: &str) -> RestResult<()> {
    if let Some(problem) = password_problem(password) {
        return Err(RestError::validation(vec![problem]));
    }
    user.password = hash_password(password)?;
    Ok(())
}

/// Creates an account from a register or admin request body.
///
/// `role` defaults to `user` and must be one of `allowed_roles`.
pub async fn create_account<S: DocumentStore>(
    state: &AppState<S>,
    body: Map<String, Value>,
    allowed_roles: &[Role],
) -> RestResult<User> {
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let role = match body.get("role") {
        None | Some(Value::Null) => Some(Role::default()),
        Some(Value::String(name)) => name.parse::<Role>().ok(),
        Some(_) => None,
    }
    .filter(|role| allowed_roles.contains(role));

    let mut user: User = build_record(None, body, &CREDENTIAL_FIELDS)?;
    user.name = user.name.trim().to_string();
    user.email = user.email.trim().to_string();

    let mut errors = user.validate();
    if role.is_none() {
        let names: Vec<&str> = allowed_roles.iter().map(Role::as_str).collect();
        errors.push(format!("please select a role in [ {} ]", names.join(", ")));
    }
    errors.extend(password_problem(&password));
    ensure_valid(errors)?;

    ensure_email_available(state, &user.email, None).await?;
    user.role = role.unwrap_or_default();
    set_password(&mut user, &password)?;

    let user = insert_account(state, &user).await?;
    info!(user_id = %user.id, role = %user.role, "Account created");
    Ok(user)
}
