//! Startup tasks.

use devcamper_persistence::{DocumentStore, Filter, UniqueField};
use serde_json::{Map, Value};
use tracing::info;

use crate::auth::Role;
use crate::error::RestResult;
use crate::handlers::create_account;
use crate::models::{Bootcamp, Entity, User};
use crate::state::AppState;

/// Fields the store must keep distinct.
///
/// Bootcamp names may be reused once the old bootcamp is deleted; emails
/// never may.
pub fn unique_fields() -> [UniqueField; 2] {
    [
        UniqueField::live(Bootcamp::COLLECTION, "name"),
        UniqueField::new(User::COLLECTION, "email"),
    ]
}

/// Installs the unique field constraints. Safe to run on every start.
pub async fn ensure_indexes<S: DocumentStore>(state: &AppState<S>) -> RestResult<()> {
    for unique in unique_fields() {
        state.storage().ensure_unique(&unique).await?;
    }
    info!("Unique field constraints ready");
    Ok(())
}

/// Creates the configured admin account unless a user with that email exists.
///
/// Returns the new admin, or `None` when nothing was created. Does nothing
/// unless both `admin_email` and `admin_password` are configured.
pub async fn ensure_admin<S: DocumentStore>(state: &AppState<S>) -> RestResult<Option<User>> {
    let config = state.config();
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(None);
    };

    let existing = Filter::new().with("email", email.as_str());
    if state.storage().exists(User::COLLECTION, &existing).await? {
        info!(email = %email, "Bootstrap admin already present");
        return Ok(None);
    }

    let mut body = Map::new();
    body.insert("name".to_string(), Value::from("Admin"));
    body.insert("email".to_string(), Value::from(email.as_str()));
    body.insert("password".to_string(), Value::from(password.as_str()));
    body.insert("role".to_string(), Value::from(Role::Admin.as_str()));

    let admin = create_account(state, body, &[Role::Admin]).await?;
    info!(user_id = %admin.id, email = %admin.email, "Bootstrap admin created");
    Ok(Some(admin))
}
