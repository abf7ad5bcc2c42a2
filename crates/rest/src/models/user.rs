//! User model.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use devcamper_persistence::query::{FieldRegistry, Projectable};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::Entity;
use super::validation::{check_text, is_valid_email};
use crate::auth::Role;
use crate::error::RestResult;

/// Stored keys that never leave the server.
const PRIVATE_FIELDS: [&str; 3] = ["password", "resetPasswordToken", "resetPasswordExpire"];

/// An account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    /// Record id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unique login address.
    pub email: String,
    /// Authorization role.
    pub role: Role,
    /// Argon2 PHC hash.
    pub password: String,
    /// Hex HMAC of the outstanding reset token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_password_token: Option<String>,
    /// When the reset token stops working.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_password_expire: Option<DateTime<Utc>>,
    /// Soft-delete flag.
    pub deleted: bool,
    /// Set by the store on insert.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Checks name and email. Passwords are checked before hashing.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_text(&mut errors, &self.name, None, "please add a name", "");
        if self.email.trim().is_empty() {
            errors.push("please add an email".to_string());
        } else if !is_valid_email(&self.email) {
            errors.push("please add a valid email".to_string());
        }
        errors
    }

    /// Returns true while the stored reset token is unexpired.
    pub fn reset_token_active(&self, now: DateTime<Utc>) -> bool {
        self.reset_password_token.is_some() && self.reset_password_expire.is_some_and(|exp| exp > now)
    }

    /// Drops any outstanding reset token.
    pub fn clear_reset_token(&mut self) {
        self.reset_password_token = None;
        self.reset_password_expire = None;
    }
}

impl Entity for User {
    const COLLECTION: &'static str = "users";
    const LABEL: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_response(&self) -> RestResult<Value> {
        let mut value = self.to_document()?;
        if let Value::Object(map) = &mut value {
            for key in PRIVATE_FIELDS {
                map.remove(key);
            }
        }
        Ok(value)
    }
}

impl Projectable for User {
    fn field_registry() -> &'static FieldRegistry<Self> {
        static REGISTRY: OnceLock<FieldRegistry<User>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            FieldRegistry::<User>::new()
                .field("id", |u| json!(u.id))
                .field("name", |u| json!(u.name))
                .field("email", |u| json!(u.email))
                .field("role", |u| json!(u.role))
                .field("createdAt", |u| json!(u.created_at))
        })
    }
}
