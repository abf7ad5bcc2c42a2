//! Review model.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use devcamper_persistence::query::{FieldRegistry, Projectable};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::Entity;
use super::validation::check_text;

/// A user's review of a bootcamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Review {
    /// Record id.
    pub id: String,
    /// At most 50 characters.
    pub title: String,
    /// At most 100 characters.
    pub text: String,
    /// 1 to 10.
    pub rating: i64,
    /// Id of the reviewed bootcamp.
    pub bootcamp: String,
    /// Id of the author.
    pub user: String,
    /// Soft-delete flag.
    pub deleted: bool,
    /// Set by the store on insert.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Returns every field constraint the review violates.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_text(
            &mut errors,
            &self.title,
            Some(50),
            "please add a title",
            "title can not be more than 50 characters",
        );
        check_text(
            &mut errors,
            &self.text,
            Some(100),
            "please add some text",
            "text can not be more than 100 characters",
        );
        if !(1..=10).contains(&self.rating) {
            errors.push("rating must be between 1 and 10".to_string());
        }
        errors
    }
}

impl Entity for Review {
    const COLLECTION: &'static str = "reviews";
    const LABEL: &'static str = "review";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Projectable for Review {
    fn field_registry() -> &'static FieldRegistry<Self> {
        static REGISTRY: OnceLock<FieldRegistry<Review>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            FieldRegistry::<Review>::new()
                .field("id", |r| json!(r.id))
                .field("title", |r| json!(r.title))
                .field("text", |r| json!(r.text))
                .field("rating", |r| json!(r.rating))
                .field("bootcamp", |r| json!(r.bootcamp))
                .field("user", |r| json!(r.user))
                .field("createdAt", |r| json!(r.created_at))
        })
    }
}
