//! Bootcamp model.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use devcamper_persistence::query::{FieldRegistry, Projectable};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::validation::{check_text, is_valid_email, is_valid_url, slugify};
use super::{Entity, Location};

/// Career tracks a bootcamp may offer.
pub const CAREERS: [&str; 6] = [
    "Web Development",
    "Mobile Development",
    "UI/UX",
    "Data Science",
    "Business",
    "Other",
];

/// Photo assigned when none is uploaded.
pub const DEFAULT_PHOTO: &str = "no-photo.jpg";

/// A bootcamp listing owned by a publisher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bootcamp {
    /// Record id.
    pub id: String,
    /// Unique display name, at most 50 characters.
    pub name: String,
    /// URL-friendly form of the name.
    pub slug: String,
    /// At most 500 characters.
    pub description: String,
    /// http(s) URL.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub website: String,
    /// At most 20 characters.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    /// Contact address.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    /// Raw address; cleared once geocoded into `location`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Geocoded address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Subset of [`CAREERS`].
    pub careers: Vec<String>,
    /// Mean rating of live reviews.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    /// Mean tuition of live courses, rounded down to tens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_cost: Option<i64>,
    /// Photo file name.
    pub photo: String,
    /// Offers housing.
    pub housing: bool,
    /// Offers job assistance.
    pub job_assistance: bool,
    /// Guarantees a job.
    pub job_guarantee: bool,
    /// Accepts the GI Bill.
    pub accept_gi: bool,
    /// Id of the owning user.
    pub user: String,
    /// Soft-delete flag.
    pub deleted: bool,
    /// Set by the store on insert.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Bootcamp {
    /// Derives the slug and fills in the default photo.
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.slug = slugify(&self.name);
        if self.photo.is_empty() {
            self.photo = DEFAULT_PHOTO.to_string();
        }
    }

    /// Returns every field constraint the bootcamp violates.
    ///
    /// The address is only required when `creating`; after geocoding it is
    /// replaced by `location`.
    pub fn validate(&self, creating: bool) -> Vec<String> {
        let mut errors = Vec::new();
        check_text(
            &mut errors,
            &self.name,
            Some(50),
            "please add a name",
            "name can not be more than 50 characters",
        );
        check_text(
            &mut errors,
            &self.description,
            Some(500),
            "please add a description",
            "description can not be more than 500 characters",
        );
        if !self.website.is_empty() && !is_valid_url(&self.website) {
            errors.push("please use a valid URL with HTTP or HTTPS".to_string());
        }
        if self.phone.chars().count() > 20 {
            errors.push("phone can not be more than 20 characters".to_string());
        }
        if !self.email.is_empty() && !is_valid_email(&self.email) {
            errors.push("please add a valid email".to_string());
        }
        if creating && self.address.as_deref().is_none_or(|a| a.trim().is_empty()) {
            errors.push("please add an address".to_string());
        }
        if self.careers.is_empty() {
            errors.push("please add at least one career".to_string());
        } else if let Some(unknown) = self.careers.iter().find(|c| !CAREERS.contains(&c.as_str())) {
            errors.push(format!("{} is not a supported career", unknown));
        }
        errors
    }
}

impl Entity for Bootcamp {
    const COLLECTION: &'static str = "bootcamps";
    const LABEL: &'static str = "bootcamp";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Projectable for Bootcamp {
    fn field_registry() -> &'static FieldRegistry<Self> {
        static REGISTRY: OnceLock<FieldRegistry<Bootcamp>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            FieldRegistry::<Bootcamp>::new()
                .field("id", |b| json!(b.id))
                .field("name", |b| json!(b.name))
                .field("slug", |b| json!(b.slug))
                .field("description", |b| json!(b.description))
                .field("website", |b| json!(b.website))
                .field("phone", |b| json!(b.phone))
                .field("email", |b| json!(b.email))
                .field("address", |b| json!(b.address))
                .field("location", |b| json!(b.location))
                .field("careers", |b| json!(b.careers))
                .field("averageRating", |b| json!(b.average_rating))
                .field("averageCost", |b| json!(b.average_cost))
                .field("photo", |b| json!(b.photo))
                .field("housing", |b| json!(b.housing))
                .field("jobAssistance", |b| json!(b.job_assistance))
                .field("jobGuarantee", |b| json!(b.job_guarantee))
                .field("acceptGi", |b| json!(b.accept_gi))
                .field("user", |b| json!(b.user))
                .field("createdAt", |b| json!(b.created_at))
        })
    }
}
