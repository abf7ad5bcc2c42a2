//! Course model.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use devcamper_persistence::query::{FieldRegistry, Projectable};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::Entity;
use super::validation::check_text;

/// Accepted `minimumSkill` values.
pub const MINIMUM_SKILLS: [&str; 3] = ["beginner", "intermediate", "advanced"];

/// A course offered by a bootcamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Course {
    /// Record id.
    pub id: String,
    /// Required.
    pub title: String,
    /// Required.
    pub description: String,
    /// Duration; positive.
    pub weeks: i64,
    /// Non-negative.
    pub tuition: f64,
    /// One of [`MINIMUM_SKILLS`].
    pub minimum_skill: String,
    /// Scholarships are offered.
    pub scholarship_available: bool,
    /// Id of the bootcamp offering the course.
    pub bootcamp: String,
    /// Id of the publisher that added it.
    pub user: String,
    /// Soft-delete flag.
    pub deleted: bool,
    /// Set by the store on insert.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Course {
    /// Returns every field constraint the course violates.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_text(&mut errors, &self.title, None, "please add a title", "");
        check_text(
            &mut errors,
            &self.description,
            None,
            "please add a description",
            "",
        );
        if self.weeks <= 0 {
            errors.push("weeks must be greater than 0".to_string());
        }
        if !self.tuition.is_finite() || self.tuition < 0.0 {
            errors.push("tuition can not be negative".to_string());
        }
        if !MINIMUM_SKILLS.contains(&self.minimum_skill.as_str()) {
            errors.push(format!(
                "please select minimum skill in [ {} ]",
                MINIMUM_SKILLS.join(", ")
            ));
        }
        errors
    }
}

impl Entity for Course {
    const COLLECTION: &'static str = "courses";
    const LABEL: &'static str = "course";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Projectable for Course {
    fn field_registry() -> &'static FieldRegistry<Self> {
        static REGISTRY: OnceLock<FieldRegistry<Course>> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            FieldRegistry::<Course>::new()
                .field("id", |c| json!(c.id))
                .field("title", |c| json!(c.title))
                .field("description", |c| json!(c.description))
                .field("weeks", |c| json!(c.weeks))
                .field("tuition", |c| json!(c.tuition))
                .field("minimumSkill", |c| json!(c.minimum_skill))
                .field("scholarshipAvailable", |c| json!(c.scholarship_available))
                .field("bootcamp", |c| json!(c.bootcamp))
                .field("user", |c| json!(c.user))
                .field("createdAt", |c| json!(c.created_at))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_course() {
        let course = Course {
            title: "Front End Web Development".to_string(),
            description: "HTML, CSS and JavaScript".to_string(),
            weeks: 8,
            tuition: 8000.0,
            minimum_skill: "beginner".to_string(),
            ..Default::default()
        };
        assert!(course.validate().is_empty());
    }

    #[test]
    fn test_invalid_course() {
        let course = Course {
            tuition: -1.0,
            minimum_skill: "expert".to_string(),
            ..Default::default()
        };
        assert_eq!(
            course.validate(),
            vec![
                "please add a title",
                "please add a description",
                "weeks must be greater than 0",
                "tuition can not be negative",
                "please select minimum skill in [ beginner, intermediate, advanced ]",
            ]
        );
    }

    #[test]
    fn test_integer_tuition_deserializes() {
        let course: Course = serde_json::from_value(json!({"tuition": 12000})).unwrap();
        assert_eq!(course.tuition, 12000.0);
    }
}
