//! Request bodies used across the API tests.

use serde_json::{Value, json};

/// Devworks Bootcamp: web and UI/UX, housing.
pub fn devworks() -> Value {
    json!({
        "name": "Devworks Bootcamp",
        "description": "Devworks is a full stack JavaScript Bootcamp located in the heart of Boston",
        "website": "https://devworks.com",
        "phone": "(111) 111-1111",
        "email": "enroll@devworks.com",
        "address": "233 Bay State Rd Boston MA 02215",
        "careers": ["Web Development", "UI/UX", "Business"],
        "housing": true,
        "jobAssistance": true,
        "jobGuarantee": false,
        "acceptGi": true
    })
}

/// ModernTech Bootcamp: web and business, no housing.
pub fn modern_tech() -> Value {
    json!({
        "name": "ModernTech Bootcamp",
        "description": "ModernTech has one goal, and that is to make you a rockstar developer",
        "website": "https://moderntech.com",
        "phone": "(222) 222-2222",
        "email": "enroll@moderntech.com",
        "address": "220 Pawtucket St, Lowell, MA 01854",
        "careers": ["Web Development", "UI/UX", "Mobile Development"],
        "housing": false,
        "jobAssistance": true,
        "jobGuarantee": false,
        "acceptGi": true
    })
}

/// Codemasters: data science and business, housing.
pub fn codemasters() -> Value {
    json!({
        "name": "Codemasters",
        "description": "Is coding your passion? Codemasters will give you the skills you need",
        "website": "https://codemasters.com",
        "phone": "(333) 333-3333",
        "email": "enroll@codemasters.com",
        "address": "85 South Prospect Street Burlington VT 05405",
        "careers": ["Web Development", "Data Science", "Business"],
        "housing": true,
        "jobAssistance": false,
        "jobGuarantee": false,
        "acceptGi": false
    })
}

/// A course with the given title and tuition.
pub fn course(title: &str, tuition: f64) -> Value {
    json!({
        "title": title,
        "description": "Learn to build applications from the ground up",
        "weeks": 8,
        "tuition": tuition,
        "minimumSkill": "beginner",
        "scholarshipAvailable": true
    })
}

/// A review with the given title and rating.
pub fn review(title: &str, rating: i64) -> Value {
    json!({
        "title": title,
        "text": "I learned a lot at this bootcamp",
        "rating": rating
    })
}
