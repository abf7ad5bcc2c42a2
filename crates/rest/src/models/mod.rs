//! Domain models.
//!
//! Each model is a serde struct stored as a JSON document. Request bodies are
//! merged over the stored (or empty) document with [`merge_fields`], decoded
//! with [`decode`], then checked with the model's `validate`.

mod bootcamp;
mod course;
mod geo;
mod review;
mod user;
pub mod validation;

pub use bootcamp::{Bootcamp, CAREERS, DEFAULT_PHOTO};
pub use course::{Course, MINIMUM_SKILLS};
pub use geo::Location;
pub use review::Review;
pub use user::User;

use devcamper_persistence::query::Projectable;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{RestError, RestResult};

/// Keys a request body can never set.
pub const SYSTEM_FIELDS: [&str; 3] = ["id", "deleted", "createdAt"];

/// A stored record type.
pub trait Entity: Projectable + Serialize + DeserializeOwned + Send + Sync {
    /// Collection the records live in.
    const COLLECTION: &'static str;

    /// Singular lowercase name used in messages.
    const LABEL: &'static str;

    /// Returns the record id.
    fn id(&self) -> &str;

    /// Serializes the record for storage.
    fn to_document(&self) -> RestResult<Value> {
        serde_json::to_value(self).map_err(|e| {
            RestError::internal(format!("failed to serialize {}: {}", Self::LABEL, e))
        })
    }

    /// Rebuilds a record from a stored document.
    fn from_document(document: Value) -> RestResult<Self> {
        serde_json::from_value(document).map_err(|e| {
            RestError::internal(format!("failed to read stored {}: {}", Self::LABEL, e))
        })
    }

    /// The JSON returned to clients.
    fn to_response(&self) -> RestResult<Value> {
        self.to_document()
    }
}

/// Copies every key of `patch` into `target` except system and protected keys.
pub fn merge_fields(target: &mut Map<String, Value>, patch: Map<String, Value>, protected: &[&str]) {
    for (key, value) in patch {
        if SYSTEM_FIELDS.contains(&key.as_str()) || protected.contains(&key.as_str()) {
            continue;
        }
        target.insert(key, value);
    }
}

/// Decodes merged JSON into a model; type mismatches are the caller's fault.
pub fn decode<T: Entity>(value: Value) -> RestResult<T> {
    serde_json::from_value(value)
        .map_err(|e| RestError::bad_request(format!("invalid {} data: {}", T::LABEL, e)))
}

/// Returns the record's document as an object map.
pub fn document_map<T: Entity>(record: &T) -> RestResult<Map<String, Value>> {
    match record.to_document()? {
        Value::Object(map) => Ok(map),
        _ => Err(RestError::internal(format!(
            "{} did not serialize to an object",
            T::LABEL
        ))),
    }
}
