//! Path id validation.

use uuid::Uuid;

use crate::error::{RestError, RestResult};
use crate::models::Entity;

/// Validates a path id for entity `T`, returning it in canonical form.
///
/// Ids are UUIDs; anything else is a 400 `invalid <entity> id format`.
pub fn record_id<T: Entity>(raw: &str) -> RestResult<String> {
    Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| RestError::bad_request(format!("invalid {} id format", T::LABEL)))
}
