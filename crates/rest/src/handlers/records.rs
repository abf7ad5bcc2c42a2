//! Typed record access shared by the handlers.
//!
//! Wraps the untyped [`DocumentStore`] calls with the soft-delete aware
//! lookups and the decode/validate step every write goes through.

use devcamper_persistence::DocumentStore;
use serde_json::{Map, Value};

use crate::error::{RestError, RestResult};
use crate::models::{Entity, decode, document_map, merge_fields};
use crate::state::AppState;

/// Loads a record that has not been soft-deleted.
///
/// A missing id is `no <entity> with id of <id>`, a deleted one
/// `this <entity> was deleted`; both are 404.
pub async fn fetch_live<T, S>(state: &AppState<S>, id: &str) -> RestResult<T>
where
    T: Entity,
    S: DocumentStore,
{
    let stored = state
        .storage()
        .find_by_id(T::COLLECTION, id)
        .await?
        .ok_or_else(|| RestError::not_found(format!("no {} with id of {}", T::LABEL, id)))?;
    if stored.is_deleted() {
        return Err(RestError::not_found(format!("this {} was deleted", T::LABEL)));
    }
    T::from_document(stored.into_content())
}

/// Builds a record from a request body, on top of `base` when updating.
///
/// System keys and `protected` keys in the body are ignored.
pub fn build_record<T: Entity>(
    base: Option<&T>,
    body: Map<String, Value>,
    protected: &[&str],
) -> RestResult<T> {
    let mut merged = match base {
        Some(record) => document_map(record)?,
        None => Map::new(),
    };
    merge_fields(&mut merged, body, protected);
    decode(Value::Object(merged))
}

/// Fails with the joined messages when `errors` is non-empty.
pub fn ensure_valid(errors: Vec<String>) -> RestResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(RestError::validation(errors))
    }
}

/// Stores a new record and returns it with its assigned id and timestamp.
pub async fn insert_record<T, S>(state: &AppState<S>, record: &T) -> RestResult<T>
where
    T: Entity,
    S: DocumentStore,
{
    let stored = state
        .storage()
        .insert(T::COLLECTION, record.to_document()?)
        .await?;
    T::from_document(stored.into_content())
}

/// Writes back an existing record.
pub async fn save_record<T, S>(state: &AppState<S>, record: &T) -> RestResult<T>
where
    T: Entity,
    S: DocumentStore,
{
    let stored = state
        .storage()
        .replace(T::COLLECTION, record.id(), record.to_document()?)
        .await?;
    T::from_document(stored.into_content())
}

/// Soft-deletes a record.
pub async fn delete_record<T, S>(state: &AppState<S>, record: &T) -> RestResult<()>
where
    T: Entity,
    S: DocumentStore,
{
    state
        .storage()
        .soft_delete(T::COLLECTION, record.id())
        .await?;
    Ok(())
}
