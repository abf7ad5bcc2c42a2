//! Stored document types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON document with persistence metadata.
///
/// The content always carries its own `id` and `deleted` fields; the metadata
/// here mirrors them so callers need not dig into the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    collection: String,
    id: String,
    content: Value,
    deleted: bool,
    created_at: DateTime<Utc>,
}

impl StoredDocument {
    /// Creates a stored document from its parts.
    pub fn new(
        collection: impl Into<String>,
        id: impl Into<String>,
        content: Value,
        deleted: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
            content,
            deleted,
            created_at,
        }
    }

    /// Returns the collection this document belongs to.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns the document ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the document content.
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Consumes this wrapper and returns the content.
    pub fn into_content(self) -> Value {
        self.content
    }

    /// Returns true if the document has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Returns when the document was first inserted.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
