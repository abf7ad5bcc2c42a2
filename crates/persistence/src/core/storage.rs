//! The document store trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageResult;
use crate::types::{Filter, FindOptions, StoredDocument, UniqueField};

/// Storage for schema-flexible JSON documents grouped into collections.
///
/// Documents are never physically removed: [`DocumentStore::soft_delete`]
/// sets their `deleted` flag. Filters do not hide deleted documents on their
/// own; callers add a `deleted: false` clause (the query compiler always
/// does).
///
/// # Filter semantics
///
/// - A scalar clause matches by equality. If the stored field is an array, any
///   element may match.
/// - A list clause matches if the field equals any listed value.
/// - A nested clause holds `$gt`, `$gte`, `$lt`, `$lte` or `$in` operators
///   applied to the field, and/or sub-field names addressing a nested
///   document. Dotted field names (`location.city`) address sub-fields too.
/// - Range operators only compare values of the same kind (numbers with
///   numbers, strings with strings).
///
/// # Example
///
/// ```ignore
/// use devcamper_persistence::{DocumentStore, Filter, FindOptions, SortDirective};
///
/// async fn cheapest<S: DocumentStore>(store: &S) -> StorageResult<Vec<Value>> {
///     let filter = Filter::live().with("housing", true);
///     let options = FindOptions::new()
///         .sort(vec![SortDirective::asc("averageCost")])
///         .limit(5);
///     store.find("bootcamps", &filter, &options).await
/// }
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Inserts a new document.
    ///
    /// An `id` is generated unless the content carries one; `createdAt` is
    /// set to now unless present; `deleted` is always reset to `false`.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(AlreadyExists)` - the id is taken
    /// * `StorageError::Resource(Duplicate)` - a unique field value is taken
    async fn insert(&self, collection: &str, content: Value) -> StorageResult<StoredDocument>;

    /// Reads a document by id, including soft-deleted ones.
    async fn find_by_id(&self, collection: &str, id: &str)
    -> StorageResult<Option<StoredDocument>>;

    /// Returns the first document matching the filter, in insertion order.
    async fn find_one(&self, collection: &str, filter: &Filter)
    -> StorageResult<Option<StoredDocument>>;

    /// Returns matching documents with sort, skip, limit and projection
    /// applied.
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StorageResult<Vec<Value>>;

    /// Counts matching documents.
    async fn count(&self, collection: &str, filter: &Filter) -> StorageResult<u64>;

    /// Replaces the content of an existing document.
    ///
    /// The stored id is kept. The `deleted` flag follows the new content.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(NotFound)` - no document has this id
    /// * `StorageError::Resource(Duplicate)` - a unique field value is taken
    async fn replace(
        &self,
        collection: &str,
        id: &str,
        content: Value,
    ) -> StorageResult<StoredDocument>;

    /// Enforces distinct values for a field from now on.
    ///
    /// Calling it again for the same field is a no-op. The check is atomic
    /// with the write, so concurrent inserts cannot both succeed.
    ///
    /// # Errors
    ///
    /// * `StorageError::Backend(MigrationError)` - the names are not plain
    ///   identifiers, or stored documents already share a value
    async fn ensure_unique(&self, unique: &UniqueField) -> StorageResult<()>;

    /// Marks a document as deleted.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(NotFound)` - no document has this id
    async fn soft_delete(&self, collection: &str, id: &str) -> StorageResult<()>;

    /// Returns true if any document matches the filter.
    async fn exists(&self, collection: &str, filter: &Filter) -> StorageResult<bool> {
        Ok(self.find_one(collection, filter).await?.is_some())
    }
}
