//! DocumentStore implementation for SQLite.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use serde_json::{Map, Value};
use tracing::debug;

use crate::core::DocumentStore;
use crate::error::{ResourceError, StorageError, StorageResult};
use crate::types::{Filter, FindOptions, StoredDocument, UniqueField};

use super::SqliteBackend;
use super::backend::{BACKEND_NAME, internal_error, serialization_error};
use super::query_builder::{QueryBuilder, SqlParam};

const ID_FIELD: &str = "id";
const CREATED_AT_FIELD: &str = "createdAt";

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn not_found(collection: &str, id: &str) -> StorageError {
    StorageError::Resource(ResourceError::NotFound {
        collection: collection.to_string(),
        id: id.to_string(),
    })
}

fn as_object(content: &mut Value) -> StorageResult<&mut Map<String, Value>> {
    content
        .as_object_mut()
        .ok_or_else(|| serialization_error("document content must be a JSON object".to_string()))
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn row_to_document(
    collection: &str,
    id: String,
    data: &str,
    deleted: bool,
    created_at: &str,
) -> StorageResult<StoredDocument> {
    let content: Value = serde_json::from_str(data)
        .map_err(|e| serialization_error(format!("Failed to deserialize document: {}", e)))?;
    let created_at = parse_timestamp(created_at)
        .ok_or_else(|| serialization_error(format!("Invalid created_at: {}", created_at)))?;
    Ok(StoredDocument::new(collection, id, content, deleted, created_at))
}

/// Reads one row by id on an already-held connection.
fn load(conn: &Connection, collection: &str, id: &str) -> StorageResult<Option<StoredDocument>> {
    let row = conn
        .query_row(
            "SELECT data, deleted, created_at FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()
        .map_err(|e| internal_error(format!("Failed to read document: {}", e)))?;

    row.map(|(data, deleted, created_at)| {
        row_to_document(collection, id.to_string(), &data, deleted != 0, &created_at)
    })
    .transpose()
}

/// Keeps only the selected top-level fields plus `id`.
fn project(content: Value, fields: &[String]) -> Value {
    match content {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| key == ID_FIELD || fields.iter().any(|f| f == key))
                .collect(),
        ),
        other => other,
    }
}

#[async_trait]
impl DocumentStore for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn insert(&self, collection: &str, content: Value) -> StorageResult<StoredDocument> {
        let conn = self.get_connection()?;
        let now = Utc::now();
        let mut content = content;

        let (id, created_at) = {
            let obj = as_object(&mut content)?;

            let id = obj
                .get(ID_FIELD)
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

            let created_at = match obj
                .get(CREATED_AT_FIELD)
                .and_then(Value::as_str)
                .and_then(parse_timestamp)
            {
                Some(ts) => ts,
                None => now,
            };

            obj.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            obj.insert(Filter::DELETED_FIELD.to_string(), Value::Bool(false));
            obj.insert(
                CREATED_AT_FIELD.to_string(),
                Value::String(format_timestamp(created_at)),
            );
            (id, created_at)
        };

        if load(&conn, collection, &id)?.is_some() {
            return Err(StorageError::Resource(ResourceError::AlreadyExists {
                collection: collection.to_string(),
                id,
            }));
        }

        let data = serde_json::to_string(&content)
            .map_err(|e| serialization_error(format!("Failed to serialize document: {}", e)))?;

        conn.execute(
            "INSERT INTO documents (collection, id, data, deleted, created_at, updated_at)
             VALUES (?1, ?2, ?3, 0, ?4, ?5)",
            params![
                collection,
                id,
                data,
                format_timestamp(created_at),
                format_timestamp(now)
            ],
        )
        .map_err(|e| self.write_error("Failed to insert document", e))?;

        debug!(collection, id = %id, "Inserted document");
        Ok(StoredDocument::new(collection, id, content, false, created_at))
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> StorageResult<Option<StoredDocument>> {
        let conn = self.get_connection()?;
        load(&conn, collection, id)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> StorageResult<Option<StoredDocument>> {
        let conn = self.get_connection()?;
        let mut builder = QueryBuilder::new();
        let where_clause = builder.where_clause(collection, filter);
        let sql = format!(
            "SELECT id, data, deleted, created_at FROM documents WHERE {} ORDER BY rowid LIMIT 1",
            where_clause
        );

        let row = conn
            .query_row(&sql, params_from_iter(builder.params()), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .optional()
            .map_err(|e| internal_error(format!("Failed to query document: {}", e)))?;

        row.map(|(id, data, deleted, created_at)| {
            row_to_document(collection, id, &data, deleted != 0, &created_at)
        })
        .transpose()
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StorageResult<Vec<Value>> {
        let conn = self.get_connection()?;
        let mut builder = QueryBuilder::new();
        let where_clause = builder.where_clause(collection, filter);
        let order_by = builder.order_by(&options.sort);
        let limit = builder.bind(SqlParam::Integer(options.limit.map_or(-1, to_i64)));
        let offset = builder.bind(SqlParam::Integer(to_i64(options.skip)));
        let sql = format!(
            "SELECT data FROM documents WHERE {} ORDER BY {} LIMIT {} OFFSET {}",
            where_clause, order_by, limit, offset
        );
        debug!(collection, sql = %sql, "Executing find");

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| internal_error(format!("Failed to prepare query: {}", e)))?;
        let rows = stmt
            .query_map(params_from_iter(builder.params()), |row| row.get::<_, String>(0))
            .map_err(|e| internal_error(format!("Failed to run query: {}", e)))?;

        let mut documents = Vec::new();
        for row in rows {
            let data = row.map_err(|e| internal_error(format!("Failed to read row: {}", e)))?;
            let content: Value = serde_json::from_str(&data).map_err(|e| {
                serialization_error(format!("Failed to deserialize document: {}", e))
            })?;
            documents.push(match &options.projection {
                Some(fields) => project(content, fields),
                None => content,
            });
        }

        Ok(documents)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StorageResult<u64> {
        let conn = self.get_connection()?;
        let mut builder = QueryBuilder::new();
        let where_clause = builder.where_clause(collection, filter);
        let sql = format!("SELECT COUNT(*) FROM documents WHERE {}", where_clause);

        let count: i64 = conn
            .query_row(&sql, params_from_iter(builder.params()), |row| row.get(0))
            .map_err(|e| internal_error(format!("Failed to count documents: {}", e)))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn replace(
        &self,
        collection: &str,
        id: &str,
        content: Value,
    ) -> StorageResult<StoredDocument> {
        let conn = self.get_connection()?;
        let existing = load(&conn, collection, id)?.ok_or_else(|| not_found(collection, id))?;

        let mut content = content;
        let deleted = {
            let obj = as_object(&mut content)?;
            let deleted = obj
                .get(Filter::DELETED_FIELD)
                .and_then(Value::as_bool)
                .unwrap_or(false);
            obj.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
            obj.insert(Filter::DELETED_FIELD.to_string(), Value::Bool(deleted));
            obj.insert(
                CREATED_AT_FIELD.to_string(),
                Value::String(format_timestamp(existing.created_at())),
            );
            deleted
        };

        let data = serde_json::to_string(&content)
            .map_err(|e| serialization_error(format!("Failed to serialize document: {}", e)))?;

        let updated = conn
            .execute(
                "UPDATE documents SET data = ?1, deleted = ?2, updated_at = ?3
                 WHERE collection = ?4 AND id = ?5",
                params![
                    data,
                    i64::from(deleted),
                    format_timestamp(Utc::now()),
                    collection,
                    id
                ],
            )
            .map_err(|e| self.write_error("Failed to update document", e))?;

        if updated == 0 {
            return Err(not_found(collection, id));
        }

        debug!(collection, id, "Replaced document");
        Ok(StoredDocument::new(
            collection,
            id,
            content,
            deleted,
            existing.created_at(),
        ))
    }

    async fn ensure_unique(&self, unique: &UniqueField) -> StorageResult<()> {
        self.register_unique(unique)
    }

    async fn soft_delete(&self, collection: &str, id: &str) -> StorageResult<()> {
        let conn = self.get_connection()?;
        let existing = load(&conn, collection, id)?.ok_or_else(|| not_found(collection, id))?;

        let mut content = existing.into_content();
        as_object(&mut content)?.insert(Filter::DELETED_FIELD.to_string(), Value::Bool(true));
        let data = serde_json::to_string(&content)
            .map_err(|e| serialization_error(format!("Failed to serialize document: {}", e)))?;

        conn.execute(
            "UPDATE documents SET data = ?1, deleted = 1, updated_at = ?2
             WHERE collection = ?3 AND id = ?4",
            params![data, format_timestamp(Utc::now()), collection, id],
        )
        .map_err(|e| self.write_error("Failed to delete document", e))?;

        debug!(collection, id, "Soft-deleted document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_keeps_id() {
        let doc = json!({"id": "1", "name": "A", "housing": true});
        let projected = project(doc, &["name".to_string()]);
        assert_eq!(projected, json!({"id": "1", "name": "A"}));
    }

    #[test]
    fn test_timestamp_round_trip_is_millisecond_precise() {
        let formatted = format_timestamp(Utc::now());
        assert!(formatted.ends_with('Z'));
        assert!(parse_timestamp(&formatted).is_some());
    }
}
