//! SQLite schema definitions and migrations.

use rusqlite::Connection;
use tracing::info;

use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::UniqueField;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

fn migration_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::MigrationError { message })
}

/// Initialize the database schema.
pub fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        create_schema_v1(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
        info!(version = SCHEMA_VERSION, "Created SQLite schema");
    } else if current_version > SCHEMA_VERSION {
        return Err(migration_error(format!(
            "database schema version {} is newer than supported version {}",
            current_version, SCHEMA_VERSION
        )));
    }

    Ok(())
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> StorageResult<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| migration_error(format!("Failed to create schema_version table: {}", e)))?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> StorageResult<()> {
    conn.execute("DELETE FROM schema_version", [])
        .map_err(|e| migration_error(format!("Failed to clear schema_version: {}", e)))?;

    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])
        .map_err(|e| migration_error(format!("Failed to set schema_version: {}", e)))?;

    Ok(())
}

/// Create the initial schema (version 1).
fn create_schema_v1(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS documents (
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            data TEXT NOT NULL,
            deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (collection, id)
        );
        CREATE INDEX IF NOT EXISTS idx_documents_live
            ON documents (collection, deleted);",
    )
    .map_err(|e| migration_error(format!("Failed to create documents table: {}", e)))
}

/// Name of the partial unique index backing a unique field.
pub(crate) fn unique_index_name(unique: &UniqueField) -> String {
    format!("idx_unique__{}__{}", unique.collection, unique.field)
}

/// Creates the partial unique index backing a unique field.
///
/// Names are inlined into the DDL, so only plain identifiers are accepted.
/// Fails if existing documents already share a value.
pub(crate) fn create_unique_index(conn: &Connection, unique: &UniqueField) -> StorageResult<()> {
    if !unique.is_well_formed() {
        return Err(migration_error(format!(
            "unique field names must be plain identifiers: {}",
            unique
        )));
    }

    let live = if unique.live_only { " AND deleted = 0" } else { "" };
    let sql = format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {} ON documents (json_extract(data, '$.{}'))
         WHERE collection = '{}'{}",
        unique_index_name(unique),
        unique.field,
        unique.collection,
        live
    );
    conn.execute_batch(&sql)
        .map_err(|e| migration_error(format!("Failed to create unique index on {}: {}", unique, e)))
}
