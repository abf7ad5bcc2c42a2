//! SQLite backend integration tests.
//!
//! These exercise the document store directly and through compiled queries.

use serde_json::{Value, json};

use devcamper_persistence::backends::sqlite::SqliteBackend;
use devcamper_persistence::error::{ResourceError, StorageError};
use devcamper_persistence::query::{CountMode, QueryCompiler, RawParameters};
use devcamper_persistence::{
    DocumentStore, Filter, FilterValue, FindOptions, SortDirective, UniqueField,
};

const BOOTCAMPS: &str = "bootcamps";

fn create_backend() -> SqliteBackend {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to initialize schema");
    backend
}

async fn seed(backend: &SqliteBackend) {
    let docs = [
        json!({"id": "b1", "name": "Devworks", "averageCost": 10000, "housing": true,
               "careers": ["Web Development", "UI/UX", "Business"],
               "location": {"city": "Boston", "state": "MA"},
               "createdAt": "2024-01-01T00:00:00.000Z"}),
        json!({"id": "b2", "name": "ModernTech", "averageCost": 8000, "housing": false,
               "careers": ["Web Development", "Data Science"],
               "location": {"city": "Boston", "state": "MA"},
               "createdAt": "2024-01-02T00:00:00.000Z"}),
        json!({"id": "b3", "name": "Codemasters", "averageCost": 12000, "housing": true,
               "careers": ["Mobile Development", "Business"],
               "location": {"city": "Kingston", "state": "RI"},
               "createdAt": "2024-01-03T00:00:00.000Z"}),
        json!({"id": "b4", "name": "Devcentral", "averageCost": 15000, "housing": false,
               "careers": ["UI/UX", "Other"],
               "location": {"city": "Providence", "state": "RI"},
               "createdAt": "2024-01-04T00:00:00.000Z"}),
    ];
    for doc in docs {
        backend.insert(BOOTCAMPS, doc).await.unwrap();
    }
}

fn ids(docs: &[Value]) -> Vec<&str> {
    docs.iter().map(|d| d["id"].as_str().unwrap()).collect()
}

fn params(pairs: &[(&str, &str)]) -> RawParameters {
    pairs.iter().copied().collect()
}

async fn run(backend: &SqliteBackend, pairs: &[(&str, &str)]) -> Vec<Value> {
    let compiled = QueryCompiler::new().compile(&params(pairs)).unwrap();
    backend
        .find(BOOTCAMPS, &compiled.filter, &compiled.find_options())
        .await
        .unwrap()
}

// ============================================================================
// Insert / Read Tests
// ============================================================================

#[tokio::test]
async fn test_insert_generates_id_and_metadata() {
    let backend = create_backend();

    let stored = backend
        .insert(BOOTCAMPS, json!({"name": "Devworks"}))
        .await
        .unwrap();

    assert!(!stored.id().is_empty());
    assert!(!stored.is_deleted());
    assert_eq!(stored.content()["id"], json!(stored.id()));
    assert_eq!(stored.content()["deleted"], json!(false));
    assert!(stored.content()["createdAt"].is_string());
}

#[tokio::test]
async fn test_insert_duplicate_fails() {
    let backend = create_backend();
    backend.insert(BOOTCAMPS, json!({"id": "dup"})).await.unwrap();

    let result = backend.insert(BOOTCAMPS, json!({"id": "dup"})).await;
    assert!(matches!(
        result,
        Err(StorageError::Resource(ResourceError::AlreadyExists { .. }))
    ));
}

#[tokio::test]
async fn test_unique_field_rejects_duplicate_insert() {
    let backend = create_backend();
    backend.ensure_unique(&UniqueField::live(BOOTCAMPS, "name")).await.unwrap();

    backend.insert(BOOTCAMPS, json!({"name": "Devworks"})).await.unwrap();
    let result = backend.insert(BOOTCAMPS, json!({"name": "Devworks"})).await;
    match result {
        Err(StorageError::Resource(ResourceError::Duplicate { collection, field })) => {
            assert_eq!(collection, BOOTCAMPS);
            assert_eq!(field, "name");
        }
        other => panic!("expected duplicate error, got {:?}", other),
    }

    // Other collections and documents without the field are unaffected.
    backend.insert("courses", json!({"name": "Devworks"})).await.unwrap();
    backend.insert(BOOTCAMPS, json!({"title": "untitled"})).await.unwrap();
    backend.insert(BOOTCAMPS, json!({"title": "untitled"})).await.unwrap();
    assert_eq!(backend.count(BOOTCAMPS, &Filter::new()).await.unwrap(), 3);
}

#[tokio::test]
async fn test_unique_field_rejects_duplicate_replace() {
    let backend = create_backend();
    backend.ensure_unique(&UniqueField::new("users", "email")).await.unwrap();

    backend.insert("users", json!({"id": "u1", "email": "a@x.io"})).await.unwrap();
    backend.insert("users", json!({"id": "u2", "email": "b@x.io"})).await.unwrap();

    let result = backend.replace("users", "u2", json!({"email": "a@x.io"})).await;
    assert!(matches!(
        result,
        Err(StorageError::Resource(ResourceError::Duplicate { .. }))
    ));

    let stored = backend.find_by_id("users", "u2").await.unwrap().unwrap();
    assert_eq!(stored.content()["email"], json!("b@x.io"));

    // Rewriting a document with its own value is fine.
    backend.replace("users", "u1", json!({"email": "a@x.io", "name": "A"})).await.unwrap();
}

#[tokio::test]
async fn test_live_unique_field_ignores_deleted() {
    let backend = create_backend();
    backend.ensure_unique(&UniqueField::live(BOOTCAMPS, "name")).await.unwrap();
    backend.ensure_unique(&UniqueField::new("users", "email")).await.unwrap();

    let first = backend.insert(BOOTCAMPS, json!({"name": "Devworks"})).await.unwrap();
    backend.soft_delete(BOOTCAMPS, first.id()).await.unwrap();
    backend.insert(BOOTCAMPS, json!({"name": "Devworks"})).await.unwrap();

    let user = backend.insert("users", json!({"email": "a@x.io"})).await.unwrap();
    backend.soft_delete("users", user.id()).await.unwrap();
    let result = backend.insert("users", json!({"email": "a@x.io"})).await;
    assert!(matches!(
        result,
        Err(StorageError::Resource(ResourceError::Duplicate { .. }))
    ));
}

#[tokio::test]
async fn test_ensure_unique_is_idempotent_and_checks_names() {
    let backend = create_backend();
    let name = UniqueField::live(BOOTCAMPS, "name");
    backend.ensure_unique(&name).await.unwrap();
    backend.ensure_unique(&name).await.unwrap();

    let hostile = UniqueField::new(BOOTCAMPS, "name'); DROP TABLE documents; --");
    assert!(backend.ensure_unique(&hostile).await.is_err());
    assert_eq!(backend.count(BOOTCAMPS, &Filter::new()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_ensure_unique_fails_on_existing_duplicates() {
    let backend = create_backend();
    backend.insert(BOOTCAMPS, json!({"name": "Devworks"})).await.unwrap();
    backend.insert(BOOTCAMPS, json!({"name": "Devworks"})).await.unwrap();

    assert!(backend.ensure_unique(&UniqueField::live(BOOTCAMPS, "name")).await.is_err());
}

#[tokio::test]
async fn test_same_id_in_different_collections() {
    let backend = create_backend();
    backend.insert("bootcamps", json!({"id": "x"})).await.unwrap();
    backend.insert("courses", json!({"id": "x"})).await.unwrap();

    assert_eq!(backend.count("bootcamps", &Filter::new()).await.unwrap(), 1);
    assert_eq!(backend.count("courses", &Filter::new()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_insert_rejects_non_object() {
    let backend = create_backend();
    let result = backend.insert(BOOTCAMPS, json!([1, 2, 3])).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_find_by_id_missing() {
    let backend = create_backend();
    assert!(backend.find_by_id(BOOTCAMPS, "nope").await.unwrap().is_none());
}

// ============================================================================
// Replace / Delete Tests
// ============================================================================

#[tokio::test]
async fn test_replace_keeps_id_and_created_at() {
    let backend = create_backend();
    let stored = backend
        .insert(BOOTCAMPS, json!({"id": "b1", "name": "Old", "createdAt": "2024-01-01T00:00:00.000Z"}))
        .await
        .unwrap();

    let replaced = backend
        .replace(BOOTCAMPS, "b1", json!({"id": "other", "name": "New"}))
        .await
        .unwrap();

    assert_eq!(replaced.id(), "b1");
    assert_eq!(replaced.content()["name"], "New");
    assert_eq!(replaced.created_at(), stored.created_at());
    assert_eq!(replaced.content()["createdAt"], "2024-01-01T00:00:00.000Z");
}

#[tokio::test]
async fn test_replace_missing_fails() {
    let backend = create_backend();
    let result = backend.replace(BOOTCAMPS, "missing", json!({})).await;
    assert!(matches!(
        result,
        Err(StorageError::Resource(ResourceError::NotFound { .. }))
    ));
}

#[tokio::test]
async fn test_soft_delete_hides_from_live_queries() {
    let backend = create_backend();
    seed(&backend).await;

    backend.soft_delete(BOOTCAMPS, "b2").await.unwrap();

    let still_there = backend.find_by_id(BOOTCAMPS, "b2").await.unwrap().unwrap();
    assert!(still_there.is_deleted());
    assert_eq!(still_there.content()["deleted"], json!(true));

    assert_eq!(backend.count(BOOTCAMPS, &Filter::live()).await.unwrap(), 3);
    assert_eq!(backend.count(BOOTCAMPS, &Filter::new()).await.unwrap(), 4);

    let docs = run(&backend, &[]).await;
    assert!(!ids(&docs).contains(&"b2"));
}

#[tokio::test]
async fn test_soft_delete_missing_fails() {
    let backend = create_backend();
    assert!(backend.soft_delete(BOOTCAMPS, "missing").await.is_err());
}

// ============================================================================
// Filter Tests
// ============================================================================

#[tokio::test]
async fn test_equality_filter() {
    let backend = create_backend();
    seed(&backend).await;

    let docs = run(&backend, &[("housing", "true"), ("sort", "name")]).await;
    assert_eq!(ids(&docs), vec!["b3", "b1"]);
}

#[tokio::test]
async fn test_scalar_matches_array_element() {
    let backend = create_backend();
    seed(&backend).await;

    let docs = run(&backend, &[("careers", "Business"), ("sort", "name")]).await;
    assert_eq!(ids(&docs), vec!["b3", "b1"]);
}

#[tokio::test]
async fn test_range_operators() {
    let backend = create_backend();
    seed(&backend).await;

    let docs = run(&backend, &[("averageCost[lte]", "10000"), ("sort", "averageCost")]).await;
    assert_eq!(ids(&docs), vec!["b2", "b1"]);

    let docs = run(
        &backend,
        &[("averageCost[gt]", "8000"), ("averageCost[lt]", "15000"), ("sort", "averageCost")],
    )
    .await;
    assert_eq!(ids(&docs), vec!["b1", "b3"]);
}

#[tokio::test]
async fn test_range_does_not_compare_across_types() {
    let backend = create_backend();
    seed(&backend).await;

    let docs = run(&backend, &[("name[gt]", "5")]).await;
    assert!(docs.is_empty());
}

#[tokio::test]
async fn test_in_operator() {
    let backend = create_backend();
    seed(&backend).await;

    let docs = run(
        &backend,
        &[("careers[in]", "Data Science"), ("careers[in]", "Other"), ("sort", "name")],
    )
    .await;
    assert_eq!(ids(&docs), vec!["b4", "b2"]);

    let docs = run(&backend, &[("careers[in]", "Mobile Development")]).await;
    assert_eq!(ids(&docs), vec!["b3"]);
}

#[tokio::test]
async fn test_nested_field_filter() {
    let backend = create_backend();
    seed(&backend).await;

    let docs = run(&backend, &[("location[state]", "RI"), ("sort", "name")]).await;
    assert_eq!(ids(&docs), vec!["b3", "b4"]);

    let docs = run(&backend, &[("location.city", "Boston"), ("sort", "name")]).await;
    assert_eq!(ids(&docs), vec!["b1", "b2"]);
}

#[tokio::test]
async fn test_object_member_values_do_not_match_parent() {
    let backend = create_backend();
    seed(&backend).await;

    assert!(run(&backend, &[("location", "Boston")]).await.is_empty());
    assert!(run(&backend, &[("location[in]", "RI")]).await.is_empty());
    assert!(run(&backend, &[("location[gte]", "A")]).await.is_empty());

    let docs = run(&backend, &[("location[city]", "Boston"), ("sort", "name")]).await;
    assert_eq!(ids(&docs), vec!["b1", "b2"]);
}

#[tokio::test]
async fn test_unknown_field_matches_nothing() {
    let backend = create_backend();
    seed(&backend).await;

    assert!(run(&backend, &[("missing", "x")]).await.is_empty());
}

#[tokio::test]
async fn test_hostile_field_names_are_bound() {
    let backend = create_backend();
    seed(&backend).await;

    assert!(run(&backend, &[("name') OR 1=1 --", "x")]).await.is_empty());
    assert!(run(&backend, &[("na\"me", "x")]).await.is_empty());
    assert_eq!(backend.count(BOOTCAMPS, &Filter::new()).await.unwrap(), 4);
}

#[tokio::test]
async fn test_list_filter_value() {
    let backend = create_backend();
    seed(&backend).await;

    let filter = Filter::live().with(
        "name",
        FilterValue::List(vec!["Devworks".into(), "Devcentral".into()]),
    );
    assert_eq!(backend.count(BOOTCAMPS, &filter).await.unwrap(), 2);
}

#[tokio::test]
async fn test_find_one_and_exists() {
    let backend = create_backend();
    seed(&backend).await;

    let found = backend
        .find_one(BOOTCAMPS, &Filter::live().with("name", "Codemasters"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id(), "b3");

    assert!(backend.exists(BOOTCAMPS, &Filter::live().with("name", "Devworks")).await.unwrap());
    assert!(!backend.exists(BOOTCAMPS, &Filter::live().with("name", "Nobody")).await.unwrap());
}

// ============================================================================
// Sort / Page / Select Tests
// ============================================================================

#[tokio::test]
async fn test_default_sort_is_newest_first() {
    let backend = create_backend();
    seed(&backend).await;

    let docs = run(&backend, &[]).await;
    assert_eq!(ids(&docs), vec!["b4", "b3", "b2", "b1"]);
}

#[tokio::test]
async fn test_multi_key_sort() {
    let backend = create_backend();
    seed(&backend).await;

    let docs = run(&backend, &[("sort", "location.state,-averageCost")]).await;
    assert_eq!(ids(&docs), vec!["b1", "b2", "b4", "b3"]);
}

#[tokio::test]
async fn test_paging() {
    let backend = create_backend();
    seed(&backend).await;

    let compiled = QueryCompiler::new()
        .compile(&params(&[("page", "2"), ("limit", "3")]))
        .unwrap();
    let docs = backend
        .find(BOOTCAMPS, &compiled.filter, &compiled.find_options())
        .await
        .unwrap();
    assert_eq!(ids(&docs), vec!["b1"]);

    let total = backend
        .count(BOOTCAMPS, &compiled.count_filter(CountMode::LiveOnly))
        .await
        .unwrap();
    let pagination = compiled.paginate(total);
    assert!(pagination.next.is_none());
    assert_eq!(pagination.prev.map(|p| p.page), Some(1));
}

#[tokio::test]
async fn test_count_modes() {
    let backend = create_backend();
    seed(&backend).await;

    let compiled = QueryCompiler::new()
        .compile(&params(&[("housing", "true")]))
        .unwrap();

    let live = backend
        .count(BOOTCAMPS, &compiled.count_filter(CountMode::LiveOnly))
        .await
        .unwrap();
    let filtered = backend
        .count(BOOTCAMPS, &compiled.count_filter(CountMode::Filtered))
        .await
        .unwrap();
    assert_eq!(live, 4);
    assert_eq!(filtered, 2);
}

#[tokio::test]
async fn test_select_projection() {
    let backend = create_backend();
    seed(&backend).await;

    let docs = run(&backend, &[("select", "name,housing"), ("sort", "name"), ("limit", "1")]).await;
    assert_eq!(docs, vec![json!({"id": "b3", "name": "Codemasters", "housing": true})]);
}

#[tokio::test]
async fn test_skip_without_limit() {
    let backend = create_backend();
    seed(&backend).await;

    let options = FindOptions::new()
        .sort(vec![SortDirective::asc("averageCost")])
        .skip(2);
    let docs = backend.find(BOOTCAMPS, &Filter::live(), &options).await.unwrap();
    assert_eq!(ids(&docs), vec!["b3", "b4"]);
}

#[tokio::test]
async fn test_scoped_query() {
    let backend = create_backend();
    backend
        .insert("courses", json!({"id": "c1", "bootcamp": "b1", "tuition": 8000}))
        .await
        .unwrap();
    backend
        .insert("courses", json!({"id": "c2", "bootcamp": "b2", "tuition": 9000}))
        .await
        .unwrap();

    let compiled = QueryCompiler::new()
        .compile(&params(&[("tuition[gte]", "1000")]))
        .unwrap()
        .scoped("bootcamp", "b2");
    let docs = backend
        .find("courses", &compiled.filter, &compiled.find_options())
        .await
        .unwrap();
    assert_eq!(ids(&docs), vec!["c2"]);
}

#[tokio::test]
async fn test_file_backend_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devcamper.db");

    {
        let backend = SqliteBackend::open(&path).unwrap();
        backend.init_schema().unwrap();
        backend.insert(BOOTCAMPS, json!({"id": "keep"})).await.unwrap();
    }

    let backend = SqliteBackend::open(&path).unwrap();
    backend.init_schema().unwrap();
    assert!(backend.find_by_id(BOOTCAMPS, "keep").await.unwrap().is_some());
}
