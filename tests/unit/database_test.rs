//! Unit tests for the qrkit persistence layer (SQLite connection, migrations,
//! and the in-memory store).

use qrkit::database::migrations::{self, CURRENT_SCHEMA_VERSION};
use qrkit::database::{Database, KeyValueStore, MemoryStore};
use qrkit::types::errors::StorageError;

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_kv_table() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let exists: bool = db
        .connection()
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='kv_store'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(false);
    assert!(exists, "Table 'kv_store' should exist after migrations");
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    assert_eq!(
        migrations::get_schema_version(db.connection()),
        CURRENT_SCHEMA_VERSION
    );
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let result = migrations::run_all(db.connection());
    assert!(result.is_ok(), "Running migrations twice should succeed (idempotent)");
    assert_eq!(
        migrations::get_schema_version(db.connection()),
        CURRENT_SCHEMA_VERSION
    );
}

#[test]
fn test_get_missing_key_is_none() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    assert_eq!(db.get("absent").unwrap(), None);
}

#[test]
fn test_set_get_overwrite_remove() {
    let db = Database::open_in_memory().expect("open_in_memory failed");

    db.set("k", "one").unwrap();
    assert_eq!(db.get("k").unwrap().as_deref(), Some("one"));

    db.set("k", "two").unwrap();
    assert_eq!(db.get("k").unwrap().as_deref(), Some("two"));

    let rows: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1, "overwriting a key must not add a row");

    db.remove("k").unwrap();
    assert_eq!(db.get("k").unwrap(), None);

    // Removing a missing key is not an error.
    db.remove("k").unwrap();
}

#[test]
fn test_values_are_stored_verbatim() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let value = "[{\"text\":\"línea 1\\nlínea 2 'quoted' 😀\"}]";
    db.set("qrHistory", value).unwrap();
    assert_eq!(db.get("qrHistory").unwrap().as_deref(), Some(value));
}

#[test]
fn test_open_file_database_persists() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let db_path = dir.path().join("test.db");

    {
        let db = Database::open(&db_path).expect("open failed");
        db.set("persist", "yes").unwrap();
    }

    assert!(db_path.exists(), "database file should be created");
    let db = Database::open(&db_path).expect("reopen failed");
    assert_eq!(db.get("persist").unwrap().as_deref(), Some("yes"));
    assert_eq!(
        migrations::get_schema_version(db.connection()),
        CURRENT_SCHEMA_VERSION
    );
}

#[test]
fn test_memory_store_basic_operations() {
    let store = MemoryStore::new();
    assert_eq!(store.get("a").unwrap(), None);

    store.set("a", "1").unwrap();
    store.set("b", "22").unwrap();
    assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    assert_eq!(store.used_bytes(), 2 + 3);

    store.remove("a").unwrap();
    assert_eq!(store.get("a").unwrap(), None);
    assert_eq!(store.used_bytes(), 3);
}

#[test]
fn test_memory_store_quota_counts_other_keys() {
    let store = MemoryStore::with_quota(10);
    store.set("a", "1234").unwrap();

    let err = store.set("b", "12345").unwrap_err();
    assert_eq!(err, StorageError::QuotaExceeded { needed: 11, limit: 10 });
    assert_eq!(store.get("b").unwrap(), None);

    store.set("b", "1234").unwrap();
    assert_eq!(store.used_bytes(), 10);
}
