//! Unit tests for the HistoryStore public API.
//!
//! These tests exercise saving, duplicate suppression, eviction, lookup and
//! clearing through the `HistoryStoreTrait` interface, over both the
//! in-memory and the SQLite backends.

use qrkit::database::{Database, KeyValueStore, MemoryStore};
use qrkit::managers::history_store::{HistoryStore, HistoryStoreTrait};
use qrkit::types::content::ContentType;
use qrkit::types::errors::StorageError;
use qrkit::types::history::{HistoryPolicy, HistoryRecord, SaveOutcome, HISTORY_STORAGE_KEY};

fn record(text: &str, timestamp: i64) -> HistoryRecord {
    HistoryRecord::new(
        text,
        format!("data:image/png;base64,{}", timestamp),
        256,
        timestamp,
        Some(ContentType::Text),
    )
}

#[test]
fn test_load_on_empty_backend_returns_empty() {
    let backend = MemoryStore::new();
    let store = HistoryStore::new(&backend);
    assert!(store.load().is_empty());
}

#[test]
fn test_load_on_corrupt_blob_returns_empty() {
    let backend = MemoryStore::new();
    backend.set(HISTORY_STORAGE_KEY, "{not json").unwrap();
    let store = HistoryStore::new(&backend);
    assert!(store.load().is_empty());

    backend.set(HISTORY_STORAGE_KEY, r#"{"id":1}"#).unwrap();
    assert!(store.load().is_empty(), "an object instead of an array is corrupt");

    backend
        .set(HISTORY_STORAGE_KEY, r#"[{"id":1,"text":"a"}]"#)
        .unwrap();
    assert!(store.load().is_empty(), "records missing fields are corrupt");
}

#[test]
fn test_save_over_corrupt_blob_starts_fresh() {
    let backend = MemoryStore::new();
    backend.set(HISTORY_STORAGE_KEY, "garbage").unwrap();
    let mut store = HistoryStore::new(&backend);

    assert_eq!(store.save(record("fresh", 5)).unwrap(), SaveOutcome::Saved);
    let loaded = store.load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].text, "fresh");
}

/// Scenario: the same URL saved 29 s later is rejected and the original kept.
#[test]
fn test_duplicate_within_window_is_rejected() {
    let backend = MemoryStore::new();
    let mut store = HistoryStore::new(&backend);

    let first = store.save(record("https://example.com", 1000)).unwrap();
    assert_eq!(first, SaveOutcome::Saved);

    let second = store.save(record("https://example.com", 30000)).unwrap();
    assert_eq!(second, SaveOutcome::Duplicate);

    let loaded = store.load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].timestamp, 1000);
}

#[test]
fn test_rejected_duplicate_leaves_blob_unchanged() {
    let backend = MemoryStore::new();
    let mut store = HistoryStore::new(&backend);
    store.save(record("same", 1000)).unwrap();
    store.save(record("other", 2000)).unwrap();

    let before = backend.get(HISTORY_STORAGE_KEY).unwrap();
    store.save(record("same", 2500)).unwrap();
    let after = backend.get(HISTORY_STORAGE_KEY).unwrap();

    assert_eq!(before, after);
}

#[test]
fn test_same_text_after_window_is_saved_again() {
    let backend = MemoryStore::new();
    let mut store = HistoryStore::new(&backend);

    store.save(record("hello", 0)).unwrap();
    assert_eq!(store.save(record("hello", 59_999)).unwrap(), SaveOutcome::Duplicate);
    assert_eq!(store.save(record("hello", 60_000)).unwrap(), SaveOutcome::Saved);

    let loaded = store.load();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].timestamp, 60_000);
    assert_eq!(loaded[1].timestamp, 0);
}

#[test]
fn test_duplicate_check_is_exact_match() {
    let backend = MemoryStore::new();
    let mut store = HistoryStore::new(&backend);

    store.save(record("Hello", 1000)).unwrap();
    assert_eq!(store.save(record("hello", 1001)).unwrap(), SaveOutcome::Saved);
    assert_eq!(store.save(record("Hello ", 1002)).unwrap(), SaveOutcome::Saved);
    assert_eq!(store.load().len(), 3);
}

#[test]
fn test_is_duplicate_recent_uses_given_now() {
    let backend = MemoryStore::new();
    let mut store = HistoryStore::new(&backend);
    store.save(record("x", 10_000)).unwrap();

    assert!(store.is_duplicate_recent("x", 10_000));
    assert!(store.is_duplicate_recent("x", 69_999));
    assert!(!store.is_duplicate_recent("x", 70_000));
    assert!(!store.is_duplicate_recent("y", 10_001));
}

/// Scenario: 12 distinct texts then a 13th; the first-inserted is evicted.
#[test]
fn test_thirteenth_record_evicts_oldest() {
    let backend = MemoryStore::new();
    let mut store = HistoryStore::new(&backend);

    for i in 1..=12 {
        let text = format!("text-{}", i);
        let ts = if i == 1 { 1 } else { (i - 1) * 1000 };
        assert_eq!(store.save(record(&text, ts)).unwrap(), SaveOutcome::Saved);
    }
    assert_eq!(store.load().len(), 12);

    store.save(record("text-13", 12_000)).unwrap();

    let loaded = store.load();
    assert_eq!(loaded.len(), 12);
    assert_eq!(loaded[0].text, "text-13");
    assert_eq!(loaded[11].text, "text-2");
    assert!(loaded.iter().all(|r| r.timestamp != 1));
    assert!(loaded.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
}

#[test]
fn test_custom_policy_cap_and_window() {
    let backend = MemoryStore::new();
    let policy = HistoryPolicy {
        max_items: 2,
        duplicate_window_ms: 10,
    };
    let mut store = HistoryStore::with_policy(&backend, policy);

    store.save(record("a", 0)).unwrap();
    store.save(record("b", 1)).unwrap();
    store.save(record("a", 20)).unwrap();

    let texts: Vec<String> = store.load().into_iter().map(|r| r.text).collect();
    assert_eq!(texts, vec!["a", "b"]);
}

#[test]
fn test_round_trip_preserves_fields() {
    let backend = MemoryStore::new();
    let mut store = HistoryStore::new(&backend);
    let original = HistoryRecord::new(
        "WIFI:T:WPA;S:home;P:secret;;",
        "data:image/png;base64,iVBORw0KGgo=",
        512,
        1_700_000_000_123,
        Some(ContentType::WiFi),
    );

    store.save(original.clone()).unwrap();
    assert_eq!(store.load()[0], original);
}

#[test]
fn test_find_by_id_accepts_string_and_numeric_forms() {
    let backend = MemoryStore::new();
    let mut store = HistoryStore::new(&backend);
    store.save(record("one", 1_000)).unwrap();
    store.save(record("two", 2_000)).unwrap();

    assert_eq!(store.find_by_id("2000").unwrap().text, "two");
    assert_eq!(store.find_by_id("1000.0").unwrap().text, "one");
    assert!(store.find_by_id("3000").is_none());
    assert!(store.find_by_id("").is_none());
}

#[test]
fn test_find_by_id_in_string_encoded_blob() {
    let backend = MemoryStore::new();
    backend
        .set(
            HISTORY_STORAGE_KEY,
            r#"[{"id":"42","text":"legacy","dataURL":"data:,","size":"300","timestamp":42,"type":"📝 Texto"}]"#,
        )
        .unwrap();
    let store = HistoryStore::new(&backend);

    let found = store.find_by_id("42").unwrap();
    assert_eq!(found.text, "legacy");
    assert_eq!(found.size, 300);
    assert_eq!(found.content_type, Some(ContentType::Text));
}

#[test]
fn test_clear_empties_history() {
    let backend = MemoryStore::new();
    let mut store = HistoryStore::new(&backend);
    store.save(record("a", 1)).unwrap();
    store.save(record("b", 2)).unwrap();

    store.clear();

    assert!(store.load().is_empty());
    assert_eq!(backend.get(HISTORY_STORAGE_KEY).unwrap(), None);

    // Clearing an already-empty store is fine.
    store.clear();
    assert!(store.load().is_empty());
}

#[test]
fn test_quota_failure_is_reported_and_keeps_previous_blob() {
    let backend = MemoryStore::with_quota(400);
    let mut store = HistoryStore::new(&backend);
    store.save(record("small", 1)).unwrap();
    let before = backend.get(HISTORY_STORAGE_KEY).unwrap();

    let big = HistoryRecord::new("big", "x".repeat(1000), 256, 100_000, None);
    let err = store.save(big).unwrap_err();

    assert!(matches!(err, StorageError::QuotaExceeded { limit: 400, .. }));
    assert_eq!(backend.get(HISTORY_STORAGE_KEY).unwrap(), before);
    assert_eq!(store.load().len(), 1);
}

#[test]
fn test_sqlite_backend_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");

    {
        let db = Database::open(&path).unwrap();
        let mut store = HistoryStore::new(&db);
        store.save(record("persisted", 5_000)).unwrap();
    }

    let db = Database::open(&path).unwrap();
    let store = HistoryStore::new(&db);
    let loaded = store.load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].text, "persisted");
}

#[test]
fn test_extreme_stored_timestamp_does_not_break_save() {
    let backend = MemoryStore::new();
    backend
        .set(
            HISTORY_STORAGE_KEY,
            r#"[{"id":1,"text":"a","dataURL":"","size":1,"timestamp":-9223372036854775808}]"#,
        )
        .unwrap();
    let mut store = HistoryStore::new(&backend);
    assert_eq!(store.load().len(), 1);

    let outcome = store
        .save(HistoryRecord::new("a", "", 1, 1_700_000_000_000, None))
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Saved, "an ancient record is never recent");
    assert_eq!(store.load().len(), 2);
}

#[test]
fn test_is_duplicate_recent_with_extreme_now() {
    let backend = MemoryStore::new();
    let mut store = HistoryStore::new(&backend);
    store.save(record("a", i64::MAX)).unwrap();
    store.save(record("b", i64::MIN)).unwrap();

    assert!(!store.is_duplicate_recent("b", i64::MAX));
    assert!(store.is_duplicate_recent("a", i64::MAX));
    // A record stamped after `now` still counts as recent.
    assert!(store.is_duplicate_recent("a", i64::MIN));
}

#[test]
fn test_duplicate_ids_coexist() {
    let backend = MemoryStore::new();
    let mut store = HistoryStore::new(&backend);
    store.save(record("first", 7)).unwrap();
    store.save(record("second", 7)).unwrap();

    let loaded = store.load();
    assert_eq!(loaded.len(), 2);
    assert_eq!(store.find_by_id("7").unwrap().text, "second");
}
