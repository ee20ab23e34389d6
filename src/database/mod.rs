//! qrkit persistence layer.
//!
//! History is stored as one string value under one key, so every backend
//! only needs to implement [`KeyValueStore`]. Two backends ship:
//!
//! - [`Database`]: SQLite file (or in-memory) with versioned migrations.
//! - [`MemoryStore`]: process-local map with an optional byte quota.
//!
//! # Usage
//!
//! ```no_run
//! use qrkit::database::{Database, KeyValueStore};
//!
//! let db = Database::open("qrkit.db").expect("failed to open database");
//! db.set("greeting", "hello").expect("write failed");
//! assert_eq!(db.get("greeting").unwrap().as_deref(), Some("hello"));
//! ```

pub mod connection;
pub mod memory;
pub mod migrations;

pub use connection::Database;
pub use memory::MemoryStore;

use crate::types::errors::StorageError;

/// A string-valued key-value persistence capability.
///
/// Writes replace the whole value for a key; there is no partial update
/// and no isolation between independent handles to the same storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
