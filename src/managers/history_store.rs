//! History Store for qrkit.
//!
//! Implements `HistoryStoreTrait`: a bounded, newest-first, duplicate-suppressing
//! log of generated QR codes, persisted as one JSON array under
//! [`HISTORY_STORAGE_KEY`] in any [`KeyValueStore`].
//!
//! Every operation is a read-modify-write of the whole collection. Two
//! independent processes sharing one backend can therefore overwrite each
//! other's entries; the last writer wins.

use tracing::{debug, info, warn};

use crate::database::KeyValueStore;
use crate::types::errors::StorageError;
use crate::types::history::{HistoryPolicy, HistoryRecord, SaveOutcome, HISTORY_STORAGE_KEY};

/// Trait defining QR history operations.
pub trait HistoryStoreTrait {
    fn load(&self) -> Vec<HistoryRecord>;
    fn is_duplicate_recent(&self, text: &str, now: i64) -> bool;
    fn save(&mut self, record: HistoryRecord) -> Result<SaveOutcome, StorageError>;
    fn find_by_id(&self, id: &str) -> Option<HistoryRecord>;
    fn clear(&mut self);
}

/// History store backed by a borrowed key-value backend.
pub struct HistoryStore<'a, S: KeyValueStore + ?Sized> {
    backend: &'a S,
    policy: HistoryPolicy,
}

impl<'a, S: KeyValueStore + ?Sized> HistoryStore<'a, S> {
    /// Creates a store with the default policy (12 items, 60 s duplicate window).
    pub fn new(backend: &'a S) -> Self {
        Self::with_policy(backend, HistoryPolicy::default())
    }

    pub fn with_policy(backend: &'a S, policy: HistoryPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn policy(&self) -> HistoryPolicy {
        self.policy
    }

    /// Timestamps come from stored data, so the age saturates instead of
    /// overflowing.
    fn contains_recent(records: &[HistoryRecord], text: &str, now: i64, window_ms: i64) -> bool {
        records
            .iter()
            .any(|r| r.text == text && now.saturating_sub(r.timestamp) < window_ms)
    }
}

impl<'a, S: KeyValueStore + ?Sized> HistoryStoreTrait for HistoryStore<'a, S> {
    /// Reads the persisted collection, newest first.
    ///
    /// Missing, unreadable or malformed data all yield an empty history.
    fn load(&self) -> Vec<HistoryRecord> {
        let raw = match self.backend.get(HISTORY_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read history; treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<HistoryRecord>>(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "history data is corrupt; treating as empty");
                Vec::new()
            }
        }
    }

    /// True if a record with exactly this text was saved less than the
    /// duplicate window before `now`.
    fn is_duplicate_recent(&self, text: &str, now: i64) -> bool {
        Self::contains_recent(&self.load(), text, now, self.policy.duplicate_window_ms)
    }

    /// Prepends `record`, trims to the cap and persists the whole collection.
    ///
    /// A recent duplicate is reported as [`SaveOutcome::Duplicate`] without
    /// touching storage.
    fn save(&mut self, record: HistoryRecord) -> Result<SaveOutcome, StorageError> {
        let mut records = self.load();

        if Self::contains_recent(
            &records,
            &record.text,
            record.timestamp,
            self.policy.duplicate_window_ms,
        ) {
            debug!(id = record.id, "skipping recent duplicate history entry");
            return Ok(SaveOutcome::Duplicate);
        }

        let id = record.id;
        records.insert(0, record);
        records.truncate(self.policy.max_items);

        let json = serde_json::to_string(&records)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.backend.set(HISTORY_STORAGE_KEY, &json).map_err(|e| {
            warn!(error = %e, "failed to persist history");
            e
        })?;

        info!(id, count = records.len(), "saved history entry");
        Ok(SaveOutcome::Saved)
    }

    /// Linear lookup by id; numeric and string-encoded ids both match.
    fn find_by_id(&self, id: &str) -> Option<HistoryRecord> {
        self.load().into_iter().find(|r| r.matches_id(id))
    }

    /// Removes the whole collection. Backend failures are logged and ignored.
    fn clear(&mut self) {
        match self.backend.remove(HISTORY_STORAGE_KEY) {
            Ok(()) => info!("cleared history"),
            Err(e) => warn!(error = %e, "failed to clear history"),
        }
    }
}
