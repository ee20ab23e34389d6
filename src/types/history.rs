use serde::{Deserialize, Deserializer, Serialize};

use super::content::ContentType;

/// Key under which the whole history collection is persisted.
pub const HISTORY_STORAGE_KEY: &str = "qrHistory";

/// Default number of records kept before the oldest are evicted.
pub const MAX_HISTORY_ITEMS: usize = 12;

/// Default window (ms) within which re-saving identical text is rejected.
pub const DUPLICATE_WINDOW_MS: i64 = 60_000;

/// A persisted snapshot of one successful QR generation.
///
/// Field names on the wire match the stored JSON layout exactly
/// (`id`, `text`, `dataURL`, `size`, `timestamp`, optional `type`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(deserialize_with = "lenient_i64")]
    pub id: i64,
    pub text: String,
    #[serde(rename = "dataURL")]
    pub data_url: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub size: u32,
    #[serde(deserialize_with = "lenient_i64")]
    pub timestamp: i64,
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_content_type"
    )]
    pub content_type: Option<ContentType>,
}

impl HistoryRecord {
    /// Builds a record whose `id` equals its creation `timestamp`.
    pub fn new(
        text: impl Into<String>,
        data_url: impl Into<String>,
        size: u32,
        timestamp: i64,
        content_type: Option<ContentType>,
    ) -> Self {
        Self {
            id: timestamp,
            text: text.into(),
            data_url: data_url.into(),
            size,
            timestamp,
            content_type,
        }
    }

    /// Loose id comparison: `"1700000000000"`, `"1700000000000.0"` and
    /// `1700000000000` all match the same record.
    pub fn matches_id(&self, id: &str) -> bool {
        let id = id.trim();
        if let Ok(n) = id.parse::<i64>() {
            return n == self.id;
        }
        if let Ok(f) = id.parse::<f64>() {
            return f.fract() == 0.0 && f == self.id as f64;
        }
        id == self.id.to_string()
    }
}

/// Result of a history save that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The record was prepended and the collection persisted.
    Saved,
    /// Identical text was saved too recently; nothing changed.
    Duplicate,
}

/// Capacity and duplicate-suppression limits for a history store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPolicy {
    pub max_items: usize,
    pub duplicate_window_ms: i64,
}

impl Default for HistoryPolicy {
    fn default() -> Self {
        Self {
            max_items: MAX_HISTORY_ITEMS,
            duplicate_window_ms: DUPLICATE_WINDOW_MS,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Float(f64),
    Str(String),
}

impl NumberOrString {
    fn into_i64(self) -> Option<i64> {
        match self {
            NumberOrString::Int(n) => Some(n),
            NumberOrString::Float(f) if f.fract() == 0.0 => Some(f as i64),
            NumberOrString::Float(_) => None,
            NumberOrString::Str(s) => s.trim().parse().ok(),
        }
    }
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    NumberOrString::deserialize(deserializer)?
        .into_i64()
        .ok_or_else(|| serde::de::Error::custom("expected an integer or numeric string"))
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let n = lenient_i64(deserializer)?;
    u32::try_from(n).map_err(|_| serde::de::Error::custom(format!("size out of range: {}", n)))
}

fn lenient_content_type<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ContentType>, D::Error> {
    let label: Option<String> = Option::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(ContentType::from_label))
}
