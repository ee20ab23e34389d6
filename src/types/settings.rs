use serde::{Deserialize, Serialize};

use super::errors::RenderError;
use super::history::{HistoryPolicy, DUPLICATE_WINDOW_MS, MAX_HISTORY_ITEMS};
use super::qr::{ErrorCorrectionLevel, RenderOptions, Rgb, MAX_CHARS};

/// Top-level qrkit settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct QrkitSettings {
    pub render: RenderSettings,
    pub input: InputSettings,
    pub history: HistorySettings,
    pub storage: StorageSettings,
    pub export: ExportSettings,
}

/// Defaults applied when a generate request leaves options unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderSettings {
    pub size: u32,
    pub foreground: String,
    pub background: String,
    pub error_correction: ErrorCorrectionLevel,
    pub quiet_zone: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            size: 256,
            foreground: "#000000".to_string(),
            background: "#ffffff".to_string(),
            error_correction: ErrorCorrectionLevel::M,
            quiet_zone: 10,
        }
    }
}

impl RenderSettings {
    /// Converts the stored defaults into render options, validating colors
    /// and dimensions.
    pub fn to_options(&self) -> Result<RenderOptions, RenderError> {
        let options = RenderOptions {
            size: self.size,
            foreground: Rgb::parse(&self.foreground)?,
            background: Rgb::parse(&self.background)?,
            error_correction: self.error_correction,
            quiet_zone: self.quiet_zone,
        };
        options.validate()?;
        Ok(options)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputSettings {
    pub max_chars: usize,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            max_chars: MAX_CHARS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistorySettings {
    pub max_items: usize,
    pub duplicate_window_ms: i64,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_items: MAX_HISTORY_ITEMS,
            duplicate_window_ms: DUPLICATE_WINDOW_MS,
        }
    }
}

impl HistorySettings {
    pub fn policy(&self) -> HistoryPolicy {
        HistoryPolicy {
            max_items: self.max_items,
            duplicate_window_ms: self.duplicate_window_ms,
        }
    }
}

/// Where the history database lives. `None` means the platform data dir.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StorageSettings {
    pub database_path: Option<String>,
}

/// Where downloaded PNGs go. `None` means the current directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ExportSettings {
    pub download_dir: Option<String>,
}
