// qrkit Settings Engine
// Loads, saves, updates and resets the generator settings.
// Settings are stored as a JSON file at the platform-specific config path.

use std::fs;
use std::io;
use std::path::Path;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::QrkitSettings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<QrkitSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &QrkitSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: QrkitSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses `settings.json` in the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => platform::get_config_dir()
                .join("settings.json")
                .to_string_lossy()
                .to_string(),
        };

        Self {
            config_path,
            settings: QrkitSettings::default(),
        }
    }

    /// Rejects settings the generator or history store cannot work with.
    fn validate(settings: &QrkitSettings) -> Result<(), SettingsError> {
        settings
            .render
            .to_options()
            .map_err(|e| SettingsError::InvalidValue(e.to_string()))?;
        if settings.input.max_chars == 0 {
            return Err(SettingsError::InvalidValue(
                "input.max_chars must be positive".to_string(),
            ));
        }
        if settings.history.max_items == 0 {
            return Err(SettingsError::InvalidValue(
                "history.max_items must be positive".to_string(),
            ));
        }
        if settings.history.duplicate_window_ms < 0 {
            return Err(SettingsError::InvalidValue(
                "history.duplicate_window_ms cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// A missing file yields defaults; a malformed one is an error.
    fn load(&mut self) -> Result<QrkitSettings, SettingsError> {
        let settings = match fs::read_to_string(&self.config_path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                SettingsError::SerializationError(format!("Malformed {}: {}", self.config_path, e))
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => QrkitSettings::default(),
            Err(e) => return Err(SettingsError::IoError(format!("{}: {}", self.config_path, e))),
        };
        Self::validate(&settings)?;

        tracing::debug!(path = %self.config_path, "loaded settings");
        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Writes the current settings as pretty JSON, creating the config
    /// directory on first save.
    fn save(&self) -> Result<(), SettingsError> {
        let io_err = |e: io::Error| SettingsError::IoError(format!("{}: {}", self.config_path, e));
        let json = serde_json::to_string_pretty(&self.settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;

        if let Some(dir) = Path::new(&self.config_path).parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        fs::write(&self.config_path, json).map_err(io_err)
    }

    fn get_settings(&self) -> &QrkitSettings {
        &self.settings
    }

    /// Replaces one leaf addressed by a dotted key such as `render.size`,
    /// then validates and persists the result.
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }
        let pointer: String = key
            .split('.')
            .map(|part| format!("/{}", part.replace('~', "~0").replace('/', "~1")))
            .collect();

        let mut tree = serde_json::to_value(&self.settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;
        // Only existing leaves are addressable; the walk stops at non-objects.
        let slot = tree
            .pointer_mut(&pointer)
            .ok_or_else(|| SettingsError::InvalidKey(format!("Key '{}' not found in settings", key)))?;
        *slot = value;

        let updated: QrkitSettings = serde_json::from_value(tree).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;
        Self::validate(&updated)?;

        self.settings = updated;
        self.save()?;
        tracing::info!(key, "updated setting");
        Ok(())
    }

    /// Resets all settings to factory defaults and saves to disk.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = QrkitSettings::default();
        self.save()?;
        Ok(())
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
