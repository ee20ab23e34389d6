// qrkit platform paths
// Resolves per-user config and data directories via the `dirs` crate.
//
// - Linux:   $XDG_CONFIG_HOME/qrkit, $XDG_DATA_HOME/qrkit
// - macOS:   ~/Library/Application Support/qrkit
// - Windows: %APPDATA%\qrkit

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "qrkit";

/// Environment variable overriding the data directory (database, logs).
pub const DATA_DIR_ENV: &str = "QRKIT_DATA_DIR";

fn fallback_base() -> PathBuf {
    env::temp_dir()
}

/// Returns the platform-specific configuration directory for qrkit.
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(fallback_base)
        .join(APP_DIR)
}

/// Returns the data directory for qrkit, honouring `QRKIT_DATA_DIR`.
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::data_dir().unwrap_or_else(fallback_base).join(APP_DIR)
}

/// Default location of the history database.
pub fn default_database_path() -> PathBuf {
    get_data_dir().join("qrkit.db")
}
