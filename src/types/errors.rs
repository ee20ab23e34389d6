use std::fmt;

// === ValidationError ===

/// Errors raised when user input cannot be turned into a QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The input is empty or whitespace only.
    Empty,
    /// The input exceeds the configured character limit.
    TooLong { len: usize, max: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty => write!(f, "Text cannot be empty"),
            ValidationError::TooLong { len, max } => {
                write!(f, "Text too long ({}/{})", len, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

// === StorageError ===

/// Errors reported by a key-value persistence backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The write would exceed the backend's storage quota.
    QuotaExceeded { needed: usize, limit: usize },
    /// The backend itself failed (I/O, SQLite, poisoned lock).
    Backend(String),
    /// The value could not be serialized for storage.
    Serialization(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::QuotaExceeded { needed, limit } => write!(
                f,
                "Storage quota exceeded: {} bytes needed, limit is {}",
                needed, limit
            ),
            StorageError::Backend(msg) => write!(f, "Storage backend error: {}", msg),
            StorageError::Serialization(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

// === HistoryError ===

/// Errors related to QR history operations.
#[derive(Debug)]
pub enum HistoryError {
    /// History entry with the given ID was not found.
    NotFound(String),
    /// There is no generated QR code to record.
    NothingGenerated,
    /// Persisting the history failed.
    Storage(String),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::NotFound(id) => write!(f, "History entry not found: {}", id),
            HistoryError::NothingGenerated => write!(f, "No QR code to save"),
            HistoryError::Storage(msg) => write!(f, "History storage error: {}", msg),
        }
    }
}

impl std::error::Error for HistoryError {}

impl From<StorageError> for HistoryError {
    fn from(err: StorageError) -> Self {
        HistoryError::Storage(err.to_string())
    }
}

// === RenderError ===

/// Errors related to QR code rendering.
#[derive(Debug)]
pub enum RenderError {
    /// The input failed validation before rendering.
    Validation(ValidationError),
    /// A color string could not be parsed.
    InvalidColor(String),
    /// Size or quiet zone out of the supported range.
    InvalidOptions(String),
    /// The data does not fit in a QR symbol at the chosen error-correction level.
    DataTooLong(String),
    /// The QR encoder rejected the input.
    Encoding(String),
    /// Rasterising or PNG encoding failed.
    Image(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Validation(err) => write!(f, "Invalid input: {}", err),
            RenderError::InvalidColor(color) => write!(f, "Invalid color: {}", color),
            RenderError::InvalidOptions(msg) => write!(f, "Invalid render options: {}", msg),
            RenderError::DataTooLong(msg) => write!(f, "Data too long for QR code: {}", msg),
            RenderError::Encoding(msg) => write!(f, "QR encoding failed: {}", msg),
            RenderError::Image(msg) => write!(f, "QR image error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RenderError {
    fn from(err: ValidationError) -> Self {
        RenderError::Validation(err)
    }
}

// === ExportError ===

/// Errors related to exporting a generated QR code.
#[derive(Debug)]
pub enum ExportError {
    /// There is no generated QR code to export.
    NothingGenerated,
    /// Writing the image file failed.
    Io(String),
    /// Neither the image nor the data-URL fallback reached the clipboard.
    Clipboard(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::NothingGenerated => write!(f, "No QR code to export"),
            ExportError::Io(msg) => write!(f, "Export I/O error: {}", msg),
            ExportError::Clipboard(msg) => write!(f, "Clipboard error: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
