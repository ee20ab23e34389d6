//! App Core for qrkit.
//!
//! Owns the history database, settings, clock and generator, and exposes the
//! command-level operations the front ends dispatch to.

use std::fs;
use std::path::{Path, PathBuf};

use crate::database::connection::Database;
use crate::managers::history_store::{HistoryStore, HistoryStoreTrait};
use crate::platform;
use crate::services::clock::{Clock, MonotonicClock};
use crate::services::exporter::{self, ClipboardSink, CopyOutcome};
use crate::services::qr_generator::{GeneratedQr, QrGenerator, QrGeneratorTrait};
use crate::services::qr_renderer::QrCodeRenderer;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::errors::{ExportError, HistoryError, RenderError};
use crate::types::history::{HistoryRecord, SaveOutcome};
use crate::types::qr::RenderOptions;

/// Central application struct.
///
/// `HistoryStore` is created on demand via [`App::history`] because it
/// borrows the database with a lifetime parameter.
pub struct App {
    pub db: Database,
    pub settings_engine: SettingsEngine,
    pub generator: QrGenerator<QrCodeRenderer>,
    clock: Box<dyn Clock>,
}

impl App {
    /// Creates a new App with the system clock.
    ///
    /// `settings_path` overrides the config file location; `db_path`
    /// overrides both the configured and the default database location.
    pub fn new(
        settings_path: Option<String>,
        db_path: Option<PathBuf>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_clock(settings_path, db_path, Box::new(MonotonicClock::new()))
    }

    pub fn with_clock(
        settings_path: Option<String>,
        db_path: Option<PathBuf>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine = SettingsEngine::new(settings_path);
        if let Err(e) = settings_engine.load() {
            tracing::warn!(
                error = %e,
                path = settings_engine.get_config_path(),
                "failed to load settings; using defaults"
            );
        }
        let settings = settings_engine.get_settings().clone();

        let db_path = db_path
            .or_else(|| settings.storage.database_path.as_ref().map(PathBuf::from))
            .unwrap_or_else(platform::default_database_path);
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let db = Database::open(&db_path)?;

        let generator = QrGenerator::with_max_chars(QrCodeRenderer::new(), settings.input.max_chars);

        tracing::info!(db = %db_path.display(), "qrkit ready");
        Ok(Self {
            db,
            settings_engine,
            generator,
            clock,
        })
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// History store over this app's database, using the configured policy.
    pub fn history(&self) -> HistoryStore<'_, Database> {
        let policy = self.settings_engine.get_settings().history.policy();
        HistoryStore::with_policy(&self.db, policy)
    }

    /// Render options from the configured defaults.
    pub fn default_render_options(&self) -> Result<RenderOptions, RenderError> {
        self.settings_engine.get_settings().render.to_options()
    }

    pub fn generate(&mut self, text: &str, options: RenderOptions) -> Result<&GeneratedQr, RenderError> {
        let now = self.clock.now_ms();
        self.generator
            .set_max_chars(self.settings_engine.get_settings().input.max_chars);
        self.generator.generate(text, options, now)
    }

    /// Records the current QR code in history.
    ///
    /// Returns the outcome and the id the record was (or would have been)
    /// saved under.
    pub fn save_to_history(&mut self) -> Result<(SaveOutcome, i64), HistoryError> {
        let now = self.clock.now_ms();
        let record = self.generator.record_for_history(now)?;
        let id = record.id;
        let outcome = self.history().save(record)?;
        Ok((outcome, id))
    }

    pub fn find_history(&self, id: &str) -> Result<HistoryRecord, HistoryError> {
        self.history()
            .find_by_id(id)
            .ok_or_else(|| HistoryError::NotFound(id.to_string()))
    }

    /// Regenerates a history entry's text at its stored size, with the
    /// configured colors and error-correction level.
    pub fn load_from_history(&mut self, id: &str) -> Result<&GeneratedQr, String> {
        let record = self.find_history(id).map_err(|e| e.to_string())?;
        let mut options = self.default_render_options().map_err(|e| e.to_string())?;
        options.size = record.size;
        self.generate(&record.text, options).map_err(|e| e.to_string())
    }

    /// Writes the current QR code as PNG into `dir`, or the configured
    /// download directory, or the working directory.
    pub fn download(&self, dir: Option<&Path>) -> Result<PathBuf, ExportError> {
        let qr = self.generator.current().ok_or(ExportError::NothingGenerated)?;
        let configured = self
            .settings_engine
            .get_settings()
            .export
            .download_dir
            .as_ref()
            .map(PathBuf::from);
        let target = dir
            .map(Path::to_path_buf)
            .or(configured)
            .unwrap_or_else(|| PathBuf::from("."));
        exporter::download(&qr.image, &target, self.clock.now_ms())
    }

    pub fn copy(&self, sink: &mut dyn ClipboardSink) -> Result<CopyOutcome, ExportError> {
        let qr = self.generator.current().ok_or(ExportError::NothingGenerated)?;
        exporter::copy_to_clipboard(&qr.image, sink)
    }
}
