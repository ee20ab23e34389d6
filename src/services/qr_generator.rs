//! QR Generator: the command-level controller.
//!
//! Validates and classifies input, renders it through a [`QrRenderer`], and
//! keeps the most recent successful result as the "current" QR code that
//! export and history commands act on.

use crate::services::content_classifier::classify;
use crate::services::qr_renderer::{validate_input, QrRenderer};
use crate::types::content::ContentType;
use crate::types::errors::{HistoryError, RenderError};
use crate::types::history::HistoryRecord;
use crate::types::qr::{RenderOptions, RenderedQr, MAX_CHARS};

/// A successfully generated QR code and the inputs that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQr {
    pub text: String,
    pub options: RenderOptions,
    pub content_type: ContentType,
    pub image: RenderedQr,
    pub generated_at: i64,
}

impl GeneratedQr {
    /// Snapshot of this code for the history log; `id` and `timestamp` are `now`.
    pub fn to_history_record(&self, now: i64) -> HistoryRecord {
        HistoryRecord::new(
            self.text.clone(),
            self.image.data_url(),
            self.options.size,
            now,
            Some(self.content_type),
        )
    }
}

/// Trait defining generator operations.
pub trait QrGeneratorTrait {
    fn generate(
        &mut self,
        text: &str,
        options: RenderOptions,
        now: i64,
    ) -> Result<&GeneratedQr, RenderError>;
    fn current(&self) -> Option<&GeneratedQr>;
    fn clear_current(&mut self);
    fn record_for_history(&self, now: i64) -> Result<HistoryRecord, HistoryError>;
}

pub struct QrGenerator<R: QrRenderer> {
    renderer: R,
    max_chars: usize,
    current: Option<GeneratedQr>,
}

impl<R: QrRenderer> QrGenerator<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_max_chars(renderer, MAX_CHARS)
    }

    pub fn with_max_chars(renderer: R, max_chars: usize) -> Self {
        Self {
            renderer,
            max_chars,
            current: None,
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn set_max_chars(&mut self, max_chars: usize) {
        self.max_chars = max_chars;
    }
}

impl<R: QrRenderer> QrGeneratorTrait for QrGenerator<R> {
    /// Validates, classifies and renders `text`.
    ///
    /// The previous code is replaced only when rendering succeeds.
    fn generate(
        &mut self,
        text: &str,
        options: RenderOptions,
        now: i64,
    ) -> Result<&GeneratedQr, RenderError> {
        validate_input(text, self.max_chars)?;
        let content_type = classify(text);
        let image = self.renderer.render(text, &options).map_err(|e| {
            tracing::warn!(error = %e, "QR generation failed");
            e
        })?;

        tracing::info!(
            length = text.chars().count(),
            kind = %content_type,
            size = options.size,
            "generated QR code"
        );

        Ok(&*self.current.insert(GeneratedQr {
            text: text.to_string(),
            options,
            content_type,
            image,
            generated_at: now,
        }))
    }

    fn current(&self) -> Option<&GeneratedQr> {
        self.current.as_ref()
    }

    fn clear_current(&mut self) {
        self.current = None;
    }

    fn record_for_history(&self, now: i64) -> Result<HistoryRecord, HistoryError> {
        self.current
            .as_ref()
            .map(|qr| qr.to_history_record(now))
            .ok_or(HistoryError::NothingGenerated)
    }
}
