//! Export of generated QR codes: PNG download and clipboard copy.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::errors::ExportError;
use crate::types::qr::RenderedQr;

/// Destination for clipboard copies.
pub trait ClipboardSink {
    fn set_image(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<(), String>;
    fn set_text(&mut self, text: &str) -> Result<(), String>;
}

/// What actually reached the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Image,
    /// The image copy failed and the PNG data URL was copied as text instead.
    DataUrl,
}

impl CopyOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyOutcome::Image => "image",
            CopyOutcome::DataUrl => "data_url",
        }
    }
}

/// File name used for downloads: `qr-code-<ms>.png`.
pub fn download_file_name(now: i64) -> String {
    format!("qr-code-{}.png", now)
}

/// Writes the PNG into `dir`, creating the directory if needed.
pub fn download(qr: &RenderedQr, dir: &Path, now: i64) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir).map_err(|e| {
        ExportError::Io(format!("Failed to create {}: {}", dir.display(), e))
    })?;
    let path = dir.join(download_file_name(now));
    fs::write(&path, &qr.png)
        .map_err(|e| ExportError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    tracing::info!(path = %path.display(), bytes = qr.png.len(), "saved QR image");
    Ok(path)
}

/// Copies the image, falling back to the data URL as text.
pub fn copy_to_clipboard(
    qr: &RenderedQr,
    sink: &mut dyn ClipboardSink,
) -> Result<CopyOutcome, ExportError> {
    let image_err = match sink.set_image(qr.width, qr.height, &qr.rgba) {
        Ok(()) => return Ok(CopyOutcome::Image),
        Err(e) => e,
    };
    tracing::warn!(error = %image_err, "image clipboard copy failed; trying data URL");

    match sink.set_text(&qr.data_url()) {
        Ok(()) => Ok(CopyOutcome::DataUrl),
        Err(text_err) => Err(ExportError::Clipboard(format!(
            "image: {}; text: {}",
            image_err, text_err
        ))),
    }
}

#[cfg(feature = "clipboard")]
pub use system::SystemClipboard;

#[cfg(feature = "clipboard")]
mod system {
    use arboard::{Clipboard, ImageData};
    use std::borrow::Cow;

    use super::ClipboardSink;

    /// The OS clipboard via `arboard`.
    pub struct SystemClipboard {
        inner: Clipboard,
    }

    impl SystemClipboard {
        pub fn new() -> Result<Self, String> {
            Clipboard::new()
                .map(|inner| Self { inner })
                .map_err(|e| e.to_string())
        }
    }

    impl ClipboardSink for SystemClipboard {
        fn set_image(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<(), String> {
            self.inner
                .set_image(ImageData {
                    width: width as usize,
                    height: height as usize,
                    bytes: Cow::Borrowed(rgba),
                })
                .map_err(|e| e.to_string())
        }

        fn set_text(&mut self, text: &str) -> Result<(), String> {
            self.inner.set_text(text).map_err(|e| e.to_string())
        }
    }
}
