//! QR rendering: input validation plus the `qrcode`/`image` backed renderer.

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, Rgba, RgbaImage};
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode};

use crate::types::errors::{RenderError, ValidationError};
use crate::types::qr::{ErrorCorrectionLevel, RenderOptions, RenderedQr, Rgb};

/// Rejects empty input and input longer than `max_chars` characters.
///
/// Length is measured on the trimmed text, in Unicode scalar values.
pub fn validate_input(text: &str, max_chars: usize) -> Result<(), ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    let len = trimmed.chars().count();
    if len > max_chars {
        return Err(ValidationError::TooLong { len, max: max_chars });
    }
    Ok(())
}

/// Trait for anything that can turn text into a QR image.
pub trait QrRenderer {
    fn render(&self, text: &str, options: &RenderOptions) -> Result<RenderedQr, RenderError>;
}

/// Renderer backed by the `qrcode` crate for encoding and `image` for PNG output.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrCodeRenderer;

impl QrCodeRenderer {
    pub fn new() -> Self {
        Self
    }

    fn ec_level(level: ErrorCorrectionLevel) -> EcLevel {
        match level {
            ErrorCorrectionLevel::L => EcLevel::L,
            ErrorCorrectionLevel::M => EcLevel::M,
            ErrorCorrectionLevel::Q => EcLevel::Q,
            ErrorCorrectionLevel::H => EcLevel::H,
        }
    }

    fn pixel(color: Rgb) -> Rgba<u8> {
        Rgba([color.0, color.1, color.2, 255])
    }

    /// Lays out `modules × modules` cells on a square canvas of at least
    /// `size` pixels, centred, with at least `quiet_zone` pixels of margin.
    fn rasterize(code: &QrCode, options: &RenderOptions) -> RgbaImage {
        let modules = code.width() as u32;
        let margin = options.quiet_zone;
        let usable = options.size.saturating_sub(margin.saturating_mul(2));
        let scale = (usable / modules).max(1);
        let drawn = modules.saturating_mul(scale);
        let canvas = options
            .size
            .max(drawn.saturating_add(margin.saturating_mul(2)));
        let offset = (canvas - drawn) / 2;

        let mut img = RgbaImage::from_pixel(canvas, canvas, Self::pixel(options.background));
        let dark = Self::pixel(options.foreground);

        for (i, color) in code.to_colors().iter().enumerate() {
            if *color != Color::Dark {
                continue;
            }
            let mx = i as u32 % modules;
            let my = i as u32 / modules;
            for dy in 0..scale {
                for dx in 0..scale {
                    img.put_pixel(offset + mx * scale + dx, offset + my * scale + dy, dark);
                }
            }
        }
        img
    }
}

impl QrRenderer for QrCodeRenderer {
    fn render(&self, text: &str, options: &RenderOptions) -> Result<RenderedQr, RenderError> {
        options.validate()?;
        let level = Self::ec_level(options.error_correction);
        let code = QrCode::with_error_correction_level(text.as_bytes(), level).map_err(|e| match e {
            QrError::DataTooLong => RenderError::DataTooLong(format!(
                "{} bytes at level {}",
                text.len(),
                options.error_correction
            )),
            other => RenderError::Encoding(other.to_string()),
        })?;

        let img = Self::rasterize(&code, options);
        let (width, height) = img.dimensions();

        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(img.as_raw(), width, height, ColorType::Rgba8.into())
            .map_err(|e| RenderError::Image(e.to_string()))?;

        tracing::debug!(
            width,
            modules = code.width(),
            level = %options.error_correction,
            "rendered QR code"
        );

        Ok(RenderedQr {
            width,
            height,
            rgba: img.into_raw(),
            png,
        })
    }
}
