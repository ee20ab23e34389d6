use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::RenderError;

/// Input length limit, matching the byte-mode capacity at the lowest
/// commonly offered error-correction level.
pub const MAX_CHARS: usize = 2953;

/// Largest accepted edge length, in pixels, for a rendered code.
pub const MAX_SIZE: u32 = 4096;

/// QR error-correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    /// ~7% recovery.
    L,
    /// ~15% recovery.
    #[default]
    M,
    /// ~25% recovery.
    Q,
    /// ~30% recovery.
    H,
}

impl fmt::Display for ErrorCorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCorrectionLevel::L => "L",
            ErrorCorrectionLevel::M => "M",
            ErrorCorrectionLevel::Q => "Q",
            ErrorCorrectionLevel::H => "H",
        };
        f.write_str(s)
    }
}

impl FromStr for ErrorCorrectionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(ErrorCorrectionLevel::L),
            "M" => Ok(ErrorCorrectionLevel::M),
            "Q" => Ok(ErrorCorrectionLevel::Q),
            "H" => Ok(ErrorCorrectionLevel::H),
            other => Err(format!("unknown error correction level: {}", other)),
        }
    }
}

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Parses `#rrggbb` or `#rgb` (the leading `#` is optional).
    pub fn parse(input: &str) -> Result<Rgb, RenderError> {
        let hex = input.trim().trim_start_matches('#');
        let invalid = || RenderError::InvalidColor(input.to_string());
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Rendering parameters for a single QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Requested edge length in pixels; the output is square.
    pub size: u32,
    pub foreground: Rgb,
    pub background: Rgb,
    pub error_correction: ErrorCorrectionLevel,
    /// Minimum background margin around the symbol, in pixels.
    pub quiet_zone: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: 256,
            foreground: Rgb::BLACK,
            background: Rgb::WHITE,
            error_correction: ErrorCorrectionLevel::M,
            quiet_zone: 10,
        }
    }
}

impl RenderOptions {
    /// Rejects sizes outside `1..=MAX_SIZE` and quiet zones wider than the
    /// requested size.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.size == 0 || self.size > MAX_SIZE {
            return Err(RenderError::InvalidOptions(format!(
                "size must be between 1 and {}, got {}",
                MAX_SIZE, self.size
            )));
        }
        if self.quiet_zone > self.size {
            return Err(RenderError::InvalidOptions(format!(
                "quiet zone {} exceeds size {}",
                self.quiet_zone, self.size
            )));
        }
        Ok(())
    }
}

/// A rasterised QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQr {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
    /// The same image encoded as PNG.
    pub png: Vec<u8>,
}

impl RenderedQr {
    /// `data:image/png;base64,...` form of the PNG.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", BASE64.encode(&self.png))
    }
}
