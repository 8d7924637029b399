//! Scannable code generation
//!
//! Each deck record carries a code encoding the track's playable URL. The
//! default generator renders a QR code (error correction level H, so a centre
//! overlay can be printed over it later) as an SVG document.

use deckify_common::{Error, Result};
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};

/// Module colour (printed white on the coloured background)
pub const DEFAULT_DARK_COLOR: &str = "#FFFFFF";
/// Background colour
pub const DEFAULT_LIGHT_COLOR: &str = "#FFB4B4";

/// Opaque image artifact encoding a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCode {
    /// SVG document
    pub svg: String,
}

/// Turns a URL into a scannable code
pub trait CodeGenerator: Send + Sync {
    fn generate(&self, url: &str) -> Result<ScanCode>;
}

/// QR code generator rendering SVG
#[derive(Debug, Clone)]
pub struct QrSvgGenerator {
    dark_color: String,
    light_color: String,
    /// Minimum edge length in pixels
    min_size: u32,
}

impl Default for QrSvgGenerator {
    fn default() -> Self {
        Self {
            dark_color: DEFAULT_DARK_COLOR.to_string(),
            light_color: DEFAULT_LIGHT_COLOR.to_string(),
            min_size: 290,
        }
    }
}

impl QrSvgGenerator {
    pub fn with_colors(mut self, dark: impl Into<String>, light: impl Into<String>) -> Self {
        self.dark_color = dark.into();
        self.light_color = light.into();
        self
    }
}

impl CodeGenerator for QrSvgGenerator {
    fn generate(&self, url: &str) -> Result<ScanCode> {
        let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::H)
            .map_err(|e| Error::Internal(format!("QR encoding failed for {}: {}", url, e)))?;

        let svg = code
            .render::<svg::Color<'_>>()
            .min_dimensions(self.min_size, self.min_size)
            .quiet_zone(true)
            .dark_color(svg::Color(&self.dark_color))
            .light_color(svg::Color(&self.light_color))
            .build();

        Ok(ScanCode { svg })
    }
}
