//! Glyph rendering.
//!
//! The compositor only sees the [`GlyphRenderer`] trait. [`BitmapRenderer`]
//! is the built-in implementation backed by a 5x7 face and a catalog of
//! named styles.

mod face;
mod styles;

use inkblot_common::{CaptchaError, GlyphBlock, Result};

use styles::STYLES;

/// Turns a single character and a style name into ASCII-art rows
pub trait GlyphRenderer {
    /// Style names this renderer accepts
    fn styles(&self) -> &[&'static str];

    fn render(&self, character: char, style: &str) -> Result<GlyphBlock>;
}

/// Renderer for A-Z over the built-in style catalog
pub struct BitmapRenderer {
    names: Vec<&'static str>,
}

impl BitmapRenderer {
    pub fn new() -> Self {
        Self {
            names: STYLES.iter().map(|style| style.name).collect(),
        }
    }
}

impl Default for BitmapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphRenderer for BitmapRenderer {
    fn styles(&self) -> &[&'static str] {
        &self.names
    }

    fn render(&self, character: char, style: &str) -> Result<GlyphBlock> {
        let style = styles::find(style).ok_or_else(|| CaptchaError::UnknownStyle(style.to_string()))?;
        let pixels = face::pixels(character).ok_or(CaptchaError::UnsupportedCharacter(character))?;

        Ok(GlyphBlock::new(style.paint(&pixels)))
    }
}
