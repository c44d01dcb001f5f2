//! Common error types for Inkblot components.

use thiserror::Error;

/// Common errors across Inkblot components
#[derive(Debug, Error)]
pub enum CaptchaError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Style name not in the renderer's catalog
    #[error("Unknown glyph style: {0}")]
    UnknownStyle(String),

    /// Renderer has no glyph for this character
    #[error("Unsupported character {0:?}")]
    UnsupportedCharacter(char),

    /// Renderer produced a block with no ink at all
    #[error("Style {style} rendered {character:?} without any visible characters")]
    BlankGlyph { character: char, style: String },

    /// Invalid input/request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Terminal I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CaptchaError {
    /// Returns true if this error was caused by user-supplied settings
    /// rather than the renderer or the terminal
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::UnknownStyle(_) | Self::InvalidInput(_))
    }
}
