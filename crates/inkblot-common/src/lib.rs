//! # Inkblot Common
//!
//! Shared types, errors, and constants used across Inkblot components.
//!
//! ## Modules
//! - `types` - Core data structures (Solution, GlyphBlock, CaptchaState, etc.)
//! - `error` - Common error types
//! - `constants` - Generation defaults and user-facing strings

pub mod constants;
pub mod error;
pub mod types;

pub use error::CaptchaError;
pub use types::*;

/// Result alias for Inkblot operations
pub type Result<T> = std::result::Result<T, CaptchaError>;
