//! Shared constants for Inkblot components.

/// Default number of letters in a solution
pub const DEFAULT_LENGTH: usize = 5;

/// Default wrong attempts before lock-out (0 = unlimited)
pub const DEFAULT_MAX_FAILS: u32 = 3;

/// Minimum noise characters scattered over a composite image
pub const NOISE_MIN: usize = 15;

/// Maximum noise characters scattered over a composite image
pub const NOISE_MAX: usize = 30;

/// Largest extra spacing inserted after each glyph (inclusive)
pub const MAX_GLYPH_OFFSET: usize = 5;

/// Upper bound accepted for the configured glyph spacing
pub const MAX_GLYPH_OFFSET_LIMIT: usize = 80;

/// Row separator used by renderers and the final art text
pub const ROW_SEPARATOR: &str = "\r\n";

/// Decoys for ink characters that are neither digits nor letters
pub const DECOY_SYMBOLS: [char; 5] = ['-', '+', '!', '|', ':'];

/// Default config file path
pub const DEFAULT_CONFIG_PATH: &str = "config/inkblot.toml";

/// Interactive session strings
pub mod messages {
    /// Prompt shown before reading an attempt
    pub const DEFAULT_PROMPT: &str = "ENTER CODE > ";

    pub const SOLVED: &str = "SOLVED!";

    pub const FAILED: &str = "FAILED!";

    pub const WRONG: &str = "WRONG!";

    /// Suffix after the remaining attempt count
    pub const ATTEMPTS_LEFT: &str = "attempts left...";
}
