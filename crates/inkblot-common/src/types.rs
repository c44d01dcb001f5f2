//! Core types shared across Inkblot components.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::ROW_SEPARATOR;
use crate::error::CaptchaError;

/// The hidden uppercase code a user must reproduce.
///
/// Always non-empty and made only of `A`-`Z`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Solution(String);

impl Solution {
    /// Create a solution, rejecting anything but one or more ASCII uppercase letters
    pub fn new(code: impl Into<String>) -> Result<Self, CaptchaError> {
        let code = code.into();
        if code.is_empty() {
            return Err(CaptchaError::InvalidInput("solution must not be empty".into()));
        }
        if let Some(bad) = code.chars().find(|c| !c.is_ascii_uppercase()) {
            return Err(CaptchaError::InvalidInput(format!(
                "solution may only contain A-Z, found {bad:?}"
            )));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Case-insensitive comparison against a user attempt
    pub fn matches(&self, attempt: &str) -> bool {
        attempt.to_lowercase() == self.0.to_lowercase()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Solution {
    type Error = CaptchaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Solution> for String {
    fn from(value: Solution) -> Self {
        value.0
    }
}

/// Rows of one character rendered in one style.
///
/// Rows may differ in length; widths are counted in `char`s.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphBlock {
    rows: Vec<String>,
}

impl GlyphBlock {
    pub fn new(rows: Vec<String>) -> Self {
        Self { rows }
    }

    /// Split renderer output on CRLF row separators
    pub fn from_text(text: &str) -> Self {
        Self {
            rows: text.split(ROW_SEPARATOR).map(str::to_owned).collect(),
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Widest row in the block
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Replace every occurrence of `from` with `to`, keeping the shape
    pub fn substitute(&mut self, from: char, to: char) {
        let mut buf = [0u8; 4];
        let to = to.encode_utf8(&mut buf);
        for row in &mut self.rows {
            *row = row.replace(from, to);
        }
    }
}

/// Attempt tracker lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptchaState {
    /// Waiting for a correct attempt
    Active,
    /// Correct attempt received (terminal)
    Solved,
    /// Attempt budget exhausted (terminal)
    Failed,
}

impl CaptchaState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// A pre-generated captcha ready to hand out, as written by `inkblot batch`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedCaptcha {
    /// CRLF-joined ASCII art
    pub art: String,
    /// The expected answer
    pub solution: Solution,
    /// Wrong attempts allowed (0 = unlimited)
    pub max_fails: u32,
    /// Unix timestamp when generated
    pub generated_at: i64,
}

impl RenderedCaptcha {
    pub fn new(art: String, solution: Solution, max_fails: u32) -> Self {
        Self {
            art,
            solution,
            max_fails,
            generated_at: chrono::Utc::now().timestamp(),
        }
    }
}
