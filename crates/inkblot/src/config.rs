//! Configuration management for Inkblot.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use inkblot_common::CaptchaError;
use inkblot_common::constants::{
    DEFAULT_LENGTH, DEFAULT_MAX_FAILS, MAX_GLYPH_OFFSET, MAX_GLYPH_OFFSET_LIMIT, NOISE_MAX, NOISE_MIN, messages,
};

use crate::captcha::CompositorSettings;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Solution and attempt settings
    #[serde(default)]
    pub captcha: CaptchaConfig,

    /// Noise injection
    #[serde(default)]
    pub noise: NoiseConfig,

    /// Glyph spacing
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Style catalog restrictions
    #[serde(default)]
    pub styles: StylesConfig,
}

/// Solution and attempt settings
#[derive(Debug, Clone, Deserialize)]
pub struct CaptchaConfig {
    /// Letters in the solution
    #[serde(default = "default_length")]
    pub length: usize,

    /// Wrong attempts before lock-out (0 = unlimited)
    #[serde(default = "default_max_fails")]
    pub max_fails: u32,

    /// Text shown before each attempt
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            length: default_length(),
            max_fails: default_max_fails(),
            prompt: default_prompt(),
        }
    }
}

/// Noise injection range (inclusive)
#[derive(Debug, Clone, Deserialize)]
pub struct NoiseConfig {
    #[serde(default = "default_noise_min")]
    pub min: usize,

    #[serde(default = "default_noise_max")]
    pub max: usize,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            min: default_noise_min(),
            max: default_noise_max(),
        }
    }
}

/// Glyph spacing
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Largest extra gap after each glyph
    #[serde(default = "default_max_offset")]
    pub max_offset: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_offset: default_max_offset(),
        }
    }
}

/// Style catalog restrictions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StylesConfig {
    /// Only draw from these styles (all renderer styles when unset)
    #[serde(default)]
    pub enabled: Option<Vec<String>>,
}

// Default value functions
fn default_length() -> usize { DEFAULT_LENGTH }
fn default_max_fails() -> u32 { DEFAULT_MAX_FAILS }
fn default_prompt() -> String { messages::DEFAULT_PROMPT.to_string() }
fn default_noise_min() -> usize { NOISE_MIN }
fn default_noise_max() -> usize { NOISE_MAX }
fn default_max_offset() -> usize { MAX_GLYPH_OFFSET }

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            tracing::debug!(path = %config_path, "Config file not found, using defaults");
            Self::default()
        };

        // Apply CLI overrides
        if let Some(length) = args.length {
            config.captcha.length = length;
        }
        if let Some(max_fails) = args.max_fails {
            config.captcha.max_fails = max_fails;
        }
        if let Some(ref prompt) = args.prompt {
            config.captcha.prompt = prompt.clone();
        }
        if !args.styles.is_empty() {
            config.styles.enabled = Some(args.styles.clone());
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the compositor cannot work with
    pub fn validate(&self) -> std::result::Result<(), CaptchaError> {
        if self.captcha.length == 0 {
            return Err(CaptchaError::Config("captcha.length must be at least 1".into()));
        }
        if self.noise.min > self.noise.max {
            return Err(CaptchaError::Config(format!(
                "noise.min ({}) must not exceed noise.max ({})",
                self.noise.min, self.noise.max
            )));
        }
        if self.layout.max_offset > MAX_GLYPH_OFFSET_LIMIT {
            return Err(CaptchaError::Config(format!(
                "layout.max_offset ({}) must not exceed {MAX_GLYPH_OFFSET_LIMIT}",
                self.layout.max_offset
            )));
        }
        if self.styles.enabled.as_ref().is_some_and(Vec::is_empty) {
            return Err(CaptchaError::Config("styles.enabled must not be empty".into()));
        }
        Ok(())
    }

    pub fn compositor_settings(&self) -> CompositorSettings {
        CompositorSettings {
            noise_min: self.noise.min,
            noise_max: self.noise.max,
            max_offset: self.layout.max_offset,
            styles: self.styles.enabled.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.captcha.length, 5);
        assert_eq!(config.captcha.max_fails, 3);
        assert_eq!(config.captcha.prompt, "ENTER CODE > ");
        assert_eq!((config.noise.min, config.noise.max), (15, 30));
        assert_eq!(config.layout.max_offset, 5);
        assert!(config.styles.enabled.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = parse(
            r#"
            [captcha]
            max_fails = 0

            [styles]
            enabled = ["tall", "shadow"]
            "#,
        );
        assert_eq!(config.captcha.max_fails, 0);
        assert_eq!(config.captcha.length, 5);
        assert_eq!(config.noise.max, 30);
        assert_eq!(
            config.compositor_settings().styles,
            Some(vec!["tall".to_string(), "shadow".to_string()])
        );
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.captcha.length = 0;
        assert!(matches!(config.validate(), Err(CaptchaError::Config(_))));

        let mut config = AppConfig::default();
        config.noise.min = 40;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.styles.enabled = Some(vec![]);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.layout.max_offset = usize::MAX;
        assert!(matches!(config.validate(), Err(CaptchaError::Config(_))));
        config.layout.max_offset = MAX_GLYPH_OFFSET_LIMIT;
        assert!(config.validate().is_ok());
    }
}
