//! # Inkblot - ASCII-art captcha for the terminal
//!
//! Renders a random code as noisy, multi-style ASCII art and asks the
//! user to type it back, with a bounded number of retries.
//!
//! ## Architecture
//! ```text
//! Solution → GlyphCompositor ──(GlyphRenderer per letter)──→ Captcha
//!                                                              ↓
//!                                                   Terminal session
//! ```

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inkblot_common::CaptchaError;
use inkblot_common::constants::DEFAULT_CONFIG_PATH;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod captcha;
mod config;
mod glyphs;

use captcha::{GlyphCompositor, StdinTerminal};
use config::AppConfig;
use glyphs::{BitmapRenderer, GlyphRenderer};

/// Inkblot - noisy ASCII-art captcha
#[derive(Parser, Debug)]
#[command(name = "inkblot")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "INKBLOT_CONFIG", global = true)]
    config: String,

    /// Letters in the solution (overrides config)
    #[arg(short, long, env = "INKBLOT_LENGTH", global = true)]
    length: Option<usize>,

    /// Wrong attempts allowed, 0 = unlimited (overrides config)
    #[arg(short, long, env = "INKBLOT_MAX_FAILS", global = true)]
    max_fails: Option<u32>,

    /// Prompt shown before each attempt (overrides config)
    #[arg(long, global = true)]
    prompt: Option<String>,

    /// Restrict glyph styles, comma separated (overrides config)
    #[arg(long, value_delimiter = ',', global = true)]
    styles: Vec<String>,

    /// Seed for reproducible captchas
    #[arg(long, env = "INKBLOT_SEED", global = true)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "LOG_LEVEL", global = true)]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false", global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a captcha interactively (default)
    Play,
    /// Print one captcha followed by its solution
    Show,
    /// Pre-generate captchas as JSON lines
    Batch {
        /// Number of captchas to generate
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },
    /// List available glyph styles
    Styles,
}

/// Exit status for bad settings, distinct from a failed captcha
const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    // .env is optional; it only feeds the env fallbacks below
    dotenvy::dotenv().ok();

    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_level, args.json_logs) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_code_for(&e)
        }
    }
}

/// Settings mistakes exit with a usage status; everything else is a failure
fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    let user_error = error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<CaptchaError>())
        .any(CaptchaError::is_user_error);

    if user_error {
        ExitCode::from(EXIT_USAGE)
    } else {
        ExitCode::FAILURE
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let config = AppConfig::load(&args.config, &args)?;
    info!(config = %args.config, "Configuration loaded");

    let length = config.captcha.length;
    let max_fails = config.captcha.max_fails;

    match args.command.unwrap_or(Command::Play) {
        Command::Play => {
            let compositor = build_compositor(&config)?;
            let mut captcha = match args.seed {
                Some(seed) => compositor.generate_with(&mut StdRng::seed_from_u64(seed), length, max_fails)?,
                None => compositor.generate(length, max_fails)?,
            };
            let mut terminal = StdinTerminal::new().context("Failed to open terminal")?;

            let solved = captcha.execute(&mut terminal, &config.captcha.prompt)?;
            info!(
                state = ?captcha.state(),
                fails = captcha.fails(),
                max_fails = captcha.max_fails(),
                "Session finished"
            );

            Ok(if solved { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Show => {
            let compositor = build_compositor(&config)?;
            let captcha = match args.seed {
                Some(seed) => compositor.generate_with(&mut StdRng::seed_from_u64(seed), length, max_fails)?,
                None => compositor.generate(length, max_fails)?,
            };

            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{captcha}")?;
            writeln!(stdout)?;
            writeln!(stdout, "{}", captcha.solution())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Batch { count } => {
            let compositor = build_compositor(&config)?;
            let batch = match args.seed {
                Some(seed) => compositor.generate_batch(&mut StdRng::seed_from_u64(seed), count, length, max_fails)?,
                None => compositor.generate_batch(&mut rand::rng(), count, length, max_fails)?,
            };

            let mut stdout = io::stdout().lock();
            for captcha in &batch {
                serde_json::to_writer(&mut stdout, captcha)?;
                writeln!(stdout)?;
            }
            info!(count = batch.len(), "Batch generated");
            Ok(ExitCode::SUCCESS)
        }
        Command::Styles => {
            let mut stdout = io::stdout().lock();
            for style in BitmapRenderer::new().styles() {
                writeln!(stdout, "{style}")?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Compositor over the built-in renderer with the configured catalog
fn build_compositor(config: &AppConfig) -> Result<GlyphCompositor<BitmapRenderer>> {
    let compositor = GlyphCompositor::new(BitmapRenderer::new(), config.compositor_settings())
        .context("Invalid glyph settings")?;
    info!(styles = compositor.styles().len(), "Compositor ready");
    Ok(compositor)
}

/// Initialize structured logging with tracing (stderr, so art on stdout stays clean)
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(io::stderr))
            .init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_errors_exit_with_usage_status() {
        let err = anyhow::Error::new(CaptchaError::UnknownStyle("gothic".into()))
            .context("Invalid glyph settings");
        assert_eq!(exit_code_for(&err), ExitCode::from(EXIT_USAGE));

        let err = anyhow::Error::new(CaptchaError::Config("captcha.length must be at least 1".into()));
        assert_eq!(exit_code_for(&err), ExitCode::from(EXIT_USAGE));
    }

    #[test]
    fn test_other_errors_exit_with_failure() {
        let eof = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed");
        let err = anyhow::Error::new(CaptchaError::from(eof));
        assert_eq!(exit_code_for(&err), ExitCode::FAILURE);

        let err = anyhow::anyhow!("Failed to parse config");
        assert_eq!(exit_code_for(&err), ExitCode::FAILURE);
    }
}
