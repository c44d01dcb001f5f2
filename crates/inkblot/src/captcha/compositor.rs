//! Glyph compositor: renders a solution into one noisy ASCII-art image.
//!
//! Each letter is drawn in a randomly chosen style, its dominant ink
//! character is swapped for a random decoy, and the glyph is appended to
//! the right of the image with random spacing. Blank rows at the top and
//! bottom are trimmed, then random noise characters overwrite cells.

use inkblot_common::constants::{
    DECOY_SYMBOLS, MAX_GLYPH_OFFSET, MAX_GLYPH_OFFSET_LIMIT, NOISE_MAX, NOISE_MIN, ROW_SEPARATOR,
};
use inkblot_common::{CaptchaError, GlyphBlock, RenderedCaptcha, Result, Solution};
use rand::Rng;

use super::Captcha;
use crate::glyphs::GlyphRenderer;

const DIGITS: &[u8] = b"0123456789";
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Tunables captured by the compositor at construction
#[derive(Debug, Clone)]
pub struct CompositorSettings {
    /// Fewest noise characters per image
    pub noise_min: usize,
    /// Most noise characters per image (inclusive)
    pub noise_max: usize,
    /// Largest extra spacing after a glyph (inclusive)
    pub max_offset: usize,
    /// Restrict the renderer's catalog to these styles
    pub styles: Option<Vec<String>>,
}

impl Default for CompositorSettings {
    fn default() -> Self {
        Self {
            noise_min: NOISE_MIN,
            noise_max: NOISE_MAX,
            max_offset: MAX_GLYPH_OFFSET,
            styles: None,
        }
    }
}

/// Builds captchas from a renderer, a style catalog and a noise palette
pub struct GlyphCompositor<R> {
    renderer: R,
    styles: Vec<String>,
    palette: Vec<char>,
    noise_min: usize,
    noise_max: usize,
    max_offset: usize,
}

impl<R: GlyphRenderer> GlyphCompositor<R> {
    pub fn new(renderer: R, settings: CompositorSettings) -> Result<Self> {
        if settings.noise_min > settings.noise_max {
            return Err(CaptchaError::Config(format!(
                "noise.min ({}) must not exceed noise.max ({})",
                settings.noise_min, settings.noise_max
            )));
        }
        if settings.max_offset > MAX_GLYPH_OFFSET_LIMIT {
            return Err(CaptchaError::Config(format!(
                "layout.max_offset ({}) must not exceed {MAX_GLYPH_OFFSET_LIMIT}",
                settings.max_offset
            )));
        }

        let styles: Vec<String> = match settings.styles {
            Some(enabled) => {
                if let Some(unknown) = enabled
                    .iter()
                    .find(|name| !renderer.styles().iter().any(|style| *style == name.as_str()))
                {
                    return Err(CaptchaError::UnknownStyle(unknown.clone()));
                }
                enabled
            }
            None => renderer.styles().iter().map(|s| s.to_string()).collect(),
        };

        if styles.is_empty() {
            return Err(CaptchaError::Config("style catalog is empty".into()));
        }

        Ok(Self {
            renderer,
            styles,
            palette: noise_palette(),
            noise_min: settings.noise_min,
            noise_max: settings.noise_max,
            max_offset: settings.max_offset,
        })
    }

    /// Styles glyphs are drawn from
    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    /// Generate a captcha with the thread-local RNG
    pub fn generate(&self, length: usize, max_fails: u32) -> Result<Captcha> {
        self.generate_with(&mut rand::rng(), length, max_fails)
    }

    /// Generate a captcha with a caller-supplied RNG
    pub fn generate_with<G: Rng + ?Sized>(
        &self,
        rng: &mut G,
        length: usize,
        max_fails: u32,
    ) -> Result<Captcha> {
        let solution = random_solution(rng, length)?;

        let mut rows = self.compose(rng, &solution)?;
        self.scatter_noise(rng, &mut rows);

        let art = rows
            .iter()
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(ROW_SEPARATOR);

        tracing::debug!(
            length,
            rows = rows.len(),
            width = rows.first().map_or(0, Vec::len),
            "Generated captcha"
        );

        Ok(Captcha::new(art, solution, max_fails))
    }

    /// Pre-generate a batch of captchas ready for serialization
    pub fn generate_batch<G: Rng + ?Sized>(
        &self,
        rng: &mut G,
        count: usize,
        length: usize,
        max_fails: u32,
    ) -> Result<Vec<RenderedCaptcha>> {
        let mut batch: Vec<RenderedCaptcha> = Vec::new();
        for _ in 0..count {
            batch.push(self.generate_with(rng, length, max_fails)?.into());
        }
        Ok(batch)
    }

    /// Lay out every glyph of the solution side by side and trim blank
    /// leading and trailing rows. All rows share one width.
    fn compose<G: Rng + ?Sized>(&self, rng: &mut G, solution: &Solution) -> Result<Vec<Vec<char>>> {
        let mut base: Vec<Vec<char>> = vec![Vec::new()];
        let mut current_length = 0;

        for (index, character) in solution.as_str().chars().enumerate() {
            let style = &self.styles[rng.random_range(0..self.styles.len())];
            let mut block = self.renderer.render(character, style)?;

            let ink = ink_character(&block).ok_or_else(|| CaptchaError::BlankGlyph {
                character,
                style: style.clone(),
            })?;
            let decoy = decoy_for(rng, ink);
            block.substitute(ink, decoy);

            let max_len = block.width();
            for (row_index, row) in block.rows().iter().enumerate() {
                if row_index >= base.len() {
                    base.push(vec![' '; current_length]);
                }
                base[row_index].extend(row.chars());
            }

            let offset = rng.random_range(0..=self.max_offset);
            let width = current_length + max_len + offset;
            for row in &mut base {
                if row.len() < width {
                    row.resize(width, ' ');
                }
            }
            current_length = width;

            tracing::debug!(index, style = %style, ?ink, ?decoy, offset, "Composited glyph");
        }

        trim_blank_rows(&mut base);
        Ok(base)
    }

    /// Overwrite random cells with palette characters. Row lengths never change.
    fn scatter_noise<G: Rng + ?Sized>(&self, rng: &mut G, rows: &mut [Vec<char>]) {
        if rows.is_empty() {
            return;
        }

        let count = rng.random_range(self.noise_min..=self.noise_max);
        for _ in 0..count {
            let row = &mut rows[rng.random_range(0..rows.len())];
            if row.is_empty() {
                continue;
            }
            let column = rng.random_range(0..row.len());
            row[column] = self.palette[rng.random_range(0..self.palette.len())];
        }
    }
}

/// `length` independent uniform draws from A-Z
fn random_solution<G: Rng + ?Sized>(rng: &mut G, length: usize) -> Result<Solution> {
    if length == 0 {
        return Err(CaptchaError::InvalidInput("captcha length must be positive".into()));
    }
    let code: String = (0..length)
        .map(|_| char::from(rng.random_range(b'A'..=b'Z')))
        .collect();
    Solution::new(code)
}

/// Most frequent non-whitespace character. Ties go to the character seen
/// first in row-major order.
fn ink_character(block: &GlyphBlock) -> Option<char> {
    let mut counts: Vec<(char, usize)> = Vec::new();
    for ch in block.rows().iter().flat_map(|row| row.chars()) {
        if ch.is_whitespace() {
            continue;
        }
        match counts.iter_mut().find(|(seen, _)| *seen == ch) {
            Some((_, count)) => *count += 1,
            None => counts.push((ch, 1)),
        }
    }

    let mut best: Option<(char, usize)> = None;
    for (ch, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((ch, count));
        }
    }
    best.map(|(ch, _)| ch)
}

/// Random replacement from the same class as the ink: digit, letter or symbol
fn decoy_for<G: Rng + ?Sized>(rng: &mut G, ink: char) -> char {
    if ink.is_ascii_digit() {
        char::from(DIGITS[rng.random_range(0..DIGITS.len())])
    } else if ink.is_alphabetic() {
        char::from(LETTERS[rng.random_range(0..LETTERS.len())])
    } else {
        DECOY_SYMBOLS[rng.random_range(0..DECOY_SYMBOLS.len())]
    }
}

fn is_blank(row: &[char]) -> bool {
    row.iter().all(|c| c.is_whitespace())
}

/// Drop all-whitespace rows from both ends; interior blank rows stay
fn trim_blank_rows(rows: &mut Vec<Vec<char>>) {
    let leading = rows.iter().take_while(|row| is_blank(row)).count();
    rows.drain(..leading);
    while rows.last().is_some_and(|row| is_blank(row)) {
        rows.pop();
    }
}

/// Printable ASCII, space through tilde
fn noise_palette() -> Vec<char> {
    (b' '..=b'~').map(char::from).collect()
}
