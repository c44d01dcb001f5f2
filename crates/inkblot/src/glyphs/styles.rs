//! Style catalog for the bitmap renderer.
//!
//! A style turns the 5x7 pixel grid of a letter into ASCII rows. Styles
//! differ in ink, vertical scale, slant, shadow, outlining, row squashing
//! and baseline padding, so neighbouring glyphs in a captcha rarely share
//! a shape or a fill character.

/// Horizontal lean applied row by row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slant {
    None,
    /// Top rows shifted right
    Forward,
    /// Bottom rows shifted right
    Backward,
}

/// Visual parameters of one named style
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub name: &'static str,
    /// Text painted for each set pixel; its length sets the cell width
    pub ink: &'static str,
    /// Drop shadow painted one cell down-right of the ink
    pub shadow: Option<char>,
    /// Paint the halo around the letter instead of the letter itself
    pub outline: bool,
    /// Fold pixel rows pairwise into `'` `.` `:` cells
    pub squash: bool,
    /// Times each row is repeated
    pub y_scale: usize,
    pub slant: Slant,
    /// Blank rows above the glyph
    pub pad_top: usize,
    /// Blank rows below the glyph
    pub pad_bottom: usize,
}

const PLAIN: Style = Style {
    name: "plain",
    ink: "#",
    shadow: None,
    outline: false,
    squash: false,
    y_scale: 1,
    slant: Slant::None,
    pad_top: 0,
    pad_bottom: 0,
};

/// Every style the bitmap renderer knows
pub const STYLES: &[Style] = &[
    Style { name: "standard", pad_bottom: 1, ..PLAIN },
    Style { name: "heavy", ink: "@", ..PLAIN },
    Style { name: "wide", ink: "##", pad_top: 1, ..PLAIN },
    Style { name: "dollar", ink: "$", pad_bottom: 2, ..PLAIN },
    Style { name: "solid", ink: "█", ..PLAIN },
    Style { name: "brackets", ink: "[]", pad_top: 2, ..PLAIN },
    Style { name: "stars", ink: "*", pad_top: 1, pad_bottom: 1, ..PLAIN },
    Style { name: "dotmatrix", ink: "o ", ..PLAIN },
    Style { name: "slant", slant: Slant::Forward, pad_bottom: 1, ..PLAIN },
    Style { name: "backslant", ink: "%", slant: Slant::Backward, ..PLAIN },
    Style { name: "oblique", ink: "//", slant: Slant::Forward, pad_top: 1, ..PLAIN },
    Style { name: "shadow", shadow: Some(':'), ..PLAIN },
    Style { name: "deepshadow", ink: "@@", shadow: Some('%'), pad_bottom: 2, ..PLAIN },
    Style { name: "outline", outline: true, ..PLAIN },
    Style { name: "hollow", ink: "OO", outline: true, pad_top: 1, ..PLAIN },
    Style { name: "tall", y_scale: 2, ..PLAIN },
    Style { name: "big", ink: "##", y_scale: 2, pad_bottom: 1, ..PLAIN },
    Style { name: "colossal", ink: "888", y_scale: 2, ..PLAIN },
    Style { name: "digital", ink: "8", pad_top: 2, ..PLAIN },
    Style { name: "lettered", ink: "M", pad_bottom: 1, ..PLAIN },
    Style { name: "stencil", ink: "=", ..PLAIN },
    Style { name: "pipes", ink: "|", pad_top: 1, ..PLAIN },
    Style { name: "plus", ink: "+", slant: Slant::Backward, pad_bottom: 1, ..PLAIN },
    Style { name: "small", squash: true, pad_top: 1, ..PLAIN },
];

/// Look up a style by name
pub fn find(name: &str) -> Option<&'static Style> {
    STYLES.iter().find(|style| style.name == name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Blank,
    Ink,
    Shadow,
}

impl Style {
    /// Paint a pixel grid into rows. Trailing spaces are trimmed, so rows
    /// come out with uneven lengths.
    pub fn paint(&self, pixels: &[Vec<bool>]) -> Vec<String> {
        let pixels = if self.outline {
            halo(pixels)
        } else {
            pixels.to_vec()
        };
        let cells = self.cells(&pixels);

        let body: Vec<String> = if self.squash {
            squash(&cells)
        } else {
            let width = self.ink.chars().count();
            let blank = " ".repeat(width);
            let shadow = self
                .shadow
                .map(|c| c.to_string().repeat(width))
                .unwrap_or_else(|| blank.clone());

            cells
                .iter()
                .flat_map(|row| {
                    let line: String = row
                        .iter()
                        .map(|cell| match cell {
                            Cell::Blank => blank.as_str(),
                            Cell::Ink => self.ink,
                            Cell::Shadow => shadow.as_str(),
                        })
                        .collect();
                    std::iter::repeat_n(line, self.y_scale.max(1))
                })
                .collect()
        };

        let height = body.len();
        let slanted = body.into_iter().enumerate().map(|(i, line)| {
            let indent = match self.slant {
                Slant::None => 0,
                Slant::Forward => height - 1 - i,
                Slant::Backward => i,
            };
            format!("{}{}", " ".repeat(indent), line)
        });

        std::iter::repeat_n(String::new(), self.pad_top)
            .chain(slanted)
            .chain(std::iter::repeat_n(String::new(), self.pad_bottom))
            .map(|line| line.trim_end().to_string())
            .collect()
    }

    /// Classify pixels into ink and, when a shadow is set, shadow cells
    fn cells(&self, pixels: &[Vec<bool>]) -> Vec<Vec<Cell>> {
        let grow = usize::from(self.shadow.is_some());
        let height = pixels.len() + grow;
        let width = pixels.first().map_or(0, Vec::len) + grow;
        let at = |r: usize, c: usize| pixels.get(r).and_then(|row| row.get(c)).copied() == Some(true);

        (0..height)
            .map(|r| {
                (0..width)
                    .map(|c| {
                        if at(r, c) {
                            Cell::Ink
                        } else if grow == 1 && r > 0 && c > 0 && at(r - 1, c - 1) {
                            Cell::Shadow
                        } else {
                            Cell::Blank
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Pixels touching the letter (8-neighbourhood) but not part of it,
/// on a grid grown by one pixel on every side
fn halo(pixels: &[Vec<bool>]) -> Vec<Vec<bool>> {
    let height = pixels.len();
    let width = pixels.first().map_or(0, Vec::len);
    let set = |r: isize, c: isize| {
        r >= 0
            && c >= 0
            && pixels
                .get(r as usize)
                .and_then(|row| row.get(c as usize))
                .copied()
                .unwrap_or(false)
    };

    (0..height + 2)
        .map(|r| {
            (0..width + 2)
                .map(|c| {
                    let (r, c) = (r as isize - 1, c as isize - 1);
                    if set(r, c) {
                        return false;
                    }
                    (-1..=1).any(|dr| (-1..=1).any(|dc| set(r + dr, c + dc)))
                })
                .collect()
        })
        .collect()
}

/// Fold rows pairwise: top only `'`, bottom only `.`, both `:`
fn squash(cells: &[Vec<Cell>]) -> Vec<String> {
    cells
        .chunks(2)
        .map(|pair| {
            let top = &pair[0];
            let bottom = pair.get(1);
            top.iter()
                .enumerate()
                .map(|(c, cell)| {
                    let upper = *cell != Cell::Blank;
                    let lower = bottom.is_some_and(|row| row[c] != Cell::Blank);
                    match (upper, lower) {
                        (true, true) => ':',
                        (true, false) => '\'',
                        (false, true) => '.',
                        (false, false) => ' ',
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn grid(rows: &[&str]) -> Vec<Vec<bool>> {
        rows.iter()
            .map(|row| row.chars().map(|c| c == '#').collect())
            .collect()
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let names: HashSet<_> = STYLES.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), STYLES.len());
        assert!(STYLES.len() >= 20);
    }

    #[test]
    fn test_plain_paint_trims_rows() {
        let rows = PLAIN.paint(&grid(&["#.#", "...", ".#."]));
        assert_eq!(rows, vec!["# #", "", " #"]);
    }

    #[test]
    fn test_wide_ink_and_vertical_scale() {
        let style = Style { ink: "##", y_scale: 2, ..PLAIN };
        let rows = style.paint(&grid(&["#.#"]));
        assert_eq!(rows, vec!["##  ##", "##  ##"]);
    }

    #[test]
    fn test_shadow_offsets_down_right() {
        let style = Style { shadow: Some(':'), ..PLAIN };
        let rows = style.paint(&grid(&["#."]));
        assert_eq!(rows, vec!["#", " :"]);
    }

    #[test]
    fn test_forward_slant_indents_top_rows() {
        let style = Style { slant: Slant::Forward, ..PLAIN };
        let rows = style.paint(&grid(&["#", "#", "#"]));
        assert_eq!(rows, vec!["  #", " #", "#"]);
    }

    #[test]
    fn test_outline_paints_halo_only() {
        let style = Style { outline: true, ..PLAIN };
        let rows = style.paint(&grid(&["#"]));
        assert_eq!(rows, vec!["###", "# #", "###"]);
    }

    #[test]
    fn test_squash_folds_row_pairs() {
        let style = Style { squash: true, ..PLAIN };
        let rows = style.paint(&grid(&["##.", "#.#", ".#."]));
        assert_eq!(rows, vec![":'.", " '"]);
    }

    #[test]
    fn test_padding_rows_are_empty() {
        let style = Style { pad_top: 1, pad_bottom: 2, ..PLAIN };
        let rows = style.paint(&grid(&["#"]));
        assert_eq!(rows, vec!["", "#", "", ""]);
    }
}
