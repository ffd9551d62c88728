//! Text compositor: turns a message into one scrollable column sequence.
//!
//! Each character is rasterized and followed by `char_spacing` blank columns.
//! [`Compositor::compose_message`] additionally appends `ticker_gap` blank
//! columns so consecutive messages don't run into each other.

use std::fmt::Write as _;

use crate::config::MarqueeConfig;
use crate::font::{glyph_table, GlyphTable};

use super::raster::{rasterize, PixelColumn};

/// The full column representation of a composited message.
///
/// Built once and never edited; a new message means a new sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSequence {
    rows: usize,
    columns: Vec<PixelColumn>,
}

impl ColumnSequence {
    /// A sequence with no columns.
    pub fn empty(rows: usize) -> Self {
        Self {
            rows,
            columns: Vec::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PixelColumn> {
        self.columns.get(index)
    }

    pub fn columns(&self) -> &[PixelColumn] {
        &self.columns
    }

    /// Index of the first column with any lit pixel.
    pub fn first_lit_column(&self) -> Option<usize> {
        self.columns.iter().position(|c| !c.is_blank())
    }

    /// Render as text, one line per row (`#` lit, `.` unlit).
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.columns.len() + 1) * self.rows);
        for row in 0..self.rows {
            for col in &self.columns {
                out.push(if col.is_lit(row) { '#' } else { '.' });
            }
            let _ = writeln!(out);
        }
        out
    }
}

/// Builds [`ColumnSequence`]s from text with a fixed font, scale and spacing.
pub struct Compositor {
    table: Box<dyn GlyphTable>,
    rows: usize,
    scale: usize,
    char_spacing: usize,
    ticker_gap: usize,
}

impl Compositor {
    pub fn new(
        table: Box<dyn GlyphTable>,
        rows: usize,
        scale: usize,
        char_spacing: usize,
        ticker_gap: usize,
    ) -> Self {
        Self {
            table,
            rows,
            scale,
            char_spacing,
            ticker_gap,
        }
    }

    pub fn from_config(config: &MarqueeConfig) -> Self {
        Self::new(
            glyph_table(config.font),
            config.rows,
            config.scale,
            config.char_spacing,
            config.ticker_gap,
        )
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn table(&self) -> &dyn GlyphTable {
        self.table.as_ref()
    }

    /// Columns one character occupies, before spacing.
    pub fn glyph_columns(&self, ch: char) -> usize {
        self.table.glyph(ch).width() * self.scale
    }

    /// Glyphs plus inter-glyph spacing, without the trailing gap.
    pub fn compose(&self, text: &str) -> ColumnSequence {
        let mut columns = Vec::new();
        for ch in text.chars() {
            let glyph = self.table.glyph(ch);
            columns.extend(rasterize(&glyph, self.scale, self.rows));
            columns.extend((0..self.char_spacing).map(|_| PixelColumn::blank(self.rows)));
        }
        ColumnSequence {
            rows: self.rows,
            columns,
        }
    }

    /// A complete scroll message: [`compose`](Self::compose) plus the ticker gap.
    pub fn compose_message(&self, text: &str) -> ColumnSequence {
        let mut seq = self.compose(text);
        seq.columns
            .extend((0..self.ticker_gap).map(|_| PixelColumn::blank(self.rows)));
        seq
    }

    /// Expected [`compose_message`](Self::compose_message) length for `text`.
    pub fn message_len(&self, text: &str) -> usize {
        text.chars()
            .map(|ch| self.glyph_columns(ch) + self.char_spacing)
            .sum::<usize>()
            + self.ticker_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::Builtin;

    fn compositor(rows: usize) -> Compositor {
        Compositor::new(Box::new(Builtin), rows, 3, 1, 8)
    }

    #[test]
    fn test_every_column_matches_grid_height() {
        for rows in [7, 21, 32, 40] {
            let seq = compositor(rows).compose_message("↑ AAPL $150.00");
            assert!(seq.columns().iter().all(|c| c.len() == rows));
        }
    }

    #[test]
    fn test_length_formula() {
        let c = compositor(32);
        // 5 columns * 3 scale + 1 spacing per char
        assert_eq!(c.compose("AB").len(), 32);
        assert_eq!(c.compose_message("AB").len(), 40);
        assert_eq!(c.message_len("AB"), 40);
    }

    #[test]
    fn test_empty_text_is_just_the_gap() {
        let c = compositor(32);
        assert!(c.compose("").is_empty());
        let msg = c.compose_message("");
        assert_eq!(msg.len(), 8);
        assert!(msg.first_lit_column().is_none());
    }

    #[test]
    fn test_spacing_columns_are_blank() {
        let c = compositor(32);
        let seq = c.compose("HH");
        // column 15 follows the first H
        assert!(seq.get(15).unwrap().is_blank());
        assert!(!seq.get(16).unwrap().is_blank());
    }

    #[test]
    fn test_first_lit_column_skips_leading_space() {
        let c = compositor(32);
        assert_eq!(c.compose(" I").first_lit_column(), Some(16 + 3));
    }

    #[test]
    fn test_to_ascii_shape() {
        let c = Compositor::new(Box::new(Builtin), 7, 1, 0, 0);
        let ascii = c.compose("-").to_ascii();
        let lines: Vec<&str> = ascii.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[3], "#####");
        assert_eq!(lines[0], ".....");
    }
}
