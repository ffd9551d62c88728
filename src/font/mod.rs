//! # Glyph Tables
//!
//! Maps characters to fixed-size monochrome bitmaps.
//!
//! Two tables are available:
//!
//! | Font | Cell | Source |
//! |------|------|--------|
//! | [`Builtin`] | 5x7 | hand-drawn LED font (A-Z, 0-9, `$ . , - + % : / ! ? ( ) =`, `↑ ↓`) |
//! | [`Spleen`] | 6x12 | Spleen PSF2 bitmap font |
//!
//! Lookups are case-insensitive (letters are upper-cased first) and anything
//! the table lacks renders as a blank space-width cell.
//!
//! ## Example
//!
//! ```
//! use tickerboard::font::{Builtin, GlyphTable};
//!
//! let a = Builtin.glyph('a');
//! assert_eq!((a.width(), a.height()), (5, 7));
//! assert!(a.is_set(0, 2)); // apex of the 'A'
//!
//! // unknown characters fall back to space
//! assert!(Builtin.glyph('€').is_blank());
//! ```

pub mod builtin;
pub mod spleen;

pub use builtin::Builtin;
pub use spleen::Spleen;

use crate::config::FontKind;

/// Bitmap for one character, stored row-major as 0/1 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphPattern {
    width: usize,
    height: usize,
    bits: Vec<u8>,
}

impl GlyphPattern {
    /// Build from rows of `'0'`/`'1'` characters. Any other character counts as off.
    ///
    /// All rows are expected to have the same length; the first row sets the width.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut bits = vec![0u8; width * height];
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().take(width).enumerate() {
                bits[y * width + x] = (c == '1') as u8;
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Build from a raw row-major buffer.
    ///
    /// The buffer is truncated or zero-padded to `width * height`.
    pub fn from_bits(width: usize, height: usize, mut bits: Vec<u8>) -> Self {
        bits.resize(width * height, 0);
        Self {
            width,
            height,
            bits,
        }
    }

    /// An all-off glyph of the given size.
    pub fn blank(width: usize, height: usize) -> Self {
        Self::from_bits(width, height, Vec::new())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the pixel at (`row`, `col`) is lit. Out of range reads as off.
    #[inline]
    pub fn is_set(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.bits[row * self.width + col] != 0
    }

    pub fn is_blank(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }
}

/// A character-to-glyph mapping with a space fallback.
pub trait GlyphTable: Send + Sync {
    /// Table name (lowercase, e.g. "builtin").
    fn name(&self) -> &'static str;

    /// Exact lookup; `None` when the table has no glyph for `ch`.
    fn lookup(&self, ch: char) -> Option<GlyphPattern>;

    /// Glyph used for spaces and for anything [`lookup`](Self::lookup) misses.
    fn space(&self) -> GlyphPattern;

    /// Upper-cased lookup with space fallback.
    fn glyph(&self, ch: char) -> GlyphPattern {
        let upper = ch.to_uppercase().next().unwrap_or(ch);
        self.lookup(upper).unwrap_or_else(|| self.space())
    }
}

/// Get the glyph table for a configured font.
pub fn glyph_table(kind: FontKind) -> Box<dyn GlyphTable> {
    match kind {
        FontKind::Builtin => Box::new(Builtin),
        FontKind::Spleen => Box::new(Spleen),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let g = GlyphPattern::from_rows(&["101", "010"]);
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 2);
        assert!(g.is_set(0, 0));
        assert!(!g.is_set(0, 1));
        assert!(g.is_set(1, 1));
        assert!(!g.is_set(5, 5));
    }

    #[test]
    fn test_empty_rows() {
        let g = GlyphPattern::from_rows(&[]);
        assert_eq!(g.width(), 0);
        assert_eq!(g.height(), 0);
        assert!(g.is_blank());
    }

    #[test]
    fn test_from_bits_pads() {
        let g = GlyphPattern::from_bits(2, 2, vec![1]);
        assert!(g.is_set(0, 0));
        assert!(!g.is_set(1, 1));
    }

    #[test]
    fn test_glyph_table_by_kind() {
        assert_eq!(glyph_table(FontKind::Builtin).name(), "builtin");
        assert_eq!(glyph_table(FontKind::Spleen).name(), "spleen");
    }

    #[test]
    fn test_lowercase_maps_to_uppercase() {
        assert_eq!(Builtin.glyph('x'), Builtin.glyph('X'));
    }
}
