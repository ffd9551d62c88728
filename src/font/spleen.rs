//! Spleen 6x12 glyph table.
//!
//! Wraps the PSF2 data shipped with `spleen-font`. Glyph rows come out of the
//! font as bool iterators; they are copied into a 6x12 buffer, ignoring any
//! pixels outside the cell.

use spleen_font::{FONT_6X12, PSF2Font};

use super::{GlyphPattern, GlyphTable};

pub const GLYPH_WIDTH: usize = 6;
pub const GLYPH_HEIGHT: usize = 12;

/// The Spleen 6x12 bitmap font.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spleen;

impl GlyphTable for Spleen {
    fn name(&self) -> &'static str {
        "spleen"
    }

    fn lookup(&self, ch: char) -> Option<GlyphPattern> {
        let mut font = PSF2Font::new(FONT_6X12).ok()?;
        let utf8 = ch.to_string();
        let glyph = font.glyph_for_utf8(utf8.as_bytes())?;

        let mut bits = vec![0u8; GLYPH_WIDTH * GLYPH_HEIGHT];
        for (row_y, row) in glyph.enumerate() {
            for (col_x, on) in row.enumerate() {
                if row_y < GLYPH_HEIGHT && col_x < GLYPH_WIDTH {
                    bits[row_y * GLYPH_WIDTH + col_x] = on as u8;
                }
            }
        }
        Some(GlyphPattern::from_bits(GLYPH_WIDTH, GLYPH_HEIGHT, bits))
    }

    fn space(&self) -> GlyphPattern {
        GlyphPattern::blank(GLYPH_WIDTH, GLYPH_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_has_pixels() {
        let g = Spleen.glyph('A');
        assert_eq!(g.width(), GLYPH_WIDTH);
        assert_eq!(g.height(), GLYPH_HEIGHT);
        assert!(!g.is_blank());
    }

    #[test]
    fn test_digits_and_dollar() {
        for ch in "$0123456789.".chars() {
            assert!(!Spleen.glyph(ch).is_blank(), "{:?} rendered blank", ch);
        }
    }

    #[test]
    fn test_space_is_blank() {
        assert!(Spleen.glyph(' ').is_blank());
    }
}
