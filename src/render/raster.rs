//! Glyph rasterizer.
//!
//! Turns one [`GlyphPattern`] into grid-height pixel columns:
//!
//! ```text
//!   5x7 glyph        scale 3           centred in 32 rows
//!   .###.      →   ...#########...  →  5 blank rows on top
//!   #...#          ...#########...     21 glyph rows
//!   ...            ...                 6 blank rows below
//! ```
//!
//! Upscaling is nearest-neighbour: every source bit becomes a `scale x scale`
//! block. When the scaled glyph is taller than the grid it is clipped,
//! `floor(excess / 2)` rows from the top and the rest from the bottom.

use crate::font::GlyphPattern;

/// One vertical slice of rendered text, `true` where an LED is lit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelColumn(Vec<bool>);

impl PixelColumn {
    /// An unlit column of `rows` pixels.
    pub fn blank(rows: usize) -> Self {
        Self(vec![false; rows])
    }

    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `row` is lit. Out of range reads as unlit.
    #[inline]
    pub fn is_lit(&self, row: usize) -> bool {
        self.0.get(row).copied().unwrap_or(false)
    }

    pub fn is_blank(&self) -> bool {
        !self.0.iter().any(|&on| on)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }
}

/// Signed row offset of the scaled glyph inside the target: positive is top
/// padding, negative is rows clipped off the top.
fn vertical_offset(scaled_height: usize, target_rows: usize) -> isize {
    if scaled_height <= target_rows {
        ((target_rows - scaled_height) / 2) as isize
    } else {
        -(((scaled_height - target_rows) / 2) as isize)
    }
}

/// Rasterize `glyph` at `scale`, vertically centred in `target_rows`.
///
/// Produces exactly `glyph.width() * scale` columns of `target_rows` pixels.
/// An empty glyph produces no columns.
pub fn rasterize(glyph: &GlyphPattern, scale: usize, target_rows: usize) -> Vec<PixelColumn> {
    if glyph.height() == 0 || glyph.width() == 0 || scale == 0 {
        return Vec::new();
    }

    let scaled_height = glyph.height() * scale;
    let scaled_width = glyph.width() * scale;
    let top = vertical_offset(scaled_height, target_rows);

    (0..scaled_width)
        .map(|x| {
            let src_col = x / scale;
            let bits = (0..target_rows)
                .map(|row| {
                    let scaled_row = row as isize - top;
                    scaled_row >= 0
                        && (scaled_row as usize) < scaled_height
                        && glyph.is_set(scaled_row as usize / scale, src_col)
                })
                .collect();
            PixelColumn(bits)
        })
        .collect()
}
