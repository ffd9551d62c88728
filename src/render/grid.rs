//! LED grid, the on-screen frame buffer.
//!
//! The grid is mutated in place every tick: [`Grid::shift_left`] moves every
//! row one column left, then the caller writes the incoming column into the
//! rightmost slot. Cells that were never lit (or were cleared) render as the
//! background colour.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::raster::PixelColumn;

/// An 8-bit RGB colour.
///
/// Parses from `#rrggbb`, `rrggbb` or `r,g,b`; serializes as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.contains(',') {
            let parts: Vec<&str> = s.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(format!("Invalid colour '{}': expected r,g,b", s));
            }
            let channel = |p: &str| {
                p.parse::<u8>()
                    .map_err(|_| format!("Invalid colour channel '{}' in '{}'", p, s))
            };
            return Ok(Rgb::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?));
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("Invalid colour '{}': expected #rrggbb", s));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| format!("Invalid hex colour '{}'", s))
        };
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// A fully resolved `rows x cols` colour matrix, ready to be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    rows: usize,
    cols: usize,
    pixels: Vec<Rgb>,
}

impl Frame {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major pixel colours.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Colour at (`row`, `col`). Panics when out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Rgb {
        assert!(row < self.rows && col < self.cols, "pixel out of range");
        self.pixels[row * self.cols + col]
    }

    /// All colours of one column, top to bottom.
    pub fn column(&self, col: usize) -> Vec<Rgb> {
        (0..self.rows).map(|row| self.get(row, col)).collect()
    }
}

/// The LED frame buffer.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    /// `None` = never lit, drawn with the background colour
    cells: Vec<Option<Rgb>>,
    background: Rgb,
}

impl Grid {
    pub fn new(rows: usize, cols: usize, background: Rgb) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
            background,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// Light one LED. Out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, row: usize, col: usize, color: Rgb) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = Some(color);
        }
    }

    /// Turn one LED off (back to background). Out-of-range coordinates are ignored.
    pub fn clear_pixel(&mut self, row: usize, col: usize) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = None;
        }
    }

    /// Effective colour at (`row`, `col`), or `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<Rgb> {
        self.index(row, col)
            .map(|i| self.cells[i].unwrap_or(self.background))
    }

    /// Move every row one column left. The rightmost column keeps its old
    /// value until the caller overwrites it.
    pub fn shift_left(&mut self) {
        if self.cols < 2 {
            return;
        }
        for row in self.cells.chunks_exact_mut(self.cols) {
            row.copy_within(1.., 0);
        }
    }

    /// Write a text column into grid column `col`: lit pixels get `color`,
    /// the rest go back to background.
    pub fn write_column(&mut self, col: usize, column: &PixelColumn, color: Rgb) {
        for row in 0..self.rows {
            if column.is_lit(row) {
                self.set_pixel(row, col, color);
            } else {
                self.clear_pixel(row, col);
            }
        }
    }

    /// Turn every LED off.
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Resolve the grid into a displayable frame.
    pub fn render(&self) -> Frame {
        Frame {
            rows: self.rows,
            cols: self.cols,
            pixels: self
                .cells
                .iter()
                .map(|c| c.unwrap_or(self.background))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgb = Rgb::new(10, 10, 10);
    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn test_rgb_parse() {
        assert_eq!("#ff0080".parse::<Rgb>().unwrap(), Rgb::new(255, 0, 128));
        assert_eq!("00ff00".parse::<Rgb>().unwrap(), Rgb::new(0, 255, 0));
        assert_eq!("10, 20,30".parse::<Rgb>().unwrap(), Rgb::new(10, 20, 30));
        assert!("#ff00".parse::<Rgb>().is_err());
        assert!("1,2".parse::<Rgb>().is_err());
        assert!("300,0,0".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_rgb_display_roundtrip() {
        let c = Rgb::new(1, 171, 255);
        assert_eq!(c.to_string(), "#01abff");
        assert_eq!(c.to_string().parse::<Rgb>().unwrap(), c);
    }

    #[test]
    fn test_unset_cells_render_background() {
        let grid = Grid::new(2, 3, BG);
        let frame = grid.render();
        assert_eq!(frame.pixels().len(), 6);
        assert!(frame.pixels().iter().all(|&p| p == BG));
    }

    #[test]
    fn test_set_pixel_out_of_bounds_is_noop() {
        let mut grid = Grid::new(2, 3, BG);
        grid.set_pixel(2, 0, RED);
        grid.set_pixel(0, 3, RED);
        grid.set_pixel(usize::MAX, usize::MAX, RED);
        assert!(grid.render().pixels().iter().all(|&p| p == BG));
        assert_eq!(grid.get(5, 5), None);
    }

    #[test]
    fn test_shift_left() {
        let mut grid = Grid::new(2, 3, BG);
        grid.set_pixel(0, 2, RED);
        grid.set_pixel(1, 1, RED);
        grid.shift_left();
        assert_eq!(grid.get(0, 1), Some(RED));
        assert_eq!(grid.get(1, 0), Some(RED));
        assert_eq!(grid.get(1, 1), Some(BG));
        // rightmost column is left for the caller
        assert_eq!(grid.get(0, 2), Some(RED));
    }

    #[test]
    fn test_shift_left_single_column() {
        let mut grid = Grid::new(1, 1, BG);
        grid.set_pixel(0, 0, RED);
        grid.shift_left();
        assert_eq!(grid.get(0, 0), Some(RED));
    }

    #[test]
    fn test_write_column_clears_unlit() {
        let mut grid = Grid::new(3, 2, BG);
        grid.set_pixel(1, 1, RED);
        let column = PixelColumn::from_bits(vec![true, false, true]);
        grid.write_column(1, &column, Rgb::BLACK);
        let frame = grid.render();
        assert_eq!(frame.column(1), vec![Rgb::BLACK, BG, Rgb::BLACK]);
    }

    #[test]
    fn test_rgb_serde_as_string() {
        let json = serde_json::to_string(&RED).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: Rgb = serde_json::from_str("\"255,0,0\"").unwrap();
        assert_eq!(back, RED);
    }
}
