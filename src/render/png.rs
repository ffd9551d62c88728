//! LED-style PNG rendering of a [`Frame`].
//!
//! Each LED becomes a `cell_size` square. For cells of 3 px and up a 1 px
//! grid line is drawn along the top and left edge of every cell, giving the
//! panel look of a real LED matrix.

use image::{ImageFormat, Rgb as Pixel, RgbImage};
use std::io::Cursor;
use std::path::Path;

use crate::error::TickerError;

use super::grid::{Frame, Rgb};

/// Smallest cell size that still gets grid lines.
const MIN_LINED_CELL: usize = 3;

#[inline]
fn pixel(c: Rgb) -> Pixel<u8> {
    Pixel([c.r, c.g, c.b])
}

/// Paint `frame` into an image `cols * cell_size` wide and `rows * cell_size` tall.
pub fn frame_to_image(frame: &Frame, cell_size: usize, line_color: Rgb) -> RgbImage {
    let cell = cell_size.max(1);
    let width = (frame.cols() * cell) as u32;
    let height = (frame.rows() * cell) as u32;
    let lined = cell >= MIN_LINED_CELL;
    let line = pixel(line_color);

    RgbImage::from_fn(width, height, |x, y| {
        let (x, y) = (x as usize, y as usize);
        if lined && (x % cell == 0 || y % cell == 0) {
            return line;
        }
        pixel(frame.get(y / cell, x / cell))
    })
}

/// Encode `frame` as PNG bytes.
pub fn encode_png(frame: &Frame, cell_size: usize, line_color: Rgb) -> Result<Vec<u8>, TickerError> {
    let img = frame_to_image(frame, cell_size, line_color);
    let mut png_bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| TickerError::Image(format!("PNG encoding failed: {}", e)))?;
    Ok(png_bytes)
}

/// Save `frame` as a PNG file.
pub fn save_png(path: &Path, frame: &Frame, cell_size: usize, line_color: Rgb) -> Result<(), TickerError> {
    frame_to_image(frame, cell_size, line_color)
        .save(path)
        .map_err(|e| TickerError::Image(format!("Failed to save PNG: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Grid;

    const BG: Rgb = Rgb::new(10, 10, 10);
    const LINE: Rgb = Rgb::new(50, 50, 50);
    const GREEN: Rgb = Rgb::new(0, 255, 0);

    fn sample() -> Frame {
        let mut grid = Grid::new(2, 4, BG);
        grid.set_pixel(1, 3, GREEN);
        grid.render()
    }

    #[test]
    fn test_image_dimensions() {
        let img = frame_to_image(&sample(), 10, LINE);
        assert_eq!(img.dimensions(), (40, 20));
    }

    #[test]
    fn test_cells_and_lines() {
        let img = frame_to_image(&sample(), 10, LINE);
        // inside the lit cell
        assert_eq!(img.get_pixel(35, 15), &Pixel([0, 255, 0]));
        // inside an unlit cell
        assert_eq!(img.get_pixel(5, 5), &Pixel([10, 10, 10]));
        // on a grid line
        assert_eq!(img.get_pixel(30, 15), &Pixel([50, 50, 50]));
    }

    #[test]
    fn test_small_cells_have_no_lines() {
        let img = frame_to_image(&sample(), 1, LINE);
        assert_eq!(img.dimensions(), (4, 2));
        assert_eq!(img.get_pixel(0, 0), &Pixel([10, 10, 10]));
        assert_eq!(img.get_pixel(3, 1), &Pixel([0, 255, 0]));
    }

    #[test]
    fn test_encode_png_signature() {
        let bytes = encode_png(&sample(), 4, LINE).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
