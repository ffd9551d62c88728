//! # Rendering Module
//!
//! Turns text into LED pixels.
//!
//! ## Pipeline
//!
//! ```text
//! "↑ AAPL $150.00"
//!        │  Compositor::compose_message
//!        ▼
//! ColumnSequence ── one PixelColumn per LED column, grid-height each
//!        │  TickerBoard feeds one column per tick
//!        ▼
//! Grid ── shift_left + write_column, in place
//!        │  Grid::render
//!        ▼
//! Frame ── rows x cols colours for a display (terminal, PNG, web)
//! ```
//!
//! ## Modules
//!
//! - [`raster`]: glyph upscaling and vertical centring
//! - [`compose`]: message composition with spacing and gap
//! - [`grid`]: the frame buffer and colours
//! - [`png`]: LED-style PNG output
//!
//! ## Example
//!
//! ```
//! use tickerboard::font::Builtin;
//! use tickerboard::render::{Compositor, Grid, Rgb};
//!
//! let compositor = Compositor::new(Box::new(Builtin), 32, 3, 1, 8);
//! let message = compositor.compose_message("HI");
//! assert_eq!(message.len(), 2 * (15 + 1) + 8);
//!
//! let mut grid = Grid::new(32, 128, Rgb::new(10, 10, 10));
//! grid.shift_left();
//! grid.write_column(127, message.get(0).unwrap(), Rgb::new(255, 255, 255));
//! ```

pub mod compose;
pub mod grid;
pub mod png;
pub mod raster;

pub use compose::{ColumnSequence, Compositor};
pub use grid::{Frame, Grid, Rgb};
pub use raster::{rasterize, PixelColumn};
