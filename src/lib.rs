//! # Tickerboard - Scrolling Stock Ticker Marquee
//!
//! Tickerboard renders stock quotes as text scrolling right-to-left across a
//! simulated LED matrix. It provides:
//!
//! - **Glyph tables**: a built-in 5x7 LED font and the Spleen 6x12 bitmap font
//! - **Rendering**: glyph rasterization, message composition and the LED grid
//! - **Rotation**: a state machine cycling through tickers and refreshing prices
//! - **Quotes**: Alpaca market data or an offline random walk
//! - **Displays**: truecolor terminal output and an HTTP preview
//!
//! ## Quick Start
//!
//! ```no_run
//! use tickerboard::{
//!     config::MarqueeConfig,
//!     display::{self, RunOptions, TerminalDisplay},
//!     quote::{self, simulated::SimulatedSource},
//!     TickerBoard,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), tickerboard::TickerError> {
//! let config = MarqueeConfig::default();
//!
//! // Random-walk prices, fetched inline with a 5 s timeout
//! let source = Arc::new(SimulatedSource::new(Some(42)));
//! let mut feed = quote::feed_for(config.fetch_mode, source, config.fetch_timeout());
//!
//! // Seed every ticker, then scroll until `q` is pressed
//! let mut board = TickerBoard::start(config, feed.as_mut()).await?;
//! let mut terminal = TerminalDisplay::open()?;
//! display::run(&mut board, feed.as_mut(), &mut terminal, RunOptions::default()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`font`] | Glyph tables |
//! | [`render`] | Rasterizer, compositor, LED grid, PNG output |
//! | [`ticker`] | Ticker rotation state machine |
//! | [`quote`] | Price sources and feeds |
//! | [`display`] | Frame loop and terminal display |
//! | [`server`] | HTTP preview |
//! | [`config`] | Marquee configuration |
//! | [`error`] | Error types |

pub mod config;
pub mod display;
pub mod error;
pub mod font;
pub mod quote;
pub mod render;
pub mod server;
pub mod ticker;

// Re-exports for convenience
pub use config::MarqueeConfig;
pub use error::TickerError;
pub use ticker::TickerBoard;
