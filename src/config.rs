//! # Marquee Configuration
//!
//! Every tunable of the marquee lives in [`MarqueeConfig`]. Defaults match the
//! classic 32x128 LED panel:
//!
//! | Setting | Default |
//! |---------|---------|
//! | Grid | 32 rows x 128 columns, 10 px cells |
//! | Tickers | AAPL, MSFT, NVDA, TSLA, AMZN |
//! | Scroll speed | 1 column per tick at 30 fps |
//! | Glyph scale | 3 (5x7 glyphs become 15x21) |
//! | Spacing | 1 blank column between glyphs, 8 after a message |
//! | Refresh | every 30 s |
//!
//! ## Usage
//!
//! ```
//! use tickerboard::config::MarqueeConfig;
//!
//! let config = MarqueeConfig {
//!     tickers: vec!["AAPL".to_string()],
//!     ..Default::default()
//! };
//! config.validate().unwrap();
//! assert_eq!(config.refresh_interval().as_secs(), 30);
//! ```
//!
//! Configs can also be loaded from JSON with [`MarqueeConfig::load`]; missing
//! fields take their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::TickerError;
use crate::render::Rgb;

/// Which glyph table renders the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FontKind {
    /// Built-in 5x7 LED font
    #[default]
    Builtin,
    /// Spleen 6x12 bitmap font
    Spleen,
}

/// How price fetches interact with the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Await the fetch on the tick that triggers it (stalls rendering while in flight)
    #[default]
    Blocking,
    /// Fetch in a background task; the last known price is shown until it lands
    Background,
}

/// Complete marquee configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarqueeConfig {
    /// LED rows
    pub rows: usize,
    /// LED columns
    pub cols: usize,
    /// On-screen size of one LED in pixels (display only)
    pub cell_size: usize,

    /// Ticker symbols, shown in order and wrapping around
    pub tickers: Vec<String>,

    /// Columns scrolled per tick
    pub scroll_speed: usize,
    /// Integer upscale applied to every glyph pixel
    pub scale: usize,
    /// Blank columns after each glyph
    pub char_spacing: usize,
    /// Blank columns after each complete message
    pub ticker_gap: usize,
    /// Target frames per second
    pub fps: u32,

    /// Seconds between price refreshes of the current ticker
    pub refresh_secs: u64,
    /// Per-request timeout for price fetches, in milliseconds
    pub fetch_timeout_ms: u64,
    /// Pause between the eager startup fetches, in milliseconds
    pub seed_delay_ms: u64,
    pub fetch_mode: FetchMode,

    pub font: FontKind,

    /// Text colour when the last move was flat or unknown
    pub color_neutral: Rgb,
    /// Text colour after an uptick
    pub color_up: Rgb,
    /// Text colour after a downtick
    pub color_down: Rgb,
    /// Fill for LEDs that are off
    pub background: Rgb,
    /// Grid line colour in PNG output
    pub line_color: Rgb,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            rows: 32,
            cols: 128,
            cell_size: 10,
            tickers: ["AAPL", "MSFT", "NVDA", "TSLA", "AMZN"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            scroll_speed: 1,
            scale: 3,
            char_spacing: 1,
            ticker_gap: 8,
            fps: 30,
            refresh_secs: 30,
            fetch_timeout_ms: 5_000,
            seed_delay_ms: 50,
            fetch_mode: FetchMode::Blocking,
            font: FontKind::Builtin,
            color_neutral: Rgb::new(255, 255, 255),
            color_up: Rgb::new(0, 255, 0),
            color_down: Rgb::new(255, 0, 0),
            background: Rgb::new(10, 10, 10),
            line_color: Rgb::new(50, 50, 50),
        }
    }
}

impl MarqueeConfig {
    /// Load a JSON config file. Fields not present keep their defaults.
    pub fn load(path: &Path) -> Result<Self, TickerError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Reject configurations the marquee cannot run with.
    pub fn validate(&self) -> Result<(), TickerError> {
        let checks: [(bool, &str); 9] = [
            (self.rows == 0, "rows must be positive"),
            (self.cols == 0, "cols must be positive"),
            (self.cell_size == 0, "cell_size must be positive"),
            (self.scroll_speed == 0, "scroll_speed must be positive"),
            (self.scale == 0, "scale must be positive"),
            (self.fps == 0, "fps must be positive"),
            (self.refresh_secs == 0, "refresh_secs must be positive"),
            (self.fetch_timeout_ms == 0, "fetch_timeout_ms must be positive"),
            (self.tickers.is_empty(), "at least one ticker is required"),
        ];
        if let Some((_, msg)) = checks.iter().find(|(failed, _)| *failed) {
            return Err(TickerError::Config(msg.to_string()));
        }

        if let Some(blank) = self.tickers.iter().position(|t| t.trim().is_empty()) {
            return Err(TickerError::Config(format!(
                "ticker #{} is blank",
                blank + 1
            )));
        }

        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn seed_delay(&self) -> Duration {
        Duration::from_millis(self.seed_delay_ms)
    }

    /// Time budget of one frame.
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}

// ============================================================================
// TESTS
// ============================================================================
