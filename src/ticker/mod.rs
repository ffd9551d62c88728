//! # Ticker Rotation
//!
//! [`TickerBoard`] owns everything that changes while the marquee runs: the
//! LED grid, the per-ticker price memory and the scroll cursor.
//!
//! ## Scrolling
//!
//! The active message is a [`ColumnSequence`]. `offset` starts at the grid
//! width and drops by one per column step; the column entering on the right is
//! `sequence[-offset]`, or blank when that index is outside the message:
//!
//! ```text
//! offset = cols      ........................|        message fully off-screen right
//! offset = 0         ........................|#       column 0 enters
//! offset = -len      ####....................|.       last column has entered
//! offset < -len      → advance to the next ticker
//! ```
//!
//! ## Per-tick order
//!
//! 1. Scroll `scroll_speed` column steps.
//! 2. If the message has fully scrolled past (`offset < -len`), advance to the
//!    next ticker (round-robin), fetch it, rebuild, restart the refresh timer.
//! 3. Otherwise, if the refresh interval has elapsed since the last rebuild,
//!    fetch the current ticker and rebuild. This restarts the message from the
//!    right edge even when it was halfway across.
//!
//! A rebuild always replaces the whole sequence and resets `offset` to the
//! grid width. Fetch failures keep the last price and colour the text neutral.

pub mod state;

pub use state::{Direction, TickerState};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::config::MarqueeConfig;
use crate::error::TickerError;
use crate::quote::QuoteFeed;
use crate::render::{ColumnSequence, Compositor, Frame, Grid, PixelColumn, Rgb};

/// What a call to [`TickerBoard::tick`] did besides scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Only scrolled
    Scrolled,
    /// Refetched the current ticker and restarted its message
    Refreshed,
    /// Moved on to the next ticker
    Advanced,
}

/// Read-only snapshot of the board, for status displays.
#[derive(Debug, Clone, Serialize)]
pub struct BoardStatus {
    pub symbol: String,
    pub index: usize,
    pub message: String,
    pub offset: i64,
    pub message_columns: usize,
    pub refreshed_at: DateTime<Utc>,
    pub tickers: Vec<TickerState>,
}

struct ScrollCursor {
    index: usize,
    text: String,
    sequence: ColumnSequence,
    offset: i64,
    last_refresh: Instant,
    refreshed_at: DateTime<Utc>,
}

/// The ticker rotation state machine.
pub struct TickerBoard {
    config: MarqueeConfig,
    compositor: Compositor,
    grid: Grid,
    tickers: Vec<TickerState>,
    cursor: ScrollCursor,
    blank: PixelColumn,
}

impl TickerBoard {
    /// Build a board with no prices known yet. The first message is ready
    /// to scroll in from the right.
    pub fn new(config: MarqueeConfig) -> Result<Self, TickerError> {
        config.validate()?;

        let compositor = Compositor::from_config(&config);
        let grid = Grid::new(config.rows, config.cols, config.background);
        let tickers: Vec<TickerState> = config
            .tickers
            .iter()
            .map(|s| TickerState::new(s.trim().to_uppercase()))
            .collect();
        let text = tickers[0].message();
        let sequence = compositor.compose_message(&text);

        Ok(Self {
            cursor: ScrollCursor {
                index: 0,
                text,
                sequence,
                offset: config.cols as i64,
                last_refresh: Instant::now(),
                refreshed_at: Utc::now(),
            },
            blank: PixelColumn::blank(config.rows),
            config,
            compositor,
            grid,
            tickers,
        })
    }

    /// Build a board and prime it: every ticker is fetched once (pausing
    /// `seed_delay` between requests), then the first ticker is fetched again
    /// so its opening message shows a real direction.
    pub async fn start(config: MarqueeConfig, feed: &mut dyn QuoteFeed) -> Result<Self, TickerError> {
        let mut board = Self::new(config)?;
        board.seed(feed).await;
        board.refresh(Instant::now(), feed).await;
        Ok(board)
    }

    async fn seed(&mut self, feed: &mut dyn QuoteFeed) {
        let delay = self.config.seed_delay();
        let count = self.tickers.len();
        for i in 0..count {
            let symbol = self.tickers[i].symbol.clone();
            let fetched = feed.get_price(&symbol).await;
            self.tickers[i].seed(fetched);
            match fetched {
                Some(price) => tracing::info!(symbol = %symbol, price, "seeded"),
                None => tracing::warn!(symbol = %symbol, "no price at startup"),
            }
            if i + 1 < count && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Advance one frame. `now` drives the refresh timer.
    pub async fn tick(&mut self, now: Instant, feed: &mut dyn QuoteFeed) -> TickEvent {
        for _ in 0..self.config.scroll_speed {
            self.step();
        }

        if self.cursor.offset < -(self.cursor.sequence.len() as i64) {
            self.advance(now, feed).await;
            return TickEvent::Advanced;
        }

        if now.saturating_duration_since(self.cursor.last_refresh) >= self.config.refresh_interval() {
            self.refresh(now, feed).await;
            return TickEvent::Refreshed;
        }

        TickEvent::Scrolled
    }

    /// Scroll one column: shift the grid and draw the incoming column.
    pub fn step(&mut self) {
        let color = self.color();
        let last = self.grid.cols() - 1;

        self.grid.shift_left();
        self.cursor.offset -= 1;

        let incoming = usize::try_from(-self.cursor.offset)
            .ok()
            .and_then(|i| self.cursor.sequence.get(i))
            .unwrap_or(&self.blank);
        self.grid.write_column(last, incoming, color);
    }

    /// Refetch the current ticker and restart its message.
    pub async fn refresh(&mut self, now: Instant, feed: &mut dyn QuoteFeed) {
        let index = self.cursor.index;
        let symbol = self.tickers[index].symbol.clone();
        let fetched = feed.get_price(&symbol).await;
        let direction = self.tickers[index].apply(fetched);

        match fetched {
            Some(price) => tracing::debug!(symbol = %symbol, price, ?direction, "price refreshed"),
            None => tracing::warn!(symbol = %symbol, "no fresh price, holding last"),
        }

        self.rebuild(now);
    }

    /// Switch to the next ticker (wrapping), fetch it and start its message.
    pub async fn advance(&mut self, now: Instant, feed: &mut dyn QuoteFeed) {
        self.cursor.index = (self.cursor.index + 1) % self.tickers.len();
        tracing::debug!(symbol = %self.tickers[self.cursor.index].symbol, "next ticker");
        self.refresh(now, feed).await;
    }

    fn rebuild(&mut self, now: Instant) {
        let text = self.tickers[self.cursor.index].message();
        self.cursor.sequence = self.compositor.compose_message(&text);
        self.cursor.text = text;
        self.cursor.offset = self.config.cols as i64;
        self.cursor.last_refresh = now;
        self.cursor.refreshed_at = Utc::now();
    }

    pub fn config(&self) -> &MarqueeConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn render(&self) -> Frame {
        self.grid.render()
    }

    pub fn offset(&self) -> i64 {
        self.cursor.offset
    }

    pub fn current_index(&self) -> usize {
        self.cursor.index
    }

    pub fn current(&self) -> &TickerState {
        &self.tickers[self.cursor.index]
    }

    pub fn tickers(&self) -> &[TickerState] {
        &self.tickers
    }

    /// Text of the message currently scrolling.
    pub fn message(&self) -> &str {
        &self.cursor.text
    }

    pub fn sequence(&self) -> &ColumnSequence {
        &self.cursor.sequence
    }

    /// When the current message was last rebuilt.
    pub fn last_refresh(&self) -> Instant {
        self.cursor.last_refresh
    }

    /// Time left before the next scheduled refresh.
    pub fn until_refresh(&self, now: Instant) -> Duration {
        self.config
            .refresh_interval()
            .saturating_sub(now.saturating_duration_since(self.cursor.last_refresh))
    }

    /// Colour of lit pixels for the current ticker.
    pub fn color(&self) -> Rgb {
        self.current().direction.color(&self.config)
    }

    pub fn status(&self) -> BoardStatus {
        BoardStatus {
            symbol: self.current().symbol.clone(),
            index: self.cursor.index,
            message: self.cursor.text.clone(),
            offset: self.cursor.offset,
            message_columns: self.cursor.sequence.len(),
            refreshed_at: self.cursor.refreshed_at,
            tickers: self.tickers.clone(),
        }
    }
}
