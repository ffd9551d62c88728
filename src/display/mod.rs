//! # Displays
//!
//! A [`Display`] shows the board once per tick and tells the loop when the
//! viewer wants out. The loop itself ([`run`]) is single-threaded and paced by
//! a fixed-rate timer:
//!
//! ```text
//! every 1/fps s ──► board.tick() ──► display.present() ──► display.should_quit()?
//!        ▲                                                        │ no
//!        └────────────────────────────────────────────────────────┘
//! ```
//!
//! Frames that fall behind (e.g. during a blocking price fetch) are skipped
//! rather than replayed in a burst.
//!
//! ## Available Displays
//!
//! - [`terminal`]: truecolor half-block rendering in the terminal
//! - [`crate::server::WebDisplay`]: publishes frames to the HTTP preview

pub mod terminal;

pub use terminal::TerminalDisplay;

use async_trait::async_trait;
use std::future::Future;
use std::time::Instant;
use tokio::time::MissedTickBehavior;

use crate::error::TickerError;
use crate::quote::QuoteFeed;
use crate::ticker::{TickEvent, TickerBoard};

/// Something that can show the marquee.
#[async_trait]
pub trait Display: Send {
    /// Display name (lowercase, e.g. "terminal").
    fn name(&self) -> &'static str;

    /// Show the board's current frame.
    async fn present(&mut self, board: &TickerBoard) -> Result<(), TickerError>;

    /// Polled once per tick; `true` stops the loop.
    fn should_quit(&mut self) -> bool {
        false
    }

    /// Release display resources. Called once when the loop exits.
    fn close(&mut self) -> Result<(), TickerError> {
        Ok(())
    }
}

/// Loop limits, mostly for tests and demos.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Stop after this many frames
    pub max_frames: Option<u64>,
}

/// Run until Ctrl-C or the display asks to quit. Returns the frame count.
pub async fn run(
    board: &mut TickerBoard,
    feed: &mut dyn QuoteFeed,
    display: &mut dyn Display,
    options: RunOptions,
) -> Result<u64, TickerError> {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };
    run_until(board, feed, display, options, ctrl_c).await
}

/// Run until `shutdown` resolves, the display asks to quit, or the frame
/// limit is reached.
pub async fn run_until(
    board: &mut TickerBoard,
    feed: &mut dyn QuoteFeed,
    display: &mut dyn Display,
    options: RunOptions,
    shutdown: impl Future<Output = ()>,
) -> Result<u64, TickerError> {
    let mut pacer = tokio::time::interval(board.config().frame_period());
    pacer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let display_name = display.name();
    tracing::info!(
        display = display_name,
        fps = board.config().fps,
        tickers = board.tickers().len(),
        "marquee running"
    );

    let mut frames = 0u64;
    let result = loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!("shutdown signal received");
                break Ok(());
            }
            _ = pacer.tick() => {}
        }

        match board.tick(Instant::now(), feed).await {
            TickEvent::Scrolled => {}
            event => tracing::debug!(?event, message = board.message(), "message rebuilt"),
        }

        if let Err(e) = display.present(board).await {
            break Err(e);
        }
        frames += 1;

        if display.should_quit() {
            tracing::info!(display = display_name, "display closed");
            break Ok(());
        }
        if options.max_frames.is_some_and(|limit| frames >= limit) {
            break Ok(());
        }
    };

    display.close()?;
    result.map(|_| frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarqueeConfig;

    struct NullFeed;

    #[async_trait]
    impl QuoteFeed for NullFeed {
        async fn get_price(&mut self, _symbol: &str) -> Option<f64> {
            None
        }
    }

    #[derive(Default)]
    struct Recorder {
        offsets: Vec<i64>,
        quit_after: Option<usize>,
        closed: bool,
    }

    #[async_trait]
    impl Display for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        async fn present(&mut self, board: &TickerBoard) -> Result<(), TickerError> {
            self.offsets.push(board.offset());
            Ok(())
        }

        fn should_quit(&mut self) -> bool {
            self.quit_after.is_some_and(|n| self.offsets.len() >= n)
        }

        fn close(&mut self) -> Result<(), TickerError> {
            self.closed = true;
            Ok(())
        }
    }

    fn board() -> TickerBoard {
        TickerBoard::new(MarqueeConfig {
            tickers: vec!["AAPL".to_string()],
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_limit() {
        let mut board = board();
        let mut display = Recorder::default();
        let frames = run_until(
            &mut board,
            &mut NullFeed,
            &mut display,
            RunOptions { max_frames: Some(5) },
            std::future::pending(),
        )
        .await
        .unwrap();

        assert_eq!(frames, 5);
        assert_eq!(display.offsets, vec![127, 126, 125, 124, 123]);
        assert!(display.closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_display_quit() {
        let mut board = board();
        let mut display = Recorder {
            quit_after: Some(3),
            ..Default::default()
        };
        let frames = run_until(
            &mut board,
            &mut NullFeed,
            &mut display,
            RunOptions::default(),
            std::future::pending(),
        )
        .await
        .unwrap();
        assert_eq!(frames, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_signal() {
        let mut board = board();
        let mut display = Recorder::default();
        let frames = run_until(
            &mut board,
            &mut NullFeed,
            &mut display,
            RunOptions::default(),
            std::future::ready(()),
        )
        .await
        .unwrap();
        assert_eq!(frames, 0);
        assert!(display.closed);
    }
}
