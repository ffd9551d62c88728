//! # Price Quotes
//!
//! Two layers sit between the marquee and the outside world:
//!
//! - a [`PriceSource`] talks to a provider and may fail in any number of ways;
//! - a [`QuoteFeed`] wraps a source for the frame loop and never fails: errors
//!   are logged and come back as "no price" (`None`).
//!
//! Sources return prices only. Whether a ticker moved up or down is decided by
//! the marquee against its own history (see [`crate::ticker::TickerState`]).
//!
//! ## Available Sources
//!
//! - [`alpaca`]: latest trade from the Alpaca market data HTTP API
//! - [`simulated`]: seeded random walk, no network
//!
//! ## Feeds
//!
//! | Feed | Behaviour |
//! |------|-----------|
//! | [`BlockingFeed`] | awaits the fetch on the calling tick, bounded by a timeout |
//! | [`BackgroundFeed`] | spawns the fetch and returns whatever finished last time |

pub mod alpaca;
pub mod background;
pub mod simulated;

pub use alpaca::{AlpacaConfig, AlpacaSource};
pub use background::BackgroundFeed;
pub use simulated::SimulatedSource;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::FetchMode;

/// Errors a price source can report.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} for {symbol}")]
    Status { symbol: String, status: u16 },

    #[error("Malformed quote for {symbol}: {reason}")]
    Decode { symbol: String, reason: String },

    #[error("Quote request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Quote unavailable: {0}")]
    Unavailable(String),
}

/// A provider of latest prices.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Source name (lowercase, e.g. "alpaca").
    fn name(&self) -> &'static str;

    /// Latest price for `symbol`.
    async fn latest_price(&self, symbol: &str) -> Result<f64, QuoteError>;
}

/// The marquee's view of a price source. Implementations must not fail:
/// anything that goes wrong is reported as `None`.
#[async_trait]
pub trait QuoteFeed: Send {
    async fn get_price(&mut self, symbol: &str) -> Option<f64>;
}

/// Round to whole cents.
#[inline]
pub fn round_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

/// Fetch with a deadline and sanity-check the result.
pub(crate) async fn fetch_checked(
    source: &dyn PriceSource,
    symbol: &str,
    timeout: Duration,
) -> Result<f64, QuoteError> {
    let price = tokio::time::timeout(timeout, source.latest_price(symbol))
        .await
        .map_err(|_| QuoteError::Timeout(timeout))??;

    if !price.is_finite() || price < 0.0 {
        return Err(QuoteError::Decode {
            symbol: symbol.to_string(),
            reason: format!("implausible price {}", price),
        });
    }
    Ok(round_cents(price))
}

/// Feed that awaits every fetch in line with the frame loop.
///
/// A slow provider stalls rendering for up to `timeout`.
pub struct BlockingFeed {
    source: Arc<dyn PriceSource>,
    timeout: Duration,
}

impl BlockingFeed {
    pub fn new(source: Arc<dyn PriceSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }
}

#[async_trait]
impl QuoteFeed for BlockingFeed {
    async fn get_price(&mut self, symbol: &str) -> Option<f64> {
        match fetch_checked(self.source.as_ref(), symbol, self.timeout).await {
            Ok(price) => Some(price),
            Err(e) => {
                tracing::warn!(symbol = %symbol, source = self.source.name(), "price fetch failed: {e}");
                None
            }
        }
    }
}

/// Build the feed for a configured fetch mode.
pub fn feed_for(mode: FetchMode, source: Arc<dyn PriceSource>, timeout: Duration) -> Box<dyn QuoteFeed> {
    match mode {
        FetchMode::Blocking => Box::new(BlockingFeed::new(source, timeout)),
        FetchMode::Background => Box::new(BackgroundFeed::new(source, timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<f64, &'static str>);

    #[async_trait]
    impl PriceSource for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn latest_price(&self, _symbol: &str) -> Result<f64, QuoteError> {
            self.0.map_err(|e| QuoteError::Unavailable(e.to_string()))
        }
    }

    struct Stalled;

    #[async_trait]
    impl PriceSource for Stalled {
        fn name(&self) -> &'static str {
            "stalled"
        }

        async fn latest_price(&self, _symbol: &str) -> Result<f64, QuoteError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(1.0)
        }
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(150.004), 150.0);
        assert_eq!(round_cents(150.006), 150.01);
        assert_eq!(round_cents(0.0), 0.0);
    }

    #[tokio::test]
    async fn test_blocking_feed_success() {
        let mut feed = BlockingFeed::new(Arc::new(Fixed(Ok(123.456))), Duration::from_secs(1));
        assert_eq!(feed.get_price("AAPL").await, Some(123.46));
    }

    #[tokio::test]
    async fn test_blocking_feed_swallows_errors() {
        let mut feed = BlockingFeed::new(Arc::new(Fixed(Err("down"))), Duration::from_secs(1));
        assert_eq!(feed.get_price("AAPL").await, None);
    }

    #[tokio::test]
    async fn test_blocking_feed_rejects_nonsense() {
        let mut feed = BlockingFeed::new(Arc::new(Fixed(Ok(f64::NAN))), Duration::from_secs(1));
        assert_eq!(feed.get_price("AAPL").await, None);
        let mut feed = BlockingFeed::new(Arc::new(Fixed(Ok(-3.0))), Duration::from_secs(1));
        assert_eq!(feed.get_price("AAPL").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocking_feed_times_out() {
        let mut feed = BlockingFeed::new(Arc::new(Stalled), Duration::from_millis(50));
        assert_eq!(feed.get_price("AAPL").await, None);
    }
}
