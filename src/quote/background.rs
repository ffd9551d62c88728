//! Non-blocking quote feed.
//!
//! Every call returns immediately. The first request for a symbol starts a
//! fetch on the tokio runtime and reports `None` ("pending"); the next request
//! collects that result and starts the following fetch. The marquee therefore
//! never waits on the network, at the cost of showing prices one refresh old.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot::{self, error::TryRecvError};

use super::{fetch_checked, PriceSource, QuoteFeed};

/// Feed that fetches on a spawned task and never waits on the network.
pub struct BackgroundFeed {
    source: Arc<dyn PriceSource>,
    timeout: Duration,
    in_flight: HashMap<String, oneshot::Receiver<Option<f64>>>,
}

impl BackgroundFeed {
    pub fn new(source: Arc<dyn PriceSource>, timeout: Duration) -> Self {
        Self {
            source,
            timeout,
            in_flight: HashMap::new(),
        }
    }

    /// Whether a fetch for `symbol` has been started and not yet collected.
    pub fn is_pending(&self, symbol: &str) -> bool {
        self.in_flight.contains_key(symbol)
    }

    fn spawn_fetch(&mut self, symbol: &str) {
        let (tx, rx) = oneshot::channel();
        let source = Arc::clone(&self.source);
        let timeout = self.timeout;
        let owned = symbol.to_string();

        tokio::spawn(async move {
            let price = match fetch_checked(source.as_ref(), &owned, timeout).await {
                Ok(price) => Some(price),
                Err(e) => {
                    tracing::warn!(symbol = %owned, source = source.name(), "background price fetch failed: {e}");
                    None
                }
            };
            // receiver gone means the feed was dropped
            let _ = tx.send(price);
        });

        self.in_flight.insert(symbol.to_string(), rx);
    }

    /// Take a finished result for `symbol`, if any. `None` while still running.
    fn collect(&mut self, symbol: &str) -> Option<Option<f64>> {
        let rx = self.in_flight.get_mut(symbol)?;
        match rx.try_recv() {
            Ok(price) => {
                self.in_flight.remove(symbol);
                Some(price)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => {
                self.in_flight.remove(symbol);
                Some(None)
            }
        }
    }
}

#[async_trait]
impl QuoteFeed for BackgroundFeed {
    async fn get_price(&mut self, symbol: &str) -> Option<f64> {
        let finished = self.collect(symbol);
        if !self.is_pending(symbol) {
            self.spawn_fetch(symbol);
        }
        if finished.is_none() {
            tracing::debug!(symbol = %symbol, "price fetch still pending");
        }
        finished.flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::QuoteError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns 10.0, 11.0, 12.0, ... and counts calls.
    struct Counter(AtomicUsize);

    #[async_trait]
    impl PriceSource for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        async fn latest_price(&self, _symbol: &str) -> Result<f64, QuoteError> {
            let n = self.0.fetch_add(1, Ordering::SeqCst);
            Ok(10.0 + n as f64)
        }
    }

    struct Broken;

    #[async_trait]
    impl PriceSource for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn latest_price(&self, symbol: &str) -> Result<f64, QuoteError> {
            Err(QuoteError::Unavailable(symbol.to_string()))
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn test_first_call_is_pending() {
        let mut feed = BackgroundFeed::new(Arc::new(Counter(AtomicUsize::new(0))), Duration::from_secs(1));
        assert_eq!(feed.get_price("AAPL").await, None);
        assert!(feed.is_pending("AAPL"));
    }

    #[tokio::test]
    async fn test_result_collected_on_next_call() {
        let source = Arc::new(Counter(AtomicUsize::new(0)));
        let mut feed = BackgroundFeed::new(source.clone(), Duration::from_secs(1));

        assert_eq!(feed.get_price("AAPL").await, None);
        settle().await;
        assert_eq!(feed.get_price("AAPL").await, Some(10.0));
        // a follow-up fetch was started
        assert!(feed.is_pending("AAPL"));
        settle().await;
        assert_eq!(feed.get_price("AAPL").await, Some(11.0));
        settle().await;
        assert_eq!(source.0.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_symbols_are_independent() {
        let mut feed = BackgroundFeed::new(Arc::new(Counter(AtomicUsize::new(0))), Duration::from_secs(1));
        assert_eq!(feed.get_price("AAPL").await, None);
        assert_eq!(feed.get_price("MSFT").await, None);
        assert!(feed.is_pending("AAPL") && feed.is_pending("MSFT"));
    }

    #[tokio::test]
    async fn test_failures_report_none() {
        let mut feed = BackgroundFeed::new(Arc::new(Broken), Duration::from_secs(1));
        assert_eq!(feed.get_price("AAPL").await, None);
        settle().await;
        assert_eq!(feed.get_price("AAPL").await, None);
        assert!(feed.is_pending("AAPL"));
    }
}
