//! Offline random-walk price source.
//!
//! Each symbol starts somewhere between $20 and $500 and moves by up to ±1%
//! per request. An optional failure rate makes some requests error, which is
//! handy for watching the marquee ride out a flaky provider.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Mutex;

use super::{round_cents, PriceSource, QuoteError};

/// Largest relative move per request.
const MAX_STEP: f64 = 0.01;

struct WalkState {
    rng: StdRng,
    prices: HashMap<String, f64>,
}

pub struct SimulatedSource {
    state: Mutex<WalkState>,
    failure_rate: f64,
}

impl SimulatedSource {
    /// A random walk. The same seed always produces the same prices.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        Self {
            state: Mutex::new(WalkState {
                rng: StdRng::seed_from_u64(seed),
                prices: HashMap::new(),
            }),
            failure_rate: 0.0,
        }
    }

    /// Fail this fraction of requests (clamped to 0..=1). A non-finite rate
    /// counts as 0.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = if rate.is_finite() { rate.clamp(0.0, 1.0) } else { 0.0 };
        self
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }
}

#[async_trait]
impl PriceSource for SimulatedSource {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn latest_price(&self, symbol: &str) -> Result<f64, QuoteError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| QuoteError::Unavailable("simulator state poisoned".to_string()))?;
        let WalkState { rng, prices } = &mut *state;

        if rng.random_bool(self.failure_rate) {
            return Err(QuoteError::Unavailable(format!(
                "simulated outage for {}",
                symbol
            )));
        }

        let price = match prices.get(symbol) {
            Some(&last) => {
                let step = rng.random_range(-MAX_STEP..=MAX_STEP);
                round_cents((last * (1.0 + step)).max(0.01))
            }
            None => round_cents(rng.random_range(20.0..500.0)),
        };
        prices.insert(symbol.to_string(), price);
        Ok(price)
    }
}
