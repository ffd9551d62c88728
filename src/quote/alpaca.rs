//! # Alpaca Market Data Source
//!
//! Fetches the latest trade price for a US equity from the Alpaca market
//! data API:
//!
//! ```text
//! GET {base_url}/v2/stocks/{SYMBOL}/trades/latest
//! APCA-API-KEY-ID: <key id>
//! APCA-API-SECRET-KEY: <secret>
//!
//! 200 {"symbol": "AAPL", "trade": {"t": "...", "p": 150.02, "s": 100, ...}}
//! ```
//!
//! Only the trade price (`p`) is used. Requests time out after the
//! configured fetch timeout.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{round_cents, PriceSource, QuoteError};

/// Default market data endpoint.
pub const DEFAULT_BASE_URL: &str = "https://data.alpaca.markets";

/// Connection settings for [`AlpacaSource`].
#[derive(Debug, Clone)]
pub struct AlpacaConfig {
    pub base_url: String,
    pub key_id: String,
    pub secret_key: String,
}

impl AlpacaConfig {
    pub fn new(key_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            key_id: key_id.into(),
            secret_key: secret_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestTradeResponse {
    trade: Option<Trade>,
}

#[derive(Debug, Deserialize)]
struct Trade {
    #[serde(rename = "p")]
    price: f64,
}

/// Extract the trade price from a latest-trade response body.
fn parse_latest_trade(symbol: &str, body: &str) -> Result<f64, QuoteError> {
    let response: LatestTradeResponse =
        serde_json::from_str(body).map_err(|e| QuoteError::Decode {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;

    response
        .trade
        .map(|t| round_cents(t.price))
        .ok_or_else(|| QuoteError::Decode {
            symbol: symbol.to_string(),
            reason: "response has no trade".to_string(),
        })
}

/// Latest-trade price source backed by the Alpaca HTTP API.
pub struct AlpacaSource {
    client: reqwest::Client,
    config: AlpacaConfig,
}

impl AlpacaSource {
    pub fn new(config: AlpacaConfig, timeout: Duration) -> Result<Self, QuoteError> {
        let client = reqwest::Client::builder()
            .user_agent("tickerboard/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self { client, config })
    }

    fn trade_url(&self, symbol: &str) -> String {
        format!(
            "{}/v2/stocks/{}/trades/latest",
            self.config.base_url.trim_end_matches('/'),
            symbol.trim().to_uppercase()
        )
    }
}

#[async_trait]
impl PriceSource for AlpacaSource {
    fn name(&self) -> &'static str {
        "alpaca"
    }

    async fn latest_price(&self, symbol: &str) -> Result<f64, QuoteError> {
        let response = self
            .client
            .get(self.trade_url(symbol))
            .header("APCA-API-KEY-ID", &self.config.key_id)
            .header("APCA-API-SECRET-KEY", &self.config.secret_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Status {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_latest_trade(symbol, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_latest_trade() {
        let body = r#"{"symbol":"AAPL","trade":{"t":"2024-05-01T15:59:59Z","x":"V","p":150.004,"s":100,"c":["@"],"i":1,"z":"C"}}"#;
        assert_eq!(parse_latest_trade("AAPL", body).unwrap(), 150.0);
    }

    #[test]
    fn test_parse_missing_trade() {
        let err = parse_latest_trade("AAPL", r#"{"symbol":"AAPL"}"#).unwrap_err();
        assert!(matches!(err, QuoteError::Decode { .. }));
    }

    #[test]
    fn test_parse_garbage() {
        let err = parse_latest_trade("AAPL", "<html>rate limited</html>").unwrap_err();
        assert!(err.to_string().contains("AAPL"));
    }

    #[test]
    fn test_trade_url() {
        let mut config = AlpacaConfig::new("id", "secret");
        config.base_url = "http://localhost:9000/".to_string();
        let source = AlpacaSource::new(config, Duration::from_secs(1)).unwrap();
        assert_eq!(
            source.trade_url(" msft "),
            "http://localhost:9000/v2/stocks/MSFT/trades/latest"
        );
    }
}
