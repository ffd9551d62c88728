//! # HTTP Preview Server
//!
//! Serves the running marquee to a browser. The frame loop publishes every
//! frame through [`WebDisplay`]; handlers read the latest one on demand.
//!
//! ## Usage
//!
//! ```bash
//! tickerboard serve --listen 0.0.0.0:8080 --tickers AAPL,MSFT
//! ```
//!
//! Then open http://localhost:8080 in a browser.
//!
//! ## Routes
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | Auto-refreshing preview page |
//! | `GET /frame.png` | Latest frame, one `cell_size` square per LED |
//! | `GET /api/status` | Current ticker, message, offset and prices |
//! | `GET /api/config` | The running [`MarqueeConfig`] |
//!
//! `/frame.png` and `/api/status` answer `503` until the first frame exists.

mod handlers;
mod state;

pub use state::{AppState, ServerConfig, Snapshot};

use async_trait::async_trait;
use axum::{routing::get, Router};
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::MarqueeConfig;
use crate::display::Display;
use crate::error::TickerError;
use crate::ticker::TickerBoard;

/// Build the preview router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::frame::index))
        .route("/frame.png", get(handlers::frame::png))
        .route("/api/status", get(handlers::status::status))
        .route("/api/config", get(handlers::status::config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and run until `shutdown` resolves.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tickerboard::config::MarqueeConfig;
/// use tickerboard::server::{serve, AppState, ServerConfig};
///
/// # async fn example() -> Result<(), tickerboard::TickerError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
/// };
/// let state = Arc::new(AppState::new(MarqueeConfig::default()));
///
/// serve(config, state, std::future::pending()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(
    config: ServerConfig,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), TickerError> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| TickerError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e)))?;

    tracing::info!("preview listening on http://{}/", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| TickerError::Server(format!("Server error: {}", e)))?;

    Ok(())
}

/// Publishes each presented frame to the preview server.
pub struct WebDisplay {
    state: Arc<AppState>,
    frames: u64,
}

impl WebDisplay {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state, frames: 0 }
    }

    /// Shared state for the router.
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Convenience constructor for a fresh state.
    pub fn for_config(marquee: MarqueeConfig) -> Self {
        Self::new(Arc::new(AppState::new(marquee)))
    }
}

#[async_trait]
impl Display for WebDisplay {
    fn name(&self) -> &'static str {
        "web"
    }

    async fn present(&mut self, board: &TickerBoard) -> Result<(), TickerError> {
        self.frames += 1;
        self.state
            .publish(Snapshot {
                frame: board.render(),
                status: board.status(),
                frame_no: self.frames,
            })
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn small_config() -> MarqueeConfig {
        MarqueeConfig {
            rows: 8,
            cols: 16,
            cell_size: 2,
            scale: 1,
            tickers: vec!["AAPL".to_string()],
            ..Default::default()
        }
    }

    async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_frame_unavailable_before_first_present() {
        let state = Arc::new(AppState::new(small_config()));
        let (status, _) = get(state.clone(), "/frame.png").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let (status, _) = get(state, "/api/status").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_frame_png_after_present() {
        let mut display = WebDisplay::for_config(small_config());
        let board = TickerBoard::new(small_config()).unwrap();
        display.present(&board).await.unwrap();

        let (status, body) = get(display.state(), "/frame.png").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..8], b"\x89PNG\r\n\x1a\n");

        let image = image::load_from_memory(&body).unwrap();
        assert_eq!(image.width(), 32);
        assert_eq!(image.height(), 16);
    }

    #[tokio::test]
    async fn test_status_json() {
        let mut display = WebDisplay::for_config(small_config());
        let board = TickerBoard::new(small_config()).unwrap();
        display.present(&board).await.unwrap();
        display.present(&board).await.unwrap();

        let (status, body) = get(display.state(), "/api/status").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["frame"], 2);
        assert_eq!(json["symbol"], "AAPL");
        assert_eq!(json["message"], "- AAPL");
        assert_eq!(json["offset"], 16);
    }

    #[tokio::test]
    async fn test_config_json() {
        let state = Arc::new(AppState::new(small_config()));
        let (status, body) = get(state, "/api/config").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["cols"], 16);
        assert_eq!(json["tickers"][0], "AAPL");
        assert_eq!(json["color_up"], "#00ff00");
    }

    #[tokio::test]
    async fn test_index_page() {
        let state = Arc::new(AppState::new(small_config()));
        let (status, body) = get(state, "/").await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("/frame.png"));
        assert!(!html.contains("{{"));
    }
}
