//! Server state and configuration.

use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

use crate::config::MarqueeConfig;
use crate::render::Frame;
use crate::ticker::BoardStatus;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
}

/// The most recently presented frame.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub frame: Frame,
    pub status: BoardStatus,
    /// Frames presented since startup
    pub frame_no: u64,
}

/// Application state shared across handlers.
pub struct AppState {
    pub marquee: MarqueeConfig,
    /// `None` until the first frame has been presented.
    pub latest: RwLock<Option<Snapshot>>,
    /// Unix timestamp of server boot for cache busting.
    pub boot_time: u64,
}

impl AppState {
    pub fn new(marquee: MarqueeConfig) -> Self {
        let boot_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self {
            marquee,
            latest: RwLock::new(None),
            boot_time,
        }
    }

    pub async fn publish(&self, snapshot: Snapshot) {
        *self.latest.write().await = Some(snapshot);
    }
}
