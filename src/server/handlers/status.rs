//! JSON status handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::config::MarqueeConfig;
use crate::ticker::BoardStatus;

use super::super::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub frame: u64,
    #[serde(flatten)]
    pub board: BoardStatus,
}

/// Handle GET /api/status - current ticker, message and prices.
pub async fn status(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, (StatusCode, &'static str)> {
    let latest = state.latest.read().await;
    let snapshot = latest
        .as_ref()
        .ok_or((StatusCode::SERVICE_UNAVAILABLE, "No frame yet"))?;
    Ok(Json(StatusResponse {
        frame: snapshot.frame_no,
        board: snapshot.status.clone(),
    }))
}

/// Handle GET /api/config - the running configuration.
pub async fn config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json::<MarqueeConfig>(state.marquee.clone())
}
