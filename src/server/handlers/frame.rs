//! Frame handlers: the live PNG and the page that polls it.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::render::png::encode_png;

use super::super::state::AppState;

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>tickerboard</title>
<style>
  body { background: #000; color: #aaa; font-family: monospace; margin: 2em; }
  img { image-rendering: pixelated; max-width: 100%; }
</style>
</head>
<body>
<img id="frame" src="/frame.png?v={{BOOT}}" alt="marquee">
<pre id="status"></pre>
<script>
  const img = document.getElementById('frame');
  const status = document.getElementById('status');
  setInterval(() => { img.src = '/frame.png?t=' + Date.now(); }, {{PERIOD_MS}});
  setInterval(async () => {
    const r = await fetch('/api/status');
    if (r.ok) {
      const s = await r.json();
      status.textContent = s.message + '   [' + (s.index + 1) + '/' + s.tickers.length + ']';
    }
  }, 1000);
</script>
</body>
</html>
"#;

/// Handle GET / - live preview page.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    // image polling capped at 10/s
    let period_ms = state.marquee.frame_period().as_millis().max(100);
    Html(
        INDEX_HTML
            .replace("{{BOOT}}", &state.boot_time.to_string())
            .replace("{{PERIOD_MS}}", &period_ms.to_string()),
    )
}

/// Handle GET /frame.png - latest frame as PNG.
pub async fn png(State(state): State<Arc<AppState>>) -> Response {
    let frame = match state.latest.read().await.as_ref() {
        Some(snapshot) => snapshot.frame.clone(),
        None => return (StatusCode::SERVICE_UNAVAILABLE, "No frame yet").into_response(),
    };

    match encode_png(&frame, state.marquee.cell_size, state.marquee.line_color) {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "image/png"),
                (header::CACHE_CONTROL, "no-store"),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Frame render failed: {}", e),
        )
            .into_response(),
    }
}
