//! # Error Types
//!
//! This module defines error types used throughout the tickerboard library.
//!
//! Quote failures have their own [`QuoteError`](crate::quote::QuoteError);
//! they are normally absorbed at the feed boundary and only reach this type
//! from code that talks to a price source directly.

use thiserror::Error;

use crate::quote::QuoteError;

/// Main error type for tickerboard operations
#[derive(Debug, Error)]
pub enum TickerError {
    /// Invalid or inconsistent configuration, rejected before the loop starts
    #[error("Config error: {0}")]
    Config(String),

    /// Price source failure surfaced outside a feed
    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    /// Display backend failure (terminal, web preview)
    #[error("Display error: {0}")]
    Display(String),

    /// Frame encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// HTTP preview server error
    #[error("Server error: {0}")]
    Server(String),

    /// JSON parse error (config files)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
