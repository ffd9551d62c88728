//! HTTP handlers for the server.

pub mod frame;
pub mod status;
