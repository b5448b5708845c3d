//! Error types for the real-time pipeline.
//!
//! None of these reach the rendering layer: connection errors feed the
//! reconnect policy, sync errors are logged and retried on the next tick,
//! preference errors fall back to defaults.

use thiserror::Error;

/// Errors raised while opening the real-time socket
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The handshake failed (network error, rejected token, ...)
    #[error("Connection error: {0}")]
    ConnectFailed(String),
}

/// Errors raised while fetching the authoritative unread summary
#[derive(Debug, Error)]
pub enum SyncError {
    /// No access token is available for the request
    #[error("No access token available")]
    MissingToken,

    /// Transport or decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Unexpected status code: {0}")]
    Status(u16),
}

/// Errors raised by the persisted preference store
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Failed to access preference file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode preferences: {0}")]
    Json(#[from] serde_json::Error),
}
