//! Configuration for the real-time client.

use std::time::Duration;

/// Delay before a dropped socket is reopened
pub const RECONNECT_DELAY: Duration = Duration::from_millis(5000);

/// Window used to coalesce rapid acquire/release churn
pub const LIFECYCLE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Interval between authoritative unread-summary fetches
pub const UNREAD_RESYNC_INTERVAL: Duration = Duration::from_secs(30);

/// Runtime configuration of the real-time pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealtimeConfig {
    /// WebSocket endpoint, without the token query parameter
    pub ws_url: String,
    /// Base URL of the REST API (e.g. `http://127.0.0.1:8000/api`)
    pub api_base: String,
    /// Debounce window for acquire/release
    pub debounce: Duration,
    /// Fixed reconnect delay
    pub reconnect_delay: Duration,
    /// Unread resync interval
    pub resync_interval: Duration,
}

impl RealtimeConfig {
    /// Create a configuration with default timings
    pub fn new(ws_url: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            api_base: api_base.into(),
            debounce: LIFECYCLE_DEBOUNCE,
            reconnect_delay: RECONNECT_DELAY,
            resync_interval: UNREAD_RESYNC_INTERVAL,
        }
    }

    /// Build the socket URL for the given access token
    pub fn socket_url(&self, token: &str) -> String {
        let separator = if self.ws_url.contains('?') { '&' } else { '?' };
        format!("{}{}token={}", self.ws_url, separator, token)
    }

    /// Build a REST endpoint URL below `api_base`
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self::new("ws://127.0.0.1:8000/ws", "http://127.0.0.1:8000/api")
    }
}
