//! Implementations of the pipeline's ports.
//!
//! - `websocket`: socket connector on top of `tokio-tungstenite`
//! - `cache`: in-memory request cache
//! - `preference`: file-backed and in-memory preference stores
//! - `http`: unread summary over the REST API
//! - `auth`: token holder

pub mod auth;
pub mod cache;
pub mod http;
pub mod preference;
pub mod websocket;

pub use auth::StaticTokenSource;
pub use cache::InMemoryRequestCache;
pub use http::HttpUnreadSummarySource;
pub use preference::{FilePreferenceStore, InMemoryPreferenceStore};
pub use websocket::WebSocketConnector;
