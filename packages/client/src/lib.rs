//! Real-time event pipeline for the chatdesk CRM client.
//!
//! One WebSocket per process carries backend events. Each frame is parsed into
//! a [`domain::RealtimeEvent`], applied to the request cache and the unread
//! counter, and then handed to every registered listener (the notification
//! presenter among them).

// layers
pub mod domain;
pub mod infrastructure;
pub mod notification;
pub mod realtime;

// terminal front-end
pub mod console;

// shared pieces
pub mod config;
pub mod error;
pub mod observable;
