//! Utilities shared by the chatdesk crates: logging setup and clocks.

pub mod logger;
pub mod time;
