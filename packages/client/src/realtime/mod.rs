//! Real-time pipeline: connection, dispatch, fixed reactions, unread counter.

mod connection;
mod dispatcher;
mod invalidator;
mod resync;
mod unread;

pub use connection::{ConnectionStatus, RealtimeClient};
pub use dispatcher::{EventDispatcher, EventListener};
pub use invalidator::CacheInvalidator;
pub use resync::{resync_unread, spawn_unread_resync};
pub use unread::UnreadCounterStore;
