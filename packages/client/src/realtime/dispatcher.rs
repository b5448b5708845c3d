//! Event dispatcher: parses frames and fans events out to listeners.

use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{Arc, Mutex},
};

use crate::{domain::RealtimeEvent, observable::lock};

use super::{invalidator::CacheInvalidator, unread::UnreadCounterStore};

/// Receives every dispatched event
pub trait EventListener: Send + Sync {
    fn on_event(&self, event: &RealtimeEvent);
}

impl<F> EventListener for F
where
    F: Fn(&RealtimeEvent) + Send + Sync,
{
    fn on_event(&self, event: &RealtimeEvent) {
        self(event)
    }
}

/// Listener identity is the `Arc` allocation, not the vtable.
fn same_listener(a: &Arc<dyn EventListener>, b: &Arc<dyn EventListener>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Parses frames into events, applies the fixed reactions, then delivers the
/// event to every listener in registration order.
pub struct EventDispatcher {
    invalidator: CacheInvalidator,
    listeners: Mutex<Vec<Arc<dyn EventListener>>>,
}

impl EventDispatcher {
    pub fn new(invalidator: CacheInvalidator) -> Self {
        Self {
            invalidator,
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn unread(&self) -> &UnreadCounterStore {
        self.invalidator.unread()
    }

    /// Register a listener. Registering the same `Arc` twice has no effect.
    ///
    /// Returns `true` if the listener was newly added.
    pub fn subscribe(&self, listener: Arc<dyn EventListener>) -> bool {
        let mut listeners = lock(&self.listeners);
        if listeners.iter().any(|l| same_listener(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Remove a listener. Removing an unknown listener has no effect.
    ///
    /// Returns `true` if the listener was registered.
    pub fn unsubscribe(&self, listener: &Arc<dyn EventListener>) -> bool {
        let mut listeners = lock(&self.listeners);
        let before = listeners.len();
        listeners.retain(|l| !same_listener(l, listener));
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }

    /// Parse and dispatch one text frame. Malformed frames are dropped.
    pub fn dispatch_frame(&self, frame: &str) {
        match RealtimeEvent::parse(frame) {
            Ok(event) => self.dispatch(&event),
            Err(e) => {
                tracing::debug!("Dropping malformed frame: {}", e);
            }
        }
    }

    /// Apply the fixed reactions, then notify listeners.
    ///
    /// A panicking listener is skipped; the remaining listeners still run.
    pub fn dispatch(&self, event: &RealtimeEvent) {
        tracing::trace!("Dispatching '{}' event", event.kind());
        self.invalidator.react(event);

        // Snapshot so listeners may (un)subscribe while being notified.
        let listeners: Vec<Arc<dyn EventListener>> = lock(&self.listeners).clone();
        for listener in listeners {
            if catch_unwind(AssertUnwindSafe(|| listener.on_event(event))).is_err() {
                tracing::debug!("Listener panicked while handling '{}'", event.kind());
            }
        }
    }
}
