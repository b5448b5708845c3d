//! Connection manager: one reconnecting socket shared by every interested
//! listener.
//!
//! ## Lifecycle
//!
//! - `acquire` registers a listener and, after the debounce window, opens the
//!   socket if none is open.
//! - `release` deregisters it; once nobody is interested, the socket is closed
//!   after the same window. A new `acquire` inside the window cancels the
//!   teardown, so quick release/acquire pairs never flap the socket.
//! - A socket that closes while a token and at least one listener remain is
//!   reopened after a fixed delay, forever, without backoff.
//! - Losing the access token closes the socket at once and disarms reconnects.
//!
//! Callbacks from a superseded socket are recognised by their connection id
//! and ignored.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{
    config::RealtimeConfig,
    domain::{AuthTokenSource, Connector, SocketHandle, ports::OutboundChannel},
    observable::{Observable, Subscription, lock},
};

use super::{
    dispatcher::{EventDispatcher, EventListener},
    unread::UnreadCounterStore,
};

/// State of the real-time socket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

/// Debounced lifecycle transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleAction {
    Open,
    Teardown,
}

/// A pending timer, identified so that a finished timer only clears itself
struct Timer {
    id: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct ConnectionState {
    /// Should-be-connected flag
    desired: bool,
    /// Id of the socket being opened or open
    current: Option<Uuid>,
    /// Outbound channel, present only while the socket is open
    outbound: Option<OutboundChannel>,
    /// Task driving the current socket
    task: Option<JoinHandle<()>>,
    reconnect_timer: Option<Timer>,
    lifecycle_timer: Option<Timer>,
    next_timer_id: u64,
}

impl ConnectionState {
    fn next_timer_id(&mut self) -> u64 {
        self.next_timer_id += 1;
        self.next_timer_id
    }

    fn cancel_reconnect(&mut self) {
        if let Some(timer) = self.reconnect_timer.take() {
            timer.handle.abort();
        }
    }

    fn cancel_lifecycle(&mut self) {
        if let Some(timer) = self.lifecycle_timer.take() {
            timer.handle.abort();
        }
    }
}

struct Shared {
    config: RealtimeConfig,
    auth: Arc<dyn AuthTokenSource>,
    connector: Arc<dyn Connector>,
    dispatcher: Arc<EventDispatcher>,
    status: Observable<ConnectionStatus>,
    state: Mutex<ConnectionState>,
}

/// Real-time client service.
///
/// Construct one per process and hand clones to consumers; clones share the
/// same socket, listeners and timers. Must be used inside a Tokio runtime.
#[derive(Clone)]
pub struct RealtimeClient {
    shared: Arc<Shared>,
}

impl RealtimeClient {
    pub fn new(
        config: RealtimeConfig,
        auth: Arc<dyn AuthTokenSource>,
        connector: Arc<dyn Connector>,
        dispatcher: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                auth,
                connector,
                dispatcher,
                status: Observable::new(ConnectionStatus::Disconnected),
                state: Mutex::new(ConnectionState::default()),
            }),
        }
    }

    /// Register interest. No-op returning `false` when there is no token.
    pub fn acquire(&self, listener: Arc<dyn EventListener>) -> bool {
        if self.shared.auth.access_token().is_none() {
            tracing::debug!("No access token; not acquiring the real-time connection");
            return false;
        }
        self.shared.dispatcher.subscribe(listener);
        schedule_lifecycle(&self.shared, LifecycleAction::Open);
        true
    }

    /// Deregister interest; the last release closes the socket after the
    /// debounce window.
    pub fn release(&self, listener: &Arc<dyn EventListener>) {
        self.shared.dispatcher.unsubscribe(listener);
        if self.shared.dispatcher.listener_count() == 0 {
            schedule_lifecycle(&self.shared, LifecycleAction::Teardown);
        }
    }

    /// Best-effort send. Dropped silently when no socket is open.
    pub fn send<T: Serialize + ?Sized>(&self, payload: &T) {
        let outbound = lock(&self.shared.state).outbound.clone();
        let Some(outbound) = outbound else {
            tracing::debug!("Not connected; dropping outbound payload");
            return;
        };
        match serde_json::to_string(payload) {
            Ok(json) => {
                if outbound.send(json).is_err() {
                    tracing::debug!("Socket closed; dropping outbound payload");
                }
            }
            Err(e) => tracing::warn!("Failed to serialize outbound payload: {}", e),
        }
    }

    /// Stop everything: timers, socket and reconnects, regardless of
    /// remaining interest. Listeners stay registered.
    pub fn shutdown(&self) {
        lock(&self.shared.state).cancel_lifecycle();
        close_connection(&self.shared);
        tracing::info!("Real-time client stopped");
    }

    pub fn status(&self) -> ConnectionStatus {
        self.shared.status.get()
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_status(
        &self,
        callback: impl Fn(&ConnectionStatus) + Send + Sync + 'static,
    ) -> Subscription {
        self.shared.status.subscribe(callback)
    }

    pub fn dispatcher(&self) -> &Arc<EventDispatcher> {
        &self.shared.dispatcher
    }

    pub fn unread(&self) -> &UnreadCounterStore {
        self.shared.dispatcher.unread()
    }

    /// Whether a socket is currently open
    pub fn is_connected(&self) -> bool {
        lock(&self.shared.state).outbound.is_some()
    }
}

fn has_interest(shared: &Shared) -> bool {
    shared.dispatcher.listener_count() > 0
}

/// Replace any pending lifecycle transition with `action`, applied after the
/// debounce window.
fn schedule_lifecycle(shared: &Arc<Shared>, action: LifecycleAction) {
    let mut state = lock(&shared.state);
    state.cancel_lifecycle();
    let id = state.next_timer_id();
    let task_shared = Arc::clone(shared);
    let delay = shared.config.debounce;
    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        {
            let mut state = lock(&task_shared.state);
            if state.lifecycle_timer.as_ref().is_some_and(|t| t.id == id) {
                state.lifecycle_timer = None;
            }
        }
        apply_lifecycle(&task_shared, action);
    });
    state.lifecycle_timer = Some(Timer { id, handle });
}

fn apply_lifecycle(shared: &Arc<Shared>, action: LifecycleAction) {
    match action {
        LifecycleAction::Open => {
            if has_interest(shared) {
                open_connection(shared);
            }
        }
        LifecycleAction::Teardown => {
            if !has_interest(shared) {
                close_connection(shared);
            }
        }
    }
}

/// Open the socket unless one is already open or being opened.
fn open_connection(shared: &Arc<Shared>) {
    let Some(token) = shared.auth.access_token() else {
        tracing::debug!("No access token; skipping connect");
        return;
    };

    let id = Uuid::new_v4();
    {
        let mut state = lock(&shared.state);
        if state.current.is_some() {
            return;
        }
        state.desired = true;
        state.current = Some(id);
    }
    shared.status.set(ConnectionStatus::Connecting);

    let url = shared.config.socket_url(&token);
    let mut state = lock(&shared.state);
    if state.current != Some(id) {
        // Torn down while the status subscribers ran.
        return;
    }
    let task_shared = Arc::clone(shared);
    state.task = Some(tokio::spawn(run_connection(task_shared, id, url)));
}

/// Drive one socket from handshake to close.
///
/// Losing the access token tears the socket down without a reconnect.
async fn run_connection(shared: Arc<Shared>, id: Uuid, url: String) {
    tracing::info!("Connecting to real-time endpoint (connection {})", id);
    let mut token = shared.auth.watch_token();
    match shared.connector.connect(&url).await {
        Ok(SocketHandle {
            outbound,
            mut inbound,
        }) => {
            if !handle_open(&shared, id, outbound) {
                return;
            }
            let mut watching_token = true;
            loop {
                tokio::select! {
                    frame = inbound.recv() => match frame {
                        Some(frame) => shared.dispatcher.dispatch_frame(&frame),
                        None => break,
                    },
                    lost = async { token.wait_for(|token| token.is_none()).await.is_ok() },
                        if watching_token =>
                    {
                        if lost {
                            tracing::info!("Access token lost; closing connection {}", id);
                            close_connection(&shared);
                            return;
                        }
                        // Auth store dropped; nothing left to observe.
                        watching_token = false;
                    }
                }
            }
            tracing::info!("Real-time connection {} closed", id);
        }
        Err(e) => {
            tracing::warn!("Real-time connection failed: {}", e);
        }
    }
    handle_close(&shared, id);
}

/// Returns `false` if the socket was superseded during the handshake.
fn handle_open(shared: &Arc<Shared>, id: Uuid, outbound: OutboundChannel) -> bool {
    {
        let mut state = lock(&shared.state);
        if state.current != Some(id) {
            return false;
        }
        state.outbound = Some(outbound);
        state.cancel_reconnect();
    }
    shared.status.set(ConnectionStatus::Connected);
    tracing::info!("Real-time connection {} established", id);
    true
}

/// Unexpected close (peer close, transport error, failed handshake).
fn handle_close(shared: &Arc<Shared>, id: Uuid) {
    let has_token = shared.auth.access_token().is_some();
    let interested = has_interest(shared);
    {
        let mut state = lock(&shared.state);
        if state.current != Some(id) {
            return;
        }
        state.current = None;
        state.outbound = None;
        // The running task is this one; detach instead of aborting.
        state.task = None;

        if state.desired && has_token && interested {
            schedule_reconnect(shared, &mut state);
        } else {
            state.desired = false;
            state.cancel_reconnect();
        }
    }
    shared.status.set(ConnectionStatus::Disconnected);
}

/// Arm exactly one reconnect timer, cancelling a superseded one.
fn schedule_reconnect(shared: &Arc<Shared>, state: &mut ConnectionState) {
    state.cancel_reconnect();
    let id = state.next_timer_id();
    let task_shared = Arc::clone(shared);
    let delay = shared.config.reconnect_delay;
    tracing::info!("Reconnecting in {} ms", delay.as_millis());
    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let desired = {
            let mut state = lock(&task_shared.state);
            if state.reconnect_timer.as_ref().is_some_and(|t| t.id == id) {
                state.reconnect_timer = None;
            }
            state.desired
        };
        if desired && has_interest(&task_shared) {
            open_connection(&task_shared);
        }
    });
    state.reconnect_timer = Some(Timer { id, handle });
}

/// Deliberate close: no reconnect.
fn close_connection(shared: &Arc<Shared>) {
    let was_active = {
        let mut state = lock(&shared.state);
        state.desired = false;
        state.cancel_reconnect();
        state.outbound = None;
        if let Some(task) = state.task.take() {
            task.abort();
        }
        state.current.take().is_some()
    };
    if was_active {
        tracing::info!("Real-time connection closed");
        shared.status.set(ConnectionStatus::Disconnected);
    }
}
