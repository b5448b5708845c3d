//! Interfaces the pipeline needs from its collaborators.
//!
//! The auth store, request cache, preference store, navigation and the
//! platform notification API live outside this crate. The pipeline depends
//! only on these traits; `crate::infrastructure` provides implementations.

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use crate::error::{ConnectionError, PreferenceError, SyncError};

use super::{
    CacheKey, CachedMessage, ConversationId, DesktopNotification, NotificationPreference,
    PermissionState, Toast, UnreadSnapshot,
};

/// Outbound channel of an open socket. Dropping it closes the socket.
pub type OutboundChannel = mpsc::UnboundedSender<String>;

/// An open socket, as seen by the connection manager.
///
/// `inbound` yields text frames in arrival order and ends when the socket
/// closes for any reason.
pub struct SocketHandle {
    pub outbound: OutboundChannel,
    pub inbound: mpsc::UnboundedReceiver<String>,
}

/// Opens sockets
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<SocketHandle, ConnectionError>;
}

/// Auth store: current access token, `None` once signed out
pub trait AuthTokenSource: Send + Sync {
    fn access_token(&self) -> Option<String>;

    /// Observe sign-in and sign-out. The value turns `None` on token loss.
    fn watch_token(&self) -> watch::Receiver<Option<String>>;
}

/// Request cache owned by the data-fetching layer
pub trait RequestCache: Send + Sync {
    /// Mark the entry stale so the next read refetches it
    fn invalidate(&self, key: &CacheKey);

    /// Apply `patch` to every message of every cached conversation page
    fn patch_messages(&self, patch: &dyn Fn(&mut CachedMessage));
}

/// Persisted notification settings
pub trait PreferenceStore: Send + Sync {
    fn load(&self) -> NotificationPreference;

    fn store(&self, preference: &NotificationPreference) -> Result<(), PreferenceError>;

    /// Whether the automatic permission prompt was already shown
    fn permission_auto_requested(&self) -> bool;

    fn mark_permission_auto_requested(&self) -> Result<(), PreferenceError>;
}

/// Routing
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Show the conversation list, optionally with one conversation selected
    fn open_conversations(&self, selected: Option<ConversationId>);
}

/// Document visibility
#[cfg_attr(test, mockall::automock)]
pub trait WindowVisibility: Send + Sync {
    fn is_hidden(&self) -> bool;
}

/// In-app feedback: toasts and the sound cue
#[cfg_attr(test, mockall::automock)]
pub trait InAppNotifier: Send + Sync {
    fn show_toast(&self, toast: Toast);

    fn play_sound(&self, volume: f32);
}

/// Platform notification API. Optional: callers hold an
/// `Option<Arc<dyn NotificationPlatform>>` and treat `None` as unsupported.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationPlatform: Send + Sync {
    fn permission(&self) -> PermissionState;

    /// Show the permission prompt and return the user's answer
    async fn request_permission(&self) -> PermissionState;

    fn show(&self, notification: &DesktopNotification);

    fn dismiss(&self, tag: &str);

    fn focus_window(&self);
}

/// Authoritative unread summary
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnreadSummarySource: Send + Sync {
    async fn fetch_unread_summary(&self) -> Result<UnreadSnapshot, SyncError>;
}
