//! Domain types of the real-time pipeline and the ports it needs from its
//! collaborators.

pub mod cache;
pub mod event;
pub mod notification;
pub mod permission;
pub mod ports;
pub mod preference;
pub mod unread;

pub use cache::{CacheKey, CachedMessage, ConversationPage};
pub use event::{
    ContactId, ConversationId, MessageDirection, MessageId, MessagePayload, RealtimeEvent,
};
pub use notification::{DesktopNotification, Presentation, Toast, ToastAction, ToastLevel};
pub use permission::PermissionState;
pub use ports::{
    AuthTokenSource, Connector, InAppNotifier, Navigator, NotificationPlatform, PreferenceStore,
    RequestCache, SocketHandle, UnreadSummarySource, WindowVisibility,
};
pub use preference::NotificationPreference;
pub use unread::UnreadSnapshot;
