//! Toasts, desktop notifications and the notification permission flow.

mod permission;
mod presenter;

pub use permission::PermissionManager;
pub use presenter::{
    MAX_PREVIEW_CHARS, NotificationPresenter, UNKNOWN_SENDER, notification_tag, present,
    truncate_preview,
};
