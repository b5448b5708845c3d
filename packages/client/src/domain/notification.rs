//! What the presenter asks the platform to show.

use super::event::ConversationId;

/// Severity of an in-app toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
}

/// Click action attached to a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastAction {
    OpenConversation(ConversationId),
}

/// In-app toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub title: String,
    pub body: String,
    pub action: Option<ToastAction>,
    /// Unix timestamp (milliseconds) at which the toast was raised
    pub raised_at: i64,
}

/// Desktop notification. Notifications sharing a `tag` replace each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopNotification {
    pub title: String,
    pub body: String,
    pub tag: String,
    pub conversation_id: ConversationId,
}

/// Outcome of presenting one event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Presentation {
    pub toast: Option<Toast>,
    pub desktop: Option<DesktopNotification>,
    /// Volume of the sound cue, if one should play
    pub sound: Option<f32>,
}

impl Presentation {
    pub fn is_empty(&self) -> bool {
        self.toast.is_none() && self.desktop.is_none() && self.sound.is_none()
    }
}
