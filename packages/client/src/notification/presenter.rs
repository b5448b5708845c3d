//! Notification presenter.
//!
//! [`present`] decides, without side effects, what an event should raise.
//! [`NotificationPresenter`] is the listener that feeds it live inputs and
//! hands the result to the platform.

use std::sync::Arc;

use chatdesk_shared::time::Clock;

use crate::{
    domain::{
        ConversationId, DesktopNotification, InAppNotifier, Navigator, NotificationPlatform,
        NotificationPreference, PermissionState, PreferenceStore, Presentation, RealtimeEvent,
        Toast, ToastAction, ToastLevel, WindowVisibility,
    },
    realtime::EventListener,
};

/// Longest preview shown in a toast or desktop notification, ellipsis included
pub const MAX_PREVIEW_CHARS: usize = 120;

/// Title used when the sender has no name
pub const UNKNOWN_SENDER: &str = "New message";

const ELLIPSIS: &str = "...";
const EMPTY_BODY: &str = "(attachment)";

/// Truncate `content` to at most `max_chars` characters, ending with an
/// ellipsis when anything was cut.
pub fn truncate_preview(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut preview: String = content.chars().take(keep).collect();
    preview.push_str(ELLIPSIS);
    preview
}

/// Tag shared by all desktop notifications of one conversation
pub fn notification_tag(conversation_id: ConversationId) -> String {
    format!("conversation-{}", conversation_id)
}

/// Decide what an event raises.
///
/// Only inbound `new_message` events raise anything. Returns `None` when
/// nothing should be shown or played.
pub fn present(
    event: &RealtimeEvent,
    hidden: bool,
    preference: &NotificationPreference,
    permission: PermissionState,
    now_millis: i64,
) -> Option<Presentation> {
    let RealtimeEvent::NewMessage {
        conversation_id,
        message,
    } = event
    else {
        return None;
    };
    if !message.is_inbound() || !preference.enabled {
        return None;
    }

    let title = message
        .sender_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_SENDER)
        .to_string();
    let body = match message.content.as_deref().map(str::trim) {
        Some(content) if !content.is_empty() => truncate_preview(content, MAX_PREVIEW_CHARS),
        _ => EMPTY_BODY.to_string(),
    };

    let toast = preference.toast_notifications.then(|| Toast {
        level: ToastLevel::Info,
        title: title.clone(),
        body: body.clone(),
        action: Some(ToastAction::OpenConversation(*conversation_id)),
        raised_at: now_millis,
    });

    let wants_desktop = hidden || !preference.notify_only_when_hidden;
    let desktop = (preference.browser_notifications && permission.is_granted() && wants_desktop)
        .then(|| DesktopNotification {
            title,
            body,
            tag: notification_tag(*conversation_id),
            conversation_id: *conversation_id,
        });

    let sound = preference.sound.then_some(preference.volume);

    let presentation = Presentation {
        toast,
        desktop,
        sound,
    };
    (!presentation.is_empty()).then_some(presentation)
}

/// Listener raising toasts and desktop notifications for inbound messages
pub struct NotificationPresenter {
    preferences: Arc<dyn PreferenceStore>,
    visibility: Arc<dyn WindowVisibility>,
    in_app: Arc<dyn InAppNotifier>,
    platform: Option<Arc<dyn NotificationPlatform>>,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
}

impl NotificationPresenter {
    pub fn new(
        preferences: Arc<dyn PreferenceStore>,
        visibility: Arc<dyn WindowVisibility>,
        in_app: Arc<dyn InAppNotifier>,
        platform: Option<Arc<dyn NotificationPlatform>>,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            preferences,
            visibility,
            in_app,
            platform,
            navigator,
            clock,
        }
    }

    fn permission(&self) -> PermissionState {
        self.platform
            .as_ref()
            .map_or(PermissionState::Unsupported, |platform| platform.permission())
    }

    /// Run the toast's action
    pub fn activate_toast(&self, action: &ToastAction) {
        match action {
            ToastAction::OpenConversation(conversation_id) => {
                self.navigator.open_conversations(Some(*conversation_id));
            }
        }
    }

    /// Desktop notification clicked: focus, navigate, dismiss
    pub fn activate_desktop(&self, notification: &DesktopNotification) {
        if let Some(platform) = &self.platform {
            platform.focus_window();
        }
        self.navigator
            .open_conversations(Some(notification.conversation_id));
        if let Some(platform) = &self.platform {
            platform.dismiss(&notification.tag);
        }
    }
}

impl EventListener for NotificationPresenter {
    fn on_event(&self, event: &RealtimeEvent) {
        if !matches!(event, RealtimeEvent::NewMessage { .. }) {
            return;
        }
        let preference = self.preferences.load();
        let Some(presentation) = present(
            event,
            self.visibility.is_hidden(),
            &preference,
            self.permission(),
            self.clock.now_millis(),
        ) else {
            return;
        };

        if let Some(toast) = presentation.toast {
            self.in_app.show_toast(toast);
        }
        if let (Some(notification), Some(platform)) = (&presentation.desktop, &self.platform) {
            platform.show(notification);
        }
        if let Some(volume) = presentation.sound {
            self.in_app.play_sound(volume);
        }
    }
}
