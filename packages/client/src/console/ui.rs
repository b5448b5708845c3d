//! Terminal stand-ins for the browser surfaces the pipeline talks to.

use std::{
    io::Write,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use chatdesk_shared::time::{Clock, SystemClock};

use crate::{
    domain::{
        ConversationId, DesktopNotification, InAppNotifier, Navigator, NotificationPlatform,
        PermissionState, Toast, WindowVisibility,
    },
    observable::lock,
};

use super::formatter::MessageFormatter;

pub const PROMPT: &str = "chatdesk> ";

/// Redisplay the prompt after printing asynchronous output
pub fn redisplay_prompt() {
    print!("{}", PROMPT);
    std::io::stdout().flush().ok();
}

/// Prints toasts and desktop notifications to stdout.
///
/// The permission prompt cannot be shown in a terminal, so it resolves to a
/// preconfigured answer. The last desktop notification stays clickable until
/// it is dismissed.
pub struct TerminalNotifier {
    permission: Mutex<PermissionState>,
    answer: PermissionState,
    last_desktop: Mutex<Option<DesktopNotification>>,
}

impl TerminalNotifier {
    pub fn new(initial: PermissionState, answer: PermissionState) -> Self {
        Self {
            permission: Mutex::new(initial),
            answer,
            last_desktop: Mutex::new(None),
        }
    }

    /// Most recent desktop notification that was not dismissed
    pub fn last_desktop_notification(&self) -> Option<DesktopNotification> {
        lock(&self.last_desktop).clone()
    }
}

impl InAppNotifier for TerminalNotifier {
    fn show_toast(&self, toast: Toast) {
        print!("{}", MessageFormatter::format_toast(&toast));
        redisplay_prompt();
    }

    fn play_sound(&self, volume: f32) {
        if volume > 0.0 {
            // Terminal bell
            print!("\x07");
            std::io::stdout().flush().ok();
        }
    }
}

#[async_trait]
impl NotificationPlatform for TerminalNotifier {
    fn permission(&self) -> PermissionState {
        *lock(&self.permission)
    }

    async fn request_permission(&self) -> PermissionState {
        let mut permission = lock(&self.permission);
        if permission.can_prompt() {
            *permission = self.answer;
        }
        *permission
    }

    fn show(&self, notification: &DesktopNotification) {
        *lock(&self.last_desktop) = Some(notification.clone());
        print!(
            "{}",
            MessageFormatter::format_desktop_notification(notification, SystemClock.now_millis())
        );
        redisplay_prompt();
    }

    fn dismiss(&self, tag: &str) {
        let mut last = lock(&self.last_desktop);
        if last.as_ref().is_some_and(|n| n.tag == tag) {
            *last = None;
        }
        tracing::debug!("Dismissed notification '{}'", tag);
    }

    fn focus_window(&self) {
        tracing::debug!("Window focused");
    }
}

/// Prints navigation requests
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn open_conversations(&self, selected: Option<ConversationId>) {
        match selected {
            Some(conversation_id) => println!("-> conversations / {}", conversation_id),
            None => println!("-> conversations"),
        }
    }
}

/// Window visibility toggled from the console
pub struct VisibilityFlag {
    hidden: AtomicBool,
}

impl VisibilityFlag {
    pub fn new(hidden: bool) -> Self {
        Self {
            hidden: AtomicBool::new(hidden),
        }
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.hidden.store(hidden, Ordering::Relaxed);
    }
}

impl WindowVisibility for VisibilityFlag {
    fn is_hidden(&self) -> bool {
        self.hidden.load(Ordering::Relaxed)
    }
}
