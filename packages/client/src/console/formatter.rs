//! Message formatting utilities for console display.

use chatdesk_shared::time::{timestamp_to_clock_label, timestamp_to_rfc3339};

use crate::{
    domain::{DesktopNotification, RealtimeEvent, Toast, ToastLevel, UnreadSnapshot},
    realtime::ConnectionStatus,
};

const RULE: &str = "------------------------------------------------------------";

/// Message formatter for console display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format an in-app toast
    ///
    /// # Arguments
    ///
    /// * `toast` - The toast raised by the presenter or the permission flow
    ///
    /// # Returns
    ///
    /// A formatted string with the toast and the time it was raised
    pub fn format_toast(toast: &Toast) -> String {
        let marker = match toast.level {
            ToastLevel::Info => "*",
            ToastLevel::Warning => "!",
        };
        format!(
            "\n[{}] {} {}: {}\n",
            timestamp_to_clock_label(toast.raised_at),
            marker,
            toast.title,
            toast.body
        )
    }

    /// Format a desktop notification
    ///
    /// # Arguments
    ///
    /// * `notification` - The notification handed to the platform
    /// * `shown_at` - Unix timestamp when it was shown (milliseconds)
    ///
    /// # Returns
    ///
    /// A framed block, so it stands out from in-app output
    pub fn format_desktop_notification(notification: &DesktopNotification, shown_at: i64) -> String {
        format!(
            "\n\n{}\n\
             [desktop] {}\n\
             {}\n\
             shown at {} ({})\n\
             {}\n",
            RULE,
            notification.title,
            notification.body,
            timestamp_to_rfc3339(shown_at),
            notification.tag,
            RULE
        )
    }

    /// Format the unread counter
    pub fn format_unread(snapshot: UnreadSnapshot) -> String {
        format!(
            "{} unread message(s) across {} contact(s)\n",
            snapshot.total, snapshot.contacts_with_unread
        )
    }

    /// Format a connection status change
    pub fn format_status(status: ConnectionStatus) -> String {
        let label = match status {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting...",
            ConnectionStatus::Connected => "connected",
        };
        format!("\n~ {}\n", label)
    }

    /// Format events that have no notification of their own
    ///
    /// # Returns
    ///
    /// `None` for events already surfaced elsewhere (new messages) or not
    /// worth printing (pongs)
    pub fn format_activity(event: &RealtimeEvent) -> Option<String> {
        let line = match event {
            RealtimeEvent::Connected { user_id } => match user_id {
                Some(user_id) => format!("session established for user {}", user_id),
                None => "session established".to_string(),
            },
            RealtimeEvent::ContactUpdate { contact_id, .. } => {
                format!("contact {} updated", contact_id)
            }
            RealtimeEvent::MessageStatus {
                conversation_id,
                message_id,
                status,
            } => format!(
                "message {} in conversation {} is {}",
                message_id, conversation_id, status
            ),
            RealtimeEvent::MessageStatusUpdate {
                message_id,
                status,
                error,
            } => match error {
                Some(error) => format!("message {} is {} ({})", message_id, status, error),
                None => format!("message {} is {}", message_id, status),
            },
            RealtimeEvent::AgentAssigned {
                contact_id,
                agent_id,
            } => match agent_id {
                Some(agent_id) => format!("contact {} assigned to agent {}", contact_id, agent_id),
                None => format!("contact {} unassigned", contact_id),
            },
            RealtimeEvent::Typing {
                conversation_id,
                is_typing: true,
                ..
            } => format!("typing in conversation {}...", conversation_id),
            RealtimeEvent::Typing { .. } | RealtimeEvent::NewMessage { .. } | RealtimeEvent::Pong => {
                return None;
            }
        };
        Some(format!("\n~ {}\n", line))
    }

    /// Format the command help
    pub fn format_help() -> String {
        "\
Commands:
  /read [n]          mark a conversation with n unread messages as read
  /unread            show the unread counter
  /open <id>         open a conversation
  /click             click the last desktop notification
  /notifications     ask for desktop notification permission
  /hide | /show      simulate the window being hidden or visible
  /ping              send a keep-alive ping
  /logout            drop the token and disconnect
  /quit              exit
Any other line is sent as a JSON payload.
"
        .to_string()
    }
}
