//! User notification preferences.

use serde::{Deserialize, Serialize};

const DEFAULT_VOLUME: f32 = 0.5;

/// Persisted notification settings of the signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreference {
    /// Master switch
    pub enabled: bool,
    /// Desktop notifications while the window is hidden
    pub browser_notifications: bool,
    /// In-app toasts
    pub toast_notifications: bool,
    /// Sound cue on inbound messages
    pub sound: bool,
    /// Raise desktop notifications only while the window is hidden
    pub notify_only_when_hidden: bool,
    /// Sound volume in `[0, 1]`
    pub volume: f32,
}

impl NotificationPreference {
    /// Clamp the volume into `[0, 1]`; NaN becomes the default volume.
    pub fn normalized(mut self) -> Self {
        self.volume = if self.volume.is_nan() {
            DEFAULT_VOLUME
        } else {
            self.volume.clamp(0.0, 1.0)
        };
        self
    }
}

impl Default for NotificationPreference {
    fn default() -> Self {
        Self {
            enabled: true,
            browser_notifications: true,
            toast_notifications: true,
            sound: true,
            notify_only_when_hidden: true,
            volume: DEFAULT_VOLUME,
        }
    }
}
