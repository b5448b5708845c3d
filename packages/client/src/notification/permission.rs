//! Desktop notification permission flow.
//!
//! The automatic prompt is shown at most once per profile, and only while the
//! platform still reports `Default`. Manual requests from the settings screen
//! are always allowed; a refusal is reported once with a toast.

use std::sync::Arc;

use chatdesk_shared::time::Clock;

use crate::domain::{
    InAppNotifier, NotificationPlatform, PermissionState, PreferenceStore, Toast, ToastLevel,
};

const BLOCKED_TITLE: &str = "Notifications blocked";
const BLOCKED_BODY: &str = "Allow notifications for this site in your browser settings.";
const UNSUPPORTED_TITLE: &str = "Notifications unavailable";
const UNSUPPORTED_BODY: &str = "This browser does not support desktop notifications.";

pub struct PermissionManager {
    platform: Option<Arc<dyn NotificationPlatform>>,
    preferences: Arc<dyn PreferenceStore>,
    in_app: Arc<dyn InAppNotifier>,
    clock: Arc<dyn Clock>,
}

impl PermissionManager {
    pub fn new(
        platform: Option<Arc<dyn NotificationPlatform>>,
        preferences: Arc<dyn PreferenceStore>,
        in_app: Arc<dyn InAppNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            platform,
            preferences,
            in_app,
            clock,
        }
    }

    /// Current permission; `Unsupported` when the capability is absent
    pub fn state(&self) -> PermissionState {
        self.platform
            .as_ref()
            .map_or(PermissionState::Unsupported, |platform| platform.permission())
    }

    /// Prompt once per profile if the user has not decided yet.
    pub async fn request_automatically(&self) -> PermissionState {
        let Some(platform) = &self.platform else {
            return PermissionState::Unsupported;
        };
        let current = platform.permission();
        if !current.can_prompt() || self.preferences.permission_auto_requested() {
            return current;
        }

        // Recorded before prompting so an abandoned prompt is not repeated.
        if let Err(e) = self.preferences.mark_permission_auto_requested() {
            tracing::warn!("Failed to persist permission prompt flag: {}", e);
        }
        let answer = platform.request_permission().await;
        tracing::info!("Notification permission answered: {:?}", answer);
        answer
    }

    /// Prompt on explicit user request.
    pub async fn request_manually(&self) -> PermissionState {
        let answer = match &self.platform {
            Some(platform) => {
                let current = platform.permission();
                if current.can_prompt() {
                    platform.request_permission().await
                } else {
                    current
                }
            }
            None => PermissionState::Unsupported,
        };

        match answer {
            PermissionState::Denied => self.warn(BLOCKED_TITLE, BLOCKED_BODY),
            PermissionState::Unsupported => self.warn(UNSUPPORTED_TITLE, UNSUPPORTED_BODY),
            PermissionState::Default | PermissionState::Granted => {}
        }
        answer
    }

    fn warn(&self, title: &str, body: &str) {
        self.in_app.show_toast(Toast {
            level: ToastLevel::Warning,
            title: title.to_string(),
            body: body.to_string(),
            action: None,
            raised_at: self.clock.now_millis(),
        });
    }
}

#[cfg(test)]
mod tests {
    use chatdesk_shared::time::FixedClock;

    use super::*;
    use crate::{
        domain::{
            NotificationPreference,
            ports::{MockInAppNotifier, MockNotificationPlatform},
        },
        infrastructure::InMemoryPreferenceStore,
    };

    fn manager(
        platform: Option<MockNotificationPlatform>,
        preferences: Arc<InMemoryPreferenceStore>,
        in_app: MockInAppNotifier,
    ) -> PermissionManager {
        PermissionManager::new(
            platform.map(|p| Arc::new(p) as Arc<dyn NotificationPlatform>),
            preferences,
            Arc::new(in_app),
            Arc::new(FixedClock::new(0)),
        )
    }

    fn store() -> Arc<InMemoryPreferenceStore> {
        Arc::new(InMemoryPreferenceStore::new(NotificationPreference::default()))
    }

    #[tokio::test]
    async fn test_automatic_request_prompts_once() {
        // テスト項目: 自動リクエストは未決定時に一度だけ行われる
        // given (前提条件):
        let mut platform = MockNotificationPlatform::new();
        platform
            .expect_permission()
            .return_const(PermissionState::Default);
        platform
            .expect_request_permission()
            .times(1)
            .return_const(PermissionState::Default);
        let preferences = store();
        let manager = manager(Some(platform), preferences.clone(), MockInAppNotifier::new());

        // when (操作):
        let first = manager.request_automatically().await;
        let second = manager.request_automatically().await;

        // then (期待する結果):
        assert_eq!(first, PermissionState::Default);
        assert_eq!(second, PermissionState::Default);
        assert!(preferences.permission_auto_requested());
    }

    #[tokio::test]
    async fn test_automatic_request_never_reprompts_decided_state() {
        // テスト項目: 許可・拒否が決まっている場合は自動で再確認しない
        // given (前提条件):
        let mut platform = MockNotificationPlatform::new();
        platform
            .expect_permission()
            .return_const(PermissionState::Denied);
        platform.expect_request_permission().never();
        let preferences = store();
        let manager = manager(Some(platform), preferences.clone(), MockInAppNotifier::new());

        // when (操作):
        let state = manager.request_automatically().await;

        // then (期待する結果):
        assert_eq!(state, PermissionState::Denied);
        assert!(!preferences.permission_auto_requested());
    }

    #[tokio::test]
    async fn test_manual_request_denied_shows_toast() {
        // テスト項目: 手動リクエストが拒否された場合、警告トーストを一度表示する
        // given (前提条件):
        let mut platform = MockNotificationPlatform::new();
        platform
            .expect_permission()
            .return_const(PermissionState::Default);
        platform
            .expect_request_permission()
            .times(1)
            .return_const(PermissionState::Denied);
        let mut in_app = MockInAppNotifier::new();
        in_app
            .expect_show_toast()
            .withf(|toast| toast.level == ToastLevel::Warning && toast.title == BLOCKED_TITLE)
            .times(1)
            .return_const(());
        let manager = manager(Some(platform), store(), in_app);

        // when (操作):
        let state = manager.request_manually().await;

        // then (期待する結果):
        assert_eq!(state, PermissionState::Denied);
    }

    #[tokio::test]
    async fn test_manual_request_after_auto_flag_still_prompts() {
        // テスト項目: 自動リクエスト済みでも手動リクエストはいつでも可能
        // given (前提条件):
        let mut platform = MockNotificationPlatform::new();
        platform
            .expect_permission()
            .return_const(PermissionState::Default);
        platform
            .expect_request_permission()
            .times(1)
            .return_const(PermissionState::Granted);
        let preferences = store();
        preferences.mark_permission_auto_requested().unwrap();
        let manager = manager(Some(platform), preferences, MockInAppNotifier::new());

        // when (操作):
        let state = manager.request_manually().await;

        // then (期待する結果):
        assert_eq!(state, PermissionState::Granted);
    }

    #[tokio::test]
    async fn test_unsupported_platform() {
        // テスト項目: 通知 API が無い場合、自動では何もせず手動ではトーストで知らせる
        // given (前提条件):
        let mut in_app = MockInAppNotifier::new();
        in_app
            .expect_show_toast()
            .withf(|toast| toast.title == UNSUPPORTED_TITLE)
            .times(1)
            .return_const(());
        let manager = manager(None, store(), in_app);

        // when (操作):
        let automatic = manager.request_automatically().await;
        let manual = manager.request_manually().await;

        // then (期待する結果):
        assert_eq!(automatic, PermissionState::Unsupported);
        assert_eq!(manual, PermissionState::Unsupported);
        assert_eq!(manager.state(), PermissionState::Unsupported);
    }
}
