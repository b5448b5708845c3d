//! Token holder standing in for the auth store.

use tokio::sync::watch;

use crate::domain::AuthTokenSource;

/// Holds the current access token. Clearing it models sign-out and is
/// observed by every `watch_token` receiver.
#[derive(Debug)]
pub struct StaticTokenSource {
    token: watch::Sender<Option<String>>,
}

impl StaticTokenSource {
    pub fn new(token: Option<String>) -> Self {
        let (token, _) = watch::channel(token.filter(|token| !token.is_empty()));
        Self { token }
    }

    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        self.token
            .send_modify(|current| *current = (!token.is_empty()).then_some(token));
    }

    pub fn clear(&self) {
        self.token.send_modify(|current| *current = None);
    }
}

impl Default for StaticTokenSource {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AuthTokenSource for StaticTokenSource {
    fn access_token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn watch_token(&self) -> watch::Receiver<Option<String>> {
        self.token.subscribe()
    }
}
