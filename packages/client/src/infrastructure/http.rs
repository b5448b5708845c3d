//! Unread summary over the REST API.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    config::RealtimeConfig,
    domain::{AuthTokenSource, UnreadSnapshot, UnreadSummarySource},
    error::SyncError,
};

const UNREAD_SUMMARY_PATH: &str = "messages/unread-summary";

/// Response body of the unread summary endpoint
#[derive(Debug, Deserialize)]
struct UnreadSummaryResponse {
    total_unread: u64,
    contacts_with_unread: u64,
}

impl From<UnreadSummaryResponse> for UnreadSnapshot {
    fn from(response: UnreadSummaryResponse) -> Self {
        UnreadSnapshot::new(response.total_unread, response.contacts_with_unread)
    }
}

/// Fetches `GET {api_base}/messages/unread-summary` with the bearer token
pub struct HttpUnreadSummarySource {
    client: reqwest::Client,
    url: String,
    auth: Arc<dyn AuthTokenSource>,
}

impl HttpUnreadSummarySource {
    pub fn new(config: &RealtimeConfig, auth: Arc<dyn AuthTokenSource>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.api_url(UNREAD_SUMMARY_PATH),
            auth,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl UnreadSummarySource for HttpUnreadSummarySource {
    async fn fetch_unread_summary(&self) -> Result<UnreadSnapshot, SyncError> {
        let token = self.auth.access_token().ok_or(SyncError::MissingToken)?;
        let response = self
            .client
            .get(&self.url)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status.as_u16()));
        }
        let summary: UnreadSummaryResponse = response.json().await?;
        Ok(summary.into())
    }
}
