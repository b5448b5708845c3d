//! Periodic reconciliation of the unread counter with the server summary.

use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::{domain::UnreadSummarySource, error::SyncError};

use super::unread::UnreadCounterStore;

/// Fetch the authoritative summary once and overwrite the counter with it.
pub async fn resync_unread(
    store: &UnreadCounterStore,
    source: &dyn UnreadSummarySource,
) -> Result<(), SyncError> {
    let summary = source.fetch_unread_summary().await?;
    store.sync_from_server(summary.total, summary.contacts_with_unread);
    tracing::debug!(
        "Unread counter synced: {} messages, {} contacts",
        summary.total,
        summary.contacts_with_unread
    );
    Ok(())
}

/// Resync immediately and then every `interval` until the handle is aborted.
///
/// Failed fetches are logged and leave the counter untouched.
pub fn spawn_unread_resync(
    store: UnreadCounterStore,
    source: Arc<dyn UnreadSummarySource>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = resync_unread(&store, source.as_ref()).await {
                tracing::warn!("Failed to sync unread summary: {}", e);
            }
        }
    })
}
