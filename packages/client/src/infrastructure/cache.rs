//! In-memory request cache.
//!
//! Keeps the latest pages of each conversation and the set of stale keys.
//! Both are bounded by the number of distinct keys: a refetch replaces a
//! conversation's pages and repeated invalidations of one key collapse.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use crate::{
    domain::{CacheKey, CachedMessage, ConversationId, ConversationPage, MessageId, RequestCache},
    observable::lock,
};

#[derive(Default)]
struct CacheState {
    pages: HashMap<ConversationId, Vec<ConversationPage>>,
    stale: HashSet<CacheKey>,
}

/// In-memory `RequestCache`
#[derive(Default)]
pub struct InMemoryRequestCache {
    state: Mutex<CacheState>,
}

impl InMemoryRequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store freshly fetched pages, replacing the conversation's previous
    /// entry; the conversation is no longer stale.
    pub fn store_pages(&self, conversation_id: ConversationId, pages: Vec<ConversationPage>) {
        let mut state = lock(&self.state);
        state.pages.insert(conversation_id, pages);
        state.stale.remove(&CacheKey::Conversation(conversation_id));
    }

    /// Look up a cached message
    pub fn message(
        &self,
        conversation_id: ConversationId,
        message_id: MessageId,
    ) -> Option<CachedMessage> {
        let state = lock(&self.state);
        state
            .pages
            .get(&conversation_id)?
            .iter()
            .flat_map(|page| page.messages.iter())
            .find(|message| message.id == message_id)
            .cloned()
    }

    pub fn is_stale(&self, key: &CacheKey) -> bool {
        lock(&self.state).stale.contains(key)
    }

    /// Number of keys awaiting a refetch
    pub fn stale_count(&self) -> usize {
        lock(&self.state).stale.len()
    }
}

impl RequestCache for InMemoryRequestCache {
    fn invalidate(&self, key: &CacheKey) {
        lock(&self.state).stale.insert(*key);
        tracing::trace!("Cache entry {:?} invalidated", key);
    }

    fn patch_messages(&self, patch: &dyn Fn(&mut CachedMessage)) {
        let mut state = lock(&self.state);
        state
            .pages
            .values_mut()
            .flat_map(|pages| pages.iter_mut())
            .flat_map(|page| page.messages.iter_mut())
            .for_each(patch);
    }
}
