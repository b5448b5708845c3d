//! Unread counter store.

use crate::{
    domain::{ConversationId, UnreadSnapshot},
    observable::{Observable, Subscription},
};

/// Observable unread counter.
///
/// Updated optimistically from inbound events and overwritten by the periodic
/// server resync. Clones share the same counter.
#[derive(Clone)]
pub struct UnreadCounterStore {
    snapshot: Observable<UnreadSnapshot>,
}

impl UnreadCounterStore {
    pub fn new() -> Self {
        Self {
            snapshot: Observable::new(UnreadSnapshot::default()),
        }
    }

    /// Current counts
    pub fn snapshot(&self) -> UnreadSnapshot {
        self.snapshot.get()
    }

    /// An inbound message arrived in `conversation_id`.
    ///
    /// Always counts one more unread contact; the next server resync corrects
    /// the drift when the conversation already had unread messages.
    pub fn increment(&self, conversation_id: ConversationId) {
        tracing::trace!("Unread increment for conversation {}", conversation_id);
        self.snapshot.update(|snapshot| *snapshot = snapshot.incremented());
    }

    /// A conversation holding `count` unread messages was marked read
    pub fn decrement(&self, count: u64) {
        self.snapshot
            .update(|snapshot| *snapshot = snapshot.decremented(count));
    }

    /// Overwrite with the authoritative server summary
    pub fn sync_from_server(&self, total: u64, contacts_with_unread: u64) {
        self.snapshot
            .set(UnreadSnapshot::new(total, contacts_with_unread));
    }

    /// Zero both counts (sign-out)
    pub fn reset(&self) {
        self.snapshot.set(UnreadSnapshot::default());
    }

    /// Subscribe to every change
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(
        &self,
        callback: impl Fn(&UnreadSnapshot) + Send + Sync + 'static,
    ) -> Subscription {
        self.snapshot.subscribe(callback)
    }
}

impl Default for UnreadCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn test_increment_is_optimistic_per_message() {
        // テスト項目: 同じ会話への複数回の受信でも連絡先数が毎回増える
        // given (前提条件):
        let store = UnreadCounterStore::new();
        let conversation = ConversationId::new(1);

        // when (操作):
        store.increment(conversation);
        store.increment(conversation);

        // then (期待する結果):
        assert_eq!(store.snapshot(), UnreadSnapshot::new(2, 2));
    }

    #[test]
    fn test_sync_from_server_overrides_drift() {
        // テスト項目: サーバー同期後のスナップショットは同期値と一致する
        // given (前提条件):
        let store = UnreadCounterStore::new();
        store.increment(ConversationId::new(1));
        store.increment(ConversationId::new(1));
        store.increment(ConversationId::new(1));

        // when (操作):
        store.sync_from_server(3, 1);

        // then (期待する結果):
        assert_eq!(store.snapshot(), UnreadSnapshot::new(3, 1));
    }

    #[test]
    fn test_decrement_and_reset_never_negative() {
        // テスト項目: 減算・リセット後も負にならない
        // given (前提条件):
        let store = UnreadCounterStore::new();
        store.sync_from_server(1, 1);

        // when (操作):
        store.decrement(5);
        let after_decrement = store.snapshot();
        store.decrement(1);
        let after_second = store.snapshot();
        store.sync_from_server(4, 2);
        store.reset();

        // then (期待する結果):
        assert_eq!(after_decrement, UnreadSnapshot::new(0, 0));
        assert_eq!(after_second, UnreadSnapshot::new(0, 0));
        assert_eq!(store.snapshot(), UnreadSnapshot::default());
    }

    #[test]
    fn test_tolerates_more_contacts_than_messages() {
        // テスト項目: 連絡先数 > 総数 の一時的なずれを許容する
        // given (前提条件):
        let store = UnreadCounterStore::new();
        store.sync_from_server(1, 1);

        // when (操作):
        store.decrement(1);
        store.increment(ConversationId::new(2));
        store.sync_from_server(0, 2);

        // then (期待する結果):
        assert_eq!(store.snapshot(), UnreadSnapshot::new(0, 2));
    }

    #[test]
    fn test_subscribers_see_every_mutation() {
        // テスト項目: すべての変更が購読者に同期的に通知される
        // given (前提条件):
        let store = UnreadCounterStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let _sub = store.subscribe(move |snapshot| seen_clone.lock().unwrap().push(*snapshot));

        // when (操作):
        store.increment(ConversationId::new(9));
        store.decrement(1);
        store.sync_from_server(5, 2);
        store.reset();

        // then (期待する結果):
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                UnreadSnapshot::new(1, 1),
                UnreadSnapshot::new(0, 0),
                UnreadSnapshot::new(5, 2),
                UnreadSnapshot::new(0, 0),
            ]
        );
    }
}
