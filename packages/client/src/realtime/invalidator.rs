//! Fixed reactions of the dispatcher: request-cache maintenance and the
//! optimistic unread increment.

use std::sync::Arc;

use crate::domain::{CacheKey, CachedMessage, RealtimeEvent, RequestCache};

use super::unread::UnreadCounterStore;

/// Applies the fixed, per-kind reactions to an event
pub struct CacheInvalidator {
    cache: Arc<dyn RequestCache>,
    unread: UnreadCounterStore,
}

impl CacheInvalidator {
    pub fn new(cache: Arc<dyn RequestCache>, unread: UnreadCounterStore) -> Self {
        Self { cache, unread }
    }

    pub fn unread(&self) -> &UnreadCounterStore {
        &self.unread
    }

    /// React to one event. Kinds without a fixed reaction are ignored.
    pub fn react(&self, event: &RealtimeEvent) {
        match event {
            RealtimeEvent::NewMessage {
                conversation_id,
                message,
            } => {
                self.cache.invalidate(&CacheKey::Conversation(*conversation_id));
                self.cache.invalidate(&CacheKey::Contacts);
                self.cache.invalidate(&CacheKey::UnreadSummary);
                if message.is_inbound() {
                    self.unread.increment(*conversation_id);
                }
            }
            RealtimeEvent::MessageStatus {
                conversation_id, ..
            } => {
                self.cache.invalidate(&CacheKey::Conversation(*conversation_id));
            }
            RealtimeEvent::MessageStatusUpdate {
                message_id,
                status,
                error,
            } => {
                // Patched in place; no refetch.
                self.cache.patch_messages(&|message: &mut CachedMessage| {
                    if message.id == *message_id {
                        message.status = status.clone();
                        if let Some(error) = error {
                            message.error = Some(error.clone());
                        }
                    }
                });
            }
            RealtimeEvent::AgentAssigned { contact_id, .. } => {
                self.cache.invalidate(&CacheKey::Contact(*contact_id));
                self.cache.invalidate(&CacheKey::Contacts);
                self.cache.invalidate(&CacheKey::Stats);
            }
            RealtimeEvent::Connected { .. }
            | RealtimeEvent::ContactUpdate { .. }
            | RealtimeEvent::Typing { .. }
            | RealtimeEvent::Pong => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ContactId, ConversationId, ConversationPage, MessageDirection,
            MessageId, MessagePayload, UnreadSnapshot,
        },
        infrastructure::InMemoryRequestCache,
    };

    fn new_message(conversation: i64, direction: MessageDirection) -> RealtimeEvent {
        RealtimeEvent::NewMessage {
            conversation_id: ConversationId::new(conversation),
            message: MessagePayload {
                id: MessageId::new(100),
                direction,
                content: Some("hello".to_string()),
                sender_name: None,
                status: None,
                message_type: None,
            },
        }
    }

    fn create_invalidator() -> (CacheInvalidator, Arc<InMemoryRequestCache>, UnreadCounterStore) {
        let cache = Arc::new(InMemoryRequestCache::new());
        let unread = UnreadCounterStore::new();
        let invalidator = CacheInvalidator::new(cache.clone(), unread.clone());
        (invalidator, cache, unread)
    }

    #[test]
    fn test_inbound_new_message_invalidates_and_increments() {
        // テスト項目: 受信メッセージでキャッシュ無効化と未読加算が行われる
        // given (前提条件):
        let (invalidator, cache, unread) = create_invalidator();

        // when (操作):
        invalidator.react(&new_message(5, MessageDirection::Inbound));

        // then (期待する結果):
        for key in [
            CacheKey::Conversation(ConversationId::new(5)),
            CacheKey::Contacts,
            CacheKey::UnreadSummary,
        ] {
            assert!(cache.is_stale(&key));
        }
        assert_eq!(cache.stale_count(), 3);
        assert_eq!(unread.snapshot(), UnreadSnapshot::new(1, 1));
    }

    #[test]
    fn test_outbound_new_message_does_not_increment() {
        // テスト項目: 送信メッセージでは未読は増えない
        // given (前提条件):
        let (invalidator, cache, unread) = create_invalidator();

        // when (操作):
        invalidator.react(&new_message(5, MessageDirection::Outbound));

        // then (期待する結果):
        assert_eq!(cache.stale_count(), 3);
        assert_eq!(unread.snapshot(), UnreadSnapshot::default());
    }

    #[test]
    fn test_message_status_update_patches_in_place() {
        // テスト項目: ステータス更新はキャッシュを無効化せずその場で書き換える
        // given (前提条件):
        let (invalidator, cache, _unread) = create_invalidator();
        let conversation = ConversationId::new(1);
        cache.store_pages(
            conversation,
            vec![ConversationPage {
                messages: vec![
                    CachedMessage::new(MessageId::new(41), "sent"),
                    CachedMessage::new(MessageId::new(42), "sent"),
                ],
            }],
        );

        // when (操作):
        invalidator.react(&RealtimeEvent::MessageStatusUpdate {
            message_id: MessageId::new(42),
            status: "delivered".to_string(),
            error: None,
        });

        // then (期待する結果):
        let patched = cache.message(conversation, MessageId::new(42)).unwrap();
        assert_eq!(patched.status, "delivered");
        assert_eq!(patched.error, None);
        let untouched = cache.message(conversation, MessageId::new(41)).unwrap();
        assert_eq!(untouched.status, "sent");
        assert_eq!(cache.stale_count(), 0);
    }

    #[test]
    fn test_message_status_update_records_error() {
        // テスト項目: エラー付きの更新ではエラーも書き込まれる
        // given (前提条件):
        let (invalidator, cache, _unread) = create_invalidator();
        let conversation = ConversationId::new(3);
        cache.store_pages(
            conversation,
            vec![ConversationPage {
                messages: vec![CachedMessage::new(MessageId::new(7), "sent")],
            }],
        );

        // when (操作):
        invalidator.react(&RealtimeEvent::MessageStatusUpdate {
            message_id: MessageId::new(7),
            status: "failed".to_string(),
            error: Some("re-engagement window expired".to_string()),
        });

        // then (期待する結果):
        let patched = cache.message(conversation, MessageId::new(7)).unwrap();
        assert_eq!(patched.status, "failed");
        assert_eq!(patched.error.as_deref(), Some("re-engagement window expired"));
    }

    #[test]
    fn test_agent_assigned_invalidates_contact_list_and_stats() {
        // テスト項目: 担当者割り当てで連絡先・一覧・統計が無効化される
        // given (前提条件):
        let (invalidator, cache, _unread) = create_invalidator();

        // when (操作):
        invalidator.react(&RealtimeEvent::AgentAssigned {
            contact_id: ContactId::new(8),
            agent_id: Some(2),
        });

        // then (期待する結果):
        for key in [
            CacheKey::Contact(ContactId::new(8)),
            CacheKey::Contacts,
            CacheKey::Stats,
        ] {
            assert!(cache.is_stale(&key));
        }
        assert_eq!(cache.stale_count(), 3);
    }

    #[test]
    fn test_message_status_invalidates_conversation() {
        // テスト項目: 会話単位のステータス通知でその会話だけが無効化される
        // given (前提条件):
        let (invalidator, cache, unread) = create_invalidator();
        unread.sync_from_server(2, 1);

        // when (操作):
        invalidator.react(&RealtimeEvent::MessageStatus {
            conversation_id: ConversationId::new(4),
            message_id: MessageId::new(9),
            status: "read".to_string(),
        });

        // then (期待する結果):
        assert!(cache.is_stale(&CacheKey::Conversation(ConversationId::new(4))));
        assert_eq!(cache.stale_count(), 1);
        assert_eq!(unread.snapshot(), UnreadSnapshot::new(2, 1));
    }

    #[test]
    fn test_other_kinds_have_no_reaction() {
        // テスト項目: 固定反応の無いイベントは何も変更しない
        // given (前提条件):
        let (invalidator, cache, unread) = create_invalidator();

        // when (操作):
        invalidator.react(&RealtimeEvent::Connected { user_id: None });
        invalidator.react(&RealtimeEvent::Pong);
        invalidator.react(&RealtimeEvent::Typing {
            conversation_id: ConversationId::new(1),
            user_id: None,
            is_typing: true,
        });
        invalidator.react(&RealtimeEvent::ContactUpdate {
            contact_id: ContactId::new(1),
            contact: None,
        });

        // then (期待する結果):
        assert_eq!(cache.stale_count(), 0);
        assert_eq!(unread.snapshot(), UnreadSnapshot::default());
    }
}
