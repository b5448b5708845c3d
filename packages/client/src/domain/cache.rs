//! Request-cache vocabulary used by the fixed event reactions.

use serde::{Deserialize, Serialize};

use super::event::{ContactId, ConversationId, MessageId};

/// Key of a cached request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Message thread of one conversation
    Conversation(ConversationId),
    /// Contact list
    Contacts,
    /// A single contact
    Contact(ContactId),
    /// Unread summary
    UnreadSummary,
    /// Aggregate dashboard stats
    Stats,
}

/// A message as held in a cached conversation page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedMessage {
    pub id: MessageId,
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl CachedMessage {
    pub fn new(id: MessageId, status: impl Into<String>) -> Self {
        Self {
            id,
            status: status.into(),
            error: None,
            content: None,
        }
    }
}

/// One page of a conversation's message history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationPage {
    pub messages: Vec<CachedMessage>,
}
