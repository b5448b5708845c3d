//! Events received over the real-time socket.
//!
//! Every frame is one JSON object with a mandatory `type` discriminator.
//! Frames that are not JSON, carry an unknown `type`, or miss a required
//! field do not parse and are dropped by the dispatcher.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Conversation identifier (one conversation per contact)
    ConversationId
);
id_type!(
    /// Message identifier
    MessageId
);
id_type!(
    /// Contact identifier
    ContactId
);

/// Direction of a chat message relative to the business account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageDirection {
    Inbound,
    Outbound,
}

/// Message carried by a `new_message` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub id: MessageId,
    pub direction: MessageDirection,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message_type: Option<String>,
}

impl MessagePayload {
    pub fn is_inbound(&self) -> bool {
        self.direction == MessageDirection::Inbound
    }
}

/// A typed real-time event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RealtimeEvent {
    /// The backend accepted the socket
    Connected {
        #[serde(default)]
        user_id: Option<i64>,
    },
    /// A contact's profile or assignment changed
    ContactUpdate {
        contact_id: ContactId,
        #[serde(default)]
        contact: Option<serde_json::Value>,
    },
    /// A message was received or sent
    NewMessage {
        conversation_id: ConversationId,
        message: MessagePayload,
    },
    /// A message in a conversation changed status
    MessageStatus {
        conversation_id: ConversationId,
        message_id: MessageId,
        status: String,
    },
    /// Delivery receipt for a single message, applied in place
    MessageStatusUpdate {
        message_id: MessageId,
        status: String,
        #[serde(default)]
        error: Option<String>,
    },
    /// A contact was assigned to an agent
    AgentAssigned {
        contact_id: ContactId,
        #[serde(default)]
        agent_id: Option<i64>,
    },
    /// Typing indicator
    Typing {
        conversation_id: ConversationId,
        #[serde(default)]
        user_id: Option<i64>,
        #[serde(default)]
        is_typing: bool,
    },
    /// Reply to a keep-alive ping
    Pong,
}

impl RealtimeEvent {
    /// Parse one frame
    pub fn parse(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }

    /// Wire name of the event kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::ContactUpdate { .. } => "contact_update",
            Self::NewMessage { .. } => "new_message",
            Self::MessageStatus { .. } => "message_status",
            Self::MessageStatusUpdate { .. } => "message_status_update",
            Self::AgentAssigned { .. } => "agent_assigned",
            Self::Typing { .. } => "typing",
            Self::Pong => "pong",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_new_message() {
        // テスト項目: new_message フレームが型付きイベントに変換される
        // given (前提条件):
        let frame = r#"{
            "type": "new_message",
            "conversation_id": 7,
            "message": {"id": 42, "direction": "inbound", "content": "hi", "sender_name": "Ana"}
        }"#;

        // when (操作):
        let event = RealtimeEvent::parse(frame).unwrap();

        // then (期待する結果):
        match event {
            RealtimeEvent::NewMessage {
                conversation_id,
                message,
            } => {
                assert_eq!(conversation_id, ConversationId::new(7));
                assert_eq!(message.id, MessageId::new(42));
                assert!(message.is_inbound());
                assert_eq!(message.sender_name.as_deref(), Some("Ana"));
                assert_eq!(message.status, None);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parse_status_update_with_optional_error() {
        // テスト項目: error フィールドは省略可能
        // given (前提条件):
        let without_error = r#"{"type":"message_status_update","message_id":42,"status":"delivered"}"#;
        let with_error =
            r#"{"type":"message_status_update","message_id":42,"status":"failed","error":"expired"}"#;

        // when (操作):
        let first = RealtimeEvent::parse(without_error).unwrap();
        let second = RealtimeEvent::parse(with_error).unwrap();

        // then (期待する結果):
        assert_eq!(
            first,
            RealtimeEvent::MessageStatusUpdate {
                message_id: MessageId::new(42),
                status: "delivered".to_string(),
                error: None,
            }
        );
        assert!(matches!(
            second,
            RealtimeEvent::MessageStatusUpdate { error: Some(ref e), .. } if e == "expired"
        ));
    }

    #[test]
    fn test_parse_conversation_message_status() {
        // テスト項目: message_status フレームが会話単位のステータスイベントになる
        // given (前提条件):
        let frame = r#"{"type":"message_status","conversation_id":4,"message_id":9,"status":"read"}"#;

        // when (操作):
        let event = RealtimeEvent::parse(frame).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            RealtimeEvent::MessageStatus {
                conversation_id: ConversationId::new(4),
                message_id: MessageId::new(9),
                status: "read".to_string(),
            }
        );
        assert_eq!(event.kind(), "message_status");
    }

    #[test]
    fn test_parse_unit_and_minimal_variants() {
        // テスト項目: フィールドを持たないイベントも解析できる
        // given (前提条件):
        let pong = r#"{"type":"pong"}"#;
        let connected = r#"{"type":"connected"}"#;

        // when (操作):
        let pong = RealtimeEvent::parse(pong).unwrap();
        let connected = RealtimeEvent::parse(connected).unwrap();

        // then (期待する結果):
        assert_eq!(pong, RealtimeEvent::Pong);
        assert_eq!(connected.kind(), "connected");
    }

    #[test]
    fn test_parse_rejects_malformed_frames() {
        // テスト項目: 不正なフレームはエラーになる
        // given (前提条件):
        let frames = [
            "not json",
            r#"{"conversation_id": 1}"#,
            r#"{"type":"unknown_kind"}"#,
            r#"{"type":"new_message","conversation_id":1}"#,
        ];

        // when (操作) / then (期待する結果):
        for frame in frames {
            assert!(RealtimeEvent::parse(frame).is_err(), "frame: {}", frame);
        }
    }
}
