//! Push-notification event payloads.
//!
//! The push transport decodes its frames into [`DeltaEvent`] values and
//! publishes them into the engine's channel. Events arrive unordered
//! relative to in-flight request promises; the engine applies them in
//! arrival order.

use serde::{Deserialize, Serialize};

use crate::payload::{WireConversation, WireMessage, WireMessageStub};

/// A server-pushed delta for one entity.
///
/// The entity kind and the change kind are collapsed into a single tag
/// (`messageCreated`, `conversationDeleted`, ...) since no consumer
/// inspects them independently. The two stub variants are the
/// conversation-scoped membership deltas: a message joined or left a
/// conversation without the conversation changing identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum DeltaEvent {
    /// A message came into existence.
    MessageCreated(WireMessage),
    /// An existing message changed.
    MessageModified(WireMessage),
    /// A message was destroyed.
    MessageDeleted {
        /// Id of the deleted message.
        id: String,
    },
    /// A conversation came into existence.
    ConversationCreated(WireConversation),
    /// An existing conversation changed.
    ConversationModified(WireConversation),
    /// A conversation was destroyed.
    ConversationDeleted {
        /// Id of the deleted conversation.
        id: String,
    },
    /// A message joined a conversation's stub list.
    StubAdded {
        /// Conversation gaining the stub.
        conversation_id: String,
        /// The stub being added.
        stub: WireMessageStub,
    },
    /// A message left a conversation's stub list.
    StubRemoved {
        /// Conversation losing the stub.
        conversation_id: String,
        /// Id of the message whose stub is removed.
        message_id: String,
    },
}

impl DeltaEvent {
    /// Id of the entity this event targets.
    #[must_use]
    pub fn target_id(&self) -> &str {
        match self {
            Self::MessageCreated(m) | Self::MessageModified(m) => &m.id,
            Self::MessageDeleted { id } | Self::ConversationDeleted { id } => id,
            Self::ConversationCreated(c) | Self::ConversationModified(c) => &c.id,
            Self::StubAdded {
                conversation_id, ..
            }
            | Self::StubRemoved {
                conversation_id, ..
            } => conversation_id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_encoding() {
        let event = DeltaEvent::MessageDeleted {
            id: "42".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"messageDeleted\""));
        let back: DeltaEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_stub_added_decodes() {
        let json = r#"{
            "type": "stubAdded",
            "payload": {
                "conversationId": "c7",
                "stub": {"id": "m9", "folderId": "2", "date": 1706000000000}
            }
        }"#;
        let event: DeltaEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.target_id(), "c7");
    }

    #[test]
    fn test_target_id_per_variant() {
        let msg = WireMessage {
            id: "m1".to_string(),
            folder_id: "2".to_string(),
            date: 0,
            read: false,
            flagged: false,
            subject: None,
            participants: None,
            parts: None,
        };
        assert_eq!(DeltaEvent::MessageCreated(msg).target_id(), "m1");
        assert_eq!(
            DeltaEvent::StubRemoved {
                conversation_id: "c1".to_string(),
                message_id: "m1".to_string(),
            }
            .target_id(),
            "c1"
        );
    }
}
