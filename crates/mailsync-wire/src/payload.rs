//! Wire-format payload types.
//!
//! These structs mirror the JSON shapes produced by the webmail API.
//! Search results carry partial shapes (no body parts, sometimes no
//! participants); detail fetches carry the full shape. Optional fields
//! therefore distinguish "not provided by this payload" from "empty",
//! which the engine's merge rules rely on.

use serde::{Deserialize, Serialize};

/// Which header field an address appeared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressField {
    /// Sender.
    From,
    /// Primary recipient.
    To,
    /// Carbon copy.
    Cc,
    /// Blind carbon copy.
    Bcc,
}

/// A participant (sender or recipient) on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireParticipant {
    /// Display name, when the server knows one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address.
    pub address: String,
    /// Header field the address came from.
    pub field: AddressField,
}

/// One body part of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBodyPart {
    /// MIME content type of the part.
    pub content_type: String,
    /// Part content; absent for parts the server elided entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Whether the server truncated this part. Absence means "not
    /// truncated"; truncation is never inferred from content length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
}

/// A message as it appears on the wire.
///
/// Both the search-result stub shape and the full detail-fetch shape
/// deserialize into this type; optional fields are simply absent in the
/// stub shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    /// Stable message id.
    pub id: String,
    /// Parent folder id, possibly in `zid:rid` delegated form.
    pub folder_id: String,
    /// Date in epoch milliseconds.
    pub date: i64,
    /// Read flag.
    #[serde(default)]
    pub read: bool,
    /// Flagged (starred) flag.
    #[serde(default)]
    pub flagged: bool,
    /// Subject line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Participants, when the payload carries them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<WireParticipant>>,
    /// Body parts, when the payload carries them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<WireBodyPart>>,
}

/// A lightweight message reference inside a conversation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessageStub {
    /// Message id.
    pub id: String,
    /// Parent folder id, possibly in `zid:rid` delegated form.
    pub folder_id: String,
    /// Date in epoch milliseconds.
    pub date: i64,
}

/// A conversation as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireConversation {
    /// Stable conversation id.
    pub id: String,
    /// Subject line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Aggregate read flag (true when every message is read).
    #[serde(default)]
    pub read: bool,
    /// Aggregate flagged flag (true when any message is flagged).
    #[serde(default)]
    pub flagged: bool,
    /// Message stubs known to this payload.
    #[serde(default)]
    pub messages: Vec<WireMessageStub>,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Conversation hits (conversation-kind searches).
    #[serde(default)]
    pub conversations: Vec<WireConversation>,
    /// Message hits (message-kind searches).
    #[serde(default)]
    pub messages: Vec<WireMessage>,
    /// Whether more results may exist past this page.
    #[serde(default)]
    pub has_more: bool,
    /// Offset this page was fetched at.
    #[serde(default)]
    pub offset: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_stub_shape_decodes() {
        let json = r#"{"id":"257","folderId":"2","date":1706000000000,"read":true,
                       "subject":"Quarterly numbers"}"#;
        let msg: WireMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.id, "257");
        assert!(msg.read);
        assert!(!msg.flagged);
        assert!(msg.participants.is_none());
        assert!(msg.parts.is_none());
    }

    #[test]
    fn test_full_message_shape_decodes() {
        let json = r#"{
            "id": "257",
            "folderId": "7a9c:2",
            "date": 1706000000000,
            "flagged": true,
            "subject": "Quarterly numbers",
            "participants": [
                {"name": "Ana", "address": "ana@example.com", "field": "from"},
                {"address": "me@example.com", "field": "to"}
            ],
            "parts": [
                {"contentType": "text/plain", "content": "Numbers attached.", "truncated": true}
            ]
        }"#;
        let msg: WireMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.participants.as_ref().unwrap().len(), 2);
        assert_eq!(
            msg.participants.unwrap()[1].field,
            AddressField::To
        );
        assert_eq!(msg.parts.unwrap()[0].truncated, Some(true));
    }

    #[test]
    fn test_conversation_defaults() {
        let json = r#"{"id":"c1"}"#;
        let conv: WireConversation = serde_json::from_str(json).unwrap();
        assert!(!conv.read);
        assert!(conv.messages.is_empty());
    }

    #[test]
    fn test_search_response_roundtrip() {
        let resp = SearchResponse {
            conversations: vec![WireConversation {
                id: "c1".to_string(),
                subject: Some("Hello".to_string()),
                read: false,
                flagged: false,
                messages: vec![WireMessageStub {
                    id: "m1".to_string(),
                    folder_id: "2".to_string(),
                    date: 1_706_000_000_000,
                }],
            }],
            messages: vec![],
            has_more: true,
            offset: 0,
        };
        let json = serde_json::to_string(&resp).unwrap();
        let back: SearchResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back, resp);
    }
}
