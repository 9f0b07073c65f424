//! Message data model.

use chrono::{DateTime, Utc};

use crate::folder::FolderRef;

pub use mailsync_wire::AddressField;

/// Unique identifier for a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub String);

impl MessageId {
    /// Creates a new message id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A participant (sender or recipient) on a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Display name, when known.
    pub name: Option<String>,
    /// Email address.
    pub address: String,
    /// Header field the address came from.
    pub field: AddressField,
}

/// One body part of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPart {
    /// MIME content type.
    pub content_type: String,
    /// Part content, when the server sent it.
    pub content: Option<String>,
    /// Whether the server truncated this part.
    pub truncated: bool,
}

/// Canonical message entity.
///
/// Owned exclusively by the [`MessageStore`](super::MessageStore);
/// conversations hold stubs that reference messages by id, never the
/// entity itself.
///
/// `subject`, `participants`, and `body` are `Option` because wire
/// payloads are partial: a search-result stub omits them entirely. The
/// merge rule uses that distinction: an absent field never overwrites
/// a known value, while a provided field always wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Stable unique id.
    pub id: MessageId,
    /// Parent folder.
    pub folder: FolderRef,
    /// Message date; primary sort and pagination cursor.
    pub date: DateTime<Utc>,
    /// Read flag.
    pub read: bool,
    /// Flagged (starred) flag.
    pub flagged: bool,
    /// Subject line, when provided.
    pub subject: Option<String>,
    /// Participants, when provided. Replaced wholesale on merge; the
    /// list is an atomic attribute, not per-element updatable.
    pub participants: Option<Vec<Participant>>,
    /// Body parts, when provided.
    pub body: Option<Vec<BodyPart>>,
    /// Whether the full body has been fetched, as opposed to a stub
    /// obtained via conversation expansion. Only ever set true; merges
    /// never downgrade it.
    pub is_complete: bool,
}

impl Message {
    /// Returns `true` when any fetched body part was truncated by the
    /// server.
    #[must_use]
    pub fn has_truncated_body(&self) -> bool {
        self.body
            .as_deref()
            .is_some_and(|parts| parts.iter().any(|p| p.truncated))
    }
}
