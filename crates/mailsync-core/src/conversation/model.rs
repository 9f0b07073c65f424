//! Conversation data model.

use chrono::{DateTime, Utc};

use crate::folder::FolderRef;
use crate::message::MessageId;

/// Unique identifier for a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationId(pub String);

impl ConversationId {
    /// Creates a new conversation id.
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

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A minimal message reference inside a conversation.
///
/// Stubs stand in for full entities: id, parent folder, and date only.
/// Message content lives exclusively in the message store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageStub {
    /// Referenced message id.
    pub id: MessageId,
    /// Parent folder of the referenced message.
    pub folder: FolderRef,
    /// Date of the referenced message.
    pub date: DateTime<Utc>,
}

/// Per-conversation expansion state.
///
/// `Idle -> Pending -> Fulfilled | Rejected`. A fulfilled expand
/// replaces the stub list with the server's authoritative set; a
/// rejected expand preserves whatever was known before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpandState {
    /// Never expanded (or invalidated by a later page fetch).
    #[default]
    Idle,
    /// Expand request in flight.
    Pending,
    /// Expand succeeded; the stub list is the complete message set as
    /// of that response.
    Fulfilled,
    /// Expand failed; the prior stub list is unchanged.
    Rejected,
}

impl ExpandState {
    /// Returns `true` while an expand request is in flight.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns `true` once the complete message set is known.
    #[must_use]
    pub const fn is_fulfilled(self) -> bool {
        matches!(self, Self::Fulfilled)
    }
}

/// Per-folder search/pagination status.
///
/// `None -> Pending -> (Complete | HasMore) | Incomplete`. `Incomplete`
/// marks a failed fetch, distinct from `Complete`, so callers can tell
/// "exhausted" apart from "loading failed, consider retrying".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    /// Folder has never been searched.
    #[default]
    None,
    /// Search in flight.
    Pending,
    /// All results fetched; nothing more to load.
    Complete,
    /// A full page arrived; more results may exist.
    HasMore,
    /// The last fetch failed; a refetch is warranted.
    Incomplete,
}

impl SearchStatus {
    /// Returns `true` when offering "load more" makes sense.
    #[must_use]
    pub const fn can_load_more(self) -> bool {
        matches!(self, Self::HasMore)
    }

    /// Returns `true` when a (re)fetch should be triggered.
    #[must_use]
    pub const fn needs_fetch(self) -> bool {
        matches!(self, Self::None | Self::Incomplete)
    }
}

/// Canonical conversation entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    /// Stable unique id.
    pub id: ConversationId,
    /// Subject line, when provided.
    pub subject: Option<String>,
    /// Aggregate read flag.
    pub read: bool,
    /// Aggregate flagged flag.
    pub flagged: bool,
    /// Message stubs. Insertion order carries no meaning; display order
    /// is computed by the selectors.
    pub stubs: Vec<MessageStub>,
    /// Expansion state machine.
    pub expanded: ExpandState,
}

impl Conversation {
    /// Returns `true` when any stub lives in the given folder; the
    /// effective-parent test used by the selectors.
    #[must_use]
    pub fn in_folder(&self, folder: &FolderRef) -> bool {
        self.stubs.iter().any(|stub| &stub.folder == folder)
    }

    /// Date of the newest stub; the conversation's sort key.
    #[must_use]
    pub fn latest_date(&self) -> DateTime<Utc> {
        self.stubs
            .iter()
            .map(|stub| stub.date)
            .max()
            .unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Looks up a stub by message id.
    #[must_use]
    pub fn stub(&self, id: &MessageId) -> Option<&MessageStub> {
        self.stubs.iter().find(|stub| &stub.id == id)
    }
}
