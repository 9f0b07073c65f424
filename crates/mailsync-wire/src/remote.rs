//! Remote mailbox contract.
//!
//! The engine never talks to a transport directly; it drives an
//! implementation of [`Mailbox`]. Production code adapts the RPC layer
//! behind this trait, tests script it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::payload::{SearchResponse, WireMessage};

/// Which entity kind a search should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    /// Conversation listings.
    Conversation,
    /// Flat message listings.
    Message,
}

/// Sort order for search results and folder projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Newest first (default).
    #[default]
    DateDesc,
    /// Oldest first.
    DateAsc,
    /// Subject, A to Z.
    SubjectAsc,
    /// Subject, Z to A.
    SubjectDesc,
}

impl SortBy {
    /// Wire string for the sort parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DateDesc => "dateDesc",
            Self::DateAsc => "dateAsc",
            Self::SubjectAsc => "subjectAsc",
            Self::SubjectDesc => "subjectDesc",
        }
    }
}

/// Parameters for a paginated folder search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Folder to search in, possibly in `zid:rid` delegated form.
    pub folder_id: String,
    /// Entity kind to return.
    pub kind: SearchKind,
    /// Sort order.
    pub sort_by: SortBy,
    /// Page size.
    pub limit: u32,
    /// Page offset; 0 means first page.
    #[serde(default)]
    pub offset: u32,
    /// Only return results dated before this epoch-ms instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<i64>,
}

/// Mailbox operation, serialized with the server's op strings.
///
/// The `!`-prefixed strings are the server's negation encoding; inside
/// the engine the operation is always this tagged type, never a string
/// that gets prefix-tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOp {
    /// Mark read.
    #[serde(rename = "read")]
    Read,
    /// Mark unread.
    #[serde(rename = "!read")]
    Unread,
    /// Set the flagged star.
    #[serde(rename = "flag")]
    Flag,
    /// Clear the flagged star.
    #[serde(rename = "!flag")]
    Unflag,
    /// Move to the trash folder.
    #[serde(rename = "trash")]
    Trash,
    /// Delete permanently.
    #[serde(rename = "delete")]
    Delete,
    /// Move to a destination folder.
    #[serde(rename = "move")]
    Move,
    /// Mark as spam (move to junk).
    #[serde(rename = "spam")]
    Spam,
    /// Unmark as spam (move back to inbox).
    #[serde(rename = "!spam")]
    Unspam,
}

/// An action request against one or more entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    /// Operation to apply.
    pub op: ActionOp,
    /// Target entity ids.
    pub ids: Vec<String>,
    /// Destination folder for `move`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_folder_id: Option<String>,
}

/// Server confirmation echo for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionAck {
    /// Ids the action was applied to.
    pub ids: Vec<String>,
    /// Operation that was applied.
    pub op: ActionOp,
}

/// The remote mailbox the engine synchronizes against.
#[async_trait]
pub trait Mailbox {
    /// Runs a paginated folder search.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails or the server refuses
    /// the query.
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse>;

    /// Fetches the complete message set of one conversation.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails or the server refuses
    /// the request.
    async fn expand_conversation(
        &self,
        conversation_id: &str,
        folder_id: &str,
    ) -> Result<Vec<WireMessage>>;

    /// Fetches a single message.
    ///
    /// `max_body_size` limits body-part size in bytes; `None` means the
    /// full body, unbounded.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails or the server refuses
    /// the request.
    async fn fetch_message(
        &self,
        message_id: &str,
        max_body_size: Option<u32>,
    ) -> Result<WireMessage>;

    /// Applies a mailbox action.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails or the server rejects
    /// the action.
    async fn apply_action(&self, request: &ActionRequest) -> Result<ActionAck>;
}
