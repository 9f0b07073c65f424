//! Canonical message store.
//!
//! Single source of truth for message content and flags. All mutation
//! goes through the merge and flag methods here; no other code path
//! writes entity fields directly.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::model::{Message, MessageId};
use crate::folder::FolderRef;

/// Merges an incoming message into an existing entry.
///
/// Shallow merge: the incoming payload wins for every field it
/// provides, and an absent field keeps the existing value. Two
/// exceptions, both deliberate:
/// - `is_complete` is only ever set true; a later partial stub never
///   downgrades a full fetch.
/// - `participants` is replaced wholesale when provided, never merged
///   element-by-element.
#[must_use]
pub fn merge_message(existing: &Message, incoming: Message) -> Message {
    Message {
        id: incoming.id,
        folder: incoming.folder,
        date: incoming.date,
        read: incoming.read,
        flagged: incoming.flagged,
        subject: incoming.subject.or_else(|| existing.subject.clone()),
        participants: incoming
            .participants
            .or_else(|| existing.participants.clone()),
        body: incoming.body.or_else(|| existing.body.clone()),
        is_complete: existing.is_complete || incoming.is_complete,
    }
}

/// Canonical map of message id to message entity.
#[derive(Debug, Default)]
pub struct MessageStore {
    entries: HashMap<MessageId, Message>,
}

impl MessageStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a message.
    #[must_use]
    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.entries.get(id)
    }

    /// Returns `true` when the message is present.
    #[must_use]
    pub fn contains(&self, id: &MessageId) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of stored messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all stored messages in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.entries.values()
    }

    /// Inserts a message, merging with any existing entry.
    pub fn upsert(&mut self, incoming: Message) {
        let merged = match self.entries.get(&incoming.id) {
            Some(existing) => merge_message(existing, incoming),
            None => incoming,
        };
        self.entries.insert(merged.id.clone(), merged);
    }

    /// Merges into an existing entry only.
    ///
    /// Returns `false` without touching the store when the target is
    /// absent; the entity was never of interest, not an error.
    pub fn merge_existing(&mut self, incoming: Message) -> bool {
        match self.entries.get(&incoming.id) {
            Some(existing) => {
                let merged = merge_message(existing, incoming);
                self.entries.insert(merged.id.clone(), merged);
                true
            }
            None => false,
        }
    }

    /// Removes a message.
    pub fn remove(&mut self, id: &MessageId) -> Option<Message> {
        self.entries.remove(id)
    }

    /// Drops every message parented in the given folder; the message
    /// half of an offset-0 page replace.
    pub fn remove_in_folder(&mut self, folder: &FolderRef) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, m| &m.folder != folder);
        before - self.entries.len()
    }

    /// Sets the read flag directly. Returns `false` when absent.
    pub fn set_read(&mut self, id: &MessageId, read: bool) -> bool {
        if let Some(message) = self.entries.get_mut(id) {
            message.read = read;
            true
        } else {
            false
        }
    }

    /// Sets the flagged flag directly. Returns `false` when absent.
    pub fn set_flagged(&mut self, id: &MessageId, flagged: bool) -> bool {
        if let Some(message) = self.entries.get_mut(id) {
            message.flagged = flagged;
            true
        } else {
            false
        }
    }

    /// Reparents a message. Returns `false` when absent.
    pub fn set_folder(&mut self, id: &MessageId, folder: &FolderRef) -> bool {
        if let Some(message) = self.entries.get_mut(id) {
            message.folder = folder.clone();
            true
        } else {
            false
        }
    }

    /// Realigns a stored message's parent and date with fresher stub
    /// data from a conversation payload. The counterpart of
    /// [`ConversationStore::sync_stub`](crate::conversation::ConversationStore::sync_stub):
    /// whichever side a payload arrives on, the other side follows.
    /// Returns `false` when the message was never stored.
    pub fn sync_parent(&mut self, id: &MessageId, folder: &FolderRef, date: DateTime<Utc>) -> bool {
        if let Some(message) = self.entries.get_mut(id) {
            message.folder = folder.clone();
            message.date = date;
            true
        } else {
            false
        }
    }

    /// Restores a snapshot slot: puts back the captured entity, or
    /// removes the key when the capture recorded absence.
    pub(crate) fn restore(&mut self, id: &MessageId, snapshot: Option<Message>) {
        match snapshot {
            Some(message) => {
                self.entries.insert(id.clone(), message);
            }
            None => {
                self.entries.remove(id);
            }
        }
    }

    /// Stub and date of a message, for conversation-side consistency
    /// checks.
    #[must_use]
    pub fn parent_and_date(&self, id: &MessageId) -> Option<(&FolderRef, DateTime<Utc>)> {
        self.entries.get(id).map(|m| (&m.folder, m.date))
    }
}
