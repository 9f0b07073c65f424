//! Conversation store.
//!
//! Canonical map of conversation id to conversation entity, plus the
//! per-folder search/pagination status machine. Stores stubs only;
//! message content lives in the message store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::model::{Conversation, ConversationId, ExpandState, MessageStub, SearchStatus};
use crate::folder::FolderRef;
use crate::message::MessageId;

/// Merges an incoming conversation into an existing entry.
///
/// Scalar fields follow the message rule: incoming wins where
/// provided. Stub lists union by message id with incoming values
/// winning; only a fulfilled expand replaces the list wholesale.
/// Expansion state is engine bookkeeping and survives the merge.
#[must_use]
pub fn merge_conversation(existing: &Conversation, incoming: Conversation) -> Conversation {
    let mut stubs = existing.stubs.clone();
    for stub in incoming.stubs {
        match stubs.iter_mut().find(|s| s.id == stub.id) {
            Some(slot) => *slot = stub,
            None => stubs.push(stub),
        }
    }

    Conversation {
        id: incoming.id,
        subject: incoming.subject.or_else(|| existing.subject.clone()),
        read: incoming.read,
        flagged: incoming.flagged,
        stubs,
        expanded: existing.expanded,
    }
}

/// Canonical map of conversation id to conversation entity.
#[derive(Debug, Default)]
pub struct ConversationStore {
    entries: HashMap<ConversationId, Conversation>,
    folders: HashMap<FolderRef, SearchStatus>,
}

impl ConversationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a conversation.
    #[must_use]
    pub fn get(&self, id: &ConversationId) -> Option<&Conversation> {
        self.entries.get(id)
    }

    /// Returns `true` when the conversation is present.
    #[must_use]
    pub fn contains(&self, id: &ConversationId) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of stored conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all stored conversations in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Conversation> {
        self.entries.values()
    }

    // -- folder search status ------------------------------------------

    /// Search status for a folder; `None` when never searched.
    #[must_use]
    pub fn folder_status(&self, folder: &FolderRef) -> SearchStatus {
        self.folders.get(folder).copied().unwrap_or_default()
    }

    /// Marks a folder search as in flight.
    pub fn search_started(&mut self, folder: &FolderRef) {
        self.folders.insert(folder.clone(), SearchStatus::Pending);
    }

    /// Marks a folder search as failed.
    ///
    /// `Incomplete`, not `Complete`: retry logic must be able to tell
    /// "nothing more to load" apart from "loading failed".
    pub fn search_failed(&mut self, folder: &FolderRef) {
        self.folders.insert(folder.clone(), SearchStatus::Incomplete);
    }

    /// Applies one page of conversation search results.
    ///
    /// Offset 0 (initial load or refresh) replaces the folder's known
    /// conversations keyed by id. A later offset unions the page into
    /// the map and clears expansion state for the folder's
    /// conversations: a new page may have changed the membership
    /// assumptions a previous expand relied on, so the invalidation is
    /// conservative rather than re-verified.
    pub fn apply_search_page(
        &mut self,
        folder: &FolderRef,
        page: Vec<Conversation>,
        offset: u32,
        has_more: bool,
    ) {
        if offset == 0 {
            self.entries.retain(|_, conv| !conv.in_folder(folder));
            for conv in page {
                self.entries.insert(conv.id.clone(), conv);
            }
        } else {
            for conv in page {
                self.upsert(conv);
            }
            for conv in self.entries.values_mut() {
                if conv.in_folder(folder) {
                    conv.expanded = ExpandState::Idle;
                }
            }
        }

        self.search_completed(folder, has_more);
    }

    /// Records a successful search outcome for a folder.
    ///
    /// Also used directly by message-kind searches: the status machine
    /// is per folder, not per entity kind.
    pub fn search_completed(&mut self, folder: &FolderRef, has_more: bool) {
        let status = if has_more {
            SearchStatus::HasMore
        } else {
            SearchStatus::Complete
        };
        self.folders.insert(folder.clone(), status);
    }

    // -- entity merges -------------------------------------------------

    /// Inserts a conversation, merging with any existing entry.
    pub fn upsert(&mut self, incoming: Conversation) {
        let merged = match self.entries.get(&incoming.id) {
            Some(existing) => merge_conversation(existing, incoming),
            None => incoming,
        };
        self.entries.insert(merged.id.clone(), merged);
    }

    /// Merges into an existing entry only; `false` when the target is
    /// absent.
    pub fn merge_existing(&mut self, incoming: Conversation) -> bool {
        match self.entries.get(&incoming.id) {
            Some(existing) => {
                let merged = merge_conversation(existing, incoming);
                self.entries.insert(merged.id.clone(), merged);
                true
            }
            None => false,
        }
    }

    /// Removes a conversation.
    pub fn remove(&mut self, id: &ConversationId) -> Option<Conversation> {
        self.entries.remove(id)
    }

    // -- expansion state machine ---------------------------------------

    /// Marks an expand request as in flight. `false` when the
    /// conversation is unknown.
    pub fn expand_started(&mut self, id: &ConversationId) -> bool {
        if let Some(conv) = self.entries.get_mut(id) {
            conv.expanded = ExpandState::Pending;
            true
        } else {
            false
        }
    }

    /// Completes an expand: the stub list is replaced, not merged;
    /// expand is the one operation that returns a conversation's
    /// complete message set.
    pub fn expand_fulfilled(&mut self, id: &ConversationId, stubs: Vec<MessageStub>) -> bool {
        if let Some(conv) = self.entries.get_mut(id) {
            conv.stubs = stubs;
            conv.expanded = ExpandState::Fulfilled;
            true
        } else {
            false
        }
    }

    /// Fails an expand; the prior stub list is preserved unchanged.
    pub fn expand_rejected(&mut self, id: &ConversationId) -> bool {
        if let Some(conv) = self.entries.get_mut(id) {
            conv.expanded = ExpandState::Rejected;
            true
        } else {
            false
        }
    }

    // -- stub maintenance ----------------------------------------------

    /// Adds or updates a stub on one conversation.
    pub fn add_stub(&mut self, id: &ConversationId, stub: MessageStub) -> bool {
        if let Some(conv) = self.entries.get_mut(id) {
            match conv.stubs.iter_mut().find(|s| s.id == stub.id) {
                Some(slot) => *slot = stub,
                None => conv.stubs.push(stub),
            }
            true
        } else {
            false
        }
    }

    /// Removes a stub from one conversation.
    pub fn remove_stub(&mut self, id: &ConversationId, message_id: &MessageId) -> bool {
        if let Some(conv) = self.entries.get_mut(id) {
            let before = conv.stubs.len();
            conv.stubs.retain(|s| &s.id != message_id);
            conv.stubs.len() != before
        } else {
            false
        }
    }

    /// Removes a message's stub from every conversation; the
    /// conversation half of cross-store message deletion.
    pub fn remove_stub_everywhere(&mut self, message_id: &MessageId) -> usize {
        let mut removed = 0;
        for conv in self.entries.values_mut() {
            let before = conv.stubs.len();
            conv.stubs.retain(|s| &s.id != message_id);
            removed += before - conv.stubs.len();
        }
        removed
    }

    /// Reparents every stub for a message, leaving dates untouched.
    /// Used by optimistic moves, where only the folder changes.
    pub fn reparent_stub(&mut self, message_id: &MessageId, folder: &FolderRef) {
        for conv in self.entries.values_mut() {
            for stub in conv.stubs.iter_mut().filter(|s| &s.id == message_id) {
                stub.folder = folder.clone();
            }
        }
    }

    /// Reparents all stubs of one conversation, returning the member
    /// message ids so the caller can reparent the messages themselves.
    pub fn reparent_all_stubs(&mut self, id: &ConversationId, folder: &FolderRef) -> Vec<MessageId> {
        match self.entries.get_mut(id) {
            Some(conv) => conv
                .stubs
                .iter_mut()
                .map(|stub| {
                    stub.folder = folder.clone();
                    stub.id.clone()
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// Realigns every stub for a message with its canonical parent and
    /// date. The message store is the source of truth for both.
    pub fn sync_stub(&mut self, message_id: &MessageId, folder: &FolderRef, date: DateTime<Utc>) {
        for conv in self.entries.values_mut() {
            for stub in conv.stubs.iter_mut().filter(|s| &s.id == message_id) {
                stub.folder = folder.clone();
                stub.date = date;
            }
        }
    }

    /// Ids of conversations whose stub lists reference a message.
    #[must_use]
    pub fn referencing(&self, message_id: &MessageId) -> Vec<ConversationId> {
        self.entries
            .values()
            .filter(|conv| conv.stub(message_id).is_some())
            .map(|conv| conv.id.clone())
            .collect()
    }

    // -- direct flag mutations (action layer) --------------------------

    /// Sets the aggregate read flag directly. `false` when absent.
    pub fn set_read(&mut self, id: &ConversationId, read: bool) -> bool {
        if let Some(conv) = self.entries.get_mut(id) {
            conv.read = read;
            true
        } else {
            false
        }
    }

    /// Sets the aggregate flagged flag directly. `false` when absent.
    pub fn set_flagged(&mut self, id: &ConversationId, flagged: bool) -> bool {
        if let Some(conv) = self.entries.get_mut(id) {
            conv.flagged = flagged;
            true
        } else {
            false
        }
    }

    /// Restores a snapshot slot: puts back the captured entity, or
    /// removes the key when the capture recorded absence.
    pub(crate) fn restore(&mut self, id: &ConversationId, snapshot: Option<Conversation>) {
        match snapshot {
            Some(conv) => {
                self.entries.insert(id.clone(), conv);
            }
            None => {
                self.entries.remove(id);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn stub(id: &str, folder: &str, date_ms: i64) -> MessageStub {
        MessageStub {
            id: MessageId::new(id),
            folder: FolderRef::parse(folder),
            date: DateTime::from_timestamp_millis(date_ms).unwrap(),
        }
    }

    fn conversation(id: &str, stubs: Vec<MessageStub>) -> Conversation {
        Conversation {
            id: ConversationId::new(id),
            subject: Some(format!("subject {id}")),
            read: false,
            flagged: false,
            stubs,
            expanded: ExpandState::Idle,
        }
    }

    fn inbox() -> FolderRef {
        FolderRef::local("2")
    }

    #[test]
    fn test_offset_zero_replaces_folder_conversations() {
        // A second offset-0 fetch drops prior entries.
        let mut store = ConversationStore::new();
        store.apply_search_page(
            &inbox(),
            vec![
                conversation("a", vec![stub("m1", "2", 10)]),
                conversation("b", vec![stub("m2", "2", 20)]),
            ],
            0,
            false,
        );
        store.apply_search_page(
            &inbox(),
            vec![
                conversation("e", vec![stub("m5", "2", 50)]),
                conversation("f", vec![stub("m6", "2", 60)]),
            ],
            0,
            false,
        );

        assert_eq!(store.len(), 2);
        assert!(store.contains(&ConversationId::new("e")));
        assert!(!store.contains(&ConversationId::new("a")));
    }

    #[test]
    fn test_offset_zero_keeps_other_folders() {
        let mut store = ConversationStore::new();
        store.apply_search_page(
            &FolderRef::local("5"),
            vec![conversation("x", vec![stub("m9", "5", 10)])],
            0,
            false,
        );
        store.apply_search_page(
            &inbox(),
            vec![conversation("a", vec![stub("m1", "2", 10)])],
            0,
            false,
        );
        assert!(store.contains(&ConversationId::new("x")));
    }

    #[test]
    fn test_load_more_unions() {
        // Offset 0 {A,B} then offset 2 {C,D} yields {A,B,C,D}.
        let mut store = ConversationStore::new();
        store.apply_search_page(
            &inbox(),
            vec![
                conversation("a", vec![stub("m1", "2", 10)]),
                conversation("b", vec![stub("m2", "2", 20)]),
            ],
            0,
            true,
        );
        store.apply_search_page(
            &inbox(),
            vec![
                conversation("c", vec![stub("m3", "2", 30)]),
                conversation("d", vec![stub("m4", "2", 40)]),
            ],
            2,
            false,
        );

        assert_eq!(store.len(), 4);
        for id in ["a", "b", "c", "d"] {
            assert!(store.contains(&ConversationId::new(id)), "missing {id}");
        }
        assert_eq!(store.folder_status(&inbox()), SearchStatus::Complete);
    }

    #[test]
    fn test_load_more_clears_expansion_in_folder() {
        let mut store = ConversationStore::new();
        store.apply_search_page(
            &inbox(),
            vec![conversation("a", vec![stub("m1", "2", 10)])],
            0,
            true,
        );
        let id = ConversationId::new("a");
        store.expand_fulfilled(&id, vec![stub("m1", "2", 10)]);
        assert!(store.get(&id).unwrap().expanded.is_fulfilled());

        store.apply_search_page(
            &inbox(),
            vec![conversation("b", vec![stub("m2", "2", 20)])],
            1,
            false,
        );
        assert_eq!(store.get(&id).unwrap().expanded, ExpandState::Idle);
    }

    #[test]
    fn test_status_transitions() {
        let mut store = ConversationStore::new();
        assert_eq!(store.folder_status(&inbox()), SearchStatus::None);

        store.search_started(&inbox());
        assert_eq!(store.folder_status(&inbox()), SearchStatus::Pending);

        store.apply_search_page(&inbox(), vec![], 0, true);
        assert_eq!(store.folder_status(&inbox()), SearchStatus::HasMore);

        store.search_failed(&inbox());
        assert_eq!(store.folder_status(&inbox()), SearchStatus::Incomplete);
        assert!(store.folder_status(&inbox()).needs_fetch());
    }

    #[test]
    fn test_expand_fulfilled_replaces_stubs() {
        let mut store = ConversationStore::new();
        store.upsert(conversation("a", vec![stub("m1", "2", 10)]));
        let id = ConversationId::new("a");

        assert!(store.expand_started(&id));
        assert!(store.get(&id).unwrap().expanded.is_pending());

        let authoritative = vec![stub("m2", "2", 20), stub("m3", "2", 30)];
        store.expand_fulfilled(&id, authoritative.clone());
        let conv = store.get(&id).unwrap();
        assert_eq!(conv.stubs, authoritative);
        assert!(conv.expanded.is_fulfilled());
    }

    #[test]
    fn test_expand_rejected_preserves_stubs() {
        let mut store = ConversationStore::new();
        let original = vec![stub("m1", "2", 10)];
        store.upsert(conversation("a", original.clone()));
        let id = ConversationId::new("a");

        store.expand_started(&id);
        store.expand_rejected(&id);

        let conv = store.get(&id).unwrap();
        assert_eq!(conv.stubs, original);
        assert_eq!(conv.expanded, ExpandState::Rejected);
    }

    #[test]
    fn test_expand_on_unknown_conversation_is_noop() {
        let mut store = ConversationStore::new();
        assert!(!store.expand_started(&ConversationId::new("nope")));
        assert!(!store.expand_rejected(&ConversationId::new("nope")));
    }

    #[test]
    fn test_merge_unions_stubs_incoming_wins() {
        let existing = conversation("a", vec![stub("m1", "2", 10), stub("m2", "2", 20)]);
        let incoming = conversation("a", vec![stub("m2", "3", 25), stub("m3", "2", 30)]);

        let merged = merge_conversation(&existing, incoming);
        assert_eq!(merged.stubs.len(), 3);
        let m2 = merged.stub(&MessageId::new("m2")).unwrap();
        assert_eq!(m2.folder, FolderRef::local("3"));
    }

    #[test]
    fn test_remove_stub_everywhere() {
        let mut store = ConversationStore::new();
        store.upsert(conversation("a", vec![stub("m1", "2", 10), stub("m2", "2", 20)]));
        store.upsert(conversation("b", vec![stub("m1", "2", 10)]));

        assert_eq!(store.remove_stub_everywhere(&MessageId::new("m1")), 2);
        assert!(store
            .get(&ConversationId::new("a"))
            .unwrap()
            .stub(&MessageId::new("m1"))
            .is_none());
    }

    #[test]
    fn test_sync_stub_realigns_parent_and_date() {
        let mut store = ConversationStore::new();
        store.upsert(conversation("a", vec![stub("m1", "2", 10)]));

        let date = DateTime::from_timestamp_millis(99).unwrap();
        store.sync_stub(&MessageId::new("m1"), &FolderRef::local("3"), date);

        let synced = store
            .get(&ConversationId::new("a"))
            .unwrap()
            .stub(&MessageId::new("m1"))
            .cloned()
            .unwrap();
        assert_eq!(synced.folder, FolderRef::local("3"));
        assert_eq!(synced.date, date);
    }

    #[test]
    fn test_referencing() {
        let mut store = ConversationStore::new();
        store.upsert(conversation("a", vec![stub("m1", "2", 10)]));
        store.upsert(conversation("b", vec![stub("m2", "2", 20)]));

        let refs = store.referencing(&MessageId::new("m1"));
        assert_eq!(refs, vec![ConversationId::new("a")]);
    }
}
