//! Optimistic mailbox actions.
//!
//! An action is applied to the stores immediately (the optimistic
//! write), then sent to the server. On rejection the pre-action
//! snapshot is restored exactly, never a partial or re-derived state,
//! so concurrent merges on unrelated entities survive a rollback
//! untouched.

use mailsync_wire::ActionOp;

use crate::config::EngineConfig;
use crate::context::StoreContext;
use crate::conversation::{Conversation, ConversationId};
use crate::folder::FolderRef;
use crate::message::{Message, MessageId};

/// A mailbox operation with its value made explicit.
///
/// The server's `!`-prefixed negation strings exist only on the wire;
/// here the toggled boolean is part of the type, computed from current
/// store state at dispatch time (see `SyncEngine::toggle_read`), which
/// keeps a repeated toggle idempotent-safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Set the read flag.
    SetRead(bool),
    /// Set the flagged flag.
    SetFlagged(bool),
    /// Move to the trash folder.
    Trash,
    /// Delete permanently.
    Delete,
    /// Move to a destination folder.
    Move(FolderRef),
    /// Mark as spam (true) or not spam (false).
    SetSpam(bool),
}

impl Action {
    /// The server op for this action.
    #[must_use]
    pub const fn wire_op(&self) -> ActionOp {
        match self {
            Self::SetRead(true) => ActionOp::Read,
            Self::SetRead(false) => ActionOp::Unread,
            Self::SetFlagged(true) => ActionOp::Flag,
            Self::SetFlagged(false) => ActionOp::Unflag,
            Self::Trash => ActionOp::Trash,
            Self::Delete => ActionOp::Delete,
            Self::Move(_) => ActionOp::Move,
            Self::SetSpam(true) => ActionOp::Spam,
            Self::SetSpam(false) => ActionOp::Unspam,
        }
    }

    /// Folder the targets end up in, for actions that relocate them.
    /// `trash` and `spam` carry implicit destinations resolved from the
    /// configured well-known folders.
    #[must_use]
    pub const fn destination<'a>(&'a self, config: &'a EngineConfig) -> Option<&'a FolderRef> {
        match self {
            Self::Move(dest) => Some(dest),
            Self::Trash => Some(&config.trash_folder),
            Self::SetSpam(true) => Some(&config.junk_folder),
            Self::SetSpam(false) => Some(&config.inbox_folder),
            Self::SetRead(_) | Self::SetFlagged(_) | Self::Delete => None,
        }
    }
}

/// The entities an action targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTargets {
    /// Individual messages.
    Messages(Vec<MessageId>),
    /// Whole conversations.
    Conversations(Vec<ConversationId>),
}

impl ActionTargets {
    /// Target ids in wire form.
    #[must_use]
    pub fn wire_ids(&self) -> Vec<String> {
        match self {
            Self::Messages(ids) => ids.iter().map(|id| id.0.clone()).collect(),
            Self::Conversations(ids) => ids.iter().map(|id| id.0.clone()).collect(),
        }
    }
}

/// Pre-action snapshot of every entity the optimistic write can touch.
///
/// Captures targeted entities plus their cross-store neighbors: for
/// message targets, the conversations whose stub lists reference them;
/// for conversation targets, the member messages. Absence is captured
/// too, so restoring puts each captured key back to exactly its prior
/// state and nothing else.
#[derive(Debug)]
pub struct Snapshot {
    messages: Vec<(MessageId, Option<Message>)>,
    conversations: Vec<(ConversationId, Option<Conversation>)>,
}

impl Snapshot {
    /// Captures the pre-action state for the given targets.
    #[must_use]
    pub fn capture(stores: &StoreContext, targets: &ActionTargets) -> Self {
        let mut message_ids: Vec<MessageId> = Vec::new();
        let mut conversation_ids: Vec<ConversationId> = Vec::new();

        match targets {
            ActionTargets::Messages(ids) => {
                for id in ids {
                    message_ids.push(id.clone());
                    for conv_id in stores.conversations.referencing(id) {
                        if !conversation_ids.contains(&conv_id) {
                            conversation_ids.push(conv_id);
                        }
                    }
                }
            }
            ActionTargets::Conversations(ids) => {
                for id in ids {
                    conversation_ids.push(id.clone());
                    if let Some(conv) = stores.conversations.get(id) {
                        for stub in &conv.stubs {
                            if !message_ids.contains(&stub.id) {
                                message_ids.push(stub.id.clone());
                            }
                        }
                    }
                }
            }
        }

        Self {
            messages: message_ids
                .into_iter()
                .map(|id| {
                    let entity = stores.messages.get(&id).cloned();
                    (id, entity)
                })
                .collect(),
            conversations: conversation_ids
                .into_iter()
                .map(|id| {
                    let entity = stores.conversations.get(&id).cloned();
                    (id, entity)
                })
                .collect(),
        }
    }

    /// Restores every captured key to its captured state.
    pub fn restore(self, stores: &mut StoreContext) {
        for (id, entity) in self.messages {
            stores.messages.restore(&id, entity);
        }
        for (id, entity) in self.conversations {
            stores.conversations.restore(&id, entity);
        }
    }
}

/// Applies the expected post-action state to the stores.
///
/// Mutates individual flags and parents directly rather than running a
/// merge pass; actions target exactly those fields. `Delete` removes
/// the entities, including the cross-store stub removal.
pub fn apply_optimistic(
    stores: &mut StoreContext,
    action: &Action,
    targets: &ActionTargets,
    config: &EngineConfig,
) {
    match targets {
        ActionTargets::Messages(ids) => {
            for id in ids {
                apply_to_message(stores, action, id, config);
            }
        }
        ActionTargets::Conversations(ids) => {
            for id in ids {
                apply_to_conversation(stores, action, id, config);
            }
        }
    }
}

fn apply_to_message(
    stores: &mut StoreContext,
    action: &Action,
    id: &MessageId,
    config: &EngineConfig,
) {
    match action {
        Action::SetRead(read) => {
            stores.messages.set_read(id, *read);
        }
        Action::SetFlagged(flagged) => {
            stores.messages.set_flagged(id, *flagged);
        }
        Action::Delete => {
            stores.messages.remove(id);
            stores.conversations.remove_stub_everywhere(id);
        }
        Action::Trash | Action::Move(_) | Action::SetSpam(_) => {
            if let Some(dest) = action.destination(config) {
                stores.messages.set_folder(id, dest);
                // Stubs follow even when the message entity itself was
                // never fetched.
                stores.conversations.reparent_stub(id, dest);
            }
        }
    }
}

fn apply_to_conversation(
    stores: &mut StoreContext,
    action: &Action,
    id: &ConversationId,
    config: &EngineConfig,
) {
    let member_ids: Vec<MessageId> = stores
        .conversations
        .get(id)
        .map(|conv| conv.stubs.iter().map(|s| s.id.clone()).collect())
        .unwrap_or_default();

    match action {
        Action::SetRead(read) => {
            stores.conversations.set_read(id, *read);
            for member in &member_ids {
                stores.messages.set_read(member, *read);
            }
        }
        Action::SetFlagged(flagged) => {
            stores.conversations.set_flagged(id, *flagged);
            for member in &member_ids {
                stores.messages.set_flagged(member, *flagged);
            }
        }
        Action::Delete => {
            stores.conversations.remove(id);
            for member in &member_ids {
                stores.messages.remove(member);
            }
        }
        Action::Trash | Action::Move(_) | Action::SetSpam(_) => {
            if let Some(dest) = action.destination(config) {
                let dest = dest.clone();
                let members = stores.conversations.reparent_all_stubs(id, &dest);
                for member in &members {
                    stores.messages.set_folder(member, &dest);
                }
            }
        }
    }
}
