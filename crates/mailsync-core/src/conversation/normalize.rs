//! Wire-to-domain conversation normalization.

use chrono::DateTime;
use mailsync_wire::{WireConversation, WireMessageStub};

use super::model::{Conversation, ConversationId, ExpandState, MessageStub};
use crate::folder::FolderRef;
use crate::message::MessageId;

/// Converts a wire stub into the domain stub.
#[must_use]
pub(crate) fn normalize_stub(wire: &WireMessageStub) -> MessageStub {
    MessageStub {
        id: MessageId::new(wire.id.clone()),
        folder: FolderRef::parse(&wire.folder_id),
        date: DateTime::from_timestamp_millis(wire.date).unwrap_or(DateTime::UNIX_EPOCH),
    }
}

/// Normalizes a wire conversation into the canonical entity.
///
/// Pure and idempotent, like the message normalizer. Freshly
/// normalized conversations start `Idle`; expansion state is engine
/// bookkeeping, never wire data.
#[must_use]
pub fn normalize_conversation(wire: &WireConversation) -> Conversation {
    Conversation {
        id: ConversationId::new(wire.id.clone()),
        subject: wire.subject.clone(),
        read: wire.read,
        flagged: wire.flagged,
        stubs: wire.messages.iter().map(normalize_stub).collect(),
        expanded: ExpandState::Idle,
    }
}
