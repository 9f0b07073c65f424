//! Push-notification merge handlers.
//!
//! Pure reducers over the store context. Created inserts or merges
//! (an optimistic create may have raced the notification); modified
//! merges into an existing entity and is a no-op when the target was
//! never of interest; deleted removes explicitly, since a fetch that merely
//! omits an entity never deletes it.

use mailsync_wire::DeltaEvent;

use crate::context::StoreContext;
use crate::conversation::{ConversationId, MessageStub, normalize_conversation, normalize_stub};
use crate::message::{MessageId, normalize_message};

/// Applies one delta event to the stores.
///
/// Safe to call with stale events: a target that no longer exists makes
/// the merge a traced no-op, and merges key by id, so applying a delta
/// for one folder or conversation never perturbs another.
pub fn apply(stores: &mut StoreContext, event: DeltaEvent) {
    match event {
        DeltaEvent::MessageCreated(wire) => {
            let message = normalize_message(&wire, false);
            let (id, folder, date) = (message.id.clone(), message.folder.clone(), message.date);
            stores.messages.upsert(message);
            stores.conversations.sync_stub(&id, &folder, date);
        }
        DeltaEvent::MessageModified(wire) => {
            let message = normalize_message(&wire, false);
            let (id, folder, date) = (message.id.clone(), message.folder.clone(), message.date);
            if stores.messages.merge_existing(message) {
                stores.conversations.sync_stub(&id, &folder, date);
            } else {
                tracing::debug!(%id, "modify for unknown message ignored");
            }
        }
        DeltaEvent::MessageDeleted { id } => {
            let id = MessageId::new(id);
            let removed = stores.messages.remove(&id).is_some();
            let stubs = stores.conversations.remove_stub_everywhere(&id);
            tracing::debug!(%id, removed, stubs, "message deleted");
        }
        DeltaEvent::ConversationCreated(wire) => {
            let conversation = normalize_conversation(&wire);
            align_members(stores, &conversation.stubs);
            stores.conversations.upsert(conversation);
        }
        DeltaEvent::ConversationModified(wire) => {
            let conversation = normalize_conversation(&wire);
            let id = conversation.id.clone();
            let stubs = conversation.stubs.clone();
            if stores.conversations.merge_existing(conversation) {
                align_members(stores, &stubs);
            } else {
                tracing::debug!(%id, "modify for unknown conversation ignored");
            }
        }
        DeltaEvent::ConversationDeleted { id } => {
            let id = ConversationId::new(id);
            let removed = stores.conversations.remove(&id).is_some();
            tracing::debug!(%id, removed, "conversation deleted");
        }
        DeltaEvent::StubAdded {
            conversation_id,
            stub,
        } => {
            let id = ConversationId::new(conversation_id);
            let stub = normalize_stub(&stub);
            if stores.conversations.add_stub(&id, stub.clone()) {
                align_members(stores, std::slice::from_ref(&stub));
            } else {
                tracing::debug!(%id, "stub add for unknown conversation ignored");
            }
        }
        DeltaEvent::StubRemoved {
            conversation_id,
            message_id,
        } => {
            let id = ConversationId::new(conversation_id);
            stores
                .conversations
                .remove_stub(&id, &MessageId::new(message_id));
        }
    }
}

/// Pushes incoming stub data into the message store, so the message
/// and conversation listings agree on parent and date no matter which
/// side the payload arrived on. Only freshly received stubs are
/// pushed, never stubs retained from an earlier merge.
fn align_members(stores: &mut StoreContext, stubs: &[MessageStub]) {
    for stub in stubs {
        stores.messages.sync_parent(&stub.id, &stub.folder, stub.date);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mailsync_wire::{WireConversation, WireMessage, WireMessageStub};

    use super::*;
    use crate::folder::FolderRef;

    fn wire_message(id: &str, folder: &str, date: i64) -> WireMessage {
        WireMessage {
            id: id.to_string(),
            folder_id: folder.to_string(),
            date,
            read: false,
            flagged: false,
            subject: Some(format!("subject {id}")),
            participants: None,
            parts: None,
        }
    }

    fn wire_conversation(id: &str, stubs: &[(&str, &str, i64)]) -> WireConversation {
        WireConversation {
            id: id.to_string(),
            subject: Some(format!("conv {id}")),
            read: false,
            flagged: false,
            messages: stubs
                .iter()
                .map(|(id, folder, date)| WireMessageStub {
                    id: (*id).to_string(),
                    folder_id: (*folder).to_string(),
                    date: *date,
                })
                .collect(),
        }
    }

    #[test]
    fn test_created_inserts_then_merges_on_race() {
        let mut stores = StoreContext::new();
        apply(
            &mut stores,
            DeltaEvent::MessageCreated(wire_message("m1", "2", 1_000)),
        );
        assert_eq!(stores.messages.len(), 1);

        // Second created for the same id merges, never duplicates.
        let mut racing = wire_message("m1", "2", 1_000);
        racing.read = true;
        apply(&mut stores, DeltaEvent::MessageCreated(racing));
        assert_eq!(stores.messages.len(), 1);
        assert!(stores.messages.get(&MessageId::new("m1")).unwrap().read);
    }

    #[test]
    fn test_modified_for_absent_message_is_noop() {
        // Scenario: modified for id "42" while "42" is absent.
        let mut stores = StoreContext::new();
        apply(
            &mut stores,
            DeltaEvent::MessageModified(wire_message("42", "2", 1_000)),
        );
        assert!(stores.messages.is_empty());
    }

    #[test]
    fn test_message_delete_is_cross_store() {
        // Deleting a message also removes its stub from every
        // conversation.
        let mut stores = StoreContext::new();
        apply(
            &mut stores,
            DeltaEvent::ConversationCreated(wire_conversation(
                "c1",
                &[("m1", "2", 1_000), ("m2", "2", 2_000)],
            )),
        );
        apply(
            &mut stores,
            DeltaEvent::MessageCreated(wire_message("m1", "2", 1_000)),
        );

        apply(
            &mut stores,
            DeltaEvent::MessageDeleted {
                id: "m1".to_string(),
            },
        );

        assert!(!stores.messages.contains(&MessageId::new("m1")));
        let conv = stores.conversations.get(&ConversationId::new("c1")).unwrap();
        assert!(conv.stub(&MessageId::new("m1")).is_none());
        assert!(conv.stub(&MessageId::new("m2")).is_some());
    }

    #[test]
    fn test_modified_message_realigns_stubs() {
        // Stub parent/date agree with the store after a successful merge.
        let mut stores = StoreContext::new();
        apply(
            &mut stores,
            DeltaEvent::ConversationCreated(wire_conversation("c1", &[("m1", "2", 1_000)])),
        );
        apply(
            &mut stores,
            DeltaEvent::MessageCreated(wire_message("m1", "2", 1_000)),
        );

        apply(
            &mut stores,
            DeltaEvent::MessageModified(wire_message("m1", "3", 5_000)),
        );

        let stub = stores
            .conversations
            .get(&ConversationId::new("c1"))
            .unwrap()
            .stub(&MessageId::new("m1"))
            .cloned()
            .unwrap();
        assert_eq!(stub.folder, FolderRef::local("3"));
        assert_eq!(stub.date.timestamp_millis(), 5_000);
    }

    #[test]
    fn test_modified_conversation_realigns_messages() {
        // The other direction: stub data arriving on a conversation
        // payload pushes into the message store, so both listings agree
        // on the message's folder and date.
        let mut stores = StoreContext::new();
        apply(
            &mut stores,
            DeltaEvent::MessageCreated(wire_message("m1", "2", 1_000)),
        );
        apply(
            &mut stores,
            DeltaEvent::ConversationCreated(wire_conversation("c1", &[("m1", "2", 1_000)])),
        );

        apply(
            &mut stores,
            DeltaEvent::ConversationModified(wire_conversation("c1", &[("m1", "3", 5_000)])),
        );

        let msg = stores.messages.get(&MessageId::new("m1")).unwrap();
        let stub = stores
            .conversations
            .get(&ConversationId::new("c1"))
            .unwrap()
            .stub(&MessageId::new("m1"))
            .cloned()
            .unwrap();
        assert_eq!(msg.folder, FolderRef::local("3"));
        assert_eq!(msg.date.timestamp_millis(), 5_000);
        assert_eq!((&stub.folder, stub.date), (&msg.folder, msg.date));
    }

    #[test]
    fn test_stub_added_realigns_message() {
        let mut stores = StoreContext::new();
        apply(
            &mut stores,
            DeltaEvent::MessageCreated(wire_message("m1", "2", 1_000)),
        );
        apply(
            &mut stores,
            DeltaEvent::ConversationCreated(wire_conversation("c1", &[])),
        );

        apply(
            &mut stores,
            DeltaEvent::StubAdded {
                conversation_id: "c1".to_string(),
                stub: WireMessageStub {
                    id: "m1".to_string(),
                    folder_id: "3".to_string(),
                    date: 5_000,
                },
            },
        );

        let msg = stores.messages.get(&MessageId::new("m1")).unwrap();
        assert_eq!(msg.folder, FolderRef::local("3"));
        assert_eq!(msg.date.timestamp_millis(), 5_000);
    }

    #[test]
    fn test_conversation_delete_keeps_messages() {
        let mut stores = StoreContext::new();
        apply(
            &mut stores,
            DeltaEvent::ConversationCreated(wire_conversation("c1", &[("m1", "2", 1_000)])),
        );
        apply(
            &mut stores,
            DeltaEvent::MessageCreated(wire_message("m1", "2", 1_000)),
        );

        apply(
            &mut stores,
            DeltaEvent::ConversationDeleted {
                id: "c1".to_string(),
            },
        );
        assert!(!stores.conversations.contains(&ConversationId::new("c1")));
        assert!(stores.messages.contains(&MessageId::new("m1")));
    }

    #[test]
    fn test_stub_add_and_remove() {
        let mut stores = StoreContext::new();
        apply(
            &mut stores,
            DeltaEvent::ConversationCreated(wire_conversation("c1", &[("m1", "2", 1_000)])),
        );

        apply(
            &mut stores,
            DeltaEvent::StubAdded {
                conversation_id: "c1".to_string(),
                stub: WireMessageStub {
                    id: "m2".to_string(),
                    folder_id: "2".to_string(),
                    date: 2_000,
                },
            },
        );
        let conv_id = ConversationId::new("c1");
        assert_eq!(stores.conversations.get(&conv_id).unwrap().stubs.len(), 2);

        apply(
            &mut stores,
            DeltaEvent::StubRemoved {
                conversation_id: "c1".to_string(),
                message_id: "m1".to_string(),
            },
        );
        let conv = stores.conversations.get(&conv_id).unwrap();
        assert_eq!(conv.stubs.len(), 1);
        assert_eq!(conv.stubs[0].id, MessageId::new("m2"));
        // Other fields untouched.
        assert_eq!(conv.subject.as_deref(), Some("conv c1"));
    }

    #[test]
    fn test_stub_add_for_unknown_conversation_is_noop() {
        let mut stores = StoreContext::new();
        apply(
            &mut stores,
            DeltaEvent::StubAdded {
                conversation_id: "nope".to_string(),
                stub: WireMessageStub {
                    id: "m1".to_string(),
                    folder_id: "2".to_string(),
                    date: 1_000,
                },
            },
        );
        assert!(stores.conversations.is_empty());
    }
}
