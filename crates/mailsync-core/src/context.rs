//! Shared store context.

use crate::conversation::ConversationStore;
use crate::message::MessageStore;

/// The two canonical stores, passed by reference to merge handlers and
/// selectors.
///
/// Not a global: each [`SyncEngine`](crate::SyncEngine) (and each test)
/// owns its own context. All mutation flows through the merge-handler
/// and action functions; the presentation layer only ever sees a shared
/// reference.
#[derive(Debug, Default)]
pub struct StoreContext {
    /// Canonical message map; single source of truth for message
    /// content and flags.
    pub messages: MessageStore,
    /// Canonical conversation map plus per-folder search status.
    pub conversations: ConversationStore,
}

impl StoreContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
