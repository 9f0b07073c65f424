//! Conversation domain model, normalization, and store.

mod model;
mod normalize;
mod store;

pub use model::{Conversation, ConversationId, ExpandState, MessageStub, SearchStatus};
pub use normalize::normalize_conversation;
pub(crate) use normalize::normalize_stub;
pub use store::{ConversationStore, merge_conversation};
