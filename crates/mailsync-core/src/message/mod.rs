//! Message domain model, normalization, and canonical store.

mod model;
mod normalize;
mod store;

pub use model::{BodyPart, Message, MessageId, Participant};
pub use normalize::normalize_message;
pub use store::{MessageStore, merge_message};
