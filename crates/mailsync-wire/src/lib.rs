//! # mailsync-wire
//!
//! Wire-format payloads and the remote mailbox contract for the
//! `mailsync` engine.
//!
//! This crate provides:
//! - Serde models for the webmail JSON shapes (messages, conversations,
//!   search pages, action requests)
//! - The [`Mailbox`] trait the engine drives for all remote operations
//! - The [`DeltaEvent`] push-notification payload
//! - The wire-level error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod notify;
pub mod payload;
pub mod remote;

pub use error::{Error, Result};
pub use notify::DeltaEvent;
pub use payload::{
    AddressField, SearchResponse, WireBodyPart, WireConversation, WireMessage, WireMessageStub,
    WireParticipant,
};
pub use remote::{ActionAck, ActionOp, ActionRequest, Mailbox, SearchKind, SearchQuery, SortBy};
