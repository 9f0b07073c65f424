//! # mailsync-core
//!
//! Client-side mailbox synchronization engine for `mailsync`.
//!
//! This crate provides:
//! - Normalization of wire payloads into canonical domain models
//! - Message and conversation stores keyed by id, with per-folder
//!   search status
//! - Delta merge handlers for push notifications
//! - An optimistic action layer with exact rollback
//! - Folder-scoped selectors for the presentation layer
//! - The [`SyncEngine`] tying stores, actions, and the remote
//!   [`Mailbox`](mailsync_wire::Mailbox) together

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod action;
pub mod config;
mod context;
pub mod conversation;
pub mod delta;
mod engine;
mod error;
pub mod folder;
pub mod message;
pub mod select;

pub use action::{Action, ActionTargets, Snapshot, apply_optimistic};
pub use config::{DEFAULT_PAGE_SIZE, EngineConfig};
pub use context::StoreContext;
pub use conversation::{
    Conversation, ConversationId, ConversationStore, ExpandState, MessageStub, SearchStatus,
    merge_conversation, normalize_conversation,
};
pub use engine::{DeltaPublisher, SyncEngine};
pub use error::{Error, Result};
pub use folder::FolderRef;
pub use message::{
    BodyPart, Message, MessageId, MessageStore, Participant, merge_message, normalize_message,
};
pub use select::{conversations_in_folder, messages_in_folder, unread_in_folder};
