//! The synchronization engine.
//!
//! Owns the stores and the remote [`Mailbox`], and is the only place
//! reads from the server and optimistic writes meet. Push notifications
//! arrive on an unbounded channel through a [`DeltaPublisher`] handle
//! and are drained explicitly with [`SyncEngine::process_notifications`]
//! so every store mutation happens on the caller's schedule.

use chrono::{DateTime, Utc};
use mailsync_wire::{ActionAck, ActionRequest, DeltaEvent, Mailbox, SearchKind, SearchQuery};
use tokio::sync::mpsc;

use crate::action::{Action, ActionTargets, Snapshot, apply_optimistic};
use crate::config::EngineConfig;
use crate::context::StoreContext;
use crate::conversation::{ConversationId, MessageStub, normalize_conversation};
use crate::delta;
use crate::error::{Error, Result};
use crate::folder::FolderRef;
use crate::message::{Message, MessageId, normalize_message};

/// Sending half of the notification channel.
///
/// Cheap to clone; the transport layer hands decoded [`DeltaEvent`]s to
/// the engine through this without holding any engine reference.
#[derive(Debug, Clone)]
pub struct DeltaPublisher {
    tx: mpsc::UnboundedSender<DeltaEvent>,
}

impl DeltaPublisher {
    /// Queues a delta event for the next [`SyncEngine::process_notifications`]
    /// call. Returns `false` if the engine was dropped.
    pub fn publish(&self, event: DeltaEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Client-side mailbox synchronization engine.
///
/// Generic over the [`Mailbox`] transport so tests can script the
/// remote end.
#[derive(Debug)]
pub struct SyncEngine<M> {
    mailbox: M,
    stores: StoreContext,
    config: EngineConfig,
    events: mpsc::UnboundedReceiver<DeltaEvent>,
}

impl<M: Mailbox> SyncEngine<M> {
    /// Creates an engine with empty stores and the publisher handle for
    /// its notification channel.
    #[must_use]
    pub fn new(mailbox: M, config: EngineConfig) -> (Self, DeltaPublisher) {
        let (tx, events) = mpsc::unbounded_channel();
        (
            Self {
                mailbox,
                stores: StoreContext::new(),
                config,
                events,
            },
            DeltaPublisher { tx },
        )
    }

    /// Read access to the stores, for selectors and assertions.
    #[must_use]
    pub fn stores(&self) -> &StoreContext {
        &self.stores
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Drains all queued notifications into the stores and returns how
    /// many were applied.
    pub fn process_notifications(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            delta::apply(&mut self.stores, event);
            applied += 1;
        }
        applied
    }

    /// Runs one page of a folder search and merges the results.
    ///
    /// Offset 0 replaces the folder's listing; later offsets union into
    /// it. `before` restricts results to entities dated before that
    /// instant, for date-anchored paging. The folder's status ends
    /// `Pending` -> `Complete` or `HasMore` on success, `Incomplete` on
    /// failure. Returns the number of entities in the page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] when the remote search fails; the stores
    /// keep whatever earlier pages loaded.
    pub async fn search(
        &mut self,
        folder: &FolderRef,
        kind: SearchKind,
        offset: u32,
        before: Option<DateTime<Utc>>,
    ) -> Result<usize> {
        self.stores.conversations.search_started(folder);
        let query = SearchQuery {
            folder_id: folder.to_wire(),
            kind,
            sort_by: self.config.sort,
            limit: self.config.page_size,
            offset,
            before: before.map(|instant| instant.timestamp_millis()),
        };
        tracing::debug!(folder = %folder, ?kind, offset, "SEARCH");

        let response = match self.mailbox.search(&query).await {
            Ok(response) => response,
            Err(err) => {
                self.stores.conversations.search_failed(folder);
                return Err(Error::Fetch(err));
            }
        };

        match kind {
            SearchKind::Conversation => {
                let page: Vec<_> = response
                    .conversations
                    .iter()
                    .map(normalize_conversation)
                    .collect();
                let count = page.len();
                // A full page with no explicit flag still means more
                // may exist.
                let has_more =
                    response.has_more || count == self.config.page_size as usize;
                // Stub data in the page is fresher than whatever the
                // message store holds; keep both sides aligned.
                for conv in &page {
                    for stub in &conv.stubs {
                        self.stores
                            .messages
                            .sync_parent(&stub.id, &stub.folder, stub.date);
                    }
                }
                self.stores
                    .conversations
                    .apply_search_page(folder, page, offset, has_more);
                Ok(count)
            }
            SearchKind::Message => {
                if offset == 0 {
                    self.stores.messages.remove_in_folder(folder);
                }
                let count = response.messages.len();
                for wire in &response.messages {
                    let message = normalize_message(wire, false);
                    let (id, parent, date) =
                        (message.id.clone(), message.folder.clone(), message.date);
                    self.stores.messages.upsert(message);
                    self.stores.conversations.sync_stub(&id, &parent, date);
                }
                let has_more =
                    response.has_more || count == self.config.page_size as usize;
                self.stores.conversations.search_completed(folder, has_more);
                Ok(count)
            }
        }
    }

    /// Fetches the full message set of a conversation.
    ///
    /// On success the fetched set replaces the conversation's stub list
    /// and the messages land in the message store. On failure the
    /// existing stubs are preserved and the conversation is marked
    /// `Rejected`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] when the remote expand fails.
    pub async fn expand_conversation(
        &mut self,
        id: &ConversationId,
        folder: &FolderRef,
    ) -> Result<usize> {
        if !self.stores.conversations.expand_started(id) {
            tracing::debug!(conversation = %id, "expanding unknown conversation");
        }

        let wires = match self
            .mailbox
            .expand_conversation(id.as_str(), &folder.to_wire())
            .await
        {
            Ok(wires) => wires,
            Err(err) => {
                self.stores.conversations.expand_rejected(id);
                return Err(Error::Fetch(err));
            }
        };

        let mut stubs = Vec::with_capacity(wires.len());
        for wire in &wires {
            let message = normalize_message(wire, false);
            stubs.push(MessageStub {
                id: message.id.clone(),
                folder: message.folder.clone(),
                date: message.date,
            });
            self.stores.messages.upsert(message);
        }
        let count = stubs.len();
        if !self.stores.conversations.expand_fulfilled(id, stubs) {
            tracing::debug!(conversation = %id, "conversation vanished during expand");
        }
        Ok(count)
    }

    /// Fetches a single message and merges it into the store.
    ///
    /// `max_body_size` bounds body parts in bytes; only an unbounded
    /// fetch marks the message complete.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] when the remote fetch fails.
    pub async fn fetch_message(
        &mut self,
        id: &MessageId,
        max_body_size: Option<u32>,
    ) -> Result<Message> {
        let wire = self
            .mailbox
            .fetch_message(id.as_str(), max_body_size)
            .await
            .map_err(Error::Fetch)?;

        let message = normalize_message(&wire, max_body_size.is_none());
        let (id, folder, date) = (message.id.clone(), message.folder.clone(), message.date);
        self.stores.messages.upsert(message);
        self.stores.conversations.sync_stub(&id, &folder, date);
        // upsert merged into any existing entry; return the merged form.
        Ok(self
            .stores
            .messages
            .get(&id)
            .cloned()
            .unwrap_or_else(|| normalize_message(&wire, max_body_size.is_none())))
    }

    /// Applies an action optimistically and sends it to the server.
    ///
    /// The stores reflect the expected outcome before the request goes
    /// out. A rejection restores the exact pre-action snapshot of the
    /// touched entities and nothing else.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionRejected`] when the server refuses; the
    /// optimistic write has been rolled back by then.
    pub async fn perform(&mut self, action: Action, targets: ActionTargets) -> Result<ActionAck> {
        let snapshot = Snapshot::capture(&self.stores, &targets);
        apply_optimistic(&mut self.stores, &action, &targets, &self.config);

        let request = ActionRequest {
            op: action.wire_op(),
            ids: targets.wire_ids(),
            destination_folder_id: match &action {
                Action::Move(dest) => Some(dest.to_wire()),
                _ => None,
            },
        };
        tracing::debug!(op = ?request.op, count = request.ids.len(), "ACTION");

        match self.mailbox.apply_action(&request).await {
            Ok(ack) => Ok(ack),
            Err(err) => {
                tracing::debug!(op = ?request.op, "action rejected, rolling back");
                snapshot.restore(&mut self.stores);
                Err(Error::ActionRejected(err))
            }
        }
    }

    /// Toggles the read flag on the targets.
    ///
    /// The new value is derived from current store state: unread unless
    /// every target is already read. Deriving at dispatch keeps a
    /// double-fired toggle from flip-flopping past the user's intent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionRejected`] when the server refuses.
    pub async fn toggle_read(&mut self, targets: ActionTargets) -> Result<ActionAck> {
        let all_read = match &targets {
            ActionTargets::Messages(ids) => ids
                .iter()
                .all(|id| self.stores.messages.get(id).is_some_and(|m| m.read)),
            ActionTargets::Conversations(ids) => ids
                .iter()
                .all(|id| self.stores.conversations.get(id).is_some_and(|c| c.read)),
        };
        self.perform(Action::SetRead(!all_read), targets).await
    }

    /// Toggles the flagged flag on the targets; same value derivation
    /// as [`toggle_read`](Self::toggle_read).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionRejected`] when the server refuses.
    pub async fn toggle_flagged(&mut self, targets: ActionTargets) -> Result<ActionAck> {
        let all_flagged = match &targets {
            ActionTargets::Messages(ids) => ids
                .iter()
                .all(|id| self.stores.messages.get(id).is_some_and(|m| m.flagged)),
            ActionTargets::Conversations(ids) => ids
                .iter()
                .all(|id| self.stores.conversations.get(id).is_some_and(|c| c.flagged)),
        };
        self.perform(Action::SetFlagged(!all_flagged), targets).await
    }
}
