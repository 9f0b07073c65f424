//! Folder-scoped projections over the stores.
//!
//! Selectors are pure reads. They never mutate the stores and never
//! trigger fetches; callers that find a folder's status wanting start a
//! search through the engine.

use mailsync_wire::SortBy;

use crate::context::StoreContext;
use crate::conversation::Conversation;
use crate::folder::FolderRef;
use crate::message::Message;

/// Conversations with at least one message stub in `folder`, ordered by
/// `sort`.
///
/// Ties sort by id so the projection is stable across calls.
#[must_use]
pub fn conversations_in_folder<'a>(
    stores: &'a StoreContext,
    folder: &FolderRef,
    sort: SortBy,
) -> Vec<&'a Conversation> {
    let mut rows: Vec<&Conversation> = stores
        .conversations
        .iter()
        .filter(|c| c.in_folder(folder))
        .collect();
    rows.sort_by(|a, b| match sort {
        SortBy::DateDesc => b
            .latest_date()
            .cmp(&a.latest_date())
            .then_with(|| a.id.as_str().cmp(b.id.as_str())),
        SortBy::DateAsc => a
            .latest_date()
            .cmp(&b.latest_date())
            .then_with(|| a.id.as_str().cmp(b.id.as_str())),
        SortBy::SubjectAsc => subject_key(a.subject.as_deref())
            .cmp(&subject_key(b.subject.as_deref()))
            .then_with(|| a.id.as_str().cmp(b.id.as_str())),
        SortBy::SubjectDesc => subject_key(b.subject.as_deref())
            .cmp(&subject_key(a.subject.as_deref()))
            .then_with(|| a.id.as_str().cmp(b.id.as_str())),
    });
    rows
}

/// Messages whose parent folder is `folder`, ordered by `sort`.
#[must_use]
pub fn messages_in_folder<'a>(
    stores: &'a StoreContext,
    folder: &FolderRef,
    sort: SortBy,
) -> Vec<&'a Message> {
    let mut rows: Vec<&Message> = stores
        .messages
        .iter()
        .filter(|m| m.folder == *folder)
        .collect();
    rows.sort_by(|a, b| match sort {
        SortBy::DateDesc => b
            .date
            .cmp(&a.date)
            .then_with(|| a.id.as_str().cmp(b.id.as_str())),
        SortBy::DateAsc => a
            .date
            .cmp(&b.date)
            .then_with(|| a.id.as_str().cmp(b.id.as_str())),
        SortBy::SubjectAsc => subject_key(a.subject.as_deref())
            .cmp(&subject_key(b.subject.as_deref()))
            .then_with(|| a.id.as_str().cmp(b.id.as_str())),
        SortBy::SubjectDesc => subject_key(b.subject.as_deref())
            .cmp(&subject_key(a.subject.as_deref()))
            .then_with(|| a.id.as_str().cmp(b.id.as_str())),
    });
    rows
}

/// Count of unread messages parented in `folder`.
#[must_use]
pub fn unread_in_folder(stores: &StoreContext, folder: &FolderRef) -> usize {
    stores
        .messages
        .iter()
        .filter(|m| m.folder == *folder && !m.read)
        .count()
}

// Case-insensitive sort key; missing subjects sort first.
fn subject_key(subject: Option<&str>) -> String {
    subject.unwrap_or("").to_lowercase()
}
