//! Wire-to-domain message normalization.
//!
//! Pure functions: no store access, no side effects. Normalizing the
//! same payload twice yields structurally equal output.

use chrono::{DateTime, Utc};
use mailsync_wire::{WireBodyPart, WireMessage, WireParticipant};

use super::model::{BodyPart, Message, MessageId, Participant};
use crate::folder::FolderRef;

/// Converts an epoch-ms wire date, clamping unrepresentable values to
/// the epoch.
fn normalize_date(epoch_ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(epoch_ms).unwrap_or(DateTime::UNIX_EPOCH)
}

fn normalize_participant(wire: &WireParticipant) -> Participant {
    Participant {
        name: wire.name.clone(),
        address: wire.address.clone(),
        field: wire.field,
    }
}

fn normalize_part(wire: &WireBodyPart) -> BodyPart {
    BodyPart {
        content_type: wire.content_type.clone(),
        content: wire.content.clone(),
        // Truncation comes only from the server's explicit flag, never
        // inferred from content length.
        truncated: wire.truncated.unwrap_or(false),
    }
}

/// Normalizes a wire message into the canonical entity.
///
/// Tolerates partial shapes: a search-result stub (no participants, no
/// body) and a full `fetch_message` response both normalize cleanly.
/// `full_fetch` marks the result complete; stubs obtained via
/// conversation expansion pass `false`.
#[must_use]
pub fn normalize_message(wire: &WireMessage, full_fetch: bool) -> Message {
    Message {
        id: MessageId::new(wire.id.clone()),
        folder: FolderRef::parse(&wire.folder_id),
        date: normalize_date(wire.date),
        read: wire.read,
        flagged: wire.flagged,
        subject: wire.subject.clone(),
        participants: wire
            .participants
            .as_deref()
            .map(|list| list.iter().map(normalize_participant).collect()),
        body: wire
            .parts
            .as_deref()
            .map(|parts| parts.iter().map(normalize_part).collect()),
        is_complete: full_fetch,
    }
}
