//! Error types for the engine.

use thiserror::Error;

/// Errors that can surface from engine operations.
///
/// Every failure path leaves the stores in a well-defined state: a
/// failed search marks the folder `Incomplete`, a rejected action rolls
/// the optimistic write back. A merge whose target no longer exists is
/// not an error at all; it is a traced no-op.
#[derive(Debug, Error)]
pub enum Error {
    /// A search or detail fetch failed.
    #[error("fetch failed: {0}")]
    Fetch(#[source] mailsync_wire::Error),

    /// The server rejected an action; the optimistic write was rolled
    /// back.
    #[error("action rejected: {0}")]
    ActionRejected(#[source] mailsync_wire::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
