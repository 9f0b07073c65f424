//! Error types for the wire layer.

use thiserror::Error;

/// Errors that can occur while talking to the remote mailbox.
#[derive(Debug, Error)]
pub enum Error {
    /// Network or transport failure; the request never produced a
    /// server verdict.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server refused the request.
    #[error("request rejected by server: {message}")]
    Rejected {
        /// Machine-readable refusal code, when the server provides one.
        code: Option<String>,
        /// Human-readable refusal message.
        message: String,
    },

    /// A payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` for failures where a retry may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
