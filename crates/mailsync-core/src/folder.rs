//! Folder addressing.
//!
//! Folders in a delegated (shared) mailbox are addressed as
//! `zid:rid` (the owner account id plus the folder id inside that
//! account), while folders in the user's own mailbox use a plain id.
//! [`FolderRef`] is the single value type for both forms; its derived
//! equality is the one folder-identity comparison used everywhere
//! membership is tested.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to a folder, local or delegated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FolderRef {
    /// Owning account id for delegated folders; `None` for the user's
    /// own mailbox.
    owner: Option<String>,
    /// Folder id within the owning mailbox.
    id: String,
}

impl FolderRef {
    /// Creates a reference to a folder in the user's own mailbox.
    #[must_use]
    pub fn local(id: impl Into<String>) -> Self {
        Self {
            owner: None,
            id: id.into(),
        }
    }

    /// Creates a reference to a folder in a delegated mailbox.
    #[must_use]
    pub fn delegated(owner: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            id: id.into(),
        }
    }

    /// Parses a wire folder id, accepting both `zid:rid` and plain
    /// forms.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((owner, id)) if !owner.is_empty() && !id.is_empty() => {
                Self::delegated(owner, id)
            }
            _ => Self::local(raw),
        }
    }

    /// Returns the owning account id for delegated folders.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Returns the folder id within the owning mailbox.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns `true` for folders in a delegated mailbox.
    #[must_use]
    pub const fn is_delegated(&self) -> bool {
        self.owner.is_some()
    }

    /// Wire form of the reference (`zid:rid` or plain id).
    #[must_use]
    pub fn to_wire(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FolderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.owner {
            Some(owner) => write!(f, "{owner}:{}", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

impl From<&str> for FolderRef {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}
