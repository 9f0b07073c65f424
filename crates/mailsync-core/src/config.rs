//! Engine configuration.

use mailsync_wire::SortBy;

use crate::folder::FolderRef;

/// Default search page size.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Configuration for a [`SyncEngine`](crate::SyncEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Search page size; also the "full page" threshold for the
    /// has-more heuristic.
    pub page_size: u32,
    /// The user's configured sort order, used for both search queries
    /// and folder projections.
    pub sort: SortBy,
    /// Well-known inbox folder; destination of un-spam.
    pub inbox_folder: FolderRef,
    /// Well-known trash folder; destination of trash.
    pub trash_folder: FolderRef,
    /// Well-known junk folder; destination of spam.
    pub junk_folder: FolderRef,
}

impl Default for EngineConfig {
    /// Conventional well-known folder ids: inbox 2, trash 3, junk 4.
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sort: SortBy::default(),
            inbox_folder: FolderRef::local("2"),
            trash_folder: FolderRef::local("3"),
            junk_folder: FolderRef::local("4"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.sort, SortBy::DateDesc);
        assert_eq!(config.trash_folder, FolderRef::local("3"));
    }
}
