//! Store model types.

use chrono::{DateTime, Utc};
use easpush_core::{AccountId, FolderClass, FolderId};

/// A folder to register for an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFolder {
    /// Identifier assigned by the server.
    pub server_id: String,
    /// Folder class.
    pub class: FolderClass,
    /// Sync key from the last sync; `None` or `"0"` until the initial sync.
    pub sync_key: Option<String>,
    /// Whether automatic sync is enabled.
    pub auto_sync: bool,
}

impl NewFolder {
    /// Creates an unsynced folder with automatic sync enabled.
    #[must_use]
    pub fn new(server_id: impl Into<String>, class: FolderClass) -> Self {
        Self {
            server_id: server_id.into(),
            class,
            sync_key: None,
            auto_sync: true,
        }
    }
}

/// Kind of a queued sync request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncRequestKind {
    /// Sync one folder.
    Folder(FolderId),
    /// Refresh the folder list.
    FolderList,
    /// (Re)start push for the account.
    Ping,
}

impl SyncRequestKind {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Folder(_) => "folder",
            Self::FolderList => "folder_list",
            Self::Ping => "ping",
        }
    }

    pub(crate) const fn folder_id(self) -> Option<i64> {
        match self {
            Self::Folder(id) => Some(id.0),
            Self::FolderList | Self::Ping => None,
        }
    }

    pub(crate) fn from_row(kind: &str, folder_id: Option<i64>) -> Option<Self> {
        match (kind, folder_id) {
            ("folder", Some(id)) => Some(Self::Folder(FolderId::new(id))),
            ("folder_list", _) => Some(Self::FolderList),
            ("ping", _) => Some(Self::Ping),
            _ => None,
        }
    }
}

/// A sync request recorded for the outer sync loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    /// Account the request belongs to.
    pub account_id: AccountId,
    /// What should be synced.
    pub kind: SyncRequestKind,
    /// When the request was recorded.
    pub requested_at: DateTime<Utc>,
}
