//! Ping request construction.
//!
//! A request is a heartbeat followed by a folder block with one entry per
//! watched folder. Byte encoding is left to the [`crate::PingCodec`].

use serde::Serialize;

use crate::folder::WatchedFolder;

/// Logical content of a Ping request.
///
/// Always names at least one folder; use [`build_request`] to construct it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PingRequest {
    heartbeat_secs: u64,
    folders: Vec<WatchedFolder>,
}

impl PingRequest {
    /// Heartbeat the server is asked to hold the request for, in seconds.
    #[must_use]
    pub const fn heartbeat_secs(&self) -> u64 {
        self.heartbeat_secs
    }

    /// Watched folders, in selection order.
    #[must_use]
    pub fn folders(&self) -> &[WatchedFolder] {
        &self.folders
    }
}

/// Builds a Ping request.
///
/// Returns `None` when there are no folders to watch; the caller must not
/// issue a long-poll in that case.
#[must_use]
pub fn build_request(heartbeat_secs: u64, folders: Vec<WatchedFolder>) -> Option<PingRequest> {
    if folders.is_empty() {
        return None;
    }
    Some(PingRequest {
        heartbeat_secs,
        folders,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::folder::FolderClass;

    fn watched(id: &str, class: FolderClass) -> WatchedFolder {
        WatchedFolder {
            server_id: id.to_string(),
            class,
        }
    }

    #[test]
    fn empty_folders_no_payload() {
        assert!(build_request(480, Vec::new()).is_none());
    }

    #[test]
    fn heartbeat_then_folders_in_order() {
        let request = build_request(
            780,
            vec![
                watched("1", FolderClass::Email),
                watched("7", FolderClass::Calendar),
            ],
        )
        .unwrap();
        assert_eq!(request.heartbeat_secs(), 780);
        assert_eq!(request.folders().len(), 2);
        assert_eq!(request.folders()[0].server_id, "1");
        assert_eq!(request.folders()[1].class, FolderClass::Calendar);
    }
}
