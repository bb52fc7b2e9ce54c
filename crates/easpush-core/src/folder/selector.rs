//! Push-folder selection.

use super::model::{FolderDescriptor, WatchedFolder};

/// Selects the folders a Ping request should watch.
///
/// Keeps folders whose initial sync has completed and whose class allows
/// automatic sync, in input order. An empty result means there is nothing to
/// watch.
#[must_use]
pub fn select_push_folders(folders: &[FolderDescriptor]) -> Vec<WatchedFolder> {
    folders
        .iter()
        .filter(|folder| folder.is_push_eligible())
        .map(WatchedFolder::from)
        .collect()
}
