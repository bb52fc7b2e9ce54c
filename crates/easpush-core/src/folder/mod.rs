//! Folder metadata and push-folder selection.

mod model;
mod selector;

pub use model::{FolderClass, FolderDescriptor, FolderId, WatchedFolder};
pub use selector::select_push_folders;
