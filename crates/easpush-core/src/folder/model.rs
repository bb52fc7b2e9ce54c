//! Folder model types.

use serde::{Deserialize, Serialize};

/// Local identifier of a folder in the folder registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FolderId(pub i64);

impl FolderId {
    /// Create a new folder ID.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for FolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Class of a folder, as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FolderClass {
    /// Mail folder.
    #[default]
    Email,
    /// Calendar folder.
    Calendar,
    /// Contacts folder.
    Contacts,
    /// Tasks folder.
    Tasks,
}

impl FolderClass {
    /// Wire name of the class.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Calendar => "Calendar",
            Self::Contacts => "Contacts",
            Self::Tasks => "Tasks",
        }
    }

    /// Parses a wire name. Unknown names yield `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Email" => Some(Self::Email),
            "Calendar" => Some(Self::Calendar),
            "Contacts" => Some(Self::Contacts),
            "Tasks" => Some(Self::Tasks),
            _ => None,
        }
    }
}

impl std::fmt::Display for FolderClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A folder as known to the folder registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderDescriptor {
    /// Local identifier.
    pub id: FolderId,
    /// Identifier assigned by the server.
    pub server_id: String,
    /// Folder class.
    pub class: FolderClass,
    /// Whether the initial full synchronization has completed.
    pub has_completed_initial_sync: bool,
    /// Whether automatic sync is enabled for this folder's class.
    pub auto_sync_enabled: bool,
}

impl FolderDescriptor {
    /// Returns true if the folder should be watched by Ping.
    #[must_use]
    pub const fn is_push_eligible(&self) -> bool {
        self.has_completed_initial_sync && self.auto_sync_enabled
    }

    /// Returns true if a stored sync key shows the initial sync finished.
    ///
    /// A missing key or the key `"0"` means the folder has never synced.
    #[must_use]
    pub fn sync_key_completed(sync_key: Option<&str>) -> bool {
        matches!(sync_key, Some(key) if key != "0")
    }
}

/// A folder entry in a Ping request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedFolder {
    /// Identifier assigned by the server.
    pub server_id: String,
    /// Folder class.
    pub class: FolderClass,
}

impl From<&FolderDescriptor> for WatchedFolder {
    fn from(folder: &FolderDescriptor) -> Self {
        Self {
            server_id: folder.server_id.clone(),
            class: folder.class,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_round_trips_names() {
        for class in [
            FolderClass::Email,
            FolderClass::Calendar,
            FolderClass::Contacts,
            FolderClass::Tasks,
        ] {
            assert_eq!(FolderClass::from_name(class.as_str()), Some(class));
        }
        assert_eq!(FolderClass::from_name("Notes"), None);
    }

    #[test]
    fn sync_key_completed() {
        assert!(!FolderDescriptor::sync_key_completed(None));
        assert!(!FolderDescriptor::sync_key_completed(Some("0")));
        assert!(FolderDescriptor::sync_key_completed(Some("1234")));
    }

    #[test]
    fn eligibility_requires_both_flags() {
        let mut folder = FolderDescriptor {
            id: FolderId::new(1),
            server_id: "5".to_string(),
            class: FolderClass::Email,
            has_completed_initial_sync: true,
            auto_sync_enabled: true,
        };
        assert!(folder.is_push_eligible());
        folder.auto_sync_enabled = false;
        assert!(!folder.is_push_eligible());
        folder.auto_sync_enabled = true;
        folder.has_completed_initial_sync = false;
        assert!(!folder.is_push_eligible());
    }
}
