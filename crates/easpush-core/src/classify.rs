//! Ping response classification.
//!
//! Maps a parsed response to what happened and to the action the client
//! must take before the next Ping. Classification is pure; the
//! [`crate::PingOperation`] applies the actions.

use crate::codec::PingResponse;
use crate::status::PingStatus;

/// Meaning of a Ping response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The heartbeat expired with no changes.
    Expired,
    /// The listed folders (server ids) have changes.
    ChangesFound {
        /// Server ids of the changed folders, in response order.
        folders: Vec<String>,
    },
    /// The request was incomplete or malformed. Re-sending it unchanged will
    /// not help.
    BadRequest(PingStatus),
    /// The requested heartbeat was outside the server's bounds.
    HeartbeatOutOfBounds {
        /// Heartbeat the server will accept, if it sent one.
        server_heartbeat: Option<u64>,
    },
    /// The request named more folders than the server allows.
    TooManyFolders {
        /// Server limit, if it sent one.
        max_folders: Option<u32>,
    },
    /// The folder list is stale and must be refreshed.
    FolderListStale,
    /// Generic server error.
    TransientServerError,
    /// Transient server error; restart the operation.
    RetryLater,
    /// Account or provisioning failure; stop pushing and re-authenticate.
    FatalAuth(PingStatus),
    /// Sync-state or protocol failure; stop pushing.
    FatalProtocol(PingStatus),
    /// Any other status, passed through unchanged.
    Unrecognized(PingStatus),
}

/// Action mandated by a classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Grow the heartbeat by one step.
    IncreaseHeartbeat,
    /// Adopt the server's heartbeat (clamped to policy).
    ForceHeartbeat(u64),
    /// Sync each listed folder (server ids).
    ResyncFolders(Vec<String>),
    /// Refresh the account's folder list.
    RefreshFolderList,
}

/// Classifies a parsed Ping response.
#[must_use]
pub fn classify(response: PingResponse) -> Classification {
    let status = response.status;
    match status {
        PingStatus::EXPIRED => Classification::Expired,
        PingStatus::CHANGES_FOUND => Classification::ChangesFound {
            folders: response.folders,
        },
        PingStatus::REQUEST_INCOMPLETE | PingStatus::REQUEST_MALFORMED => {
            Classification::BadRequest(status)
        }
        PingStatus::HEARTBEAT_OUT_OF_BOUNDS => Classification::HeartbeatOutOfBounds {
            server_heartbeat: response.heartbeat_interval,
        },
        PingStatus::TOO_MANY_FOLDERS => Classification::TooManyFolders {
            max_folders: response.max_folders,
        },
        PingStatus::FOLDER_REFRESH_NEEDED => Classification::FolderListStale,
        PingStatus::SERVER_ERROR => Classification::TransientServerError,
        PingStatus::SERVER_ERROR_RETRY => Classification::RetryLater,
        s if s.is_fatal_auth() => Classification::FatalAuth(s),
        s if s.is_fatal_protocol() => Classification::FatalProtocol(s),
        s => Classification::Unrecognized(s),
    }
}

impl Classification {
    /// The action this classification mandates, if any.
    ///
    /// A heartbeat-out-of-bounds response without a server value mandates
    /// nothing.
    #[must_use]
    pub fn action(&self) -> Option<Action> {
        match self {
            Self::Expired => Some(Action::IncreaseHeartbeat),
            Self::ChangesFound { folders } => Some(Action::ResyncFolders(folders.clone())),
            Self::HeartbeatOutOfBounds {
                server_heartbeat: Some(secs),
            } => Some(Action::ForceHeartbeat(*secs)),
            Self::FolderListStale => Some(Action::RefreshFolderList),
            Self::BadRequest(_)
            | Self::HeartbeatOutOfBounds {
                server_heartbeat: None,
            }
            | Self::TooManyFolders { .. }
            | Self::TransientServerError
            | Self::RetryLater
            | Self::FatalAuth(_)
            | Self::FatalProtocol(_)
            | Self::Unrecognized(_) => None,
        }
    }

    /// Returns true if the caller must stop pushing for this account.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::FatalAuth(_) | Self::FatalProtocol(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn status(code: u32) -> PingResponse {
        PingResponse::with_status(PingStatus::new(code))
    }

    mod classify_tests {
        use super::*;

        #[test]
        fn expired() {
            let c = classify(status(1));
            assert_eq!(c, Classification::Expired);
            assert_eq!(c.action(), Some(Action::IncreaseHeartbeat));
        }

        #[test]
        fn changes_found_keeps_folder_order() {
            let mut response = status(2);
            response.folders = vec!["9".to_string(), "3".to_string()];
            let c = classify(response);
            assert_eq!(
                c.action(),
                Some(Action::ResyncFolders(vec!["9".to_string(), "3".to_string()]))
            );
        }

        #[test]
        fn bad_request() {
            for code in [3, 4] {
                let c = classify(status(code));
                assert_eq!(c, Classification::BadRequest(PingStatus::new(code)));
                assert_eq!(c.action(), None);
            }
        }

        #[test]
        fn heartbeat_out_of_bounds() {
            let mut response = status(5);
            response.heartbeat_interval = Some(30);
            let c = classify(response);
            assert_eq!(c.action(), Some(Action::ForceHeartbeat(30)));
        }

        #[test]
        fn heartbeat_out_of_bounds_without_value() {
            let c = classify(status(5));
            assert_eq!(
                c,
                Classification::HeartbeatOutOfBounds {
                    server_heartbeat: None
                }
            );
            assert_eq!(c.action(), None);
        }

        #[test]
        fn too_many_folders_carries_limit() {
            let mut response = status(6);
            response.max_folders = Some(10);
            let c = classify(response);
            assert_eq!(
                c,
                Classification::TooManyFolders {
                    max_folders: Some(10)
                }
            );
            assert_eq!(c.action(), None);
        }

        #[test]
        fn folder_refresh() {
            let c = classify(status(7));
            assert_eq!(c, Classification::FolderListStale);
            assert_eq!(c.action(), Some(Action::RefreshFolderList));
        }

        #[test]
        fn server_errors() {
            assert_eq!(classify(status(8)), Classification::TransientServerError);
            assert_eq!(classify(status(111)), Classification::RetryLater);
        }

        #[test]
        fn fatal_auth() {
            let c = classify(status(130));
            assert_eq!(c, Classification::FatalAuth(PingStatus::ACCESS_DENIED));
            assert!(c.is_fatal());
            assert_eq!(c.action(), None);
        }

        #[test]
        fn fatal_protocol() {
            let c = classify(status(134));
            assert_eq!(
                c,
                Classification::FatalProtocol(PingStatus::SYNC_STATE_CORRUPT)
            );
            assert!(c.is_fatal());
        }

        #[test]
        fn unrecognized_passes_through() {
            let c = classify(status(0));
            assert_eq!(c, Classification::Unrecognized(PingStatus::new(0)));
            assert!(!c.is_fatal());
            assert_eq!(classify(status(146)), Classification::Unrecognized(PingStatus::new(146)));
        }
    }
}
