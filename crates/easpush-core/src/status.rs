//! Ping status codes.
//!
//! Codes 1-8 are specific to Ping. Codes from 100 up are the common
//! ActiveSync command status codes a server may return for any command.

use serde::{Deserialize, Serialize};

/// Status code from a Ping response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PingStatus(u32);

impl PingStatus {
    /// Creates a status from its numeric code.
    #[must_use]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns true for the account and provisioning codes that mean the
    /// account cannot sync until it is re-authorised.
    #[must_use]
    pub const fn is_fatal_auth(self) -> bool {
        matches!(
            self,
            Self::USER_DISABLED_FOR_SYNC
                | Self::USERS_DISABLED_FOR_SYNC
                | Self::USER_ON_LEGACY_SERVER_CANT_SYNC
                | Self::DEVICE_QUARANTINED
                | Self::ACCESS_DENIED
                | Self::USER_ACCOUNT_DISABLED
                | Self::NOT_PROVISIONABLE_PARTIAL
                | Self::NOT_PROVISIONABLE_LEGACY_DEVICE
                | Self::TOO_MANY_PARTNERSHIPS
        )
    }

    /// Returns true for the sync-state, provisioning and protocol codes a
    /// Ping should never receive.
    #[must_use]
    pub const fn is_fatal_protocol(self) -> bool {
        matches!(
            self,
            Self::SYNC_STATE_NOT_FOUND
                | Self::SYNC_STATE_LOCKED
                | Self::SYNC_STATE_CORRUPT
                | Self::SYNC_STATE_EXISTS
                | Self::SYNC_STATE_INVALID
                | Self::NEEDS_PROVISIONING_WIPE
                | Self::NEEDS_PROVISIONING
                | Self::NEEDS_PROVISIONING_REFRESH
                | Self::NEEDS_PROVISIONING_INVALID
                | Self::WTF_INVALID_COMMAND
                | Self::WTF_INVALID_PROTOCOL
                | Self::WTF_DEVICE_CLAIMS_EXTERNAL_MANAGEMENT
                | Self::WTF_UNKNOWN_ITEM_TYPE
                | Self::WTF_REQUIRES_PROXY_WITHOUT_SSL
                | Self::ITEM_NOT_FOUND
        )
    }
}

impl std::fmt::Display for PingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Ping status codes
impl PingStatus {
    /// 1 Heartbeat expired with no changes
    pub const EXPIRED: Self = Self(1);
    /// 2 Changes found in the listed folders
    pub const CHANGES_FOUND: Self = Self(2);
    /// 3 Request omitted required parameters
    pub const REQUEST_INCOMPLETE: Self = Self(3);
    /// 4 Request was malformed
    pub const REQUEST_MALFORMED: Self = Self(4);
    /// 5 Heartbeat outside the server's bounds
    pub const HEARTBEAT_OUT_OF_BOUNDS: Self = Self(5);
    /// 6 More folders than the server allows
    pub const TOO_MANY_FOLDERS: Self = Self(6);
    /// 7 Folder hierarchy must be synced again
    pub const FOLDER_REFRESH_NEEDED: Self = Self(7);
    /// 8 Server error
    pub const SERVER_ERROR: Self = Self(8);
}

// Common command status codes
impl PingStatus {
    /// 111 Transient server error, retry later
    pub const SERVER_ERROR_RETRY: Self = Self(111);
    /// 126 User disabled for sync
    pub const USER_DISABLED_FOR_SYNC: Self = Self(126);
    /// 127 Users disabled for sync
    pub const USERS_DISABLED_FOR_SYNC: Self = Self(127);
    /// 128 User on a legacy server
    pub const USER_ON_LEGACY_SERVER_CANT_SYNC: Self = Self(128);
    /// 129 Device quarantined
    pub const DEVICE_QUARANTINED: Self = Self(129);
    /// 130 Access denied
    pub const ACCESS_DENIED: Self = Self(130);
    /// 131 User account disabled
    pub const USER_ACCOUNT_DISABLED: Self = Self(131);
    /// 132 Sync state not found
    pub const SYNC_STATE_NOT_FOUND: Self = Self(132);
    /// 133 Sync state locked
    pub const SYNC_STATE_LOCKED: Self = Self(133);
    /// 134 Sync state corrupt
    pub const SYNC_STATE_CORRUPT: Self = Self(134);
    /// 135 Sync state already exists
    pub const SYNC_STATE_EXISTS: Self = Self(135);
    /// 136 Sync state invalid
    pub const SYNC_STATE_INVALID: Self = Self(136);
    /// 137 Invalid command
    pub const WTF_INVALID_COMMAND: Self = Self(137);
    /// 138 Invalid protocol version
    pub const WTF_INVALID_PROTOCOL: Self = Self(138);
    /// 139 Device not fully provisionable
    pub const NOT_PROVISIONABLE_PARTIAL: Self = Self(139);
    /// 140 Remote wipe requested
    pub const NEEDS_PROVISIONING_WIPE: Self = Self(140);
    /// 141 Legacy device on a strict policy
    pub const NOT_PROVISIONABLE_LEGACY_DEVICE: Self = Self(141);
    /// 142 Device not provisioned
    pub const NEEDS_PROVISIONING: Self = Self(142);
    /// 143 Policy refresh required
    pub const NEEDS_PROVISIONING_REFRESH: Self = Self(143);
    /// 144 Invalid policy key
    pub const NEEDS_PROVISIONING_INVALID: Self = Self(144);
    /// 145 Externally managed devices not allowed
    pub const WTF_DEVICE_CLAIMS_EXTERNAL_MANAGEMENT: Self = Self(145);
    /// 147 Unknown item type
    pub const WTF_UNKNOWN_ITEM_TYPE: Self = Self(147);
    /// 148 Server requires a proxy without SSL
    pub const WTF_REQUIRES_PROXY_WITHOUT_SSL: Self = Self(148);
    /// 150 Item not found
    pub const ITEM_NOT_FOUND: Self = Self(150);
    /// 177 Maximum device partnerships reached
    pub const TOO_MANY_PARTNERSHIPS: Self = Self(177);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_code() {
        assert_eq!(PingStatus::EXPIRED.as_u32(), 1);
        assert_eq!(PingStatus::new(111), PingStatus::SERVER_ERROR_RETRY);
        assert_eq!(PingStatus::TOO_MANY_PARTNERSHIPS.to_string(), "177");
    }

    #[test]
    fn fatal_sets_are_disjoint() {
        for code in 0..300 {
            let status = PingStatus::new(code);
            assert!(!(status.is_fatal_auth() && status.is_fatal_protocol()));
        }
    }

    #[test]
    fn fatal_auth_members() {
        for code in [126, 127, 128, 129, 130, 131, 139, 141, 177] {
            assert!(PingStatus::new(code).is_fatal_auth(), "{code}");
        }
        assert!(!PingStatus::SERVER_ERROR_RETRY.is_fatal_auth());
    }

    #[test]
    fn fatal_protocol_members() {
        for code in [
            132, 133, 134, 135, 136, 137, 138, 140, 142, 143, 144, 145, 147, 148, 150,
        ] {
            assert!(PingStatus::new(code).is_fatal_protocol(), "{code}");
        }
        assert!(!PingStatus::new(146).is_fatal_protocol());
        assert!(!PingStatus::CHANGES_FOUND.is_fatal_protocol());
    }
}
