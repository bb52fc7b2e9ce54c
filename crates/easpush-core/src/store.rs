//! Storage interfaces consumed by the Ping operation.

use std::future::Future;
use std::sync::Arc;

use crate::Result;
use crate::account::AccountId;
use crate::folder::{FolderDescriptor, FolderId};

/// Durable per-account heartbeat storage.
pub trait HeartbeatStore: Send + Sync {
    /// Loads the persisted heartbeat in seconds, if any.
    fn load_heartbeat(
        &self,
        account: AccountId,
    ) -> impl Future<Output = Result<Option<u64>>> + Send;

    /// Persists the heartbeat in seconds.
    fn store_heartbeat(
        &self,
        account: AccountId,
        secs: u64,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Read access to folder metadata and the sync actions a Ping can trigger.
pub trait FolderRegistry: Send + Sync {
    /// Lists every folder known for the account.
    fn folders(
        &self,
        account: AccountId,
    ) -> impl Future<Output = Result<Vec<FolderDescriptor>>> + Send;

    /// Requests a targeted sync of one folder.
    fn request_folder_sync(
        &self,
        account: AccountId,
        folder: FolderId,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Requests a refresh of the account's folder list.
    fn request_folder_list_refresh(
        &self,
        account: AccountId,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Requests that push be (re)started for the account.
    fn request_ping(&self, account: AccountId) -> impl Future<Output = Result<()>> + Send;
}

impl<T: HeartbeatStore> HeartbeatStore for Arc<T> {
    fn load_heartbeat(
        &self,
        account: AccountId,
    ) -> impl Future<Output = Result<Option<u64>>> + Send {
        (**self).load_heartbeat(account)
    }

    fn store_heartbeat(
        &self,
        account: AccountId,
        secs: u64,
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).store_heartbeat(account, secs)
    }
}

impl<T: FolderRegistry> FolderRegistry for Arc<T> {
    fn folders(
        &self,
        account: AccountId,
    ) -> impl Future<Output = Result<Vec<FolderDescriptor>>> + Send {
        (**self).folders(account)
    }

    fn request_folder_sync(
        &self,
        account: AccountId,
        folder: FolderId,
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).request_folder_sync(account, folder)
    }

    fn request_folder_list_refresh(
        &self,
        account: AccountId,
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).request_folder_list_refresh(account)
    }

    fn request_ping(&self, account: AccountId) -> impl Future<Output = Result<()>> + Send {
        (**self).request_ping(account)
    }
}
