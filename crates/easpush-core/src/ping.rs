//! The Ping operation.
//!
//! One call selects the folders to watch, sends a Ping with the current
//! heartbeat, waits for the server to answer or the client deadline to pass,
//! classifies the answer and retunes the heartbeat. Looping, backoff between
//! failures and disabling push are left to the caller.

use std::future::Future;

use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::account::AccountId;
use crate::classify::{Action, Classification, classify};
use crate::codec::PingCodec;
use crate::config::PushConfig;
use crate::folder::{FolderClass, FolderDescriptor, FolderId, select_push_folders};
use crate::heartbeat::{HeartbeatChange, HeartbeatController};
use crate::request::build_request;
use crate::status::PingStatus;
use crate::store::{FolderRegistry, HeartbeatStore};
use crate::transport::{Transport, TransportError};
use crate::{Error, Result};

/// Work the caller must carry out after a Ping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// Sync one changed folder.
    SyncFolder {
        /// Local folder id.
        folder: FolderId,
        /// Server id reported by the Ping.
        server_id: String,
        /// Folder class.
        class: FolderClass,
    },
    /// Refresh the account's folder list.
    RefreshFolderList,
}

/// Result of one Ping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingOutcome {
    /// The server answered with a status the caller may keep pushing after.
    Completed {
        /// What the server reported.
        classification: Classification,
        /// Work to carry out before or while pinging again.
        effects: Vec<SideEffect>,
    },
    /// No folder is eligible for push; no request was sent.
    NothingToWatch,
    /// The account cannot sync until re-authorised. Stop pushing.
    FatalAuth(PingStatus),
    /// Client and server state disagree. Stop pushing.
    FatalProtocol(PingStatus),
    /// The server asked the client to try again.
    RetryLater,
    /// The request failed or the response was unusable. The heartbeat has
    /// already been backed off.
    OperationFailure(TransportError),
    /// The caller cancelled the call before it completed.
    Cancelled,
}

/// Ping operation for one account.
///
/// `run_once` takes `&mut self`, so one instance never has two Pings in
/// flight. Run one instance per account.
pub struct PingOperation<T, C, R, S> {
    account: AccountId,
    heartbeat: HeartbeatController,
    transport: T,
    codec: C,
    registry: R,
    store: S,
}

impl<T, C, R, S> PingOperation<T, C, R, S>
where
    T: Transport,
    C: PingCodec,
    R: FolderRegistry,
    S: HeartbeatStore,
{
    /// Creates the operation, restoring the account's persisted heartbeat.
    ///
    /// A heartbeat that cannot be loaded falls back to the policy default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the heartbeat policy is invalid.
    pub async fn new(
        account: AccountId,
        config: PushConfig,
        transport: T,
        codec: C,
        registry: R,
        store: S,
    ) -> Result<Self> {
        config.heartbeat.validate()?;

        let persisted = match store.load_heartbeat(account).await {
            Ok(secs) => secs,
            Err(e) => {
                warn!(account = %account, "Failed to load heartbeat, using default: {e}");
                None
            }
        };
        let heartbeat = HeartbeatController::new(config.heartbeat, persisted);
        debug!(
            account = %account,
            heartbeat = heartbeat.current_secs(),
            "initial ping duration"
        );

        Ok(Self {
            account,
            heartbeat,
            transport,
            codec,
            registry,
            store,
        })
    }

    /// Account this operation pings for.
    #[must_use]
    pub const fn account_id(&self) -> AccountId {
        self.account
    }

    /// Heartbeat state.
    #[must_use]
    pub const fn heartbeat(&self) -> &HeartbeatController {
        &self.heartbeat
    }

    /// Runs one Ping to completion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MetadataUnavailable`] if the folder list cannot be
    /// read and [`Error::Encode`] if the request cannot be encoded. Network
    /// and protocol failures are reported through [`PingOutcome`].
    pub async fn run_once(&mut self) -> Result<PingOutcome> {
        self.run_until_cancelled(std::future::pending()).await
    }

    /// Runs one Ping, abandoning it if `cancel` completes first.
    ///
    /// Only the wait for the server's answer is cancellable. The folder read
    /// before it and the heartbeat write after it always run to completion.
    /// A cancelled Ping leaves the heartbeat untouched.
    ///
    /// # Errors
    ///
    /// Same as [`Self::run_once`].
    pub async fn run_until_cancelled<F>(&mut self, cancel: F) -> Result<PingOutcome>
    where
        F: Future<Output = ()>,
    {
        let account = self.account;
        let folders = self
            .registry
            .folders(account)
            .await
            .map_err(|source| Error::MetadataUnavailable {
                account,
                source: Box::new(source),
            })?;

        let Some(request) = build_request(
            self.heartbeat.current_secs(),
            select_push_folders(&folders),
        ) else {
            info!(account = %account, "No folders want push");
            return Ok(PingOutcome::NothingToWatch);
        };

        let payload = self.codec.encode(&request).map_err(Error::Encode)?;
        let deadline = self.heartbeat.timeout_for_request();
        debug!(
            account = %account,
            heartbeat = request.heartbeat_secs(),
            folders = request.folders().len(),
            "sending ping"
        );

        let started = Instant::now();
        let transport = &self.transport;
        let exchange = async move {
            match tokio::time::timeout(deadline, transport.send(payload, deadline)).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::TimedOut(deadline)),
            }
        };

        tokio::pin!(cancel);
        let result = tokio::select! {
            biased;
            () = &mut cancel => {
                debug!(account = %account, "ping cancelled");
                return Ok(PingOutcome::Cancelled);
            }
            result = exchange => result,
        };

        let response = result
            .and_then(|body| {
                if body.is_empty() {
                    Err(TransportError::EmptyBody)
                } else {
                    Ok(body)
                }
            })
            .and_then(|body| {
                self.codec
                    .decode(&body)
                    .map_err(|e| TransportError::Unusable(e.to_string()))
            });

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    account = %account,
                    elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "Ping request failure: {err}"
                );
                let change = self.heartbeat.on_operation_failure();
                self.persist(change).await;
                return Ok(PingOutcome::OperationFailure(err));
            }
        };

        let classification = classify(response);
        self.log_classification(&classification);

        let mut effects = Vec::new();
        match classification.action() {
            Some(Action::IncreaseHeartbeat) => {
                let change = self.heartbeat.increase();
                self.persist(change).await;
            }
            Some(Action::ForceHeartbeat(secs)) => {
                let change = self.heartbeat.force_set(secs);
                info!(
                    account = %account,
                    old = change.previous,
                    new = change.current,
                    server = secs,
                    "Heartbeat out of bounds"
                );
                self.persist(change).await;
            }
            Some(Action::ResyncFolders(server_ids)) => {
                effects.extend(resolve_changed_folders(account, &folders, &server_ids));
            }
            Some(Action::RefreshFolderList) => effects.push(SideEffect::RefreshFolderList),
            None => {}
        }

        Ok(match classification {
            Classification::RetryLater => {
                self.heartbeat.on_timeout_expired();
                PingOutcome::RetryLater
            }
            Classification::FatalAuth(status) => PingOutcome::FatalAuth(status),
            Classification::FatalProtocol(status) => PingOutcome::FatalProtocol(status),
            classification => PingOutcome::Completed {
                classification,
                effects,
            },
        })
    }

    /// Writes the heartbeat after a mutation. A failed write only costs a
    /// stale value after restart, so it is logged, not returned.
    async fn persist(&self, change: HeartbeatChange) {
        if let Err(e) = self
            .store
            .store_heartbeat(self.account, change.current)
            .await
        {
            warn!(account = %self.account, heartbeat = change.current, "Failed to store heartbeat: {e}");
        }
    }

    fn log_classification(&self, classification: &Classification) {
        let account = self.account;
        match classification {
            Classification::Expired => info!(account = %account, "Ping expired"),
            Classification::ChangesFound { folders } => {
                info!(account = %account, changed = folders.len(), "Ping found changed folders");
            }
            Classification::BadRequest(status) => {
                error!(account = %account, %status, "Bad ping request");
            }
            Classification::HeartbeatOutOfBounds {
                server_heartbeat: None,
            } => {
                warn!(account = %account, "Heartbeat out of bounds without a server value");
            }
            Classification::HeartbeatOutOfBounds { .. } => {}
            Classification::TooManyFolders { max_folders } => {
                info!(account = %account, ?max_folders, "Too many folders");
            }
            Classification::FolderListStale => info!(account = %account, "FolderSync needed"),
            Classification::TransientServerError => info!(account = %account, "Server error"),
            Classification::RetryLater => info!(account = %account, "Retryable server error"),
            Classification::FatalAuth(status) | Classification::FatalProtocol(status) => {
                error!(account = %account, %status, "Unexpected error on ping");
            }
            Classification::Unrecognized(status) => {
                debug!(account = %account, %status, "Unrecognized ping status");
            }
        }
    }
}

/// Resolves changed server ids against the account's folders.
///
/// Ids the registry does not know are skipped.
fn resolve_changed_folders(
    account: AccountId,
    folders: &[FolderDescriptor],
    server_ids: &[String],
) -> Vec<SideEffect> {
    server_ids
        .iter()
        .filter_map(|server_id| {
            let found = folders.iter().find(|f| &f.server_id == server_id);
            if found.is_none() {
                warn!(account = %account, server_id = %server_id, "Changed folder not found");
            }
            found
        })
        .map(|folder| SideEffect::SyncFolder {
            folder: folder.id,
            server_id: folder.server_id.clone(),
            class: folder.class,
        })
        .collect()
}

/// Carries out side effects against the folder registry, in order.
///
/// # Errors
///
/// Returns the first registry error; later effects are not applied.
pub async fn apply_effects<R>(registry: &R, account: AccountId, effects: &[SideEffect]) -> Result<()>
where
    R: FolderRegistry,
{
    for effect in effects {
        match effect {
            SideEffect::SyncFolder { folder, .. } => {
                registry.request_folder_sync(account, *folder).await?;
            }
            SideEffect::RefreshFolderList => {
                registry.request_folder_list_refresh(account).await?;
            }
        }
    }
    Ok(())
}
