//! # easpush-core
//!
//! Client core for the ActiveSync `Ping` command, the long-poll a mail-sync
//! client uses to learn which folders have new data.
//!
//! ## Features
//!
//! - **Folder selection**: only folders that finished their initial sync and
//!   allow automatic sync are watched
//! - **Request building**: heartbeat followed by the watched folder list
//! - **Adaptive heartbeat**: the hold duration grows on clean expiry, backs
//!   off on failure and honours server corrections, always within
//!   `[480, 1680]` seconds
//! - **Response classification**: table-driven mapping from status codes to
//!   outcomes and the side effects they mandate
//!
//! Transport, wire encoding and storage are supplied by the embedding
//! application through the [`Transport`], [`PingCodec`], [`FolderRegistry`]
//! and [`HeartbeatStore`] traits.
//!
//! ## Quick Start
//!
//! ```ignore
//! use easpush_core::{AccountId, PingOperation, PingOutcome, PushConfig};
//!
//! let mut ping = PingOperation::new(
//!     AccountId::new(1),
//!     PushConfig::default(),
//!     transport,
//!     codec,
//!     registry.clone(),
//!     store,
//! )
//! .await?;
//!
//! loop {
//!     match ping.run_once().await? {
//!         PingOutcome::Completed { effects, .. } => {
//!             easpush_core::apply_effects(&registry, ping.account_id(), &effects).await?;
//!         }
//!         PingOutcome::RetryLater | PingOutcome::OperationFailure(_) => continue,
//!         _ => break,
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod account;
pub mod classify;
pub mod codec;
pub mod config;
mod error;
pub mod folder;
pub mod heartbeat;
pub mod ping;
pub mod request;
pub mod status;
pub mod store;
pub mod transport;

pub use account::AccountId;
pub use classify::{Action, Classification, classify};
pub use codec::{CodecError, PingCodec, PingResponse};
pub use config::{HeartbeatPolicy, PushConfig};
pub use error::{Error, Result};
pub use folder::{FolderClass, FolderDescriptor, FolderId, WatchedFolder, select_push_folders};
pub use heartbeat::{HeartbeatChange, HeartbeatController};
pub use ping::{PingOperation, PingOutcome, SideEffect, apply_effects};
pub use request::{PingRequest, build_request};
pub use status::PingStatus;
pub use store::{FolderRegistry, HeartbeatStore};
pub use transport::{Transport, TransportError};
