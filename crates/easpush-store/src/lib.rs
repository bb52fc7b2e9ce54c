//! # easpush-store
//!
//! `SQLite` storage for the Ping operation:
//! - Per-account heartbeat persistence ([`easpush_core::HeartbeatStore`])
//! - Folder metadata and the sync requests a Ping triggers
//!   ([`easpush_core::FolderRegistry`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod model;
mod repository;

pub use error::{Error, Result};
pub use model::{NewFolder, SyncRequest, SyncRequestKind};
pub use repository::{PushRepository, default_database_path};
