//! Push state storage repository.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use easpush_core::{
    AccountId, FolderClass, FolderDescriptor, FolderId, FolderRegistry, HeartbeatStore,
};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, warn};

use crate::model::{NewFolder, SyncRequest, SyncRequestKind};
use crate::{Error, Result};

/// Default database location, under the user's data directory.
#[must_use]
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("easpush")
        .join("push.db")
}

/// Repository for heartbeats, folder metadata and queued sync requests.
#[derive(Debug, Clone)]
pub struct PushRepository {
    pool: SqlitePool,
}

impl PushRepository {
    /// Create a new repository with the given database path.
    ///
    /// Creates the database and tables if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let repo = Self { pool };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Open the repository at [`default_database_path`], creating its
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the database
    /// cannot be opened.
    pub async fn open_default() -> Result<Self> {
        let path = default_database_path();
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        Self::new(&path.to_string_lossy()).await
    }

    /// Create an in-memory repository for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let repo = Self { pool };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Initialize database schema.
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS push_state (
                account_id INTEGER PRIMARY KEY,
                ping_duration INTEGER NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS folders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                server_id TEXT NOT NULL,
                class TEXT NOT NULL,
                sync_key TEXT,
                auto_sync INTEGER NOT NULL DEFAULT 1,
                UNIQUE(account_id, server_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS sync_requests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                kind TEXT NOT NULL,
                folder_id INTEGER,
                requested_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get the persisted heartbeat for an account, in seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn heartbeat(&self, account: AccountId) -> Result<Option<u64>> {
        let row = sqlx::query("SELECT ping_duration FROM push_state WHERE account_id = ?")
            .bind(account.0)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.and_then(|row| u64::try_from(row.get::<i64, _>("ping_duration")).ok()))
    }

    /// Persist the heartbeat for an account, in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `secs` does not fit the column, or an
    /// error if the database query fails.
    pub async fn set_heartbeat(&self, account: AccountId, secs: u64) -> Result<()> {
        let stored = i64::try_from(secs).map_err(|_| Error::OutOfRange(secs))?;
        sqlx::query(
            r"
            INSERT INTO push_state (account_id, ping_duration, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(account_id) DO UPDATE SET
                ping_duration = excluded.ping_duration,
                updated_at = excluded.updated_at
            ",
        )
        .bind(account.0)
        .bind(stored)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(account = %account, heartbeat = secs, "Stored ping duration");
        Ok(())
    }

    /// Register a folder, or update it if the server id is already known.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn save_folder(&self, account: AccountId, folder: &NewFolder) -> Result<FolderId> {
        sqlx::query(
            r"
            INSERT INTO folders (account_id, server_id, class, sync_key, auto_sync)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(account_id, server_id) DO UPDATE SET
                class = excluded.class,
                sync_key = excluded.sync_key,
                auto_sync = excluded.auto_sync
            ",
        )
        .bind(account.0)
        .bind(&folder.server_id)
        .bind(folder.class.as_str())
        .bind(folder.sync_key.as_deref())
        .bind(folder.auto_sync)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query("SELECT id FROM folders WHERE account_id = ? AND server_id = ?")
            .bind(account.0)
            .bind(&folder.server_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(FolderId::new(row.get("id")))
    }

    /// Record the sync key reached by a folder sync.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn set_sync_key(&self, folder: FolderId, sync_key: Option<&str>) -> Result<()> {
        sqlx::query("UPDATE folders SET sync_key = ? WHERE id = ?")
            .bind(sync_key)
            .bind(folder.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Enable or disable automatic sync for every folder of a class.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn set_auto_sync(
        &self,
        account: AccountId,
        class: FolderClass,
        enabled: bool,
    ) -> Result<()> {
        sqlx::query("UPDATE folders SET auto_sync = ? WHERE account_id = ? AND class = ?")
            .bind(enabled)
            .bind(account.0)
            .bind(class.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// List the folders of an account, in registration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or a row holds an unknown
    /// folder class.
    pub async fn list_folders(&self, account: AccountId) -> Result<Vec<FolderDescriptor>> {
        let rows = sqlx::query(
            r"
            SELECT id, server_id, class, sync_key, auto_sync
            FROM folders
            WHERE account_id = ?
            ORDER BY id ASC
            ",
        )
        .bind(account.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_folder).collect()
    }

    /// Queue a sync request for the outer sync loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn record_request(&self, account: AccountId, kind: SyncRequestKind) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO sync_requests (account_id, kind, folder_id, requested_at)
            VALUES (?, ?, ?, ?)
            ",
        )
        .bind(account.0)
        .bind(kind.as_str())
        .bind(kind.folder_id())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(account = %account, kind = kind.as_str(), "Queued sync request");
        Ok(())
    }

    /// Get queued sync requests for an account, oldest first.
    ///
    /// Rows that cannot be interpreted are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn pending_requests(&self, account: AccountId) -> Result<Vec<SyncRequest>> {
        let rows = sqlx::query(
            r"
            SELECT id, account_id, kind, folder_id, requested_at
            FROM sync_requests
            WHERE account_id = ?
            ORDER BY id ASC
            ",
        )
        .bind(account.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .filter_map(|row| row_to_request(row).map(|(_, request)| request))
            .collect())
    }

    /// Remove and return the queued sync requests for an account, oldest
    /// first.
    ///
    /// Rows that cannot be interpreted are left in the queue with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn take_pending_requests(&self, account: AccountId) -> Result<Vec<SyncRequest>> {
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query(
            r"
            SELECT id, account_id, kind, folder_id, requested_at
            FROM sync_requests
            WHERE account_id = ?
            ORDER BY id ASC
            ",
        )
        .bind(account.0)
        .fetch_all(&mut *tx)
        .await?;

        let parsed: Vec<(i64, SyncRequest)> = rows.iter().filter_map(row_to_request).collect();
        for (id, _) in &parsed {
            sqlx::query("DELETE FROM sync_requests WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(parsed.into_iter().map(|(_, request)| request).collect())
    }

    /// Delete all push state of an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete_account(&self, account: AccountId) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for table in ["push_state", "folders", "sync_requests"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE account_id = ?"))
                .bind(account.0)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

/// Convert a database row to a folder descriptor.
fn row_to_folder(row: &sqlx::sqlite::SqliteRow) -> Result<FolderDescriptor> {
    let class: String = row.get("class");
    let class = FolderClass::from_name(&class)
        .ok_or_else(|| Error::Corrupt(format!("unknown folder class {class}")))?;
    let sync_key: Option<String> = row.get("sync_key");

    Ok(FolderDescriptor {
        id: FolderId::new(row.get("id")),
        server_id: row.get("server_id"),
        class,
        has_completed_initial_sync: FolderDescriptor::sync_key_completed(sync_key.as_deref()),
        auto_sync_enabled: row.get::<i64, _>("auto_sync") != 0,
    })
}

/// Convert a database row to a queued sync request and its row id.
fn row_to_request(row: &sqlx::sqlite::SqliteRow) -> Option<(i64, SyncRequest)> {
    let id: i64 = row.get("id");
    let kind: String = row.get("kind");
    let Some(kind) = SyncRequestKind::from_row(&kind, row.get("folder_id")) else {
        warn!(request = id, "Skipping unknown sync request kind: {kind}");
        return None;
    };
    let requested_at_str: String = row.get("requested_at");
    let requested_at = match DateTime::parse_from_rfc3339(&requested_at_str) {
        Ok(at) => at.with_timezone(&Utc),
        Err(e) => {
            warn!(request = id, "Skipping sync request with bad timestamp: {e}");
            return None;
        }
    };

    Some((
        id,
        SyncRequest {
            account_id: AccountId(row.get::<i64, _>("account_id")),
            kind,
            requested_at,
        },
    ))
}

impl HeartbeatStore for PushRepository {
    async fn load_heartbeat(&self, account: AccountId) -> easpush_core::Result<Option<u64>> {
        Ok(self.heartbeat(account).await?)
    }

    async fn store_heartbeat(&self, account: AccountId, secs: u64) -> easpush_core::Result<()> {
        Ok(self.set_heartbeat(account, secs).await?)
    }
}

impl FolderRegistry for PushRepository {
    async fn folders(&self, account: AccountId) -> easpush_core::Result<Vec<FolderDescriptor>> {
        Ok(self.list_folders(account).await?)
    }

    async fn request_folder_sync(
        &self,
        account: AccountId,
        folder: FolderId,
    ) -> easpush_core::Result<()> {
        Ok(self
            .record_request(account, SyncRequestKind::Folder(folder))
            .await?)
    }

    async fn request_folder_list_refresh(&self, account: AccountId) -> easpush_core::Result<()> {
        Ok(self
            .record_request(account, SyncRequestKind::FolderList)
            .await?)
    }

    async fn request_ping(&self, account: AccountId) -> easpush_core::Result<()> {
        Ok(self.record_request(account, SyncRequestKind::Ping).await?)
    }
}
