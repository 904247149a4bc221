// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All statements run on tokio-rusqlite's single background thread. Clones of
//! [`Database`] share that thread, so writes are serialized without
//! `SQLITE_BUSY` contention. Do not open extra connections for writes.

use std::path::Path;

use tagswipe_core::TagswipeError;
use tracing::debug;

use crate::migrations;

/// Convert a tokio-rusqlite error into [`TagswipeError::Storage`].
pub(crate) fn map_tr_err<E>(e: tokio_rusqlite::Error<E>) -> TagswipeError
where
    E: std::error::Error + Send + Sync + 'static,
{
    TagswipeError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the tagswipe SQLite database.
#[derive(Debug, Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database file at `path` in WAL mode and migrate it.
    pub async fn open(path: &str) -> Result<Self, TagswipeError> {
        Self::open_with(path, true).await
    }

    /// Open the database file at `path`, choosing the journal mode.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, TagswipeError> {
        if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TagswipeError::Storage { source: e.into() })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| TagswipeError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(wal_mode).await?;
        debug!(path, wal_mode, "database opened");
        Ok(db)
    }

    /// Open a private in-memory database, already migrated.
    pub async fn open_in_memory() -> Result<Self, TagswipeError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| TagswipeError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(false).await?;
        Ok(db)
    }

    async fn prepare(&self, wal_mode: bool) -> Result<(), TagswipeError> {
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                if wal_mode {
                    conn.pragma_update(None, "journal_mode", "WAL")?;
                }
                // Votes must survive a reload right after the write returns.
                conn.pragma_update(None, "synchronous", "FULL")?;
                conn.pragma_update(None, "foreign_keys", "ON")?;
                conn.busy_timeout(std::time::Duration::from_secs(5))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        self.conn
            .call(|conn| migrations::run_migrations(conn))
            .await
            .map_err(map_tr_err)
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Flush the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), TagswipeError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Trivial query used by adapter health checks.
    pub async fn ping(&self) -> Result<(), TagswipeError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoint and close the connection.
    pub async fn close(self) -> Result<(), TagswipeError> {
        self.checkpoint().await?;
        self.conn.close().await.map_err(|e| TagswipeError::Storage {
            source: Box::new(e),
        })
    }
}
