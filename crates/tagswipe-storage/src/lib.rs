// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the tagswipe vote queue.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and the two storage-backed
//! collaborators: device-local key/value state and the vote store.

pub mod database;
pub mod local_state;
pub mod migrations;
pub mod votes;

pub use database::Database;
pub use local_state::SqliteLocalState;
pub use votes::SqliteVoteStore;

use tagswipe_config::model::StorageConfig;
use tagswipe_core::TagswipeError;

/// Open the configured database and build both storage collaborators over it.
pub async fn open_from_config(
    config: &StorageConfig,
) -> Result<(Database, SqliteLocalState, SqliteVoteStore), TagswipeError> {
    let db = Database::open_with(&config.database_path, config.wal_mode).await?;
    tracing::debug!(path = %config.database_path, "SQLite storage initialized");
    Ok((
        db.clone(),
        SqliteLocalState::new(db.clone()),
        SqliteVoteStore::new(db),
    ))
}
