// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the LocalState trait.

use async_trait::async_trait;
use rusqlite::params;
use tracing::debug;

use tagswipe_core::{Adapter, AdapterType, HealthStatus, LocalState, TagswipeError};

use crate::database::{Database, map_tr_err};

/// Key/value state stored in the `local_state` table.
///
/// Each `set` is a single autocommit upsert, so it is durable once the call
/// returns.
#[derive(Debug, Clone)]
pub struct SqliteLocalState {
    db: Database,
}

impl SqliteLocalState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Adapter for SqliteLocalState {
    fn name(&self) -> &str {
        "sqlite-local-state"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::LocalState
    }

    async fn health_check(&self) -> Result<HealthStatus, TagswipeError> {
        self.db.ping().await?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TagswipeError> {
        self.db.checkpoint().await?;
        debug!("local state: WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl LocalState for SqliteLocalState {
    async fn get(&self, key: &str) -> Result<Option<String>, TagswipeError> {
        let key = key.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
                let result = conn.query_row(
                    "SELECT value FROM local_state WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                );
                match result {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await
            .map_err(map_tr_err)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), TagswipeError> {
        let key = key.to_string();
        let value = value.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO local_state (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                    params![key, value],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn remove(&self, key: &str) -> Result<(), TagswipeError> {
        let key = key.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute("DELETE FROM local_state WHERE key = ?1", params![key])?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn memory_state() -> SqliteLocalState {
        SqliteLocalState::new(Database::open_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn adapter_identity() {
        let state = memory_state().await;
        assert_eq!(state.name(), "sqlite-local-state");
        assert_eq!(state.version(), semver::Version::new(0, 1, 0));
        assert_eq!(state.adapter_type(), AdapterType::LocalState);
        assert_eq!(state.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn missing_key_reads_none() {
        let state = memory_state().await;
        assert_eq!(state.get("tag_page_heist").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let state = memory_state().await;
        state.set("tag_page_heist", "2").await.unwrap();
        state.set("tag_page_heist", "3").await.unwrap();
        assert_eq!(
            state.get("tag_page_heist").await.unwrap().as_deref(),
            Some("3")
        );
    }

    #[tokio::test]
    async fn remove_deletes_key() {
        let state = memory_state().await;
        state.set("voted_movies_heist", "[1,2]").await.unwrap();
        state.remove("voted_movies_heist").await.unwrap();
        assert_eq!(state.get("voted_movies_heist").await.unwrap(), None);
        // Removing an absent key is not an error.
        state.remove("voted_movies_heist").await.unwrap();
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("state.db");
        let path = db_path.to_str().unwrap();

        let db = Database::open(path).await.unwrap();
        SqliteLocalState::new(db.clone())
            .set("tag_vote_session_id", "abc")
            .await
            .unwrap();
        db.close().await.unwrap();

        let state = SqliteLocalState::new(Database::open(path).await.unwrap());
        assert_eq!(
            state.get("tag_vote_session_id").await.unwrap().as_deref(),
            Some("abc")
        );
    }
}
