// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the VoteStore trait.

use async_trait::async_trait;
use rusqlite::params;
use tracing::debug;

use tagswipe_core::{
    Adapter, AdapterType, HealthStatus, ItemId, Tag, TagswipeError, VoteStats, VoteStore,
    VoteWrite,
};

use crate::database::{Database, map_tr_err};

/// Vote store backed by the `tag_votes` table.
///
/// Every submission is one row; stats are aggregated at read time.
#[derive(Debug, Clone)]
pub struct SqliteVoteStore {
    db: Database,
}

impl SqliteVoteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Number of votes a session has cast under a tag.
    pub async fn count_for_session(
        &self,
        tag: &Tag,
        session_id: &str,
    ) -> Result<u64, TagswipeError> {
        let tag = tag.as_str().to_string();
        let session_id = session_id.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<i64, rusqlite::Error> {
                conn.query_row(
                    "SELECT COUNT(*) FROM tag_votes WHERE tag = ?1 AND session_id = ?2",
                    params![tag, session_id],
                    |row| row.get(0),
                )
            })
            .await
            .map(|n| n.max(0) as u64)
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl Adapter for SqliteVoteStore {
    fn name(&self) -> &str {
        "sqlite-votes"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::VoteStore
    }

    async fn health_check(&self) -> Result<HealthStatus, TagswipeError> {
        self.db.ping().await?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TagswipeError> {
        self.db.checkpoint().await?;
        debug!("vote store: WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl VoteStore for SqliteVoteStore {
    async fn write_vote(&self, vote: &VoteWrite) -> Result<(), TagswipeError> {
        let tag = vote.tag.as_str().to_string();
        let item_id = vote.item_id.0 as i64;
        let is_tag = vote.vote.is_tag();
        let session_id = vote.session_id.as_str().to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO tag_votes (tag, tmdb_id, is_tag, session_id)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![tag, item_id, is_tag, session_id],
                )?;
                Ok(())
            })
            .await
            .map_err(|e| TagswipeError::WriteFailure {
                message: "insert into tag_votes failed".to_string(),
                source: Some(Box::new(e)),
            })
    }

    async fn read_stats(&self, tag: &Tag, item_id: ItemId) -> Result<VoteStats, TagswipeError> {
        let tag = tag.as_str().to_string();
        let item_id = item_id.0 as i64;
        let (yes, no) = self
            .db
            .connection()
            .call(move |conn| -> Result<(i64, i64), rusqlite::Error> {
                conn.query_row(
                    "SELECT COALESCE(SUM(is_tag = 1), 0), COALESCE(SUM(is_tag = 0), 0)
                     FROM tag_votes WHERE tag = ?1 AND tmdb_id = ?2",
                    params![tag, item_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
            })
            .await
            .map_err(map_tr_err)?;
        Ok(VoteStats {
            yes: yes.max(0) as u64,
            no: no.max(0) as u64,
        })
    }
}
