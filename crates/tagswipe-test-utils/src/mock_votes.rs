// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording VoteStore for deterministic testing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use tagswipe_core::{
    Adapter, AdapterType, HealthStatus, ItemId, Tag, TagswipeError, VoteStats, VoteStore,
    VoteWrite,
};

/// Captures every vote write; stats are computed from the captured writes.
#[derive(Debug, Clone, Default)]
pub struct MockVoteStore {
    writes: Arc<Mutex<Vec<VoteWrite>>>,
    failing: Arc<AtomicBool>,
}

impl MockVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail with `WriteFailure`. Failed writes are not recorded.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn writes(&self) -> Vec<VoteWrite> {
        self.writes.lock().await.clone()
    }

    pub async fn write_count(&self) -> usize {
        self.writes.lock().await.len()
    }
}

#[async_trait]
impl Adapter for MockVoteStore {
    fn name(&self) -> &str {
        "mock-vote-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::VoteStore
    }

    async fn health_check(&self) -> Result<HealthStatus, TagswipeError> {
        if self.failing.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Degraded("writes failing".to_string()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TagswipeError> {
        Ok(())
    }
}

#[async_trait]
impl VoteStore for MockVoteStore {
    async fn write_vote(&self, vote: &VoteWrite) -> Result<(), TagswipeError> {
        if self.failing.load(Ordering::SeqCst) {
            debug!(item_id = %vote.item_id, "mock vote store rejecting write");
            return Err(TagswipeError::write_failure("mock vote store is failing"));
        }
        self.writes.lock().await.push(vote.clone());
        Ok(())
    }

    async fn read_stats(&self, tag: &Tag, item_id: ItemId) -> Result<VoteStats, TagswipeError> {
        let writes = self.writes.lock().await;
        let mut stats = VoteStats::default();
        for w in writes.iter().filter(|w| &w.tag == tag && w.item_id == item_id) {
            if w.vote.is_tag() {
                stats.yes += 1;
            } else {
                stats.no += 1;
            }
        }
        Ok(stats)
    }
}
