// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote vote persistence.

use async_trait::async_trait;

use crate::error::TagswipeError;
use crate::traits::adapter::Adapter;
use crate::types::{ItemId, Tag, VoteStats, VoteWrite};

/// Store that receives every committed vote and serves aggregate stats.
#[async_trait]
pub trait VoteStore: Adapter {
    /// Persists one vote. Failures return [`TagswipeError::WriteFailure`].
    async fn write_vote(&self, vote: &VoteWrite) -> Result<(), TagswipeError>;

    /// Aggregated yes/no counts for an item under a tag.
    async fn read_stats(&self, tag: &Tag, item_id: ItemId) -> Result<VoteStats, TagswipeError>;
}
