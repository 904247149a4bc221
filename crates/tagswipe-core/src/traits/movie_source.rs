// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paged movie catalog consumed by the swipe queue.

use async_trait::async_trait;

use crate::error::TagswipeError;
use crate::traits::adapter::Adapter;
use crate::types::{MoviePage, Tag};

/// An opaque, paginated source of candidate movies for a tag.
///
/// The queue never interprets the ordering. `salt` is an opaque value the
/// queue bumps when it wants a differently shuffled result set (after a reset
/// or a pass); sources are free to ignore it.
#[async_trait]
pub trait MovieSource: Adapter {
    /// Fetches one page (1-based) of candidates for `tag`.
    ///
    /// Network-level failures return [`TagswipeError::SourceUnavailable`].
    async fn fetch_page(&self, tag: &Tag, page: u32, salt: u64)
    -> Result<MoviePage, TagswipeError>;
}
