// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted MovieSource for deterministic testing.
//!
//! Scripted responses queued with `push_page()`/`push_failure()` are served
//! first, in order. Otherwise the page registered for the requested page
//! number is returned, or an empty page when none is registered.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use tagswipe_core::{
    Adapter, AdapterType, CandidateItem, HealthStatus, MoviePage, MovieSource, Tag,
    TagswipeError,
};

/// One recorded `fetch_page` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub tag: Tag,
    pub page: u32,
    pub salt: u64,
}

/// A candidate with a predictable title.
pub fn movie(id: u64) -> CandidateItem {
    CandidateItem::new(id, format!("Movie {id}"))
}

/// A page of [`movie`]s.
pub fn movie_page(ids: &[u64], total_pages: u32) -> MoviePage {
    MoviePage {
        items: ids.iter().map(|&id| movie(id)).collect(),
        total_pages,
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockMovieSource {
    pages: Arc<Mutex<HashMap<u32, MoviePage>>>,
    scripted: Arc<Mutex<VecDeque<Result<MoviePage, String>>>>,
    calls: Arc<Mutex<Vec<FetchCall>>>,
}

impl MockMovieSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `pages` as pages 1..=n.
    pub fn with_pages(pages: Vec<MoviePage>) -> Self {
        let map = pages
            .into_iter()
            .enumerate()
            .map(|(i, page)| (i as u32 + 1, page))
            .collect();
        Self {
            pages: Arc::new(Mutex::new(map)),
            ..Self::default()
        }
    }

    /// Register the response for one page number.
    pub async fn set_page(&self, number: u32, page: MoviePage) {
        self.pages.lock().await.insert(number, page);
    }

    /// Drop every registered page.
    pub async fn clear_pages(&self) {
        self.pages.lock().await.clear();
    }

    /// Serve `page` for the next call regardless of the page number.
    pub async fn push_page(&self, page: MoviePage) {
        self.scripted.lock().await.push_back(Ok(page));
    }

    /// Fail the next call with `SourceUnavailable`.
    pub async fn push_failure(&self, message: &str) {
        self.scripted
            .lock()
            .await
            .push_back(Err(message.to_string()));
    }

    pub async fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Page numbers requested so far, in order.
    pub async fn requested_pages(&self) -> Vec<u32> {
        self.calls.lock().await.iter().map(|c| c.page).collect()
    }
}

#[async_trait]
impl Adapter for MockMovieSource {
    fn name(&self) -> &str {
        "mock-movie-source"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::MovieSource
    }

    async fn health_check(&self) -> Result<HealthStatus, TagswipeError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), TagswipeError> {
        Ok(())
    }
}

#[async_trait]
impl MovieSource for MockMovieSource {
    async fn fetch_page(
        &self,
        tag: &Tag,
        page: u32,
        salt: u64,
    ) -> Result<MoviePage, TagswipeError> {
        self.calls.lock().await.push(FetchCall {
            tag: tag.clone(),
            page,
            salt,
        });

        if let Some(scripted) = self.scripted.lock().await.pop_front() {
            debug!(tag = %tag, page, ok = scripted.is_ok(), "serving scripted page");
            return scripted.map_err(TagswipeError::source_unavailable);
        }

        let pages = self.pages.lock().await;
        Ok(pages.get(&page).cloned().unwrap_or_else(|| MoviePage {
            items: Vec::new(),
            total_pages: pages.len() as u32,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_registered_pages_and_logs_calls() {
        let source = MockMovieSource::with_pages(vec![movie_page(&[1, 2], 2), movie_page(&[3], 2)]);
        let tag = Tag::new("heist");
        let page = source.fetch_page(&tag, 2, 7).await.unwrap();
        assert_eq!(page.items[0].id.0, 3);
        assert_eq!(
            source.calls().await,
            vec![FetchCall {
                tag,
                page: 2,
                salt: 7
            }]
        );
    }

    #[tokio::test]
    async fn scripted_responses_come_first() {
        let source = MockMovieSource::with_pages(vec![movie_page(&[1], 1)]);
        source.push_failure("offline").await;
        let tag = Tag::new("heist");
        let err = source.fetch_page(&tag, 1, 0).await.unwrap_err();
        assert!(matches!(err, TagswipeError::SourceUnavailable { .. }));
        assert_eq!(source.fetch_page(&tag, 1, 0).await.unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn unknown_page_is_empty() {
        let source = MockMovieSource::with_pages(vec![movie_page(&[1], 1)]);
        let page = source.fetch_page(&Tag::new("x"), 9, 0).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }
}
