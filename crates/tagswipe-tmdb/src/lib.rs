// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TMDB movie source for the tagswipe vote queue.
//!
//! A tag is resolved to a TMDB keyword by exact, case-insensitive name match;
//! candidates come from `discover/movie` filtered by that keyword.

pub mod client;
pub mod types;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tagswipe_config::model::TmdbConfig;
use tagswipe_core::{
    Adapter, AdapterType, CandidateItem, HealthStatus, ItemId, MoviePage, MovieSource, Tag,
    TagswipeError,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::client::{DiscoverQuery, TmdbClient};
use crate::types::DiscoverMovie;

/// Discover orderings; the queue's salt picks one so a bumped salt reshuffles.
const SORT_ORDERS: [&str; 5] = [
    "popularity.desc",
    "vote_count.desc",
    "vote_average.desc",
    "primary_release_date.desc",
    "revenue.desc",
];

const POSTER_SIZE: &str = "w500";
const BACKDROP_SIZE: &str = "w1280";

/// TMDB-backed [`MovieSource`].
///
/// API key resolution order: `tmdb.api_key` -> `TMDB_API_KEY` env var -> error.
pub struct TmdbMovieSource {
    client: TmdbClient,
    image_base_url: String,
    language: String,
    include_adult: bool,
    max_pages: u32,
    /// Lower-cased tag -> keyword id (`None` when TMDB has no exact match).
    keywords: Mutex<HashMap<String, Option<u64>>>,
}

impl TmdbMovieSource {
    pub fn new(config: &TmdbConfig) -> Result<Self, TagswipeError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = TmdbClient::new(
            api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(base_url = %config.base_url, "TMDB movie source initialized");
        Ok(Self::with_client(client, config))
    }

    /// Build over an existing client.
    pub fn with_client(client: TmdbClient, config: &TmdbConfig) -> Self {
        Self {
            client,
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            include_adult: config.include_adult,
            max_pages: config.max_pages.max(1),
            keywords: Mutex::new(HashMap::new()),
        }
    }

    /// Keyword id whose name equals `tag`, ignoring case. Cached per tag.
    pub async fn keyword_id(&self, tag: &Tag) -> Result<Option<u64>, TagswipeError> {
        let key = tag.as_str().to_lowercase();
        if let Some(cached) = self.keywords.lock().await.get(&key) {
            return Ok(*cached);
        }

        let response = self.client.search_keyword(tag.as_str()).await?;
        let id = response
            .results
            .iter()
            .find(|k| k.name.to_lowercase() == key)
            .map(|k| k.id);
        debug!(tag = %tag, keyword_id = ?id, "resolved TMDB keyword");

        self.keywords.lock().await.insert(key, id);
        Ok(id)
    }

    fn to_candidate(&self, movie: DiscoverMovie) -> CandidateItem {
        CandidateItem {
            id: ItemId(movie.id),
            title: movie.title,
            poster_url: self.image_url(POSTER_SIZE, movie.poster_path.as_deref()),
            backdrop_url: self.image_url(BACKDROP_SIZE, movie.backdrop_path.as_deref()),
            overview: movie.overview,
            release_date: movie.release_date.filter(|d| !d.is_empty()),
            imdb_id: None,
        }
    }

    fn image_url(&self, size: &str, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty())
            .map(|p| format!("{}/{size}{p}", self.image_base_url))
    }
}

/// Discover ordering for a salt value.
pub fn sort_order(salt: u64) -> &'static str {
    SORT_ORDERS[(salt % SORT_ORDERS.len() as u64) as usize]
}

fn resolve_api_key(configured: &Option<String>) -> Result<String, TagswipeError> {
    if let Some(key) = configured.as_deref().filter(|k| !k.trim().is_empty()) {
        return Ok(key.to_string());
    }
    std::env::var("TMDB_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            TagswipeError::Config(
                "TMDB API key not found: set tmdb.api_key or TMDB_API_KEY".to_string(),
            )
        })
}

#[async_trait]
impl Adapter for TmdbMovieSource {
    fn name(&self) -> &str {
        "tmdb"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::MovieSource
    }

    async fn health_check(&self) -> Result<HealthStatus, TagswipeError> {
        match self.client.ping().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), TagswipeError> {
        debug!("TMDB movie source shutting down");
        Ok(())
    }
}

#[async_trait]
impl MovieSource for TmdbMovieSource {
    async fn fetch_page(
        &self,
        tag: &Tag,
        page: u32,
        salt: u64,
    ) -> Result<MoviePage, TagswipeError> {
        let Some(keyword_id) = self.keyword_id(tag).await? else {
            debug!(tag = %tag, "no TMDB keyword for tag");
            return Ok(MoviePage::default());
        };

        // TMDB rejects pages past its cap; report the cap so the cursor restarts.
        if page > self.max_pages {
            return Ok(MoviePage {
                items: Vec::new(),
                total_pages: self.max_pages,
            });
        }

        let query = DiscoverQuery {
            keyword_id,
            page,
            sort_by: sort_order(salt),
            language: self.language.clone(),
            include_adult: self.include_adult,
        };
        let response = self.client.discover(&query).await?;
        let total_pages = response.total_pages.min(self.max_pages);
        let items: Vec<CandidateItem> = response
            .results
            .into_iter()
            .map(|movie| self.to_candidate(movie))
            .collect();

        debug!(
            tag = %tag,
            page,
            total_pages,
            sort_by = query.sort_by,
            count = items.len(),
            "fetched TMDB discover page"
        );
        Ok(MoviePage { items, total_pages })
    }
}
