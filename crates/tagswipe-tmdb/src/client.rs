// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the TMDB v3 API.
//!
//! Provides [`TmdbClient`] which handles authentication, JSON decoding, and
//! a single retry on transient errors.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tagswipe_core::TagswipeError;
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, DiscoverResponse, KeywordSearchResponse};

/// Query parameters for one discover request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverQuery {
    pub keyword_id: u64,
    pub page: u32,
    pub sort_by: &'static str,
    pub language: String,
    pub include_adult: bool,
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl TmdbClient {
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, TagswipeError> {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| TagswipeError::SourceUnavailable {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: 1,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Overrides the delay before a retry (tests use zero).
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// `GET /search/keyword?query=..&page=1`
    pub async fn search_keyword(&self, query: &str) -> Result<KeywordSearchResponse, TagswipeError> {
        self.get_json(
            "search/keyword",
            &[("query", query.to_string()), ("page", "1".to_string())],
        )
        .await
    }

    /// `GET /discover/movie?with_keywords=..`
    pub async fn discover(&self, query: &DiscoverQuery) -> Result<DiscoverResponse, TagswipeError> {
        self.get_json(
            "discover/movie",
            &[
                ("with_keywords", query.keyword_id.to_string()),
                ("language", query.language.clone()),
                ("include_adult", query.include_adult.to_string()),
                ("sort_by", query.sort_by.to_string()),
                ("page", query.page.to_string()),
            ],
        )
        .await
    }

    /// `GET /configuration`, used as a cheap authenticated ping.
    pub async fn ping(&self) -> Result<(), TagswipeError> {
        self.get_json::<serde_json::Value>("configuration", &[])
            .await
            .map(|_| ())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, TagswipeError> {
        let url = format!("{}/{}", self.base_url, path);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, path, "retrying TMDB request after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = self
                .client
                .get(&url)
                .query(&[("api_key", self.api_key.as_str())])
                .query(params)
                .send()
                .await
                .map_err(|e| TagswipeError::SourceUnavailable {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, path, "TMDB response received");

            if status.is_success() {
                let body = response
                    .text()
                    .await
                    .map_err(|e| TagswipeError::SourceUnavailable {
                        message: format!("failed to read response body: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return serde_json::from_str(&body).map_err(|e| {
                    TagswipeError::SourceUnavailable {
                        message: format!("failed to parse TMDB response: {e}"),
                        source: Some(Box::new(e)),
                    }
                });
            }

            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!("TMDB error {status}: {}", api_err.status_message),
                Err(_) => format!("TMDB returned {status}: {body}"),
            };

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, "transient TMDB error, will retry");
                last_error = Some(TagswipeError::source_unavailable(message));
                continue;
            }
            return Err(TagswipeError::source_unavailable(message));
        }

        Err(last_error
            .unwrap_or_else(|| TagswipeError::source_unavailable("TMDB request failed after retries")))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}
