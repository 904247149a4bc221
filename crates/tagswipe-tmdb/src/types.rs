// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TMDB v3 response types.

use serde::Deserialize;

/// `GET /search/keyword`
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordSearchResponse {
    #[serde(default)]
    pub results: Vec<Keyword>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Keyword {
    pub id: u64,
    pub name: String,
}

/// `GET /discover/movie`
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<DiscoverMovie>,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverMovie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Error body TMDB returns alongside non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub status_code: i64,
    pub status_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_tolerates_nulls_and_missing_fields() {
        let body = r#"{
            "page": 1,
            "results": [
                {"id": 1, "title": "A", "poster_path": null, "overview": "x"},
                {"id": 2, "title": "B", "release_date": "1990-12-01", "backdrop_path": "/b.jpg"}
            ],
            "total_pages": 3,
            "total_results": 50
        }"#;
        let parsed: DiscoverResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].poster_path, None);
        assert_eq!(parsed.results[1].overview, "");
        assert_eq!(parsed.results[1].backdrop_path.as_deref(), Some("/b.jpg"));
        assert_eq!(parsed.total_pages, 3);
    }

    #[test]
    fn api_error_parses() {
        let body = r#"{"status_code": 7, "status_message": "Invalid API key", "success": false}"#;
        let parsed: ApiErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status_code, 7);
        assert_eq!(parsed.status_message, "Invalid API key");
    }
}
