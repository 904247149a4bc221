// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level tagswipe configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TagswipeConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Swipe queue tuning.
    #[serde(default)]
    pub queue: QueueConfig,

    /// Local SQLite storage.
    #[serde(default)]
    pub storage: StorageConfig,

    /// TMDB movie source.
    #[serde(default)]
    pub tmdb: TmdbConfig,
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Swipe queue tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    /// A new page is requested once the backlog holds fewer items than this.
    #[serde(default = "default_low_water_mark")]
    pub low_water_mark: usize,

    /// Upper bound on pages fetched by a single refill call.
    #[serde(default = "default_max_pages_per_refill")]
    pub max_pages_per_refill: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            low_water_mark: default_low_water_mark(),
            max_pages_per_refill: default_max_pages_per_refill(),
        }
    }
}

fn default_low_water_mark() -> usize {
    3
}

fn default_max_pages_per_refill() -> u32 {
    10
}

/// Local SQLite storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("tagswipe").join("tagswipe.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("tagswipe.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// TMDB movie source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TmdbConfig {
    /// TMDB v3 API key. `None` requires the `TMDB_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the TMDB v3 API.
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,

    /// Base URL for poster and backdrop images.
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Language passed to discover queries.
    #[serde(default = "default_language")]
    pub language: String,

    /// Include adult titles in discover results.
    #[serde(default)]
    pub include_adult: bool,

    /// Cap on the page count reported to the queue (TMDB serves at most 500).
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_tmdb_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            include_adult: false,
            max_pages: default_max_pages(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_max_pages() -> u32 {
    500
}

fn default_timeout_secs() -> u64 {
    30
}
