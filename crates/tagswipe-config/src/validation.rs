// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::TagswipeConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &TagswipeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let level = config.general.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "general.log_level `{}` is not one of {}",
            config.general.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.queue.low_water_mark < 1 {
        fail("queue.low_water_mark must be at least 1".to_string());
    }

    if config.queue.max_pages_per_refill < 1 {
        fail("queue.max_pages_per_refill must be at least 1".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    for (key, url) in [
        ("tmdb.base_url", &config.tmdb.base_url),
        ("tmdb.image_base_url", &config.tmdb.image_base_url),
    ] {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            fail(format!("{key} `{url}` must be an http(s) URL"));
        }
    }

    if config.tmdb.max_pages < 1 {
        fail("tmdb.max_pages must be at least 1".to_string());
    }

    if config.tmdb.timeout_secs == 0 {
        fail("tmdb.timeout_secs must be greater than 0".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
