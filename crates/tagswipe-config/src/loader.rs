// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./tagswipe.toml` > `~/.config/tagswipe/tagswipe.toml` >
//! `/etc/tagswipe/tagswipe.toml`, with `TAGSWIPE_` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TagswipeConfig;

const SYSTEM_CONFIG: &str = "/etc/tagswipe/tagswipe.toml";
const LOCAL_CONFIG: &str = "tagswipe.toml";

/// Path of the per-user config file, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tagswipe").join(LOCAL_CONFIG))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tagswipe/tagswipe.toml`
/// 3. `~/.config/tagswipe/tagswipe.toml`
/// 4. `./tagswipe.toml`
/// 5. `TAGSWIPE_*` environment variables
pub fn load_config() -> Result<TagswipeConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<TagswipeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TagswipeConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TagswipeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TagswipeConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TagswipeConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment provider mapping `TAGSWIPE_SECTION_KEY` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys such as
/// `low_water_mark` contain underscores themselves.
fn env_provider() -> Env {
    Env::prefixed("TAGSWIPE_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    for section in ["general", "queue", "storage", "tmdb"] {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
