// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the collaborator traits and the swipe queue.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A voting tag, e.g. `christmas` ("is this a christmas movie?").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub String);

impl Tag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// External identity of a candidate item (a TMDB movie id).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ItemId)
    }
}

/// Opaque per-device identifier attached to every vote for auditing.
///
/// Generated once and persisted; independent of any user account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a fresh random session id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A movie offered for a yes/no vote. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateItem {
    pub id: ItemId,
    pub title: String,
    /// Fully qualified poster image URL.
    #[serde(default)]
    pub poster_url: Option<String>,
    /// Fully qualified backdrop image URL.
    #[serde(default)]
    pub backdrop_url: Option<String>,
    #[serde(default)]
    pub overview: String,
    /// Release date as reported by the source (`YYYY-MM-DD`).
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
}

impl CandidateItem {
    /// Minimal item with only an id and a title.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: ItemId(id),
            title: title.into(),
            poster_url: None,
            backdrop_url: None,
            overview: String::new(),
            release_date: None,
            imdb_id: None,
        }
    }

    /// Release year parsed from the release date, if present.
    pub fn release_year(&self) -> Option<u16> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse().ok())
    }

    /// IMDb title page for this item, if the source provided an IMDb id.
    pub fn imdb_url(&self) -> Option<String> {
        self.imdb_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| format!("https://www.imdb.com/title/{id}"))
    }
}

/// One page of results from a movie source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoviePage {
    pub items: Vec<CandidateItem>,
    /// Number of pages the source reports for this tag and salt.
    pub total_pages: u32,
}

/// A binary answer to "is this movie `<tag>`?".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Yes,
    No,
}

impl Vote {
    /// The boolean stored by vote stores (`true` means the movie is the tag).
    pub fn is_tag(self) -> bool {
        matches!(self, Vote::Yes)
    }

    pub fn from_is_tag(is_tag: bool) -> Self {
        if is_tag { Vote::Yes } else { Vote::No }
    }
}

/// Payload of a remote vote write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteWrite {
    pub tag: Tag,
    pub item_id: ItemId,
    pub vote: Vote,
    pub session_id: SessionId,
}

/// Aggregated votes for one item under one tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteStats {
    pub yes: u64,
    pub no: u64,
}

impl VoteStats {
    pub fn total(&self) -> u64 {
        self.yes + self.no
    }

    /// Share of yes votes in percent, `None` when nobody has voted.
    pub fn yes_percent(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.yes as f64 / total as f64 * 100.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies which collaborator seam an adapter fills.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    MovieSource,
    VoteStore,
    LocalState,
}
