// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-tag set of item ids the user has already voted on.

use std::collections::BTreeSet;

use tagswipe_core::{ItemId, TagswipeError};
use tracing::warn;

/// Voted item ids for one tag, plus the shared-item exemption.
///
/// While an item is exempt, [`has_voted`](Self::has_voted) reports `false`
/// for it even though it stays in the set. This is what lets an already-voted
/// deep-linked item be shown once more.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteLedger {
    voted: BTreeSet<ItemId>,
    exempt: Option<ItemId>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from already-known ids.
    pub fn from_ids(ids: impl IntoIterator<Item = ItemId>) -> Self {
        Self {
            voted: ids.into_iter().collect(),
            exempt: None,
        }
    }

    /// Whether `id` counts as voted for dedup purposes.
    pub fn has_voted(&self, id: ItemId) -> bool {
        self.exempt != Some(id) && self.voted.contains(&id)
    }

    /// Raw membership, ignoring the exemption.
    pub fn contains(&self, id: ItemId) -> bool {
        self.voted.contains(&id)
    }

    /// Record a vote. Returns `false` if the id was already present.
    pub fn record(&mut self, id: ItemId) -> bool {
        self.voted.insert(id)
    }

    /// Forget every vote and any exemption.
    pub fn clear(&mut self) {
        self.voted.clear();
        self.exempt = None;
    }

    pub fn exempt(&mut self, id: ItemId) {
        self.exempt = Some(id);
    }

    pub fn lift_exemption(&mut self) {
        self.exempt = None;
    }

    pub fn exempted(&self) -> Option<ItemId> {
        self.exempt
    }

    pub fn len(&self) -> usize {
        self.voted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voted.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.voted.iter().copied()
    }

    /// Serialize the voted set as a JSON array of ids. The exemption is
    /// session-only and never persisted.
    pub fn encode(&self) -> Result<String, TagswipeError> {
        serde_json::to_string(&self.voted)
            .map_err(|e| TagswipeError::Internal(format!("failed to encode vote ledger: {e}")))
    }

    /// Parse a persisted ledger. Absent or corrupt values yield an empty ledger.
    pub fn decode(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::new();
        };
        match serde_json::from_str::<BTreeSet<ItemId>>(raw) {
            Ok(voted) => Self {
                voted,
                exempt: None,
            },
            Err(e) => {
                warn!(error = %e, "discarding corrupt vote ledger");
                Self::new()
            }
        }
    }
}
