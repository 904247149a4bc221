// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered in-memory backlog of candidate items.

use std::collections::{HashSet, VecDeque};

use tagswipe_core::{CandidateItem, ItemId};

/// Ordered items; the front is the one currently shown. Ids are unique.
#[derive(Debug, Clone, Default)]
pub struct Backlog {
    items: VecDeque<CandidateItem>,
    ids: HashSet<ItemId>,
}

impl Backlog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn front(&self) -> Option<&CandidateItem> {
        self.items.front()
    }

    pub fn pop_front(&mut self) -> Option<CandidateItem> {
        let item = self.items.pop_front()?;
        self.ids.remove(&item.id);
        Some(item)
    }

    /// Insert at the front. Returns `false` (and drops the item) on a duplicate id.
    pub fn push_front(&mut self, item: CandidateItem) -> bool {
        if !self.ids.insert(item.id) {
            return false;
        }
        self.items.push_front(item);
        true
    }

    /// Append at the back. Returns `false` (and drops the item) on a duplicate id.
    pub fn push_back(&mut self, item: CandidateItem) -> bool {
        if !self.ids.insert(item.id) {
            return false;
        }
        self.items.push_back(item);
        true
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    /// Remove the item with `id`, wherever it sits.
    pub fn remove(&mut self, id: ItemId) -> Option<CandidateItem> {
        if !self.ids.remove(&id) {
            return None;
        }
        let index = self.items.iter().position(|item| item.id == id)?;
        self.items.remove(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.ids.clear();
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }
}
