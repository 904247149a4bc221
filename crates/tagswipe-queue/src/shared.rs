// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deep-linked ("shared") item resolution.
//!
//! A session may be opened with one target item id. The resolver tracks that
//! target through a small state machine:
//!
//! ```text
//! Unresolved --fetch--> AwaitingFetch --seen in page--> Injected --vote--> Voted
//!      |                      |                            |
//!      +----------------------+------ pass / exhausted ----+--skip--> Skipped
//! ```
//!
//! `Voted` and `Skipped` are terminal. Once terminal the resolver no longer
//! affects merge order and normal dedup applies to the target again.

use tagswipe_core::{CandidateItem, ItemId};
use tracing::debug;

use crate::ledger::VoteLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedPhase {
    /// Target supplied, no page requested yet.
    Unresolved,
    /// Pages have been requested but the target has not appeared.
    AwaitingFetch,
    /// Target placed at the front of the backlog.
    Injected,
    Voted,
    Skipped,
}

impl SharedPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SharedPhase::Voted | SharedPhase::Skipped)
    }

    pub fn is_pending(self) -> bool {
        matches!(self, SharedPhase::Unresolved | SharedPhase::AwaitingFetch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SharedTarget {
    id: ItemId,
    phase: SharedPhase,
    was_already_voted: bool,
}

/// Tracks the optional deep-linked item for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedItemResolver {
    target: Option<SharedTarget>,
}

impl SharedItemResolver {
    /// Start tracking `target`. If the ledger already holds it, the item is
    /// flagged as already voted and exempted from dedup until terminal.
    pub fn new(target: Option<ItemId>, ledger: &mut VoteLedger) -> Self {
        let target = target.map(|id| {
            let was_already_voted = ledger.contains(id);
            if was_already_voted {
                ledger.exempt(id);
            }
            debug!(item_id = %id, was_already_voted, "tracking shared item");
            SharedTarget {
                id,
                phase: SharedPhase::Unresolved,
                was_already_voted,
            }
        });
        Self { target }
    }

    pub fn target(&self) -> Option<ItemId> {
        self.target.as_ref().map(|t| t.id)
    }

    pub fn phase(&self) -> Option<SharedPhase> {
        self.target.as_ref().map(|t| t.phase)
    }

    pub fn was_already_voted(&self) -> bool {
        self.target.as_ref().is_some_and(|t| t.was_already_voted)
    }

    /// Target still needs to be located in a fetched page.
    pub fn is_pending(&self) -> bool {
        self.phase().is_some_and(SharedPhase::is_pending)
    }

    pub fn is_terminal(&self) -> bool {
        self.phase().is_some_and(SharedPhase::is_terminal)
    }

    /// `id` is the active shared target.
    pub fn is_active_target(&self, id: ItemId) -> bool {
        self.target
            .as_ref()
            .is_some_and(|t| t.id == id && !t.phase.is_terminal())
    }

    /// `id` is the injected, already-voted target that may be viewed but not re-voted.
    pub fn is_view_only(&self, id: ItemId) -> bool {
        self.target.as_ref().is_some_and(|t| {
            t.id == id && t.was_already_voted && t.phase == SharedPhase::Injected
        })
    }

    pub(crate) fn note_fetch_requested(&mut self) {
        if let Some(t) = self.target.as_mut() {
            if t.phase == SharedPhase::Unresolved {
                t.phase = SharedPhase::AwaitingFetch;
            }
        }
    }

    /// Pull the pending target out of a fetched page, moving it to `Injected`.
    pub(crate) fn take_from(&mut self, items: &mut Vec<CandidateItem>) -> Option<CandidateItem> {
        let t = self.target.as_mut().filter(|t| t.phase.is_pending())?;
        let index = items.iter().position(|item| item.id == t.id)?;
        t.phase = SharedPhase::Injected;
        debug!(item_id = %t.id, "shared item injected");
        Some(items.remove(index))
    }

    /// Transition to `Voted` if `id` is the active target.
    /// Returns `true` when this call made the resolver terminal.
    pub(crate) fn mark_voted(&mut self, id: ItemId, ledger: &mut VoteLedger) -> bool {
        self.finish(id, SharedPhase::Voted, ledger)
    }

    /// Transition to `Skipped` if `id` is the active target.
    pub(crate) fn mark_skipped(&mut self, id: ItemId, ledger: &mut VoteLedger) -> bool {
        self.finish(id, SharedPhase::Skipped, ledger)
    }

    /// Give up on a target that never appeared. Lands in `Skipped`.
    pub(crate) fn abandon(&mut self, ledger: &mut VoteLedger) -> bool {
        let Some(id) = self
            .target
            .as_ref()
            .filter(|t| t.phase.is_pending())
            .map(|t| t.id)
        else {
            return false;
        };
        debug!(item_id = %id, "shared item not found, abandoning");
        self.finish(id, SharedPhase::Skipped, ledger)
    }

    pub(crate) fn clear(&mut self, ledger: &mut VoteLedger) {
        if self.target.take().is_some() {
            ledger.lift_exemption();
        }
    }

    fn finish(&mut self, id: ItemId, phase: SharedPhase, ledger: &mut VoteLedger) -> bool {
        match self.target.as_mut() {
            Some(t) if t.id == id && !t.phase.is_terminal() => {
                t.phase = phase;
                ledger.lift_exemption();
                debug!(item_id = %id, phase = ?phase, "shared item resolved");
                true
            }
            _ => false,
        }
    }
}
