// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vote submission: guards, optimistic local update, remote write payload.

use tagswipe_core::{CandidateItem, ItemId, Vote, VoteWrite};
use tracing::debug;

use crate::session::SessionState;

/// Result of [`VoteCoordinator::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Recorded locally. The caller sends `write` to the vote store.
    Accepted {
        write: VoteWrite,
        /// The vote made the shared item terminal.
        shared_resolved: bool,
    },
    /// Already voted; nothing changed.
    Duplicate,
    /// The already-voted shared item can only be skipped.
    ViewOnly,
    /// The item is not in the backlog.
    NotQueued,
}

/// Result of [`VoteCoordinator::pass`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    /// The item removed from the front, if any.
    pub item: Option<CandidateItem>,
    pub shared_resolved: bool,
}

/// Applies user votes and skips to a [`SessionState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct VoteCoordinator;

impl VoteCoordinator {
    pub fn new() -> Self {
        Self
    }

    /// Commit a vote on `item_id` under the session's tag.
    ///
    /// The local update is final; a later remote failure is never rolled back.
    pub fn submit(&self, s: &mut SessionState, item_id: ItemId, vote: Vote) -> SubmitOutcome {
        if s.shared.is_view_only(item_id) {
            debug!(item_id = %item_id, "rejecting vote on view-only shared item");
            return SubmitOutcome::ViewOnly;
        }
        if s.ledger.has_voted(item_id) {
            debug!(item_id = %item_id, "duplicate vote ignored");
            return SubmitOutcome::Duplicate;
        }
        if !s.backlog.contains(item_id) {
            return SubmitOutcome::NotQueued;
        }

        s.ledger.record(item_id);
        let shared_resolved = s.shared.mark_voted(item_id, &mut s.ledger);
        s.backlog.remove(item_id);
        debug!(tag = %s.tag, item_id = %item_id, vote = %vote, "vote recorded");

        SubmitOutcome::Accepted {
            write: VoteWrite {
                tag: s.tag.clone(),
                item_id,
                vote,
                session_id: s.session_id.clone(),
            },
            shared_resolved,
        }
    }

    /// Move past the current item when it is the view-only shared item.
    /// Returns `false` in any other situation.
    pub fn skip_shared(&self, s: &mut SessionState) -> bool {
        let Some(id) = s.backlog.front().map(|item| item.id) else {
            return false;
        };
        if !s.shared.is_view_only(id) {
            return false;
        }
        s.backlog.remove(id);
        s.passed.insert(id);
        s.shared.mark_skipped(id, &mut s.ledger)
    }

    /// Skip the current item without voting and ask for a supplemental page
    /// under a new salt. The rest of the backlog is kept.
    pub fn pass(&self, s: &mut SessionState) -> PassOutcome {
        let item = s.backlog.pop_front();
        let shared_resolved = match &item {
            Some(item) => {
                s.passed.insert(item.id);
                s.shared.mark_skipped(item.id, &mut s.ledger)
            }
            // Nothing on screen: stop waiting for a shared item that has not shown up.
            None => s.shared.abandon(&mut s.ledger),
        };
        s.salt = s.salt.wrapping_add(1);
        s.supplement_requested = true;
        debug!(
            tag = %s.tag,
            item_id = ?item.as_ref().map(|i| i.id),
            salt = s.salt,
            "item passed"
        );
        PassOutcome {
            item,
            shared_resolved,
        }
    }
}
