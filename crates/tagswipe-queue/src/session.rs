// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The single mutable value a swipe session operates on.

use std::collections::HashSet;

use tagswipe_core::{ItemId, SessionId, Tag};

use crate::backlog::Backlog;
use crate::cursor::PaginationCursor;
use crate::ledger::VoteLedger;
use crate::shared::SharedItemResolver;

/// Whether the movie source can still produce new items for this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    Open,
    /// Last page consumed without new items. Only a reset reopens it.
    Exhausted,
}

/// Everything one swipe session knows about one tag.
///
/// [`QueueController`](crate::QueueController) and
/// [`VoteCoordinator`](crate::VoteCoordinator) mutate it through `&mut`.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub(crate) tag: Tag,
    pub(crate) session_id: SessionId,
    pub(crate) backlog: Backlog,
    pub(crate) ledger: VoteLedger,
    pub(crate) cursor: PaginationCursor,
    pub(crate) shared: SharedItemResolver,
    pub(crate) source: SourceState,
    /// Opaque shuffle hint passed to the movie source.
    pub(crate) salt: u64,
    /// Bumped on reset; fetch tickets from older generations are discarded.
    pub(crate) generation: u64,
    pub(crate) fetch_in_flight: bool,
    /// A pass asked for one fetch regardless of the low-water mark.
    pub(crate) supplement_requested: bool,
    /// Items passed this session. Never persisted.
    pub(crate) passed: HashSet<ItemId>,
}

impl SessionState {
    /// Build a session from loaded durable state.
    pub fn new(
        tag: Tag,
        session_id: SessionId,
        mut ledger: VoteLedger,
        cursor: PaginationCursor,
        shared_target: Option<ItemId>,
    ) -> Self {
        let shared = SharedItemResolver::new(shared_target, &mut ledger);
        Self {
            tag,
            session_id,
            backlog: Backlog::new(),
            ledger,
            cursor,
            shared,
            source: SourceState::Open,
            salt: 0,
            generation: 0,
            fetch_in_flight: false,
            supplement_requested: false,
            passed: HashSet::new(),
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn backlog(&self) -> &Backlog {
        &self.backlog
    }

    pub fn ledger(&self) -> &VoteLedger {
        &self.ledger
    }

    pub fn cursor(&self) -> &PaginationCursor {
        &self.cursor
    }

    pub fn shared(&self) -> &SharedItemResolver {
        &self.shared
    }

    pub fn source_state(&self) -> SourceState {
        self.source
    }

    pub fn is_exhausted(&self) -> bool {
        self.source == SourceState::Exhausted
    }

    pub fn salt(&self) -> u64 {
        self.salt
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fetch_in_flight(&self) -> bool {
        self.fetch_in_flight
    }

    pub fn was_passed(&self, id: ItemId) -> bool {
        self.passed.contains(&id)
    }
}
