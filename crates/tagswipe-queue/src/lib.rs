// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tag-voting swipe queue.
//!
//! Presents a server-paginated backlog of movies one at a time for a yes/no
//! vote on a tag. The synchronous pieces ([`QueueController`],
//! [`VoteCoordinator`], [`VoteLedger`], [`PaginationCursor`],
//! [`SharedItemResolver`]) operate on one [`SessionState`] value; the
//! [`SwipeEngine`] wraps them with the async collaborators and persistence.

pub mod backlog;
pub mod controller;
pub mod coordinator;
pub mod cursor;
pub mod engine;
pub mod keys;
pub mod ledger;
pub mod session;
pub mod shared;

pub use backlog::Backlog;
pub use controller::{
    DEFAULT_LOW_WATER_MARK, FetchTicket, IngestOutcome, QueueController, QueueStatus,
};
pub use coordinator::{PassOutcome, SubmitOutcome, VoteCoordinator};
pub use cursor::PaginationCursor;
pub use engine::{Collaborators, EngineOptions, SwipeEngine, SwipeEvent};
pub use ledger::VoteLedger;
pub use session::{SessionState, SourceState};
pub use shared::{SharedItemResolver, SharedPhase};
