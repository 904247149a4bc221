// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! Every collaborator extends the [`Adapter`] base trait and uses
//! `#[async_trait]` so the queue can hold them as trait objects.

pub mod adapter;
pub mod local_state;
pub mod movie_source;
pub mod vote_store;

pub use adapter::Adapter;
pub use local_state::LocalState;
pub use movie_source::MovieSource;
pub use vote_store::VoteStore;
