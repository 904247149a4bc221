// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for tagswipe integration tests.
//!
//! Provides in-memory collaborators and a harness for fast, deterministic
//! tests without network access.
//!
//! # Components
//!
//! - [`MemoryLocalState`] - shared in-memory key/value state
//! - [`MockMovieSource`] - scripted pages with a call log
//! - [`MockVoteStore`] - records writes, can be told to fail
//! - [`TestHarness`] - wires the mocks into a [`SwipeEngine`](tagswipe_queue::SwipeEngine)

pub mod harness;
pub mod memory_state;
pub mod mock_source;
pub mod mock_votes;

pub use harness::{TestHarness, TestHarnessBuilder, drain_events};
pub use memory_state::MemoryLocalState;
pub use mock_source::{FetchCall, MockMovieSource, movie, movie_page};
pub use mock_votes::MockVoteStore;
