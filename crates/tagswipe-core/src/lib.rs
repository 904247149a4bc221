// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the tagswipe vote queue.
//!
//! This crate provides the domain types, the error type, and the collaborator
//! traits ([`MovieSource`], [`VoteStore`], [`LocalState`]) that the queue
//! engine is written against. Storage and HTTP implementations live in their
//! own crates.

pub mod error;
pub mod traits;
pub mod types;

pub use error::TagswipeError;
pub use types::{
    AdapterType, CandidateItem, HealthStatus, ItemId, MoviePage, SessionId, Tag, Vote,
    VoteStats, VoteWrite,
};

pub use traits::{Adapter, LocalState, MovieSource, VoteStore};
