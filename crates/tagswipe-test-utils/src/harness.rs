// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end swipe queue tests.
//!
//! `TestHarness` owns the mock collaborators and opens [`SwipeEngine`]s over
//! them. Engines opened from the same harness share local state, which is how
//! tests simulate a reload.

use std::sync::Arc;

use tagswipe_core::{ItemId, LocalState, MoviePage, Tag, TagswipeError};
use tagswipe_queue::{Collaborators, EngineOptions, SwipeEngine, SwipeEvent};
use tagswipe_storage::{Database, SqliteLocalState};
use tokio::sync::mpsc;

use crate::memory_state::MemoryLocalState;
use crate::mock_source::MockMovieSource;
use crate::mock_votes::MockVoteStore;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    pages: Vec<MoviePage>,
    options: EngineOptions,
    sqlite_state: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            options: EngineOptions::default(),
            sqlite_state: false,
        }
    }

    /// Pages served as pages 1..=n.
    pub fn with_pages(mut self, pages: Vec<MoviePage>) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_low_water_mark(mut self, low_water_mark: usize) -> Self {
        self.options.low_water_mark = low_water_mark;
        self
    }

    pub fn with_max_pages_per_refill(mut self, pages: u32) -> Self {
        self.options.max_pages_per_refill = pages;
        self
    }

    /// Back local state with a SQLite file in a temp directory instead of memory.
    pub fn with_sqlite_state(mut self) -> Self {
        self.sqlite_state = true;
        self
    }

    pub async fn build(self) -> Result<TestHarness, TagswipeError> {
        let memory = MemoryLocalState::new();
        let (local, temp_dir): (Arc<dyn LocalState>, Option<tempfile::TempDir>) =
            if self.sqlite_state {
                let temp_dir = tempfile::TempDir::new()
                    .map_err(|e| TagswipeError::Storage { source: e.into() })?;
                let db_path = temp_dir.path().join("test.db");
                let db = Database::open(&db_path.to_string_lossy()).await?;
                (Arc::new(SqliteLocalState::new(db)), Some(temp_dir))
            } else {
                (Arc::new(memory.clone()), None)
            };

        Ok(TestHarness {
            source: Arc::new(MockMovieSource::with_pages(self.pages)),
            votes: Arc::new(MockVoteStore::new()),
            memory,
            local,
            options: self.options,
            _temp_dir: temp_dir,
        })
    }
}

/// Mock collaborators plus the options engines are opened with.
pub struct TestHarness {
    pub source: Arc<MockMovieSource>,
    pub votes: Arc<MockVoteStore>,
    /// In-memory state; only wired into engines when SQLite state is off.
    pub memory: MemoryLocalState,
    pub local: Arc<dyn LocalState>,
    pub options: EngineOptions,
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            source: self.source.clone(),
            votes: self.votes.clone(),
            local: self.local.clone(),
        }
    }

    /// Open a session for `tag`, optionally deep-linked to `shared`.
    pub async fn open(
        &self,
        tag: &str,
        shared: Option<u64>,
    ) -> Result<(SwipeEngine, mpsc::UnboundedReceiver<SwipeEvent>), TagswipeError> {
        SwipeEngine::open(
            Tag::new(tag),
            shared.map(ItemId),
            self.collaborators(),
            self.options,
        )
        .await
    }

    /// Open a session and run its first refill.
    pub async fn open_loaded(
        &self,
        tag: &str,
        shared: Option<u64>,
    ) -> Result<(SwipeEngine, mpsc::UnboundedReceiver<SwipeEvent>), TagswipeError> {
        let (mut engine, events) = self.open(tag, shared).await?;
        engine.refill().await?;
        Ok((engine, events))
    }
}

/// Drain every event currently buffered on `rx`.
pub fn drain_events(rx: &mut mpsc::UnboundedReceiver<SwipeEvent>) -> Vec<SwipeEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
