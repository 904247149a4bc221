// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Async swipe engine: owns one [`SessionState`] plus the collaborators.
//!
//! Every operation that changes durable state awaits the local write before
//! returning. Remote vote writes are spawned and never awaited on the swipe
//! path; [`SwipeEngine::settle_writes`] drains them.
//!
//! Operations do not fetch on their own. Hosts call [`SwipeEngine::refill`]
//! (or drive [`SwipeEngine::begin_fetch`] / [`SwipeEngine::complete_fetch`]
//! themselves) before reading the current item.

use std::sync::Arc;

use tagswipe_config::model::QueueConfig;
use tagswipe_core::{
    CandidateItem, ItemId, LocalState, MoviePage, MovieSource, SessionId, Tag, TagswipeError,
    Vote, VoteStats, VoteStore,
};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::controller::{FetchTicket, IngestOutcome, QueueController, QueueStatus};
use crate::coordinator::{PassOutcome, SubmitOutcome, VoteCoordinator};
use crate::cursor::PaginationCursor;
use crate::keys;
use crate::ledger::VoteLedger;
use crate::session::SessionState;

/// Notifications for the host, delivered on the channel returned by
/// [`SwipeEngine::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwipeEvent {
    /// The shared item reached a terminal state; the host should drop the deep link.
    DeepLinkResolved { item_id: ItemId },
    /// A remote vote write failed. The local vote stands.
    WriteFailed { item_id: ItemId, message: String },
    /// The source has nothing new for this tag.
    Exhausted { tag: Tag },
    /// A fetch failed; the backlog is unchanged and the next refill retries.
    SourceUnavailable { message: String },
    /// The stored page no longer exists; pagination restarted at page 1.
    StaleCursorRecovered { tag: Tag },
}

/// Tunables for a [`SwipeEngine`].
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    pub low_water_mark: usize,
    /// Upper bound on pages fetched by one [`SwipeEngine::refill`] call.
    pub max_pages_per_refill: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from(&QueueConfig::default())
    }
}

impl From<&QueueConfig> for EngineOptions {
    fn from(config: &QueueConfig) -> Self {
        Self {
            low_water_mark: config.low_water_mark,
            max_pages_per_refill: config.max_pages_per_refill,
        }
    }
}

/// The collaborators an engine talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub source: Arc<dyn MovieSource>,
    pub votes: Arc<dyn VoteStore>,
    pub local: Arc<dyn LocalState>,
}

/// One swipe session for one tag.
pub struct SwipeEngine {
    state: SessionState,
    controller: QueueController,
    coordinator: VoteCoordinator,
    collaborators: Collaborators,
    options: EngineOptions,
    events: mpsc::UnboundedSender<SwipeEvent>,
    writes: JoinSet<()>,
}

impl SwipeEngine {
    /// Load durable state for `tag` and start a session.
    ///
    /// `deep_link` is the optional shared item to show first.
    pub async fn open(
        tag: Tag,
        deep_link: Option<ItemId>,
        collaborators: Collaborators,
        options: EngineOptions,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SwipeEvent>), TagswipeError> {
        let local = &collaborators.local;
        let session_id = load_session_id(local.as_ref()).await?;
        let ledger = VoteLedger::decode(local.get(&keys::voted_key(&tag)).await?.as_deref());
        let cursor = PaginationCursor::decode(local.get(&keys::page_key(&tag)).await?.as_deref());

        info!(
            tag = %tag,
            session_id = %session_id,
            voted = ledger.len(),
            page = cursor.next_page(),
            shared = ?deep_link,
            "swipe session opened"
        );

        let state = SessionState::new(tag, session_id, ledger, cursor, deep_link);
        let (events, rx) = mpsc::unbounded_channel();
        let engine = Self {
            state,
            controller: QueueController::new(options.low_water_mark),
            coordinator: VoteCoordinator::new(),
            collaborators,
            options,
            events,
            writes: JoinSet::new(),
        };
        Ok((engine, rx))
    }

    pub fn tag(&self) -> &Tag {
        self.state.tag()
    }

    pub fn session_id(&self) -> &SessionId {
        self.state.session_id()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current(&self) -> Option<&CandidateItem> {
        self.controller.current(&self.state)
    }

    /// The current item is the already-voted shared item.
    pub fn current_is_view_only(&self) -> bool {
        self.current()
            .is_some_and(|item| self.state.shared().is_view_only(item.id))
    }

    pub fn status(&self) -> QueueStatus {
        self.controller.status(&self.state)
    }

    pub fn has_voted(&self, id: ItemId) -> bool {
        self.state.ledger().has_voted(id)
    }

    /// Fetch pages until the backlog is above the low-water mark, the shared
    /// item is found, the source is exhausted, or the per-call page budget runs out.
    ///
    /// Source failures are reported as [`SwipeEvent::SourceUnavailable`] and
    /// end the call without error. Local-state failures are returned.
    pub async fn refill(&mut self) -> Result<(), TagswipeError> {
        let mut budget = self.options.max_pages_per_refill;
        let mut next = self.begin_fetch();
        while let Some(ticket) = next {
            if budget == 0 {
                self.controller.fail_fetch(&mut self.state, &ticket);
                debug!(tag = %ticket.tag, "refill page budget spent");
                break;
            }
            budget -= 1;

            let result = self
                .collaborators
                .source
                .fetch_page(&ticket.tag, ticket.page, ticket.salt)
                .await;
            let page = match result {
                Ok(page) => page,
                Err(e) => {
                    self.fail_fetch(&ticket, &e);
                    return Ok(());
                }
            };

            next = match self.complete_fetch(&ticket, page).await? {
                IngestOutcome::StaleCursor { retry } => Some(retry),
                IngestOutcome::Exhausted { .. } | IngestOutcome::Discarded => None,
                IngestOutcome::Ingested { .. } => self.begin_fetch(),
            };
        }
        Ok(())
    }

    /// Issue a fetch ticket if a refill is due and none is outstanding.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        self.controller.begin_fetch(&mut self.state)
    }

    /// Merge a fetched page and persist the cursor.
    pub async fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        page: MoviePage,
    ) -> Result<IngestOutcome, TagswipeError> {
        let outcome = self.controller.ingest(&mut self.state, ticket, page);
        match &outcome {
            IngestOutcome::Discarded => return Ok(outcome),
            IngestOutcome::Ingested { .. } => {}
            IngestOutcome::StaleCursor { .. } => {
                self.emit(SwipeEvent::StaleCursorRecovered {
                    tag: self.state.tag().clone(),
                });
            }
            IngestOutcome::Exhausted { abandoned_shared } => {
                if *abandoned_shared {
                    self.emit_shared_resolved();
                }
                self.emit(SwipeEvent::Exhausted {
                    tag: self.state.tag().clone(),
                });
            }
        }
        if let Err(e) = self.persist_cursor().await {
            // The retry ticket never reaches the caller.
            if let IngestOutcome::StaleCursor { retry } = &outcome {
                self.controller.fail_fetch(&mut self.state, retry);
            }
            return Err(e);
        }
        Ok(outcome)
    }

    /// Release a ticket whose fetch failed and report it.
    pub fn fail_fetch(&mut self, ticket: &FetchTicket, error: &TagswipeError) {
        warn!(tag = %ticket.tag, page = ticket.page, error = %error, "movie source fetch failed");
        self.controller.fail_fetch(&mut self.state, ticket);
        self.emit(SwipeEvent::SourceUnavailable {
            message: error.to_string(),
        });
    }

    /// Vote on `item_id`. The ledger is persisted before this returns; the
    /// remote write runs in the background.
    ///
    /// A failed ledger write is returned as an error, but the vote still
    /// stands in memory and the remote write is still sent. The next
    /// successful ledger write persists it.
    pub async fn submit_vote(
        &mut self,
        item_id: ItemId,
        vote: Vote,
    ) -> Result<SubmitOutcome, TagswipeError> {
        let outcome = self.coordinator.submit(&mut self.state, item_id, vote);
        let mut persisted = Ok(());
        if let SubmitOutcome::Accepted {
            write,
            shared_resolved,
        } = &outcome
        {
            persisted = self.persist_ledger().await;
            if *shared_resolved {
                self.emit_shared_resolved();
            }

            let votes = Arc::clone(&self.collaborators.votes);
            let events = self.events.clone();
            let write = write.clone();
            self.writes.spawn(async move {
                if let Err(e) = votes.write_vote(&write).await {
                    warn!(
                        tag = %write.tag,
                        item_id = %write.item_id,
                        error = %e,
                        "remote vote write failed"
                    );
                    let _ = events.send(SwipeEvent::WriteFailed {
                        item_id: write.item_id,
                        message: e.to_string(),
                    });
                }
            });
        }
        if let Err(e) = persisted {
            warn!(
                tag = %self.state.tag(),
                item_id = %item_id,
                error = %e,
                "failed to persist vote ledger"
            );
            return Err(e);
        }
        Ok(outcome)
    }

    /// Move past the view-only shared item. Returns `false` if the current
    /// item is not the view-only shared item.
    pub fn skip_shared(&mut self) -> bool {
        let skipped = self.coordinator.skip_shared(&mut self.state);
        if skipped {
            self.emit_shared_resolved();
        }
        skipped
    }

    /// Skip the current item without voting.
    pub fn pass(&mut self) -> PassOutcome {
        let outcome = self.coordinator.pass(&mut self.state);
        if outcome.shared_resolved {
            self.emit_shared_resolved();
        }
        outcome
    }

    /// Clear votes and pagination for this tag and start over.
    pub async fn reset(&mut self) -> Result<(), TagswipeError> {
        self.controller.reset(&mut self.state);
        let tag = self.state.tag().clone();
        self.collaborators
            .local
            .remove(&keys::voted_key(&tag))
            .await?;
        self.collaborators.local.remove(&keys::page_key(&tag)).await?;
        Ok(())
    }

    pub async fn stats(&self, item_id: ItemId) -> Result<VoteStats, TagswipeError> {
        self.collaborators
            .votes
            .read_stats(self.state.tag(), item_id)
            .await
    }

    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Wait for every spawned remote write to finish.
    pub async fn settle_writes(&mut self) {
        while let Some(result) = self.writes.join_next().await {
            if let Err(e) = result {
                warn!(error = %e, "vote write task did not complete");
            }
        }
    }

    async fn persist_ledger(&self) -> Result<(), TagswipeError> {
        let encoded = self.state.ledger().encode()?;
        self.collaborators
            .local
            .set(&keys::voted_key(self.state.tag()), &encoded)
            .await
    }

    async fn persist_cursor(&self) -> Result<(), TagswipeError> {
        self.collaborators
            .local
            .set(
                &keys::page_key(self.state.tag()),
                &self.state.cursor().encode(),
            )
            .await
    }

    fn emit_shared_resolved(&self) {
        if let Some(item_id) = self.state.shared().target() {
            self.emit(SwipeEvent::DeepLinkResolved { item_id });
        }
    }

    fn emit(&self, event: SwipeEvent) {
        // A host that dropped the receiver is not interested in events.
        let _ = self.events.send(event);
    }
}

async fn load_session_id(local: &dyn LocalState) -> Result<SessionId, TagswipeError> {
    if let Some(existing) = local.get(keys::SESSION_ID_KEY).await? {
        if !existing.trim().is_empty() {
            return Ok(SessionId(existing));
        }
    }
    let session_id = SessionId::generate();
    local.set(keys::SESSION_ID_KEY, session_id.as_str()).await?;
    debug!(session_id = %session_id, "generated new session id");
    Ok(session_id)
}
