// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue controller: backlog access, refill decisions, page merging, reset.
//!
//! The controller is synchronous. It hands out [`FetchTicket`]s describing
//! the page to fetch and merges the result when the caller brings the page
//! back, so the async host decides when and how fetches run.

use std::collections::HashSet;

use tagswipe_core::{CandidateItem, MoviePage, Tag};
use tracing::{debug, info};

use crate::session::{SessionState, SourceState};

/// Default backlog length below which a refill is requested.
pub const DEFAULT_LOW_WATER_MARK: usize = 3;

/// An outstanding page request. At most one exists per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub tag: Tag,
    pub page: u32,
    pub salt: u64,
    pub generation: u64,
    /// Issued after a stale-cursor reset.
    pub retry: bool,
}

/// Result of merging a fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Page merged. `added` counts new backlog entries including an injected shared item.
    Ingested { added: usize, injected_shared: bool },
    /// The source has fewer pages than the cursor expected. The cursor was reset
    /// to page 1 and the retry ticket is now the outstanding fetch.
    StaleCursor { retry: FetchTicket },
    /// Last page consumed with nothing new. `abandoned_shared` is set when a
    /// pending shared item was given up on.
    Exhausted { abandoned_shared: bool },
    /// Ticket predates a reset; nothing changed.
    Discarded,
}

/// What a host should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStatus {
    /// Backlog empty, more pages may arrive.
    Loading,
    Ready,
    /// Backlog empty and the source has nothing new. Only a reset recovers.
    Exhausted,
}

/// Enforces the backlog invariants over a [`SessionState`].
#[derive(Debug, Clone, Copy)]
pub struct QueueController {
    low_water: usize,
}

impl Default for QueueController {
    fn default() -> Self {
        Self::new(DEFAULT_LOW_WATER_MARK)
    }
}

impl QueueController {
    pub fn new(low_water: usize) -> Self {
        Self {
            low_water: low_water.max(1),
        }
    }

    pub fn low_water(&self) -> usize {
        self.low_water
    }

    pub fn current<'a>(&self, s: &'a SessionState) -> Option<&'a CandidateItem> {
        s.backlog.front()
    }

    /// Drop the front item. Advancing past the shared item counts as skipping it.
    pub fn advance(&self, s: &mut SessionState) -> Option<CandidateItem> {
        let item = s.backlog.pop_front()?;
        if s.shared.mark_skipped(item.id, &mut s.ledger) {
            s.passed.insert(item.id);
        }
        Some(item)
    }

    pub fn needs_refill(&self, s: &SessionState) -> bool {
        s.source == SourceState::Open
            && (s.backlog.len() < self.low_water
                || s.shared.is_pending()
                || s.supplement_requested)
    }

    pub fn status(&self, s: &SessionState) -> QueueStatus {
        if !s.backlog.is_empty() {
            QueueStatus::Ready
        } else if s.source == SourceState::Exhausted {
            QueueStatus::Exhausted
        } else {
            QueueStatus::Loading
        }
    }

    /// Issue a ticket for the next page, or `None` if a fetch is already
    /// outstanding or no refill is needed.
    pub fn begin_fetch(&self, s: &mut SessionState) -> Option<FetchTicket> {
        if s.fetch_in_flight || !self.needs_refill(s) {
            return None;
        }
        s.fetch_in_flight = true;
        s.supplement_requested = false;
        s.shared.note_fetch_requested();
        let ticket = FetchTicket {
            tag: s.tag.clone(),
            page: s.cursor.next_page(),
            salt: s.salt,
            generation: s.generation,
            retry: false,
        };
        debug!(tag = %ticket.tag, page = ticket.page, salt = ticket.salt, "fetch ticket issued");
        Some(ticket)
    }

    /// Release a ticket whose fetch failed. The next refill retries the same page.
    pub fn fail_fetch(&self, s: &mut SessionState, ticket: &FetchTicket) {
        if ticket.generation == s.generation {
            s.fetch_in_flight = false;
        }
    }

    /// Merge a fetched page into the backlog.
    pub fn ingest(
        &self,
        s: &mut SessionState,
        ticket: &FetchTicket,
        page: MoviePage,
    ) -> IngestOutcome {
        if ticket.generation != s.generation {
            debug!(
                page = ticket.page,
                ticket_generation = ticket.generation,
                generation = s.generation,
                "discarding page from before reset"
            );
            return IngestOutcome::Discarded;
        }
        s.fetch_in_flight = false;

        if s.cursor.is_stale(page.total_pages) {
            if ticket.retry {
                return self.exhaust(s);
            }
            info!(
                tag = %s.tag,
                page = s.cursor.next_page(),
                total_pages = page.total_pages,
                "pagination cursor is stale, restarting at page 1"
            );
            s.cursor.reset();
            s.fetch_in_flight = true;
            let retry = FetchTicket {
                tag: s.tag.clone(),
                page: s.cursor.next_page(),
                salt: s.salt,
                generation: s.generation,
                retry: true,
            };
            return IngestOutcome::StaleCursor { retry };
        }

        let mut items = page.items;
        let injected = s.shared.take_from(&mut items);
        let injected_shared = injected.is_some();

        let mut seen = HashSet::new();
        if let Some(item) = &injected {
            seen.insert(item.id);
        }
        let fresh: Vec<CandidateItem> = items
            .into_iter()
            .filter(|item| {
                !s.ledger.has_voted(item.id)
                    && !s.backlog.contains(item.id)
                    && !s.passed.contains(&item.id)
                    && seen.insert(item.id)
            })
            .collect();

        let mut added = 0;
        if let Some(item) = injected {
            if s.backlog.push_front(item) {
                added += 1;
            }
        }
        for item in fresh {
            if s.backlog.push_back(item) {
                added += 1;
            }
        }

        let last_page = s.cursor.is_last_page(page.total_pages);
        if !last_page {
            s.cursor.advance();
        }
        debug!(
            tag = %s.tag,
            page = ticket.page,
            total_pages = page.total_pages,
            added,
            injected_shared,
            backlog = s.backlog.len(),
            "page ingested"
        );

        if added == 0 && last_page {
            return self.exhaust(s);
        }
        IngestOutcome::Ingested {
            added,
            injected_shared,
        }
    }

    /// Clear the ledger, cursor, shared item, and backlog, and start over.
    pub fn reset(&self, s: &mut SessionState) {
        s.ledger.clear();
        s.cursor.reset();
        s.shared.clear(&mut s.ledger);
        s.backlog.clear();
        s.passed.clear();
        s.source = SourceState::Open;
        s.salt = s.salt.wrapping_add(1);
        s.generation = s.generation.wrapping_add(1);
        s.fetch_in_flight = false;
        s.supplement_requested = false;
        info!(tag = %s.tag, generation = s.generation, "queue reset");
    }

    fn exhaust(&self, s: &mut SessionState) -> IngestOutcome {
        s.source = SourceState::Exhausted;
        s.supplement_requested = false;
        let abandoned_shared = s.shared.abandon(&mut s.ledger);
        info!(tag = %s.tag, backlog = s.backlog.len(), "movie source exhausted");
        IngestOutcome::Exhausted { abandoned_shared }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::PaginationCursor;
    use crate::ledger::VoteLedger;
    use crate::shared::SharedPhase;
    use tagswipe_core::{ItemId, SessionId};

    fn session(voted: &[u64], page: u32, shared: Option<u64>) -> SessionState {
        SessionState::new(
            Tag::new("heist"),
            SessionId("s".into()),
            VoteLedger::from_ids(voted.iter().copied().map(ItemId)),
            PaginationCursor::at(page),
            shared.map(ItemId),
        )
    }

    fn movie_page(ids: &[u64], total_pages: u32) -> MoviePage {
        MoviePage {
            items: ids
                .iter()
                .map(|&id| CandidateItem::new(id, format!("Movie {id}")))
                .collect(),
            total_pages,
        }
    }

    fn fetch(
        c: &QueueController,
        s: &mut SessionState,
        ids: &[u64],
        total: u32,
    ) -> IngestOutcome {
        let ticket = c.begin_fetch(s).expect("refill should be needed");
        c.ingest(s, &ticket, movie_page(ids, total))
    }

    #[test]
    fn fresh_session_is_loading_and_needs_refill() {
        let c = QueueController::default();
        let s = session(&[], 1, None);
        assert_eq!(c.status(&s), QueueStatus::Loading);
        assert!(c.needs_refill(&s));
        assert!(c.current(&s).is_none());
    }

    #[test]
    fn ingest_filters_voted_and_duplicates() {
        let c = QueueController::default();
        let mut s = session(&[2], 1, None);
        let outcome = fetch(&c, &mut s, &[1, 2, 3, 3, 1], 5);
        assert_eq!(
            outcome,
            IngestOutcome::Ingested {
                added: 2,
                injected_shared: false
            }
        );
        assert_eq!(s.backlog.ids(), vec![ItemId(1), ItemId(3)]);
        assert_eq!(s.cursor.next_page(), 2);
    }

    #[test]
    fn items_already_in_backlog_are_not_appended_again() {
        let c = QueueController::new(10);
        let mut s = session(&[], 1, None);
        fetch(&c, &mut s, &[1, 2], 5);
        fetch(&c, &mut s, &[2, 3], 5);
        assert_eq!(s.backlog.ids(), vec![ItemId(1), ItemId(2), ItemId(3)]);
    }

    #[test]
    fn begin_fetch_coalesces() {
        let c = QueueController::default();
        let mut s = session(&[], 1, None);
        let ticket = c.begin_fetch(&mut s).unwrap();
        assert!(c.begin_fetch(&mut s).is_none());
        c.fail_fetch(&mut s, &ticket);
        let again = c.begin_fetch(&mut s).unwrap();
        assert_eq!(again.page, 1);
    }

    #[test]
    fn no_refill_above_low_water() {
        let c = QueueController::new(2);
        let mut s = session(&[], 1, None);
        fetch(&c, &mut s, &[1, 2, 3], 5);
        assert!(!c.needs_refill(&s));
        assert!(c.begin_fetch(&mut s).is_none());
        c.advance(&mut s);
        c.advance(&mut s);
        assert!(c.needs_refill(&s));
    }

    #[test]
    fn pending_shared_item_forces_refill_and_lands_in_front() {
        let c = QueueController::new(1);
        let mut s = session(&[], 1, Some(50));
        fetch(&c, &mut s, &[1, 2, 3], 5);
        assert_eq!(s.shared.phase(), Some(SharedPhase::AwaitingFetch));
        assert!(c.needs_refill(&s), "pending shared item keeps refill going");

        fetch(&c, &mut s, &[4, 50, 5], 5);
        assert_eq!(c.current(&s).map(|i| i.id), Some(ItemId(50)));
        assert_eq!(s.shared.phase(), Some(SharedPhase::Injected));
        assert!(!c.needs_refill(&s));
    }

    #[test]
    fn empty_non_last_page_advances_cursor() {
        let c = QueueController::default();
        let mut s = session(&[1, 2], 1, None);
        let outcome = fetch(&c, &mut s, &[1, 2], 3);
        assert_eq!(
            outcome,
            IngestOutcome::Ingested {
                added: 0,
                injected_shared: false
            }
        );
        assert_eq!(s.cursor.next_page(), 2);
        assert!(!s.is_exhausted());
    }

    #[test]
    fn empty_last_page_exhausts_and_abandons_shared() {
        let c = QueueController::default();
        let mut s = session(&[], 1, Some(99));
        let outcome = fetch(&c, &mut s, &[], 1);
        assert_eq!(
            outcome,
            IngestOutcome::Exhausted {
                abandoned_shared: true
            }
        );
        assert_eq!(c.status(&s), QueueStatus::Exhausted);
        assert_eq!(s.shared.phase(), Some(SharedPhase::Skipped));
        assert!(c.begin_fetch(&mut s).is_none());
    }

    #[test]
    fn last_page_with_new_items_stays_on_page() {
        let c = QueueController::new(5);
        let mut s = session(&[], 2, None);
        fetch(&c, &mut s, &[1], 2);
        assert_eq!(s.cursor.next_page(), 2);
        assert!(!s.is_exhausted());
        // Refetching the same last page finds nothing new.
        assert!(matches!(
            fetch(&c, &mut s, &[1], 2),
            IngestOutcome::Exhausted { .. }
        ));
        assert_eq!(c.status(&s), QueueStatus::Ready);
    }

    #[test]
    fn stale_cursor_resets_and_retries_once() {
        let c = QueueController::default();
        let mut s = session(&[], 8, None);
        let outcome = fetch(&c, &mut s, &[1, 2], 3);
        let IngestOutcome::StaleCursor { retry } = outcome else {
            panic!("expected stale cursor, got {outcome:?}");
        };
        assert_eq!(retry.page, 1);
        assert!(retry.retry);
        assert!(s.fetch_in_flight());
        assert!(c.begin_fetch(&mut s).is_none());

        let outcome = c.ingest(&mut s, &retry, movie_page(&[1, 2], 3));
        assert!(matches!(outcome, IngestOutcome::Ingested { added: 2, .. }));
        assert_eq!(s.cursor.next_page(), 2);
    }

    #[test]
    fn reset_clears_everything_and_discards_late_pages() {
        let c = QueueController::default();
        let mut s = session(&[10, 11], 4, Some(10));
        let late = c.begin_fetch(&mut s).unwrap();
        c.reset(&mut s);

        assert!(s.ledger.is_empty());
        assert_eq!(s.cursor.next_page(), 1);
        assert_eq!(s.shared.target(), None);
        assert!(s.backlog.is_empty());
        assert_eq!(s.salt(), 1);
        assert!(!s.fetch_in_flight());

        assert_eq!(
            c.ingest(&mut s, &late, movie_page(&[1, 2, 3], 9)),
            IngestOutcome::Discarded
        );
        assert!(s.backlog.is_empty());

        let fresh = c.begin_fetch(&mut s).unwrap();
        assert_eq!(fresh.page, 1);
        assert_eq!(fresh.salt, 1);
    }

    #[test]
    fn advancing_past_shared_item_skips_it() {
        let c = QueueController::default();
        let mut s = session(&[], 1, Some(5));
        fetch(&c, &mut s, &[5, 6], 3);
        let item = c.advance(&mut s).unwrap();
        assert_eq!(item.id, ItemId(5));
        assert_eq!(s.shared.phase(), Some(SharedPhase::Skipped));
        assert!(s.was_passed(ItemId(5)));
    }
}
