// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted pagination cursor for one tag.

use tracing::debug;

/// The next 1-based page to request from the movie source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationCursor {
    page: u32,
}

impl Default for PaginationCursor {
    fn default() -> Self {
        Self { page: 1 }
    }
}

impl PaginationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor positioned at `page`, clamped to at least 1.
    pub fn at(page: u32) -> Self {
        Self { page: page.max(1) }
    }

    pub fn next_page(&self) -> u32 {
        self.page
    }

    pub fn advance(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// The source reports fewer pages than the cursor points at.
    ///
    /// Page 1 is never stale: a source with zero pages is simply empty.
    pub fn is_stale(&self, total_pages: u32) -> bool {
        self.page > 1 && total_pages < self.page
    }

    /// The cursor sits on (or past) the last page the source reports.
    pub fn is_last_page(&self, total_pages: u32) -> bool {
        self.page >= total_pages
    }

    pub fn encode(&self) -> String {
        self.page.to_string()
    }

    /// Parse a persisted page. Absent, corrupt, or zero values decode to page 1.
    pub fn decode(raw: Option<&str>) -> Self {
        match raw.map(|r| r.trim().parse::<u32>()) {
            Some(Ok(page)) if page >= 1 => Self { page },
            Some(Ok(_)) | Some(Err(_)) => {
                debug!(raw = ?raw, "invalid persisted page, starting at page 1");
                Self::new()
            }
            None => Self::new(),
        }
    }
}
