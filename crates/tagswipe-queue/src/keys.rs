// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable key layout in [`LocalState`](tagswipe_core::LocalState).

use tagswipe_core::Tag;

/// Device-wide session id, shared by every tag.
pub const SESSION_ID_KEY: &str = "tag_vote_session_id";

/// JSON array of item ids already voted on under `tag`.
pub fn voted_key(tag: &Tag) -> String {
    format!("voted_movies_{tag}")
}

/// Decimal page number of the next page to request for `tag`.
pub fn page_key(tag: &Tag) -> String {
    format!("tag_page_{tag}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_by_tag() {
        let tag = Tag::new("christmas");
        assert_eq!(voted_key(&tag), "voted_movies_christmas");
        assert_eq!(page_key(&tag), "tag_page_christmas");
    }
}
