// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tagswipe reset` and `tagswipe stats` command implementations.

use colored::Colorize;
use tagswipe_config::TagswipeConfig;
use tagswipe_core::{ItemId, LocalState, Tag, TagswipeError, VoteStats, VoteStore};
use tagswipe_queue::keys;
use tracing::info;

/// Run the `tagswipe reset` command.
///
/// Removes the voted set and the page cursor for `tag`. The device session id
/// and votes already sent to the vote store are kept.
pub async fn run_reset(config: &TagswipeConfig, tag: &str) -> Result<(), TagswipeError> {
    let (db, local, _votes) = tagswipe_storage::open_from_config(&config.storage).await?;
    let tag = Tag::new(tag);
    reset_tag(&local, &tag).await?;
    db.close().await?;

    println!("{} local progress for {}", "cleared".green(), tag.to_string().bold());
    Ok(())
}

pub(crate) async fn reset_tag(local: &dyn LocalState, tag: &Tag) -> Result<(), TagswipeError> {
    local.remove(&keys::voted_key(tag)).await?;
    local.remove(&keys::page_key(tag)).await?;
    info!(tag = %tag, "local tag progress reset");
    Ok(())
}

/// Run the `tagswipe stats` command.
pub async fn run_stats(config: &TagswipeConfig, tag: &str, item: u64) -> Result<(), TagswipeError> {
    let (db, local, votes) = tagswipe_storage::open_from_config(&config.storage).await?;
    let tag = Tag::new(tag);
    let stats = votes.read_stats(&tag, ItemId(item)).await?;

    let mine = match local.get(keys::SESSION_ID_KEY).await? {
        Some(session_id) => Some(votes.count_for_session(&tag, &session_id).await?),
        None => None,
    };
    db.close().await?;

    println!("{}", format_stats(&tag, ItemId(item), &stats));
    if let Some(mine) = mine {
        println!("this device has cast {mine} vote(s) under {tag}");
    }
    Ok(())
}

/// One-line summary of the votes for an item.
pub(crate) fn format_stats(tag: &Tag, item: ItemId, stats: &VoteStats) -> String {
    match stats.yes_percent() {
        Some(pct) => format!(
            "movie {item} as {tag}: {} yes, {} no ({} votes, {pct:.0}% yes)",
            stats.yes,
            stats.no,
            stats.total()
        ),
        None => format!("movie {item} as {tag}: no votes yet"),
    }
}
