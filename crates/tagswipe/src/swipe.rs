// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tagswipe swipe` command implementation.
//!
//! Runs an interactive card loop over a [`SwipeEngine`]: SQLite for local
//! state and votes, TMDB as the movie source, rustyline for input.

use std::sync::Arc;

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tagswipe_config::TagswipeConfig;
use tagswipe_core::{CandidateItem, ItemId, Tag, TagswipeError, Vote};
use tagswipe_queue::{
    Collaborators, EngineOptions, QueueStatus, SubmitOutcome, SwipeEngine, SwipeEvent,
};
use tagswipe_tmdb::TmdbMovieSource;
use tokio::sync::mpsc;
use tracing::info;

/// A key the user can press at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Vote(Vote),
    Pass,
    SkipShared,
    Reset,
    Stats,
    Help,
    Quit,
}

/// Parse one line of prompt input. Empty input refreshes the card.
pub(crate) fn parse_action(line: &str) -> Option<Action> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(Action::Vote(Vote::Yes)),
        "n" | "no" => Some(Action::Vote(Vote::No)),
        "p" | "pass" => Some(Action::Pass),
        "s" | "skip" => Some(Action::SkipShared),
        "r" | "reset" => Some(Action::Reset),
        "i" | "info" | "stats" => Some(Action::Stats),
        "h" | "?" | "help" => Some(Action::Help),
        "q" | "quit" | "exit" => Some(Action::Quit),
        _ => None,
    }
}

/// Whether the loop keeps going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

/// Run the `tagswipe swipe` interactive session.
pub async fn run_swipe(
    config: TagswipeConfig,
    tag: String,
    share: Option<u64>,
) -> Result<(), TagswipeError> {
    let (db, local, votes) = tagswipe_storage::open_from_config(&config.storage).await?;

    let source = TmdbMovieSource::new(&config.tmdb).inspect_err(|_| {
        eprintln!(
            "error: TMDB API key required. Set via: config (tmdb.api_key), TMDB_API_KEY or TAGSWIPE_TMDB_API_KEY env var"
        );
    })?;

    let collaborators = Collaborators {
        source: Arc::new(source),
        votes: Arc::new(votes),
        local: Arc::new(local),
    };
    let (mut engine, mut events) = SwipeEngine::open(
        Tag::new(tag),
        share.map(ItemId),
        collaborators,
        EngineOptions::from(&config.queue),
    )
    .await?;

    let mut rl = DefaultEditor::new()
        .map_err(|e| TagswipeError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", format!("tagswipe: is it {}?", engine.tag()).bold().green());
    print_help();

    let prompt = format!("{}> ", engine.tag().as_str().green());
    loop {
        if let Err(e) = engine.refill().await {
            eprintln!("{}: {e}", "error".red());
        }
        print_events(&mut events);
        print_status(&engine);

        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line.as_str());

        let Some(action) = parse_action(&line) else {
            println!("unknown key {:?}, {} for help", line.trim(), "h".yellow());
            continue;
        };
        match handle(&mut engine, action).await {
            Ok((Flow::Quit, _)) => break,
            Ok((Flow::Continue, Some(message))) => println!("{message}"),
            Ok((Flow::Continue, None)) => {}
            Err(e) => eprintln!("{}: {e}", "error".red()),
        }
    }

    if engine.pending_writes() > 0 {
        println!("sending {} pending vote(s)...", engine.pending_writes());
    }
    engine.settle_writes().await;
    print_events(&mut events);
    info!(tag = %engine.tag(), "swipe session ended");
    db.close().await
}

/// Apply one action to the engine. Returns an optional message for the user.
pub(crate) async fn handle(
    engine: &mut SwipeEngine,
    action: Action,
) -> Result<(Flow, Option<String>), TagswipeError> {
    let message = match action {
        Action::Quit => return Ok((Flow::Quit, None)),
        Action::Help => {
            print_help();
            None
        }
        Action::Vote(vote) => {
            let Some(id) = engine.current().map(|item| item.id) else {
                return Ok((Flow::Continue, Some("nothing to vote on".into())));
            };
            match engine.submit_vote(id, vote).await? {
                SubmitOutcome::Accepted { .. } => None,
                SubmitOutcome::ViewOnly => {
                    Some("you already voted on this one, press s to move on".into())
                }
                SubmitOutcome::Duplicate => Some("already voted".into()),
                SubmitOutcome::NotQueued => Some("that movie is no longer queued".into()),
            }
        }
        Action::Pass => match engine.pass().item {
            Some(item) => Some(format!("passed on {}", item.title)),
            None => Some("nothing to pass".into()),
        },
        Action::SkipShared => {
            if engine.skip_shared() {
                None
            } else {
                Some("only a shared movie you already voted on can be skipped".into())
            }
        }
        Action::Reset => {
            if engine.status() != QueueStatus::Exhausted {
                return Ok((
                    Flow::Continue,
                    Some("reset is available once you run out of movies".into()),
                ));
            }
            engine.reset().await?;
            Some(format!("starting {} over", engine.tag()))
        }
        Action::Stats => match engine.current().map(|item| item.id) {
            Some(id) => {
                let stats = engine.stats(id).await?;
                Some(crate::commands::format_stats(engine.tag(), id, &stats))
            }
            None => Some("no movie on screen".into()),
        },
    };
    Ok((Flow::Continue, message))
}

fn print_help() {
    println!(
        "{} yes  {} no  {} pass  {} skip shared  {} stats  {} reset  {} quit\n",
        "y".yellow(),
        "n".yellow(),
        "p".yellow(),
        "s".yellow(),
        "i".yellow(),
        "r".yellow(),
        "q".yellow()
    );
}

fn print_status(engine: &SwipeEngine) {
    match engine.status() {
        QueueStatus::Ready => {
            if let Some(item) = engine.current() {
                println!("{}", render_card(item, engine.current_is_view_only()));
            }
        }
        QueueStatus::Loading => println!("{}", "waiting for movies, press enter to retry".dimmed()),
        QueueStatus::Exhausted => println!(
            "no more movies for {}. press {} to start over or {} to quit",
            engine.tag().as_str().bold(),
            "r".yellow(),
            "q".yellow()
        ),
    }
}

fn print_events(events: &mut mpsc::UnboundedReceiver<SwipeEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            SwipeEvent::WriteFailed { item_id, message } => {
                eprintln!("{}: vote for {item_id} not saved remotely: {message}", "warning".yellow());
            }
            SwipeEvent::SourceUnavailable { message } => {
                eprintln!("{}: could not load movies: {message}", "warning".yellow());
            }
            SwipeEvent::StaleCursorRecovered { tag } => {
                println!("{}", format!("results for {tag} changed, starting from page 1").dimmed());
            }
            SwipeEvent::DeepLinkResolved { .. } | SwipeEvent::Exhausted { .. } => {}
        }
    }
}

/// Text for one movie card.
pub(crate) fn render_card(item: &CandidateItem, view_only: bool) -> String {
    let mut lines = Vec::new();
    let heading = match item.release_year() {
        Some(year) => format!("{} ({year})", item.title.bold()),
        None => item.title.bold().to_string(),
    };
    lines.push(heading);
    if !item.overview.is_empty() {
        lines.push(item.overview.clone());
    }
    if let Some(poster) = &item.poster_url {
        lines.push(format!("poster: {poster}"));
    }
    if let Some(imdb) = item.imdb_url() {
        lines.push(format!("imdb:   {imdb}"));
    }
    if view_only {
        lines.push(format!(
            "{}",
            "you already voted on this shared movie, press s to continue".cyan()
        ));
    }
    lines.join("\n")
}
