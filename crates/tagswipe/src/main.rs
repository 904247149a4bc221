// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tagswipe - vote on whether movies fit a tag, one card at a time.
//!
//! This is the binary entry point.

mod commands;
mod swipe;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tagswipe_config::TagswipeConfig;
use tracing_subscriber::EnvFilter;

/// Tagswipe - vote on whether movies fit a tag.
#[derive(Parser, Debug)]
#[command(name = "tagswipe", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive swipe session for a tag.
    Swipe {
        /// Tag to vote on, e.g. `christmas`.
        #[arg(long)]
        tag: String,
        /// Movie id from a shared link to show first.
        #[arg(long)]
        share: Option<u64>,
    },
    /// Forget local votes and pagination for a tag.
    Reset {
        #[arg(long)]
        tag: String,
    },
    /// Show aggregate votes for one movie under a tag.
    Stats {
        #[arg(long)]
        tag: String,
        /// Movie id.
        #[arg(long)]
        item: u64,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => tagswipe_config::load_and_validate_path(path),
        None => tagswipe_config::load_and_validate(),
    };
    let config: TagswipeConfig = match loaded {
        Ok(config) => config,
        Err(errors) => {
            tagswipe_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.general.log_level);

    let result = match cli.command {
        Some(Commands::Swipe { tag, share }) => swipe::run_swipe(config, tag, share).await,
        Some(Commands::Reset { tag }) => commands::run_reset(&config, &tag).await,
        Some(Commands::Stats { tag, item }) => commands::run_stats(&config, &tag, item).await,
        None => {
            println!("tagswipe: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tagswipe={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
