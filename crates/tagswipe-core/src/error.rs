// SPDX-FileCopyrightText: 2026 Tagswipe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the tagswipe workspace.

use thiserror::Error;

/// The primary error type used across all collaborator traits and queue operations.
///
/// Only genuine failures live here. Conditions the queue treats as ordinary
/// outcomes (a stale pagination cursor, an exhausted source, a duplicate vote
/// submission) are modeled as return values instead.
#[derive(Debug, Error)]
pub enum TagswipeError {
    /// Configuration errors (invalid TOML, missing API key, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Durable local state or database failure.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The movie source could not be reached or returned an unusable response.
    #[error("movie source unavailable: {message}")]
    SourceUnavailable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A vote could not be written to the remote vote store.
    #[error("vote write failed: {message}")]
    WriteFailure {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TagswipeError {
    /// Shorthand for a [`TagswipeError::SourceUnavailable`] without an underlying cause.
    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a [`TagswipeError::WriteFailure`] without an underlying cause.
    pub fn write_failure(message: impl Into<String>) -> Self {
        Self::WriteFailure {
            message: message.into(),
            source: None,
        }
    }
}
