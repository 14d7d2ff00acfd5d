// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Deckprep.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Deckprep operations.
///
/// A filename that matches no class grammar is not an error: classifiers
/// return `None` and the batch skips the file.
#[derive(Debug, Error)]
pub enum DeckprepError {
    // -- Input errors --
    #[error("cannot read source directory {}: {source}", .path.display())]
    SourceDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    // -- Output errors --
    #[error("image encoding failed: {0}")]
    Encode(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Configuration --
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DeckprepError>;
