// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Deckprep: Core types, pipeline configuration, filename classifiers, and the
// error type shared across all crates.

pub mod classify;
pub mod config;
pub mod error;
pub mod types;

pub use classify::{Classifier, PrefixLabelClassifier, SuitRankClassifier};
pub use config::PipelineConfig;
pub use error::DeckprepError;
pub use types::*;
