// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filename classifiers: map a source file name to a training class label.
// Both grammars are pure string functions; a name that matches neither form
// yields `None` and the batch skips the file.

use std::collections::HashSet;
use std::path::Path;

use tracing::trace;

use crate::config::PipelineConfig;
use crate::types::{ClassLabel, PipelineKind};

/// Card suits recognised by the suit/rank grammar (lower-case).
pub const SUITS: [&str; 4] = ["hearts", "spades", "clubs", "diamonds"];

/// Stem prefix of the coloured-pencil scans, e.g.
/// `COLOURED_PENCIL_001_Hearts_2_Espadin`.
pub const ANNOTATED_PREFIX: &str = "COLOURED_PENCIL_";

/// Maps a file name to a class label.
pub trait Classifier {
    /// Return the label for `file_name`, or `None` if it has no class.
    fn classify(&self, file_name: &str) -> Option<ClassLabel>;
}

/// Build the classifier matching `config.kind`.
pub fn classifier_for(config: &PipelineConfig) -> Box<dyn Classifier> {
    match config.kind {
        PipelineKind::Species => Box::new(SuitRankClassifier),
        PipelineKind::Artwork => Box::new(PrefixLabelClassifier::new(
            config.exclude.iter().cloned(),
        )),
    }
}

/// File name without its final extension.
fn stem(file_name: &str) -> Option<&str> {
    Path::new(file_name).file_stem().and_then(|s| s.to_str())
}

fn is_suit(candidate: &str) -> bool {
    SUITS.contains(&candidate)
}

// -- Grammar A ----------------------------------------------------------------

/// Suit/rank grammar of the species artwork.
///
/// Accepts `Hearts_2_Espadin.png` directly (`hearts_2`) and the annotated
/// `COLOURED_PENCIL_001_Hearts_2_Espadin.png` form (`hearts_2`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SuitRankClassifier;

impl Classifier for SuitRankClassifier {
    fn classify(&self, file_name: &str) -> Option<ClassLabel> {
        let stem = stem(file_name)?;
        let parts: Vec<&str> = stem.split('_').collect();
        let suit = parts[0].to_lowercase();

        if !is_suit(&suit) {
            return classify_annotated(stem, &parts);
        }
        // Rank is taken verbatim: "A", "10", "K".
        let rank = parts.get(1)?;
        trace!(file_name, %suit, rank, "suit/rank name matched");
        ClassLabel::new(format!("{suit}_{rank}"))
    }
}

/// Annotated form: fourth segment is the suit, the rank comes from the fifth.
fn classify_annotated(stem: &str, parts: &[&str]) -> Option<ClassLabel> {
    if !stem.starts_with(ANNOTATED_PREFIX) || parts.len() < 5 {
        return None;
    }
    let suit = parts[3].to_lowercase();
    let rank_part = parts[4];
    // The rank is the first character of the fifth segment, so `10` yields `1`.
    let rank: String = match rank_part.split_once('_') {
        Some((head, _)) => head.to_owned(),
        None => rank_part.chars().take(1).collect(),
    };
    if !is_suit(&suit) {
        return None;
    }
    trace!(stem, %suit, %rank, "annotated name matched");
    ClassLabel::new(format!("{suit}_{rank}"))
}

// -- Grammar B ----------------------------------------------------------------

/// `NNN_label` grammar of the finished card faces, with an exclusion list of
/// promotional assets.
#[derive(Debug, Clone, Default)]
pub struct PrefixLabelClassifier {
    exclude: HashSet<String>,
}

impl PrefixLabelClassifier {
    pub fn new(exclude: impl IntoIterator<Item = String>) -> Self {
        Self {
            exclude: exclude.into_iter().collect(),
        }
    }
}

impl Classifier for PrefixLabelClassifier {
    fn classify(&self, file_name: &str) -> Option<ClassLabel> {
        if self.exclude.contains(file_name) {
            trace!(file_name, "excluded asset");
            return None;
        }
        let (_, label) = stem(file_name)?.split_once('_')?;
        ClassLabel::new(label)
    }
}
