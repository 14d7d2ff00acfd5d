// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Run report: totals, per-class counts, skipped sources, and a SHA-256
// fingerprint of every written file so two runs can be compared.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use deckprep_core::error::Result;
use deckprep_core::{ClassLabel, PipelineKind, VariantKind};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// One persisted variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrittenFile {
    /// Path relative to the output root, e.g. `hearts_2/hearts_2_00.jpg`.
    pub path: PathBuf,
    /// Transform that produced the file.
    pub kind: VariantKind,
    /// Lowercase hex SHA-256 of the encoded bytes.
    pub sha256: String,
}

/// Outcome of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub pipeline: PipelineKind,
    pub output: PathBuf,
    /// Images written this run, including any later overwritten by a
    /// duplicate class.
    pub total_images: usize,
    /// Files on disk per class after the run.
    pub classes: BTreeMap<ClassLabel, usize>,
    /// Source names that produced no class.
    pub skipped: Vec<String>,
    /// Source names that could not be decoded (only with keep-going).
    pub undecodable: Vec<String>,
    pub files: Vec<WrittenFile>,
}

impl BatchReport {
    pub fn new(pipeline: PipelineKind, output: impl Into<PathBuf>) -> Self {
        Self {
            pipeline,
            output: output.into(),
            total_images: 0,
            classes: BTreeMap::new(),
            skipped: Vec::new(),
            undecodable: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Record the files written for `label`. A label seen before replaces the
    /// earlier entry, matching the overwritten files on disk.
    pub fn record_class(&mut self, label: ClassLabel, written: Vec<WrittenFile>) {
        self.total_images += written.len();
        if let Some(previous) = self.classes.insert(label.clone(), written.len()) {
            warn!(
                class = %label,
                previous,
                "class produced by more than one source; later files overwrite earlier ones"
            );
            self.files
                .retain(|file| !written.iter().any(|new| new.path == file.path));
        }
        self.files.extend(written);
    }

    pub fn record_skip(&mut self, file_name: impl Into<String>) {
        self.skipped.push(file_name.into());
    }

    pub fn record_undecodable(&mut self, file_name: impl Into<String>) {
        self.undecodable.push(file_name.into());
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Run report written");
        Ok(())
    }

    /// Load a report written by an earlier run, if one exists at `path`.
    pub fn read_json(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Report left at `path` by an earlier run. A missing file is `None`; so
    /// is one that cannot be read or is not a report, with a warning.
    pub fn read_previous(path: &Path) -> Option<Self> {
        match Self::read_json(path) {
            Ok(previous) => previous,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Ignoring unreadable previous report");
                None
            }
        }
    }

    /// Compare with any report already at `path`, then replace it with this one.
    pub fn replace_at(&self, path: &Path) -> Result<()> {
        if let Some(previous) = Self::read_previous(path) {
            if self.same_output_as(&previous) {
                info!(path = %path.display(), "Output identical to previous run");
            } else {
                warn!(path = %path.display(), "Output differs from previous run");
            }
        }
        self.write_json(path)
    }

    /// Whether `other` wrote the same file names with the same contents.
    pub fn same_output_as(&self, other: &BatchReport) -> bool {
        self.classes == other.classes && self.files == other.files
    }
}
