// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration. Every processing parameter is a fixed constant of
// one of the two presets; the value is passed explicitly into the batch.

use serde::{Deserialize, Serialize};

use crate::error::{DeckprepError, Result};
use crate::types::PipelineKind;

/// Square edge length fed to the trainer.
pub const TARGET_SIZE: u32 = 224;

/// Maximum number of variants persisted per class.
pub const TARGET_PER_CLASS: usize = 20;

/// Promotional and card-back assets that never form a class.
pub const ARTWORK_EXCLUDE: [&str; 3] = [
    "055_promo_front.jpg",
    "056_promo_back.jpg",
    "057_card-back.jpg",
];

/// Immutable settings for one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Which filename grammar and preprocessing the run uses.
    pub kind: PipelineKind,
    /// Source file extension, compared case-insensitively, without the dot.
    pub source_extension: String,
    /// Flatten transparency onto `background` before resizing.
    pub composite_background: bool,
    /// Exact square size to resize to, or `None` to keep source dimensions.
    pub target_size: Option<u32>,
    /// Cap on persisted variants per class.
    pub target_per_class: usize,
    /// JPEG quality (1-100).
    pub jpeg_quality: u8,
    /// RGB used both as the compositing canvas and the rotation fill.
    pub background: [u8; 3],
    /// File names excluded from classification.
    pub exclude: Vec<String>,
    /// Default output directory name when none is supplied.
    pub default_output: String,
}

impl PipelineConfig {
    /// Transparent species PNGs: white background, 224x224, quality 92.
    pub fn species() -> Self {
        Self {
            kind: PipelineKind::Species,
            source_extension: "png".into(),
            composite_background: true,
            target_size: Some(TARGET_SIZE),
            target_per_class: TARGET_PER_CLASS,
            jpeg_quality: 92,
            background: [255, 255, 255],
            exclude: Vec::new(),
            default_output: "species_white".into(),
        }
    }

    /// Finished card-face JPEGs: no compositing or resize, quality 90.
    pub fn artwork() -> Self {
        Self {
            kind: PipelineKind::Artwork,
            source_extension: "jpg".into(),
            composite_background: false,
            target_size: None,
            target_per_class: TARGET_PER_CLASS,
            jpeg_quality: 90,
            background: [255, 255, 255],
            exclude: ARTWORK_EXCLUDE.iter().map(|name| (*name).to_owned()).collect(),
            default_output: "training_data".into(),
        }
    }

    /// Preset for the given pipeline kind.
    pub fn for_kind(kind: PipelineKind) -> Self {
        match kind {
            PipelineKind::Species => Self::species(),
            PipelineKind::Artwork => Self::artwork(),
        }
    }

    /// Reject combinations that cannot produce output.
    pub fn validate(&self) -> Result<()> {
        if self.target_size == Some(0) {
            return Err(DeckprepError::InvalidConfig(
                "target size must be at least 1 pixel".into(),
            ));
        }
        if self.target_per_class == 0 {
            return Err(DeckprepError::InvalidConfig(
                "per-class cap must be at least 1".into(),
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(DeckprepError::InvalidConfig(format!(
                "JPEG quality {} is outside 1..=100",
                self.jpeg_quality
            )));
        }
        if self.source_extension.is_empty() {
            return Err(DeckprepError::InvalidConfig(
                "source extension must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Whether `extension` (without the dot) selects a source file.
    pub fn accepts_extension(&self, extension: &str) -> bool {
        extension.eq_ignore_ascii_case(&self.source_extension)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::species()
    }
}
