// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Deckprep.

use serde::{Deserialize, Serialize};

/// The two batch jobs Deckprep knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    /// Transparent species PNGs, suit/rank filenames.
    Species,
    /// Finished card-face JPEGs, `NNN_label` filenames.
    Artwork,
}

impl std::fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Species => write!(f, "species"),
            Self::Artwork => write!(f, "artwork"),
        }
    }
}

/// A training-class identifier such as `hearts_2` or `joker_black`.
///
/// Labels double as output directory names, so construction rejects anything
/// that is not a single plain path component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassLabel(String);

impl ClassLabel {
    /// Validate `raw` as a directory-safe label.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let unsafe_component = raw.is_empty()
            || raw == "."
            || raw == ".."
            || raw.contains(['/', '\\', '\0']);
        if unsafe_component {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the `index`-th persisted variant, e.g. `spades_A_07.jpg`.
    pub fn variant_file_name(&self, index: usize) -> String {
        format!("{}_{:02}.jpg", self.0, index)
    }
}

impl std::fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClassLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Transform descriptor of one augmented variant. Angles are in degrees,
/// counter-clockwise positive; factors are multiplicative (1.0 = unchanged).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VariantKind {
    Identity,
    Rotate { degrees: f32 },
    Brightness { factor: f32 },
    Contrast { factor: f32 },
    RotateBrightness { degrees: f32, factor: f32 },
    RotateContrast { degrees: f32, factor: f32 },
    Sharpen { factor: f32 },
}

impl std::fmt::Display for VariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity => write!(f, "identity"),
            Self::Rotate { degrees } => write!(f, "rotate({degrees:+})"),
            Self::Brightness { factor } => write!(f, "brightness(x{factor})"),
            Self::Contrast { factor } => write!(f, "contrast(x{factor})"),
            Self::RotateBrightness { degrees, factor } => {
                write!(f, "rotate({degrees:+})+brightness(x{factor})")
            }
            Self::RotateContrast { degrees, factor } => {
                write!(f, "rotate({degrees:+})+contrast(x{factor})")
            }
            Self::Sharpen { factor } => write!(f, "sharpen(x{factor})"),
        }
    }
}
