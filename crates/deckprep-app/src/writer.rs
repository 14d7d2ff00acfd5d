// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Class writer: persists variants as `<root>/<label>/<label>_NN.jpg`.

use std::path::{Path, PathBuf};

use deckprep_core::error::Result;
use deckprep_core::{ClassLabel, PipelineConfig};
use deckprep_image::Variant;
use deckprep_image::image::processor::encode_jpeg;
use tracing::{debug, instrument};

use crate::report::{WrittenFile, hash_bytes};

/// Writes at most `cap` variants per class as JPEG at a fixed quality.
#[derive(Debug, Clone)]
pub struct ClassWriter {
    root: PathBuf,
    quality: u8,
    cap: usize,
}

impl ClassWriter {
    pub fn new(root: impl Into<PathBuf>, quality: u8, cap: usize) -> Self {
        Self {
            root: root.into(),
            quality,
            cap,
        }
    }

    pub fn from_config(root: impl Into<PathBuf>, config: &PipelineConfig) -> Self {
        Self::new(root, config.jpeg_quality, config.target_per_class)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the files of `label`.
    pub fn class_dir(&self, label: &ClassLabel) -> PathBuf {
        self.root.join(label.as_str())
    }

    /// Encode and write the first `cap` variants, creating the class directory
    /// (and any missing parents) first.
    #[instrument(skip(self, variants), fields(class = %label, available = variants.len()))]
    pub fn write_class(
        &self,
        label: &ClassLabel,
        variants: &[Variant],
    ) -> Result<Vec<WrittenFile>> {
        let dir = self.class_dir(label);
        std::fs::create_dir_all(&dir)?;

        let mut written = Vec::with_capacity(variants.len().min(self.cap));
        for (index, variant) in variants.iter().take(self.cap).enumerate() {
            let file_name = label.variant_file_name(index);
            let bytes = encode_jpeg(&variant.image, self.quality)?;
            std::fs::write(dir.join(&file_name), &bytes)?;
            debug!(file = %file_name, kind = %variant.kind, "Variant written");

            written.push(WrittenFile {
                path: Path::new(label.as_str()).join(&file_name),
                kind: variant.kind,
                sha256: hash_bytes(&bytes),
            });
        }
        Ok(written)
    }
}
