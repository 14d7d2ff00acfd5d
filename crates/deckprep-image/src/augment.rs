// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Augmentation: expands one base image into a fixed, ordered sequence of
// variants. The sequence never depends on image content, so reruns over the
// same inputs produce the same files in the same order.

use deckprep_core::{PipelineConfig, VariantKind};
use image::{Rgb, RgbImage};
use tracing::{debug, instrument};

use crate::image::processor::ImageProcessor;

/// Canonical variant order. Earlier entries survive truncation to the
/// per-class cap.
pub const AUGMENTATION_SEQUENCE: [VariantKind; 14] = [
    VariantKind::Identity,
    VariantKind::Rotate { degrees: -12.0 },
    VariantKind::Rotate { degrees: -6.0 },
    VariantKind::Rotate { degrees: 6.0 },
    VariantKind::Rotate { degrees: 12.0 },
    VariantKind::Brightness { factor: 0.85 },
    VariantKind::Brightness { factor: 1.15 },
    VariantKind::Contrast { factor: 0.90 },
    VariantKind::Contrast { factor: 1.10 },
    VariantKind::RotateBrightness {
        degrees: -8.0,
        factor: 1.08,
    },
    VariantKind::RotateContrast {
        degrees: 8.0,
        factor: 1.05,
    },
    VariantKind::Sharpen { factor: 1.3 },
    // Extra small rotations.
    VariantKind::Rotate { degrees: -4.0 },
    VariantKind::Rotate { degrees: 4.0 },
];

/// One augmented copy of a base image.
#[derive(Debug, Clone)]
pub struct Variant {
    pub kind: VariantKind,
    pub image: RgbImage,
}

/// Produces the augmentation sequence for a base image.
///
/// `fill` is used for the corners uncovered by rotation and must match the
/// compositing background so rotated variants show no seams.
#[derive(Debug, Clone, Copy)]
pub struct Augmentor {
    fill: Rgb<u8>,
}

impl Augmentor {
    pub fn new(fill: Rgb<u8>) -> Self {
        Self { fill }
    }

    /// Augmentor whose rotation fill is the pipeline background.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(Rgb(config.background))
    }

    /// Generate every variant of `base`, in canonical order.
    #[instrument(skip_all, fields(width = base.width(), height = base.height()))]
    pub fn augment(&self, base: &RgbImage) -> Vec<Variant> {
        let variants: Vec<Variant> = AUGMENTATION_SEQUENCE
            .iter()
            .map(|&kind| Variant {
                kind,
                image: self.apply(kind, base),
            })
            .collect();
        debug!(count = variants.len(), "Augmentation complete");
        variants
    }

    /// Apply a single transform descriptor to `base`.
    pub fn apply(&self, kind: VariantKind, base: &RgbImage) -> RgbImage {
        let processor = ImageProcessor::from_rgb(base.clone());
        let out = match kind {
            VariantKind::Identity => processor,
            VariantKind::Rotate { degrees } => processor.rotate(degrees, self.fill),
            VariantKind::Brightness { factor } => processor.enhance_brightness(factor),
            VariantKind::Contrast { factor } => processor.enhance_contrast(factor),
            VariantKind::RotateBrightness { degrees, factor } => processor
                .rotate(degrees, self.fill)
                .enhance_brightness(factor),
            VariantKind::RotateContrast { degrees, factor } => processor
                .rotate(degrees, self.fill)
                .enhance_contrast(factor),
            VariantKind::Sharpen { factor } => processor.enhance_sharpness(factor),
        };
        out.into_rgb8()
    }
}

impl Default for Augmentor {
    fn default() -> Self {
        Self::new(Rgb([255, 255, 255]))
    }
}
