// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// deckprep-image: Image processing for the Deckprep training-set builder.
//
// Provides single-image operations (compositing onto a background, exact
// square resize, fill-colour rotation, brightness/contrast/sharpness
// enhancement, JPEG encoding) and the fixed augmentation sequence built on them.

pub mod augment;
pub mod image;

// Re-export the primary structs so callers can use `deckprep_image::Augmentor` etc.
pub use augment::{Augmentor, Variant};
pub use self::image::processor::ImageProcessor;
