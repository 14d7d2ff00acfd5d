// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: background compositing, exact square resize, fill-colour
// rotation, and brightness/contrast/sharpness enhancement. Operates on
// in-memory images using the `image` and `imageproc` crates.

use std::path::Path;

use deckprep_core::error::DeckprepError;
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{self, Interpolation};
use tracing::{debug, instrument};

use super::enhance;

/// Image processing pipeline operating on a single in-memory image.
///
/// All operations are non-destructive: each method consumes `self` and returns a
/// new `ImageProcessor` wrapping the transformed image, enabling method chaining.
/// Every transformation yields an opaque RGB image.
///
/// ```ignore
/// let base = ImageProcessor::open("Hearts_2_Espadin.png")?
///     .composite_on(Rgb([255, 255, 255]))
///     .resize_square(224)
///     .into_rgb8();
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DeckprepError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|err| DeckprepError::Decode {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            color = ?img.color(),
            "Image loaded"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Wrap an RGB buffer.
    pub fn from_rgb(image: RgbImage) -> Self {
        Self {
            image: DynamicImage::ImageRgb8(image),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Consume the processor and return the image as 8-bit RGB.
    pub fn into_rgb8(self) -> RgbImage {
        match self.image {
            DynamicImage::ImageRgb8(rgb) => rgb,
            other => other.to_rgb8(),
        }
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Flatten the image onto an opaque canvas of `background`, blending with
    /// the image's own alpha channel. Images without alpha are only normalised
    /// to RGB.
    #[instrument(skip(self), fields(has_alpha = self.image.color().has_alpha()))]
    pub fn composite_on(self, background: Rgb<u8>) -> Self {
        if !self.image.color().has_alpha() {
            return Self::from_rgb(self.into_rgb8());
        }
        let rgba = self.image.to_rgba8();
        Self::from_rgb(enhance::composite_over(&rgba, background))
    }

    /// Resize the image to exactly `target` x `target`, ignoring aspect ratio.
    /// Uses Lanczos3 filtering for high-quality downscaling.
    #[instrument(skip(self))]
    pub fn resize_square(self, target: u32) -> Self {
        debug!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            target,
            "Resizing image"
        );
        let resized = self
            .image
            .resize_exact(target, target, FilterType::Lanczos3);
        Self::from_rgb(resized.to_rgb8())
    }

    /// Rotate the image by `degrees` (counter-clockwise positive) about its
    /// centre without expanding the canvas. Uncovered corners take `fill`.
    ///
    /// Sampling is nearest-neighbour so rotated pixels keep their exact source
    /// colours.
    #[instrument(skip(self, fill))]
    pub fn rotate(self, degrees: f32, fill: Rgb<u8>) -> Self {
        let rgb = self.into_rgb8();
        if degrees.rem_euclid(360.0).abs() < 0.01 {
            return Self::from_rgb(rgb);
        }
        // imageproc rotates clockwise for positive angles.
        let rotated = geometric_transformations::rotate_about_center(
            &rgb,
            -degrees.to_radians(),
            Interpolation::Nearest,
            fill,
        );
        Self::from_rgb(rotated)
    }

    /// Scale brightness by `factor` (1.0 is a no-op).
    #[instrument(skip(self))]
    pub fn enhance_brightness(self, factor: f32) -> Self {
        Self::from_rgb(enhance::brightness(&self.into_rgb8(), factor))
    }

    /// Scale contrast around the mean luma by `factor` (1.0 is a no-op).
    #[instrument(skip(self))]
    pub fn enhance_contrast(self, factor: f32) -> Self {
        Self::from_rgb(enhance::contrast(&self.into_rgb8(), factor))
    }

    /// Adjust sharpness by `factor`; above 1.0 sharpens, below 1.0 softens.
    #[instrument(skip(self))]
    pub fn enhance_sharpness(self, factor: f32) -> Self {
        Self::from_rgb(enhance::sharpness(&self.into_rgb8(), factor))
    }
}

/// Encode an RGB buffer as baseline JPEG at `quality`.
pub fn encode_jpeg(rgb: &RgbImage, quality: u8) -> Result<Vec<u8>, DeckprepError> {
    let mut buffer = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|err| DeckprepError::Encode(format!("JPEG encoding failed: {}", err)))?;
    debug!(
        width = rgb.width(),
        height = rgb.height(),
        quality,
        bytes = buffer.len(),
        "JPEG encoded"
    );
    Ok(buffer)
}
