// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Photometric enhancement and alpha compositing on RGB rasters.
//
// Each enhancement is a blend between the image and a "degenerate" version of
// it: black for brightness, a flat mean-luma grey for contrast, and a smoothed
// copy for sharpness. A factor of 1.0 returns the input unchanged; factors
// below 1.0 move towards the degenerate image, factors above 1.0 away from it.

use image::{Rgb, RgbImage, RgbaImage};

/// 3x3 smoothing kernel used as the sharpness baseline.
const SMOOTH_KERNEL: [[u32; 3]; 3] = [[1, 1, 1], [1, 5, 1], [1, 1, 1]];
const SMOOTH_SCALE: u32 = 13;

/// Blend one channel: `degenerate + factor * (value - degenerate)`, clamped to
/// the `u8` range and truncated.
#[inline]
fn blend_channel(degenerate: u8, value: u8, factor: f32) -> u8 {
    let d = degenerate as f32;
    let blended = d + factor * (value as f32 - d);
    blended.clamp(0.0, 255.0) as u8
}

/// Flatten `src` onto an opaque canvas of `background`, using the source alpha
/// channel as the blend mask.
pub fn composite_over(src: &RgbaImage, background: Rgb<u8>) -> RgbImage {
    let [bg_r, bg_g, bg_b] = background.0;
    RgbImage::from_fn(src.width(), src.height(), |x, y| {
        let [r, g, b, a] = src.get_pixel(x, y).0;
        let alpha = a as u32;
        let mix = |fg: u8, bg: u8| -> u8 {
            ((fg as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8
        };
        Rgb([mix(r, bg_r), mix(g, bg_g), mix(b, bg_b)])
    })
}

/// Scale every channel by `factor`.
pub fn brightness(img: &RgbImage, factor: f32) -> RgbImage {
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = blend_channel(0, *channel, factor);
        }
    }
    out
}

/// Scale each channel's deviation from the image's mean luma by `factor`.
pub fn contrast(img: &RgbImage, factor: f32) -> RgbImage {
    let pivot = mean_luma(img);
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = blend_channel(pivot, *channel, factor);
        }
    }
    out
}

/// Blend between a smoothed copy (`factor` 0.0) and the original (1.0);
/// factors above 1.0 enhance edges.
pub fn sharpness(img: &RgbImage, factor: f32) -> RgbImage {
    let smoothed = smooth(img);
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let value = img.get_pixel(x, y).0;
        let degenerate = smoothed.get_pixel(x, y).0;
        Rgb([
            blend_channel(degenerate[0], value[0], factor),
            blend_channel(degenerate[1], value[1], factor),
            blend_channel(degenerate[2], value[2], factor),
        ])
    })
}

/// ITU-R 601 luma in 16.16 fixed point.
#[inline]
fn luma(Rgb([r, g, b]): Rgb<u8>) -> u32 {
    (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16
}

/// Mean luma of the whole image, rounded to the nearest level.
pub fn mean_luma(img: &RgbImage) -> u8 {
    let count = img.width() as u64 * img.height() as u64;
    if count == 0 {
        return 0;
    }
    let total: u64 = img.pixels().map(|p| luma(*p) as u64).sum();
    let mean = total as f64 / count as f64;
    (mean + 0.5).min(255.0) as u8
}

/// Apply the 3x3 smoothing kernel to interior pixels; the one-pixel border is
/// copied unchanged.
fn smooth(img: &RgbImage) -> RgbImage {
    let (width, height) = img.dimensions();
    let mut out = img.clone();
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut sums = [0u32; 3];
            for (ky, row) in SMOOTH_KERNEL.iter().enumerate() {
                for (kx, weight) in row.iter().enumerate() {
                    let p = img.get_pixel(x + kx as u32 - 1, y + ky as u32 - 1).0;
                    for c in 0..3 {
                        sums[c] += p[c] as u32 * weight;
                    }
                }
            }
            let px = sums.map(|s| ((s + SMOOTH_SCALE / 2) / SMOOTH_SCALE) as u8);
            out.put_pixel(x, y, Rgb(px));
        }
    }
    out
}
