//! Image backend: thin wrappers over the `image` crate for the operations
//! the evaluator drives. The core never inspects pixels itself.

use std::{io::Cursor, path::Path, time::Instant};

use image::{ImageFormat, RgbaImage, imageops};
use tracing::debug;

use crate::error::{ImfxError, ImfxResult};

/// Loads an image from disk into RGBA8.
pub fn load(path: &Path) -> ImfxResult<RgbaImage> {
    let img = image::open(path)
        .map_err(|e| ImfxError::decode(format!("'{}': {e}", path.display())))?;
    Ok(img.to_rgba8())
}

/// Uniform resize by `factor` on both axes, bilinear filtering. Target
/// dimensions are rounded and clamped to at least 1x1; factor 1.0 is an
/// identity.
pub fn resize_scale(img: &RgbaImage, factor: f64) -> RgbaImage {
    if !factor.is_finite() || factor == 1.0 {
        return img.clone();
    }
    let width = ((f64::from(img.width()) * factor).round() as u32).max(1);
    let height = ((f64::from(img.height()) * factor).round() as u32).max(1);
    let start = Instant::now();
    let out = imageops::resize(img, width, height, imageops::FilterType::Triangle);
    debug!(
        factor,
        width,
        height,
        elapsed_us = start.elapsed().as_micros() as u64,
        "resize"
    );
    out
}

/// Gaussian blur with the given standard deviation. Sigma at or below zero
/// is an identity.
pub fn gaussian_blur(img: &RgbaImage, sigma: f32) -> RgbaImage {
    if sigma <= 0.0 {
        return img.clone();
    }
    let start = Instant::now();
    let out = imageops::blur(img, sigma);
    debug!(
        sigma,
        elapsed_us = start.elapsed().as_micros() as u64,
        "gaussian blur"
    );
    out
}

/// Places `overlay` on `base` so their centers coincide, replacing pixels.
/// The overlay is clipped to the base rectangle when larger on either axis;
/// the base keeps its dimensions.
pub fn overlay_centered(mut base: RgbaImage, overlay: &RgbaImage) -> RgbaImage {
    // Each dimension is halved separately, so with mixed parity the overlay
    // sits one pixel toward the bottom right.
    let x = i64::from(base.width() / 2) - i64::from(overlay.width() / 2);
    let y = i64::from(base.height() / 2) - i64::from(overlay.height() / 2);
    let start = Instant::now();
    imageops::replace(&mut base, overlay, x, y);
    debug!(
        x,
        y,
        elapsed_us = start.elapsed().as_micros() as u64,
        "overlay"
    );
    base
}

/// Encodes the image as PNG, in memory.
pub fn encode_png(img: &RgbaImage) -> ImfxResult<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ImfxError::encode(e.to_string()))?;
    Ok(bytes)
}
