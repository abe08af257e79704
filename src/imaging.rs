//! Image decode, resampling and encode
//!
//! Thin wrappers over the `image` crate with the resize semantics the
//! pipeline relies on. All resampling uses Lanczos3.

use crate::models::ImageFormat;
use crate::plan::Geometry;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageResult, RgbaImage};
use std::fs;
use std::io::{self, Cursor};
use std::path::Path;

const FILTER: FilterType = FilterType::Lanczos3;

/// Decode an image file.
pub fn open(path: &Path) -> ImageResult<DynamicImage> {
    image::open(path)
}

/// A fully transparent image.
pub fn blank(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::new(width.max(1), height.max(1)))
}

/// Fit inside `width` x `height` keeping the aspect ratio.
///
/// Images already inside the box are returned unchanged; fit never enlarges.
pub fn fit(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (w, h) = image.dimensions();
    if w <= width && h <= height {
        return image.clone();
    }
    image.resize(width.max(1), height.max(1), FILTER)
}

/// Scale to cover `width` x `height`, then crop the centre to exactly that size.
pub fn fill(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    image.resize_to_fill(width.max(1), height.max(1), FILTER)
}

/// Resize to `width` x `height`. A zero dimension is derived from the other
/// one so the aspect ratio is kept.
pub fn resize(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (w, h) = image.dimensions();
    let (width, height) = match (width, height) {
        (0, 0) => return image.clone(),
        (width, 0) => (width, scaled(h, width as f64 / w as f64)),
        (0, height) => (scaled(w, height as f64 / h as f64), height),
        dims => dims,
    };
    image.resize_exact(width, height, FILTER)
}

fn scaled(value: u32, factor: f64) -> u32 {
    ((value as f64 * factor).round() as u32).max(1)
}

fn truncated(value: u32, factor: f64) -> u32 {
    ((value as f64 * factor) as u32).max(1)
}

/// Apply a plan's geometry.
pub fn apply_geometry(image: &DynamicImage, geometry: Geometry) -> DynamicImage {
    match geometry {
        Geometry::Passthrough => image.clone(),
        Geometry::Scale(factor) => {
            let (w, h) = image.dimensions();
            fit(image, truncated(w, factor), truncated(h, factor))
        }
        Geometry::Width(width) => resize(image, width, 0),
        Geometry::Height(height) => resize(image, 0, height),
        Geometry::Fit { width, height } => fit(image, width, height),
    }
}

/// Encode `image` in memory.
///
/// Encoder failures surface here, before anything touches the disk.
pub fn encode(image: &DynamicImage, format: ImageFormat) -> ImageResult<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    match format {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()).write_to(&mut bytes, format.codec())?,
        _ => image.write_to(&mut bytes, format.codec())?,
    }
    Ok(bytes.into_inner())
}

/// Write encoded bytes to `path`, creating parent directories.
pub fn write(bytes: &[u8], path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)
}

/// Encode `image` to `path` in `format`, creating parent directories.
pub fn save(image: &DynamicImage, path: &Path, format: ImageFormat) -> ImageResult<()> {
    let bytes = encode(image, format)?;
    write(&bytes, path)?;
    Ok(())
}
