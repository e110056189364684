//! I/O helpers for RGBA/grayscale images and JSON.
//!
//! - `load_rgba_image`: read a PNG/JPEG/etc. into an owned RGBA buffer.
//! - `save_rgba`: write an `RgbaBuffer` to a PNG.
//! - `save_grayscale_f32`: write an `ImageF32` (0..255 scale) to a grayscale PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageF32, ImageView, RgbaBuffer};
use image::{DynamicImage, GrayImage, Luma, RgbaImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit RGBA.
pub fn load_rgba_image(path: &Path) -> Result<RgbaBuffer, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgba8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    RgbaBuffer::from_raw(width, height, img.into_raw())
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))
}

/// Save an RGBA buffer to a PNG.
pub fn save_rgba(buffer: &RgbaBuffer, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let image = RgbaImage::from_raw(
        buffer.width() as u32,
        buffer.height() as u32,
        buffer.as_bytes().to_vec(),
    )
    .ok_or_else(|| "Failed to create image buffer".to_string())?;
    DynamicImage::ImageRgba8(image)
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a float image to a grayscale PNG, clamping values in [0, 255].
pub fn save_grayscale_f32(image: &ImageF32, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for (y, row) in image.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            let v = px.clamp(0.0, 255.0).round();
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
