//! I/O helpers for frames, masks and JSON.
//!
//! - `load_rgb_image`: read a PNG/JPEG into an owned RGB8 frame, optionally
//!   resized to the camera size.
//! - `save_mask_png`: write a segmentation mask to a grayscale PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{Mask, OwnedFrame};
use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to interleaved RGB8. When `size` is
/// given and differs from the file's dimensions the image is resized to it.
pub fn load_rgb_image(path: &Path, size: Option<(usize, usize)>) -> Result<OwnedFrame, String> {
    let mut img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    if let Some((w, h)) = size.filter(|&(w, h)| w > 0 && h > 0) {
        if (img.width() as usize, img.height() as usize) != (w, h) {
            img = imageops::resize(&img, w as u32, h as u32, FilterType::Triangle);
        }
    }
    let width = img.width() as usize;
    let height = img.height() as usize;
    OwnedFrame::from_raw(width, height, img.into_raw())
        .ok_or_else(|| format!("Unexpected buffer size decoding {}", path.display()))
}

/// Save a mask as an 8-bit grayscale PNG.
pub fn save_mask_png(mask: &Mask, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let image: GrayImage =
        ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(mask.w as u32, mask.h as u32, mask.data.clone())
            .ok_or_else(|| "Failed to create image buffer".to_string())?;
    image
        .save(path)
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
