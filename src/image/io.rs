//! I/O helpers for RGB images and JSON.
//!
//! - `load_rgb_image`: read a PNG/JPEG/etc. into an owned interleaved RGB8 buffer.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageMeta, ImageRgb8};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned interleaved RGB8 buffer with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct RgbImageBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
    meta: ImageMeta,
}

impl RgbImageBuffer {
    /// Construct an owned buffer given tightly packed RGB bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>, meta: ImageMeta) -> Self {
        Self {
            width,
            height,
            data,
            meta,
        }
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Filename/format metadata captured at load time.
    pub fn meta(&self) -> &ImageMeta {
        &self.meta
    }

    /// Borrow as a read-only `ImageRgb8` view
    pub fn as_view(&self) -> ImageRgb8<'_> {
        ImageRgb8 {
            w: self.width,
            h: self.height,
            stride: self.width * 3,
            data: &self.data,
        }
    }
}

/// Load an image from disk and convert to 8-bit RGB.
pub fn load_rgb_image(path: &Path) -> Result<RgbImageBuffer, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let meta = ImageMeta::from_filename(filename);
    Ok(RgbImageBuffer::new(width, height, img.into_raw(), meta))
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
