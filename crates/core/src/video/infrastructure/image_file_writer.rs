use std::path::Path;

use crate::shared::frame::{Frame, RGBA_CHANNELS};
use crate::video::domain::image_writer::ImageWriter;

/// Writes a single RGBA frame to an image file using the `image` crate.
///
/// The output format follows the path's extension (PNG for frame files).
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if frame.channels() != RGBA_CHANNELS {
            return Err(format!(
                "expected an RGBA frame, got {} channels",
                frame.channels()
            )
            .into());
        }

        // Ensure parent directory exists (infrastructure concern)
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let img = image::RgbaImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;
        img.save(path)?;
        Ok(())
    }
}
