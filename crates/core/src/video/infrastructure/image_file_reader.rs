use std::path::Path;

use crate::shared::frame::{Frame, RGBA_CHANNELS};
use crate::video::domain::image_reader::ImageReader;

/// Reads a still image with the `image` crate, format detected from content.
///
/// Every input (gray, RGB, 16-bit, ...) is converted to 8-bit RGBA.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
        let img = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?
            .to_rgba8();
        let (width, height) = img.dimensions();
        log::debug!("Decoded {} ({width}x{height})", path.display());
        Ok(Frame::new(img.into_raw(), width, height, RGBA_CHANNELS, 0))
    }
}
