use std::path::Path;

use crate::shared::frame::Frame;

/// Decodes a still image into an RGBA frame.
pub trait ImageReader: Send {
    fn read(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>>;
}
