use std::path::Path;

/// Assembles a directory of numbered frame images into a video file.
///
/// Abstracts the external encoder so the pipeline can be exercised
/// without spawning it.
pub trait VideoEncoder: Send {
    fn encode(
        &self,
        frames_dir: &Path,
        fps: u32,
        output: &Path,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
