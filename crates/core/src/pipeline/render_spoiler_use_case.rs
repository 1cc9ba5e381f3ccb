use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use rand::Rng;

use crate::pipeline::generate_frames_use_case::GenerateFramesUseCase;
use crate::shared::error::SpoilerError;
use crate::shared::spoiler_config::ShimmerSettings;
use crate::video::domain::video_encoder::VideoEncoder;

/// Where a render reads from and writes to.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPaths {
    pub source: PathBuf,
    pub frames_dir: PathBuf,
    pub output: PathBuf,
}

/// Full spoiler render: reset the frames directory, generate frames,
/// encode them into a video, then remove the frames.
pub struct RenderSpoilerUseCase {
    generator: GenerateFramesUseCase,
    encoder: Box<dyn VideoEncoder>,
    fps: u32,
    keep_frames: bool,
}

impl RenderSpoilerUseCase {
    pub fn new(
        generator: GenerateFramesUseCase,
        encoder: Box<dyn VideoEncoder>,
        fps: u32,
        keep_frames: bool,
    ) -> Self {
        Self {
            generator,
            encoder,
            fps,
            keep_frames,
        }
    }

    /// Runs the render and returns the path of the produced video.
    ///
    /// The frames directory is wiped before and after rendering, so it may
    /// not be, or contain, the source image or the output video.
    ///
    /// Frames left behind by a failed run are not removed.
    pub fn execute<R: Rng + ?Sized>(
        &mut self,
        paths: &RenderPaths,
        settings: &ShimmerSettings,
        rng: &mut R,
    ) -> Result<PathBuf, SpoilerError> {
        check_paths(paths)?;
        reset_dir(&paths.frames_dir)?;

        let frames = self
            .generator
            .execute(&paths.source, &paths.frames_dir, settings, rng)?;
        log::info!(
            "Wrote {frames} frames to {}, encoding at {} fps",
            paths.frames_dir.display(),
            self.fps
        );

        self.encoder
            .encode(&paths.frames_dir, self.fps, &paths.output)
            .map_err(|source| SpoilerError::Encode { source })?;

        if self.keep_frames {
            log::info!("Keeping frames in {}", paths.frames_dir.display());
        } else if let Err(e) = fs::remove_dir_all(&paths.frames_dir) {
            log::warn!(
                "Failed to remove frames folder {}: {e}",
                paths.frames_dir.display()
            );
        }

        log::info!("Spoiler video created: {}", paths.output.display());
        Ok(paths.output.clone())
    }
}

fn check_paths(paths: &RenderPaths) -> Result<(), SpoilerError> {
    let frames_dir = resolve(&paths.frames_dir);
    let source = resolve(&paths.source);
    let output = resolve(&paths.output);

    if source.starts_with(&frames_dir) {
        return Err(SpoilerError::InvalidConfig(format!(
            "frames directory {} would remove the source image {}",
            paths.frames_dir.display(),
            paths.source.display()
        )));
    }
    if output.starts_with(&frames_dir) {
        return Err(SpoilerError::InvalidConfig(format!(
            "frames directory {} would remove the output video {}",
            paths.frames_dir.display(),
            paths.output.display()
        )));
    }
    if output == source {
        return Err(SpoilerError::InvalidConfig(format!(
            "output {} would overwrite the source image",
            paths.output.display()
        )));
    }
    Ok(())
}

/// Absolute form of `path` with `.` and `..` removed and the longest
/// existing prefix canonicalized.
fn resolve(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    canonicalize_existing(&normalized)
}

fn canonicalize_existing(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => canonicalize_existing(parent).join(name),
        _ => path.to_path_buf(),
    }
}

/// Removes `dir` if present and recreates it empty.
fn reset_dir(dir: &Path) -> Result<(), SpoilerError> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| SpoilerError::io(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| SpoilerError::io(dir, e))
}
