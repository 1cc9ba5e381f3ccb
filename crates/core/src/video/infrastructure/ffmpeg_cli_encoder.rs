use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::shared::constants::{DEFAULT_FFMPEG_BINARY, FRAME_FILE_PATTERN};
use crate::video::domain::video_encoder::VideoEncoder;

pub const VIDEO_CODEC: &str = "libx264";
/// 4:2:0 output needs even frame dimensions, which the generator guarantees.
pub const PIXEL_FORMAT: &str = "yuv420p";

/// Encodes numbered PNG frames by running the system `ffmpeg` binary.
///
/// The child inherits stdout/stderr so ffmpeg's own progress stays visible.
pub struct FfmpegCliEncoder {
    binary: OsString,
}

impl FfmpegCliEncoder {
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_FFMPEG_BINARY)
    }

    pub fn with_binary(binary: impl Into<OsString>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Returns true if the configured binary runs `-version` successfully.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Command-line arguments for one encode, excluding the binary itself.
    pub fn build_args(frames_dir: &Path, fps: u32, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-framerate".into(),
            fps.to_string().into(),
            "-i".into(),
            frames_dir.join(FRAME_FILE_PATTERN).into_os_string(),
            "-c:v".into(),
            VIDEO_CODEC.into(),
            "-pix_fmt".into(),
            PIXEL_FORMAT.into(),
            output.as_os_str().to_owned(),
        ]
    }
}

impl Default for FfmpegCliEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoEncoder for FfmpegCliEncoder {
    fn encode(
        &self,
        frames_dir: &Path,
        fps: u32,
        output: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let args = Self::build_args(frames_dir, fps, output);
        log::debug!("Running {:?} {:?}", self.binary, args);

        let status = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| {
                format!(
                    "failed to spawn {} (is it installed and on PATH?): {e}",
                    self.binary.to_string_lossy()
                )
            })?;

        if !status.success() {
            return Err(format!(
                "{} exited with {status}",
                self.binary.to_string_lossy()
            )
            .into());
        }
        Ok(())
    }
}
