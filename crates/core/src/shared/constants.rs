pub const DEFAULT_FPS: u32 = 30;
pub const DEFAULT_DURATION_SECS: u32 = 5;

/// Gaussian sigma for the background blur, in pixels.
pub const DEFAULT_BLUR_SIGMA: f64 = 45.0;
/// Fraction of base-image pixels that seed a shimmer dot.
pub const DEFAULT_DOT_DENSITY: f64 = 0.004;
pub const DEFAULT_DOT_SIZE: u32 = 6;
/// Full brightness oscillations over the whole clip.
pub const DEFAULT_SHIMMER_SPEED: f64 = 9.0;
pub const DEFAULT_DARKEN_FRACTION: f64 = 0.3;

/// Dots stay near-white so they read against the darkened backdrop.
pub const DOT_GRAY_MIN: u8 = 220;
pub const DOT_GRAY_MAX: u8 = 250;

pub const DEFAULT_OUTPUT_VIDEO: &str = "spoiler.mp4";
pub const DEFAULT_FRAMES_DIR: &str = "frames";
pub const DEFAULT_FFMPEG_BINARY: &str = "ffmpeg";

pub const FRAME_FILE_PREFIX: &str = "frame_";
pub const FRAME_FILE_EXTENSION: &str = "png";
/// printf-style input pattern matching [`frame_file_name`] for the encoder.
pub const FRAME_FILE_PATTERN: &str = "frame_%04d.png";

pub const CONFIG_DIR_NAME: &str = "spoiler";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// File name of the frame at `index`, zero-padded to four digits.
pub fn frame_file_name(index: usize) -> String {
    format!("{FRAME_FILE_PREFIX}{index:04}.{FRAME_FILE_EXTENSION}")
}
