use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_BLUR_SIGMA, DEFAULT_DARKEN_FRACTION,
    DEFAULT_DOT_DENSITY, DEFAULT_DOT_SIZE, DEFAULT_DURATION_SECS, DEFAULT_FFMPEG_BINARY,
    DEFAULT_FPS, DEFAULT_FRAMES_DIR, DEFAULT_OUTPUT_VIDEO, DEFAULT_SHIMMER_SPEED, DOT_GRAY_MAX,
    DOT_GRAY_MIN,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Invalid(String),
}

/// Everything a render run can be tuned with.
///
/// Loaded from JSON where every field is optional; missing fields take the
/// built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpoilerConfig {
    pub fps: u32,
    pub duration_secs: u32,
    pub blur_sigma: f64,
    pub dot_density: f64,
    pub dot_size: u32,
    pub shimmer_speed: f64,
    pub darken_fraction: f64,
    /// Fixed RNG seed; `None` draws one from OS entropy.
    pub seed: Option<u64>,
    pub output: PathBuf,
    pub frames_dir: PathBuf,
    pub keep_frames: bool,
    pub ffmpeg: String,
}

impl Default for SpoilerConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            duration_secs: DEFAULT_DURATION_SECS,
            blur_sigma: DEFAULT_BLUR_SIGMA,
            dot_density: DEFAULT_DOT_DENSITY,
            dot_size: DEFAULT_DOT_SIZE,
            shimmer_speed: DEFAULT_SHIMMER_SPEED,
            darken_fraction: DEFAULT_DARKEN_FRACTION,
            seed: None,
            output: PathBuf::from(DEFAULT_OUTPUT_VIDEO),
            frames_dir: PathBuf::from(DEFAULT_FRAMES_DIR),
            keep_frames: false,
            ffmpeg: DEFAULT_FFMPEG_BINARY.to_string(),
        }
    }
}

impl SpoilerConfig {
    /// `<config_dir>/spoiler/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads the user config file when one exists, otherwise the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn total_frames(&self) -> usize {
        self.fps as usize * self.duration_secs as usize
    }

    pub fn shimmer_settings(&self) -> ShimmerSettings {
        ShimmerSettings {
            frame_count: self.total_frames(),
            dot_density: self.dot_density,
            dot_size: self.dot_size,
            shimmer_speed: self.shimmer_speed,
            darken_fraction: self.darken_fraction,
            gray_range: DOT_GRAY_MIN..=DOT_GRAY_MAX,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be positive".into()));
        }
        if self.duration_secs == 0 {
            return Err(ConfigError::Invalid("duration must be positive".into()));
        }
        if !self.blur_sigma.is_finite() || self.blur_sigma < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "Blur sigma must be a non-negative number, got {}",
                self.blur_sigma
            )));
        }
        if !self.dot_density.is_finite() || !(0.0..=1.0).contains(&self.dot_density) {
            return Err(ConfigError::Invalid(format!(
                "Dot density must be between 0.0 and 1.0, got {}",
                self.dot_density
            )));
        }
        if self.dot_size == 0 {
            return Err(ConfigError::Invalid("Dot size must be at least 1".into()));
        }
        if !self.shimmer_speed.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "Shimmer speed must be finite, got {}",
                self.shimmer_speed
            )));
        }
        if !(0.0..=1.0).contains(&self.darken_fraction) {
            return Err(ConfigError::Invalid(format!(
                "Darken fraction must be between 0.0 and 1.0, got {}",
                self.darken_fraction
            )));
        }
        if self.ffmpeg.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "ffmpeg binary must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Per-run knobs consumed by the frame generator.
#[derive(Debug, Clone, PartialEq)]
pub struct ShimmerSettings {
    pub frame_count: usize,
    pub dot_density: f64,
    pub dot_size: u32,
    pub shimmer_speed: f64,
    pub darken_fraction: f64,
    pub gray_range: RangeInclusive<u8>,
}

impl Default for ShimmerSettings {
    fn default() -> Self {
        SpoilerConfig::default().shimmer_settings()
    }
}
