use std::path::PathBuf;

use thiserror::Error;

/// Terminal failures of a spoiler render. None of them are retried.
#[derive(Error, Debug)]
pub enum SpoilerError {
    #[error("failed to load source image {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error>,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to blur base image: {source}")]
    Blur {
        #[source]
        source: Box<dyn std::error::Error>,
    },
    #[error("I/O failure at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error>,
    },
    #[error("video encoding failed: {source}")]
    Encode {
        #[source]
        source: Box<dyn std::error::Error>,
    },
}

impl SpoilerError {
    pub fn io(path: impl Into<PathBuf>, source: impl Into<Box<dyn std::error::Error>>) -> Self {
        Self::Io {
            path: path.into(),
            source: source.into(),
        }
    }
}
