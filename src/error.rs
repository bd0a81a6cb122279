//! Error types for the library surface.
//!
//! Generation itself cannot fail once a configuration validated; errors only
//! arise from configuration input and from encoding output.

use std::path::PathBuf;

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ExportResult<T> = Result<T, ExportError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config json: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("nothing to export: {0}")]
    Empty(String),
}

impl ExportError {
    pub fn empty(msg: impl Into<String>) -> Self {
        Self::Empty(msg.into())
    }
}
