//! Error handling for heic2jpg
//!
//! anyhow carries errors and their context through the pipeline; the
//! domain-specific failures live in [`ConvertError`].

use anyhow::Context;
use std::path::Path;

pub type Result<T> = anyhow::Result<T>;

/// Extension trait for Results to add context with file paths
pub trait ResultExt<T> {
    /// Add context with file path information
    fn with_path_context<P: AsRef<Path>>(self, operation: &str, path: P) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error> + Send + Sync + 'static,
{
    fn with_path_context<P: AsRef<Path>>(self, operation: &str, path: P) -> Result<T> {
        self.map_err(|e| e.into())
            .with_context(|| format!("Failed to {}: {}", operation, path.as_ref().display()))
    }
}

/// Specific error types for heic2jpg operations
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Source directory not found: {path}")]
    SourceNotFound { path: String },

    #[error("No files found in source directory: {path}")]
    NoFiles { path: String },

    #[error("Source and destination are the same file: {path}")]
    SameFile { path: String },

    #[error("HEIF decoding is not available in this build (enable the `heif` feature)")]
    HeifUnsupported,

    #[error("HEIF decode failed: {reason}")]
    HeifDecode { reason: String },

    #[error("No directory was entered")]
    PromptAborted,
}
