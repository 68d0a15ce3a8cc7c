use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during settings and persistent store management.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings file does not exist.
    #[error("Settings file not found: {0}")]
    NotFound(PathBuf),
    /// Settings or store file is not valid JSON of the expected shape.
    #[error("Malformed JSON in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Serialising settings failed.
    #[error("Failed to serialise settings: {0}")]
    Serialise(#[source] serde_json::Error),
    /// Atomic write operation failed.
    #[error("Atomic write failed: {0}")]
    WriteFailed(String),
    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
