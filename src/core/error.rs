use std::path::PathBuf;
use thiserror::Error;

use crate::core::validator::NamingError;

/// Errors that can occur while resolving or performing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Required fields are blank or the export directory was never set.
    #[error("Export not ready, missing: {}", .0.join(", "))]
    NotReady(Vec<String>),
    /// Action name or index not in the panel's action list.
    #[error("No export action '{0}'")]
    UnknownAction(String),
    /// No display item is selected in the host.
    #[error("No display item selected")]
    NoSelection,
    /// The persistent `export_directory` value is unset or blank.
    #[error("Export directory has not been set")]
    ExportDirectoryUnset,
    /// No writer registered under the requested id.
    #[error("No writer registered with id '{0}'")]
    WriterNotFound(String),
    /// The writer's primary extension is not a DigitalMicrograph one.
    #[error("Writer extension '{0}' is not dm3 or dm4")]
    UnsupportedExtension(String),
    /// Target file already exists; nothing was written.
    #[error("Could not export - file exists: {0}")]
    FileExists(PathBuf),
    /// Naming fields failed validation.
    #[error("Invalid naming fields: {0}")]
    Naming(#[from] NamingError),
    /// The writer collaborator failed after the safety checks passed.
    #[error("Writer failed for {path}: {source}")]
    WriterFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Generic I/O error (directory creation, existence checks).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// True for the one failure that is shown to the user as a dialog
    pub fn is_conflict(&self) -> bool {
        matches!(self, ExportError::FileExists(_))
    }
}
