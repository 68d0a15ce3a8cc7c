// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! SuperSTEM settings file management
//!
//! Settings live in `superstem_customisation.json` inside the host's
//! configuration location. Key features:
//!
//! - **Forgiving reads**: A missing or empty file logs a warning, malformed
//!   JSON logs an error; both fall back to defaults instead of aborting
//! - **Atomic rewrites**: Temp-file-then-rename, so a crash mid-write never
//!   leaves a truncated file behind
//! - **Unknown keys preserved**: Anything the crate does not know about
//!   survives a rewrite
//!
//! # Example
//!
//! ```no_run
//! use superstem_export::config::SettingsManager;
//! use std::path::Path;
//!
//! let manager = SettingsManager::new(Path::new("/home/user/.config/nionswift"));
//! let settings = manager.load();
//! println!("Exporting below {}", settings.export_base_directory().display());
//! ```

pub mod error;
pub mod store;

use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub use error::ConfigError;
pub use store::{JsonFileStore, MemoryStore, PersistentStore};

/// File name of the settings file inside the host configuration location
pub const SETTINGS_FILE_NAME: &str = "superstem_customisation.json";

/// Fallback for both base directories when the settings do not name one
pub const DEFAULT_BASE_DIRECTORY: &str = "/tmp/NewData/sstem";

/// Contents of the settings file. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SuperstemSettings {
    /// Where new libraries are created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_base_directory: Option<String>,

    /// Where export directories are derived below
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_base_directory: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,

    /// External compression tool. Parsed and exposed, never run by this crate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compress_program: Option<String>,

    /// External hashing tool. Parsed and exposed, never run by this crate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashes_program: Option<String>,

    /// Default for the site field of the new library dialog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superstem_site: Option<String>,

    /// Default for the instrument field of the new library dialog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superstem_instrument: Option<String>,

    /// Keys this crate does not interpret
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SuperstemSettings {
    /// Data base directory, falling back to `DEFAULT_BASE_DIRECTORY`
    pub fn data_base_directory(&self) -> PathBuf {
        resolve_directory(self.data_base_directory.as_deref())
    }

    /// Export base directory, falling back to `DEFAULT_BASE_DIRECTORY`
    pub fn export_base_directory(&self) -> PathBuf {
        resolve_directory(self.export_base_directory.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Expands `~` and substitutes the default for unset or blank values
fn resolve_directory(value: Option<&str>) -> PathBuf {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(shellexpand::tilde(dir).as_ref()),
        None => PathBuf::from(DEFAULT_BASE_DIRECTORY),
    }
}

/// Reads and rewrites the SuperSTEM settings file.
#[derive(Clone, Debug)]
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    /// Creates a manager for the settings file inside `config_location`.
    ///
    /// Nothing is read until `load()` is called.
    pub fn new(config_location: &Path) -> Self {
        let settings_path = config_location.join(SETTINGS_FILE_NAME);
        info!(path = %settings_path.display(), "Using SuperSTEM settings file");
        Self { settings_path }
    }

    /// Creates a manager for an explicit settings file path.
    pub fn from_path(settings_path: PathBuf) -> Self {
        Self { settings_path }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Reads the settings file strictly.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(settings))` - File parsed
    /// * `Ok(None)` - File missing or zero bytes long
    /// * `Err(ConfigError::Malformed)` - File is not a valid settings object
    pub fn try_load(&self) -> Result<Option<SuperstemSettings>, ConfigError> {
        if !self.settings_path.is_file() || fs::metadata(&self.settings_path)?.len() == 0 {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.settings_path)?;
        let settings = serde_json::from_str(&content).map_err(|source| ConfigError::Malformed {
            path: self.settings_path.clone(),
            source,
        })?;
        Ok(Some(settings))
    }

    /// Reads the settings file, never failing.
    ///
    /// Missing or empty files log a warning; malformed ones log an error.
    /// Either way the defaults are returned and processing continues.
    pub fn load(&self) -> SuperstemSettings {
        match self.try_load() {
            Ok(Some(settings)) => {
                if settings.is_empty() {
                    warn!(
                        path = %self.settings_path.display(),
                        "SuperSTEM settings file is empty, add a value for export_base_directory"
                    );
                } else {
                    info!(?settings, "Loaded SuperSTEM settings");
                }
                settings
            }
            Ok(None) => {
                warn!(
                    path = %self.settings_path.display(),
                    "SuperSTEM settings file not found or empty, create it with a value for export_base_directory"
                );
                SuperstemSettings::default()
            }
            Err(e) => {
                error!(error = %e, "Failed to read SuperSTEM settings, using defaults");
                SuperstemSettings::default()
            }
        }
    }

    /// Rewrites the whole settings file atomically.
    ///
    /// The file is only rewritten if it already exists; this crate never
    /// creates a settings file on its own.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if there is no settings file, or
    /// `ConfigError::WriteFailed` if the atomic write fails.
    pub fn write(&self, settings: &SuperstemSettings) -> Result<(), ConfigError> {
        if !self.settings_path.is_file() {
            warn!(path = %self.settings_path.display(), "SuperSTEM settings file not found, not writing");
            return Err(ConfigError::NotFound(self.settings_path.clone()));
        }

        let content = to_pretty_json(settings)?;
        info!(path = %self.settings_path.display(), "Updating SuperSTEM settings file");
        write_atomically(&self.settings_path, content.as_bytes())
    }

    /// Rewrites the settings file in canonical form.
    ///
    /// Reads strictly first: unlike `load()`, a file that cannot be parsed is
    /// left exactly as it is.
    ///
    /// # Errors
    ///
    /// - `ConfigError::NotFound` if the file is missing or empty
    /// - `ConfigError::Malformed` if the file does not parse
    /// - anything `write()` returns
    pub fn rewrite(&self) -> Result<SuperstemSettings, ConfigError> {
        let settings = self
            .try_load()?
            .ok_or_else(|| ConfigError::NotFound(self.settings_path.clone()))?;
        self.write(&settings)?;
        Ok(settings)
    }
}

/// Serialises with four-space indentation
pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, ConfigError> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(ConfigError::Serialise)?;
    String::from_utf8(buffer).map_err(|e| ConfigError::WriteFailed(e.to_string()))
}

/// Temp file + rename; the target is either fully old or fully new
pub(crate) fn write_atomically(path: &Path, content: &[u8]) -> Result<(), ConfigError> {
    let mut file = AtomicWriteFile::options()
        .open(path)
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to open for atomic write: {}", e)))?;

    file.write_all(content)
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to write content: {}", e)))?;

    file.commit()
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to commit atomic write: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests;
