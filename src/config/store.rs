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

//! Persistent key/value string store
//!
//! The host application persists small strings across sessions (the current
//! export directory, the export filter, recently used project directories).
//! `PersistentStore` is the seam; `MemoryStore` backs tests and embedding
//! hosts, `JsonFileStore` backs the command-line front end.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::config::{to_pretty_json, write_atomically, ConfigError};

/// Keys this crate reads and writes
pub mod keys {
    pub const EXPORT_DIRECTORY: &str = "export_directory";
    pub const EXPORT_FILTER: &str = "export_filter";
    pub const EXPORT_BASE_DIRECTORY: &str = "export_base_directory";
    pub const CURRENT_PROJECT_DIR: &str = "sstem_current_project_dir";
    pub const LAST_PROJECT_DIR: &str = "sstem_last_project_dir";
    pub const CURRENT_WORKSPACE_DIRECTORY: &str = "current_workspace_directory";
    pub const LAST_WORKSPACE_DIRECTORY: &str = "last_workspace_directory";
}

/// File dialog filter persisted next to the export directory
pub const DM_EXPORT_FILTER: &str = "DigitalMicrograph Files files (*.dm3 *.dm4)";

/// Host-provided string store that survives restarts.
pub trait PersistentStore {
    /// Returns `None` if the key is unset.
    fn get_string(&self, key: &str) -> Option<String>;

    fn set_string(&self, key: &str, value: &str);

    /// Like `get_string`, treating blank values as unset
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get_string(key).filter(|v| !v.trim().is_empty())
    }
}

/// Process-local store, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistentStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set_string(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// Store backed by a flat JSON object file.
///
/// The file is read fully on open and rewritten wholesale (atomically) on
/// every `set_string`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: RefCell<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Opens (or starts) a store at `path`.
    ///
    /// A missing or empty file starts an empty store.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Malformed` if the file is not a JSON object of
    /// strings.
    pub fn open(path: PathBuf) -> Result<Self, ConfigError> {
        let values = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|source| ConfigError::Malformed {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            values: RefCell::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the current values to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = to_pretty_json(&*self.values.borrow())?;
        write_atomically(&self.path, content.as_bytes())
    }
}

impl PersistentStore for JsonFileStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set_string(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());

        match self.save() {
            Ok(()) => debug!(key, value, "Persisted value"),
            Err(e) => error!(key, error = %e, path = %self.path.display(), "Failed to persist value"),
        }
    }
}
