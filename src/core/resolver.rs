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

//! Export path resolution and the non-destructive write
//!
//! # Export lifecycle
//!
//! ```text
//! Idle → LabelComputed → DirectoryReady → WriteSucceeded → Idle
//!                                       ↘ WriteRefused   ↗
//! ```
//!
//! There are no retries: a refused or failed write ends the action and the
//! user has to trigger a new one.
//!
//! # Safe-write rules
//!
//! - The parent directory is created on demand (`mkdir -p`)
//! - An existing target is never overwritten: `ExportError::FileExists`
//! - A refusal performs no filesystem mutation at all
//!
//! The display item is renamed before the write. When the write is refused
//! or fails the previous title is restored.

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::error::ExportError;
use crate::core::naming;
use crate::core::session::SessionStore;
use crate::core::types::{DmExtension, NamingFields, SessionField};

/// Format of the date component of derived directory names
pub const DATE_FORMAT: &str = "%Y_%m_%d";

/// An exportable entity owned by the host, opaque beyond its title.
pub trait DisplayItem {
    fn title(&self) -> String;

    /// Renames the item; visible to the host immediately.
    fn set_title(&self, title: &str);
}

/// Serialises a display item to a file. Encoding itself is out of scope for
/// this crate.
pub trait Writer {
    /// Stable id the writer is looked up by (e.g. `dm-io-handler`)
    fn id(&self) -> &str;

    /// Supported extensions, preferred first
    fn extensions(&self) -> &[String];

    fn write(&self, item: &dyn DisplayItem, path: &Path) -> std::io::Result<()>;
}

/// Stages of a single export action, reported in debug logs
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExportStage {
    Idle,
    LabelComputed,
    DirectoryReady,
    WriteSucceeded,
    WriteRefused,
}

/// Formats a date as `YYYY_MM_DD`
pub fn date_string(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Derives `base / YYYY_MM_DD_MICROSCOPIST_sample_samplearea`.
///
/// Session values are read at call time, so the result always reflects the
/// current metadata. Unset values become empty segments.
pub fn derive_export_directory(
    session: &dyn SessionStore,
    base_directory: &Path,
    current_date: NaiveDate,
) -> PathBuf {
    let session_string = [
        session.value_or_empty(SessionField::Microscopist).to_uppercase(),
        session.value_or_empty(SessionField::Sample),
        session.value_or_empty(SessionField::SampleArea),
    ]
    .join("_");

    let directory = base_directory.join(format!("{}_{}", date_string(current_date), session_string));
    info!(directory = %directory.display(), "Derived export directory");
    directory
}

/// Resolves write targets under a configured export base directory and
/// performs collision-checked writes.
#[derive(Clone, Debug)]
pub struct ExportPathResolver {
    base_directory: PathBuf,
}

impl ExportPathResolver {
    pub fn new(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            base_directory: base_directory.into(),
        }
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// See `naming::build_label`.
    pub fn build_label(&self, fields: &NamingFields, action: &str) -> Result<String, ExportError> {
        Ok(naming::build_label(fields, action)?)
    }

    /// Derives the export directory for the current session. Never cached.
    pub fn derive_export_directory(
        &self,
        session: &dyn SessionStore,
        current_date: NaiveDate,
    ) -> PathBuf {
        derive_export_directory(session, &self.base_directory, current_date)
    }

    /// Sets the display item's title to the computed label.
    pub fn rename_item(item: &dyn DisplayItem, label: &str) {
        debug!(from = %item.title(), to = %label, "Renaming display item");
        item.set_title(label);
    }

    /// Writes `item` to `target_path` unless the file already exists.
    ///
    /// # Errors
    ///
    /// - `ExportError::FileExists` if the target exists (nothing touched)
    /// - `ExportError::Io` if the parent directory cannot be created
    /// - `ExportError::WriterFailed` if the writer itself fails
    pub fn write_artifact(
        &self,
        target_path: &Path,
        item: &dyn DisplayItem,
        writer: &dyn Writer,
    ) -> Result<PathBuf, ExportError> {
        if let Some(parent) = target_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if parent.is_dir() {
                debug!(directory = %parent.display(), "Export directory already exists");
            } else {
                fs::create_dir_all(parent)?;
                info!(directory = %parent.display(), "Created export directory");
            }
        }
        debug!(stage = ?ExportStage::DirectoryReady);

        if target_path.exists() {
            warn!(path = %target_path.display(), "Could not export - file exists");
            debug!(stage = ?ExportStage::WriteRefused);
            return Err(ExportError::FileExists(target_path.to_path_buf()));
        }

        writer
            .write(item, target_path)
            .map_err(|source| ExportError::WriterFailed {
                path: target_path.to_path_buf(),
                source,
            })?;

        info!(file = ?target_path.file_name(), writer = writer.id(), "Exported display item");
        debug!(stage = ?ExportStage::WriteSucceeded);
        Ok(target_path.to_path_buf())
    }

    /// Runs one export action end to end: label, rename, safe write.
    ///
    /// On any failure after the rename, the item's previous title is put back.
    pub fn export_item(
        &self,
        fields: &NamingFields,
        action: &str,
        directory: &Path,
        item: &dyn DisplayItem,
        writer: &dyn Writer,
    ) -> Result<PathBuf, ExportError> {
        let extension = primary_extension(writer)?;
        let target = naming::build_target(fields, action, directory, extension)?;
        let label = target.label();
        debug!(stage = ?ExportStage::LabelComputed, %label);

        let previous_title = item.title();
        Self::rename_item(item, &label);

        let result = self.write_artifact(&target.path(), item, writer);
        if result.is_err() {
            item.set_title(&previous_title);
            debug!(title = %previous_title, "Restored display item title");
        }
        debug!(stage = ?ExportStage::Idle);
        result
    }
}

/// The writer's preferred extension as a `DmExtension`
fn primary_extension(writer: &dyn Writer) -> Result<DmExtension, ExportError> {
    let first = writer.extensions().first().map(String::as_str).unwrap_or("");
    DmExtension::parse(first).ok_or_else(|| ExportError::UnsupportedExtension(first.to_string()))
}
