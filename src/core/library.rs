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

//! New library naming and creation
//!
//! A library is a directory under the data base directory named
//! `YYYY_MM_DD_MICROSCOPIST_sample_sample_area`, holding a workspace file.
//! When that name is taken, `_1`, `_2`, ... is appended until it is free.

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::resolver::date_string;
use crate::core::session::SessionStore;
use crate::core::types::SessionField;

/// File the host opens as a project
pub const WORKSPACE_FILE_NAME: &str = "Nion Swift Workspace.nslib";

/// A created (or already existing) library on disk
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LibraryReference {
    pub name: String,
    pub directory: PathBuf,
    pub workspace_file: PathBuf,
}

/// Base library name without the uniqueness index.
///
/// Whitespace in any segment becomes `_`.
pub fn library_base_name(session: &dyn SessionStore, current_date: NaiveDate) -> String {
    [
        date_string(current_date),
        session.value_or_empty(SessionField::Microscopist).to_uppercase(),
        session.value_or_empty(SessionField::Sample),
        session.value_or_empty(SessionField::SampleArea),
    ]
    .join("_")
    .replace(char::is_whitespace, "_")
}

/// Derives a library name that does not exist yet under `data_base_directory`.
pub fn derive_library_name(
    session: &dyn SessionStore,
    data_base_directory: &Path,
    current_date: NaiveDate,
) -> String {
    let base_name = library_base_name(session, current_date);

    let mut name = base_name.clone();
    let mut index = 0u32;
    while data_base_directory.join(&name).exists() {
        index += 1;
        name = format!("{}_{}", base_name, index);
    }
    name
}

/// Creates the library directory and an empty workspace file.
///
/// Idempotent: an existing directory or workspace file is left untouched.
pub fn create_library(data_base_directory: &Path, name: &str) -> std::io::Result<LibraryReference> {
    let directory = data_base_directory.join(name);
    fs::create_dir_all(&directory)?;

    let workspace_file = directory.join(WORKSPACE_FILE_NAME);
    if !workspace_file.exists() {
        fs::write(&workspace_file, serde_json::json!({}).to_string())?;
        info!(path = %workspace_file.display(), "Created workspace file");
    }

    Ok(LibraryReference {
        name: name.to_string(),
        directory,
        workspace_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::SessionMetadata;
    use tempfile::TempDir;

    fn session() -> SessionMetadata {
        SessionMetadata::new()
            .with(SessionField::Microscopist, "dmh")
            .with(SessionField::Sample, "S1234")
            .with(SessionField::SampleArea, "grain boundary")
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_base_name_replaces_spaces() {
        assert_eq!(
            library_base_name(&session(), date()),
            "2024_03_09_DMH_S1234_grain_boundary"
        );
    }

    #[test]
    fn test_name_is_indexed_when_taken() {
        let temp_dir = TempDir::new().unwrap();
        let base = "2024_03_09_DMH_S1234_grain_boundary";

        assert_eq!(derive_library_name(&session(), temp_dir.path(), date()), base);

        fs::create_dir(temp_dir.path().join(base)).unwrap();
        assert_eq!(
            derive_library_name(&session(), temp_dir.path(), date()),
            format!("{}_1", base)
        );

        fs::create_dir(temp_dir.path().join(format!("{}_1", base))).unwrap();
        assert_eq!(
            derive_library_name(&session(), temp_dir.path(), date()),
            format!("{}_2", base)
        );
    }

    #[test]
    fn test_create_library_writes_empty_workspace() {
        let temp_dir = TempDir::new().unwrap();
        let reference = create_library(temp_dir.path(), "lib").unwrap();

        assert!(reference.directory.is_dir());
        assert_eq!(fs::read_to_string(&reference.workspace_file).unwrap(), "{}");
    }

    #[test]
    fn test_create_library_keeps_existing_workspace() {
        let temp_dir = TempDir::new().unwrap();
        let directory = temp_dir.path().join("lib");
        fs::create_dir(&directory).unwrap();
        fs::write(directory.join(WORKSPACE_FILE_NAME), "{\"keep\": 1}").unwrap();

        let reference = create_library(temp_dir.path(), "lib").unwrap();
        assert_eq!(
            fs::read_to_string(&reference.workspace_file).unwrap(),
            "{\"keep\": 1}"
        );
    }
}
