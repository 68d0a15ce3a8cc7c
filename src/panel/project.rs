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

//! Project and workspace switch bookkeeping
//!
//! Whenever the host switches project, the previous current directory is
//! pushed to the "last" key and the new one becomes current.

use std::path::Path;
use tracing::info;

use crate::config::store::{keys, PersistentStore};

/// Records a project switch. `project_file` is the project's index file;
/// its parent directory is what gets stored.
pub fn record_project_switch(store: &dyn PersistentStore, project_file: &Path) {
    let directory = project_file.parent().unwrap_or(project_file);
    rotate(store, keys::CURRENT_PROJECT_DIR, keys::LAST_PROJECT_DIR, directory);
}

/// Records a workspace directory switch.
pub fn record_workspace_switch(store: &dyn PersistentStore, workspace_directory: &Path) {
    rotate(
        store,
        keys::CURRENT_WORKSPACE_DIRECTORY,
        keys::LAST_WORKSPACE_DIRECTORY,
        workspace_directory,
    );
}

fn rotate(store: &dyn PersistentStore, current_key: &str, last_key: &str, new_value: &Path) {
    let previous = store.get_string(current_key).unwrap_or_default();
    store.set_string(last_key, &previous);

    let current = new_value.to_string_lossy();
    store.set_string(current_key, &current);
    info!(%previous, %current, "Switched {}", current_key);
}
