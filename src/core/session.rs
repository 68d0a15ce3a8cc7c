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

//! Session metadata access
//!
//! The host owns session metadata (it shows it in its own "Session" panel);
//! this crate only reads and writes single keys through `SessionStore`.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::core::types::SessionField;

/// Read/write access to the host's session metadata.
pub trait SessionStore {
    /// Returns the value of a field, `None` when unset.
    fn get_value(&self, field: SessionField) -> Option<String>;

    fn set_value(&self, field: SessionField, value: &str);

    /// Value of a field with unset mapped to an empty string
    fn value_or_empty(&self, field: SessionField) -> String {
        self.get_value(field).unwrap_or_default()
    }
}

/// In-memory session metadata, keyed like the host library
/// (`stem.session.<field>`).
#[derive(Debug, Default)]
pub struct SessionMetadata {
    values: RefCell<HashMap<String, String>>,
}

impl SessionMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for tests and the CLI
    pub fn with(self, field: SessionField, value: &str) -> Self {
        self.set_value(field, value);
        self
    }
}

impl SessionStore for SessionMetadata {
    fn get_value(&self, field: SessionField) -> Option<String> {
        self.values.borrow().get(&field.library_key()).cloned()
    }

    fn set_value(&self, field: SessionField, value: &str) {
        self.values
            .borrow_mut()
            .insert(field.library_key(), value.to_string());
    }
}
