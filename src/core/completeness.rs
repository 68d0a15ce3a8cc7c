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

//! Field completeness tracking
//!
//! Keeps a "has value" flag per field and folds the required subset into a
//! single readiness flag. Optional fields are tracked too but never gate.
//!
//! The export panel variant carries an extra per-instance gate: the export
//! directory must have been set at least once before exports are allowed.
//! The gate lives on the tracker itself so two panels never share it.

use std::collections::HashSet;

use crate::core::types::{FieldEdit, TrackedField};

/// Boolean bookkeeping behind export-button enablement.
///
/// This component cannot fail. Pushing the result into UI controls is the
/// job of `panel::notifier::ReadinessNotifier`.
#[derive(Clone, Debug)]
pub struct FieldCompletenessTracker<F: TrackedField> {
    /// Fields whose last committed text was non-blank
    present: HashSet<F>,
    /// `None` when the export directory gate is not in use
    export_directory_set: Option<bool>,
}

impl<F: TrackedField> FieldCompletenessTracker<F> {
    /// Creates a tracker gated only on the required fields of `F`.
    pub fn new() -> Self {
        Self {
            present: HashSet::new(),
            export_directory_set: None,
        }
    }

    /// Creates a tracker that additionally requires the export directory to
    /// have been set at least once.
    pub fn with_export_directory_gate() -> Self {
        Self {
            present: HashSet::new(),
            export_directory_set: Some(false),
        }
    }

    /// Records the latest committed text of a field.
    pub fn record_field_change(&mut self, field: F, new_text: &str) {
        if new_text.trim().is_empty() {
            self.present.remove(&field);
        } else {
            self.present.insert(field);
        }
    }

    pub fn record_edit(&mut self, edit: &FieldEdit<F>) {
        self.record_field_change(edit.field, &edit.text);
    }

    /// Records a change addressed by host field id. Unknown ids are ignored.
    pub fn record_field_id_change(&mut self, field_id: &str, new_text: &str) {
        if let Some(field) = F::from_id(field_id) {
            self.record_field_change(field, new_text);
        }
    }

    pub fn has_value(&self, field: F) -> bool {
        self.present.contains(&field)
    }

    /// True when every required field has a value (and the export directory
    /// gate, if any, has been passed).
    pub fn is_ready(&self) -> bool {
        let fields_ready = F::required().iter().all(|f| self.present.contains(f));
        fields_ready && self.export_directory_set.unwrap_or(true)
    }

    /// Required fields that are still blank, in declaration order
    pub fn missing_fields(&self) -> Vec<F> {
        F::required()
            .iter()
            .filter(|f| !self.present.contains(f))
            .copied()
            .collect()
    }

    /// Passes the export directory gate. One-shot: stays set until the
    /// directory field is explicitly blanked.
    pub fn mark_export_directory_set(&mut self) {
        if let Some(set) = self.export_directory_set.as_mut() {
            *set = true;
        }
    }

    /// Applies a manual edit of the export directory field to the gate.
    ///
    /// Blank text closes the gate again, anything else opens it.
    pub fn record_export_directory_edit(&mut self, text: &str) {
        if let Some(set) = self.export_directory_set.as_mut() {
            *set = !text.trim().is_empty();
        }
    }

    /// Whether the export directory gate has been passed. Always true for
    /// trackers without the gate.
    pub fn export_directory_set(&self) -> bool {
        self.export_directory_set.unwrap_or(true)
    }

    pub fn has_export_directory_gate(&self) -> bool {
        self.export_directory_set.is_some()
    }
}

impl<F: TrackedField> Default for FieldCompletenessTracker<F> {
    fn default() -> Self {
        Self::new()
    }
}
