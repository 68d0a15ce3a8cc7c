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

//! New library dialog
//!
//! Edits the session metadata and derives a unique library name from it once
//! microscopist, sample and sample area are all filled in. "Create" makes the
//! library directory with an empty workspace file and registers it with the
//! host as a project.

use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info, warn};

use crate::config::SuperstemSettings;
use crate::core::library::{self, derive_library_name, LibraryReference};
use crate::core::{FieldCompletenessTracker, FieldEdit, SessionField, SessionStore};
use crate::panel::dialog_slot::DialogTicket;
use crate::panel::host::{ProjectHost, TaskQueue};

/// Host seams the dialog needs
#[derive(Clone)]
pub struct DialogContext {
    pub session: Rc<dyn SessionStore>,
    pub queue: Rc<dyn TaskQueue>,
    pub projects: Rc<dyn ProjectHost>,
    pub settings: SuperstemSettings,
}

pub struct LibraryDialog {
    ctx: DialogContext,
    data_base_directory: PathBuf,
    today: NaiveDate,
    values: RefCell<HashMap<SessionField, String>>,
    tracker: RefCell<FieldCompletenessTracker<SessionField>>,
    /// Displayed library name, written by queued UI tasks
    library_name: Rc<RefCell<String>>,
    _ticket: Option<DialogTicket>,
}

impl LibraryDialog {
    /// Opens the dialog with fields prefilled from the session.
    ///
    /// Blank site and instrument fall back to the `superstem_site` and
    /// `superstem_instrument` settings.
    pub fn new(ctx: DialogContext, today: NaiveDate) -> Self {
        let mut values = HashMap::new();
        let mut tracker = FieldCompletenessTracker::new();

        for field in SessionField::ALL {
            let mut value = ctx.session.value_or_empty(field);
            if value.trim().is_empty() {
                let fallback = match field {
                    SessionField::Site => ctx.settings.superstem_site.clone(),
                    SessionField::Instrument => ctx.settings.superstem_instrument.clone(),
                    _ => None,
                };
                value = fallback.unwrap_or_default();
            }
            tracker.record_field_change(field, &value);
            values.insert(field, value);
        }

        let dialog = Self {
            data_base_directory: ctx.settings.data_base_directory(),
            ctx,
            today,
            values: RefCell::new(values),
            tracker: RefCell::new(tracker),
            library_name: Rc::new(RefCell::new(String::new())),
            _ticket: None,
        };
        dialog.refresh_library_name();
        dialog
    }

    /// Ties the dialog to a slot; the slot frees when the dialog drops.
    pub(crate) fn with_ticket(mut self, ticket: DialogTicket) -> Self {
        self._ticket = Some(ticket);
        self
    }

    pub fn field_value(&self, field: SessionField) -> String {
        self.values.borrow().get(&field).cloned().unwrap_or_default()
    }

    pub fn is_ready(&self) -> bool {
        self.tracker.borrow().is_ready()
    }

    /// Library name as currently displayed; empty until the required
    /// fields are filled in
    pub fn library_name(&self) -> String {
        self.library_name.borrow().clone()
    }

    pub fn data_base_directory(&self) -> &Path {
        &self.data_base_directory
    }

    /// Handles "editing finished" on a session field.
    pub fn on_field_edited(&self, edit: FieldEdit<SessionField>) {
        let text = edit.text.trim();
        debug!(field = ?edit.field, %text, "Session field edited");

        self.ctx.session.set_value(edit.field, text);
        self.values.borrow_mut().insert(edit.field, text.to_string());
        self.tracker.borrow_mut().record_edit(&edit);
        self.refresh_library_name();
    }

    /// Queues the displayed name update: the derived name when ready,
    /// blank otherwise.
    fn refresh_library_name(&self) {
        let name = if self.is_ready() {
            derive_library_name(
                self.ctx.session.as_ref(),
                &self.data_base_directory,
                self.today,
            )
        } else {
            String::new()
        };
        let slot = Rc::clone(&self.library_name);
        self.ctx.queue.queue_task(Box::new(move || {
            *slot.borrow_mut() = name;
        }));
    }

    /// "Create": makes the library and registers it as a host project.
    ///
    /// Returns `Ok(None)` without touching the filesystem while a required
    /// field is blank or no library name is displayed yet.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from creating the directory or workspace file.
    pub fn create_library(&self) -> io::Result<Option<LibraryReference>> {
        let name = self.library_name();
        if !self.is_ready() || name.is_empty() {
            let missing = self.tracker.borrow().missing_fields();
            warn!(?missing, "Missing field for library name");
            return Ok(None);
        }

        let reference = library::create_library(&self.data_base_directory, &name)?;
        self.ctx
            .projects
            .create_project_reference(&reference.directory, &reference.name);
        info!(library = %reference.name, "Library created");
        Ok(Some(reference))
    }
}
