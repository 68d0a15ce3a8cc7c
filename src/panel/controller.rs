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

//! Export panel controller - mediates between the host and the core
//!
//! # Responsibilities
//!
//! - Track the four naming fields and gate the export actions on them
//! - Derive and persist the export directory ("Set Export Folder")
//! - Accept manual edits of the export directory
//! - Run an export action against the selected display item
//! - Surface the file-exists conflict as the one user-visible warning
//! - Open the new library dialog
//!
//! # Architecture
//!
//! The controller holds the host seams from `panel::host` but never touches
//! widgets. All UI-visible state changes go through the host task queue.

use chrono::{Local, NaiveDate};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, error, info, warn};

use crate::config::store::{keys, PersistentStore, DM_EXPORT_FILTER};
use crate::config::SuperstemSettings;
use crate::core::{
    ExportError, ExportPathResolver, FieldCompletenessTracker, FieldEdit, NamingField,
    NamingFields, SessionStore, TrackedField, Writer,
};
use crate::panel::dialog_slot::DialogSlot;
use crate::panel::host::{
    ActionControl, DocumentHost, ProjectHost, TaskQueue, WarningPresenter,
};
use crate::panel::library_dialog::{DialogContext, LibraryDialog};
use crate::panel::notifier::ReadinessNotifier;
use crate::panel::writer::{WriterRegistry, DM_WRITER_ID};

/// Export actions offered by default, in button order
pub const DEFAULT_ACTIONS: [&str; 11] = [
    "HAADF", "MAADF", "BF", "ABF",
    "LAADF", "SI-Survey", "SI-During", "SI-After",
    "SI-EELS", "EELS-sngl", "Ronchi",
];

/// Export buttons are laid out in rows of this many
pub const BUTTONS_PER_ROW: usize = 4;

/// The only failure shown to the user as a dialog
pub const FILE_EXISTS_MESSAGE: &str = "Could not export - file exists";

/// Everything the panel needs from the host, passed in explicitly
#[derive(Clone)]
pub struct PanelContext {
    pub session: Rc<dyn SessionStore>,
    pub store: Rc<dyn PersistentStore>,
    pub queue: Rc<dyn TaskQueue>,
    pub host: Rc<dyn DocumentHost>,
    pub warnings: Rc<dyn WarningPresenter>,
    pub projects: Rc<dyn ProjectHost>,
    pub writers: WriterRegistry,
    pub settings: SuperstemSettings,
}

/// Panel configuration
#[derive(Clone, Debug)]
pub struct PanelOptions {
    /// Export action names, one button each
    pub actions: Vec<String>,
    /// Writer to export with, resolved once at construction
    pub writer_id: String,
    /// Require "Set Export Folder" (or a manual directory) before exporting
    pub require_export_directory: bool,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            actions: DEFAULT_ACTIONS.iter().map(|a| a.to_string()).collect(),
            writer_id: DM_WRITER_ID.to_string(),
            require_export_directory: true,
        }
    }
}

/// Controller behind one SuperSTEM export panel instance
pub struct ExportPanel {
    ctx: PanelContext,
    actions: Vec<String>,
    writer: Rc<dyn Writer>,
    resolver: ExportPathResolver,
    fields: RefCell<NamingFields>,
    tracker: RefCell<FieldCompletenessTracker<NamingField>>,
    notifier: ReadinessNotifier,
    /// Text of the export directory field
    export_directory: RefCell<String>,
    warning_slot: DialogSlot,
    library_slot: DialogSlot,
}

impl ExportPanel {
    /// Creates a panel with blank fields and every action disabled.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::WriterNotFound` if no writer is registered under
    /// `options.writer_id`.
    pub fn new(ctx: PanelContext, options: PanelOptions) -> Result<Self, ExportError> {
        let writer = ctx
            .writers
            .get_writer_by_id(&options.writer_id)
            .ok_or_else(|| ExportError::WriterNotFound(options.writer_id.clone()))?;

        let resolver = ExportPathResolver::new(export_base_directory(&ctx.settings, ctx.store.as_ref()));
        info!(base = %resolver.base_directory().display(), writer = writer.id(), "Export panel ready");

        let tracker = if options.require_export_directory {
            FieldCompletenessTracker::with_export_directory_gate()
        } else {
            FieldCompletenessTracker::new()
        };

        Ok(Self {
            notifier: ReadinessNotifier::new(ctx.queue.clone()),
            ctx,
            actions: options.actions,
            writer,
            resolver,
            fields: RefCell::new(NamingFields::default()),
            tracker: RefCell::new(tracker),
            export_directory: RefCell::new(String::new()),
            warning_slot: DialogSlot::new(),
            library_slot: DialogSlot::new(),
        })
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Actions grouped into button rows
    pub fn action_rows(&self) -> Vec<&[String]> {
        self.actions.chunks(BUTTONS_PER_ROW).collect()
    }

    pub fn action_index(&self, name: &str) -> Option<usize> {
        self.actions.iter().position(|a| a == name)
    }

    /// Registers an export control and queues its initial state.
    pub fn register_control(&self, control: Rc<dyn ActionControl>) {
        self.notifier.register(control);
        self.notifier.on_ready_changed(self.is_ready());
    }

    pub fn is_ready(&self) -> bool {
        self.tracker.borrow().is_ready()
    }

    pub fn fields(&self) -> NamingFields {
        self.fields.borrow().clone()
    }

    pub fn export_directory_text(&self) -> String {
        self.export_directory.borrow().clone()
    }

    pub fn resolver(&self) -> &ExportPathResolver {
        &self.resolver
    }

    /// Handles "editing finished" on one of the naming fields.
    pub fn on_field_edited(&self, edit: FieldEdit<NamingField>) {
        debug!(field = edit.field.id(), text = %edit.text, "Naming field edited");
        self.fields.borrow_mut().apply(&edit);
        self.tracker.borrow_mut().record_edit(&edit);
        self.notifier.on_ready_changed(self.is_ready());
    }

    /// "Set Export Folder" for today's date.
    pub fn set_export_folder(&self) -> PathBuf {
        self.set_export_folder_on(Local::now().date_naive())
    }

    /// "Set Export Folder": derives the directory from the live session
    /// metadata, persists it with the DM export filter and opens the gate.
    pub fn set_export_folder_on(&self, date: NaiveDate) -> PathBuf {
        let directory = self
            .resolver
            .derive_export_directory(self.ctx.session.as_ref(), date);
        let text = directory.to_string_lossy().into_owned();

        self.persist_export_directory(&text);
        *self.export_directory.borrow_mut() = text;
        self.tracker.borrow_mut().mark_export_directory_set();
        self.notifier.on_ready_changed(self.is_ready());
        directory
    }

    /// Handles a manual edit of the export directory field.
    pub fn on_export_directory_edited(&self, text: &str) {
        let text = text.trim();
        self.persist_export_directory(text);
        *self.export_directory.borrow_mut() = text.to_string();
        self.tracker.borrow_mut().record_export_directory_edit(text);
        self.notifier.on_ready_changed(self.is_ready());
        info!(directory = %text, "Export directory edited");
    }

    fn persist_export_directory(&self, directory: &str) {
        self.ctx.store.set_string(keys::EXPORT_DIRECTORY, directory);
        self.ctx.store.set_string(keys::EXPORT_FILTER, DM_EXPORT_FILTER);
    }

    /// Runs the export action at `index` on the selected display item.
    ///
    /// # Errors
    ///
    /// - `ExportError::NotReady` if the action is disabled
    /// - `ExportError::NoSelection` if nothing is selected
    /// - `ExportError::ExportDirectoryUnset` if no directory is persisted
    /// - `ExportError::FileExists` if the target exists (warning shown)
    /// - anything `ExportPathResolver::export_item` returns
    pub fn export(&self, index: usize) -> Result<PathBuf, ExportError> {
        let action = self
            .actions
            .get(index)
            .ok_or_else(|| ExportError::UnknownAction(index.to_string()))?;

        let tracker = self.tracker.borrow().clone();
        if !tracker.is_ready() {
            let mut missing: Vec<String> = tracker
                .missing_fields()
                .iter()
                .map(|f| f.to_string())
                .collect();
            if !tracker.export_directory_set() {
                missing.push("export directory".to_string());
            }
            return Err(ExportError::NotReady(missing));
        }

        let item = self
            .ctx
            .host
            .selected_display_item()
            .ok_or(ExportError::NoSelection)?;

        let directory = self
            .ctx
            .store
            .get_non_empty(keys::EXPORT_DIRECTORY)
            .ok_or(ExportError::ExportDirectoryUnset)?;
        info!(%directory, %action, "Exporting");

        let result = self.resolver.export_item(
            &self.fields.borrow(),
            action,
            Path::new(&directory),
            item.as_ref(),
            self.writer.as_ref(),
        );

        match &result {
            Ok(path) => info!(path = %path.display(), "Export finished"),
            Err(ExportError::FileExists(path)) => self.show_conflict(path),
            Err(e) => error!(error = %e, %action, "Export failed"),
        }
        result
    }

    /// Exports by action name instead of button index.
    pub fn export_named(&self, action: &str) -> Result<PathBuf, ExportError> {
        let index = self
            .action_index(action)
            .ok_or_else(|| ExportError::UnknownAction(action.to_string()))?;
        self.export(index)
    }

    fn show_conflict(&self, path: &Path) {
        match self.warning_slot.open() {
            Some(ticket) => self.ctx.warnings.show_warning(FILE_EXISTS_MESSAGE, ticket),
            None => warn!(path = %path.display(), "Conflict warning already open"),
        }
    }

    /// Opens the new library dialog for today, unless one is already open.
    pub fn open_library_dialog(&self) -> Option<LibraryDialog> {
        self.open_library_dialog_on(Local::now().date_naive())
    }

    pub fn open_library_dialog_on(&self, today: NaiveDate) -> Option<LibraryDialog> {
        let Some(ticket) = self.library_slot.open() else {
            debug!("Library dialog already open");
            return None;
        };

        let ctx = DialogContext {
            session: self.ctx.session.clone(),
            queue: self.ctx.queue.clone(),
            projects: self.ctx.projects.clone(),
            settings: self.ctx.settings.clone(),
        };
        Some(LibraryDialog::new(ctx, today).with_ticket(ticket))
    }

    /// Releases every registered control (panel close).
    pub fn close(&self) {
        self.notifier.clear();
    }
}

/// Settings value first, then the persisted `export_base_directory`, then
/// the built-in default.
fn export_base_directory(settings: &SuperstemSettings, store: &dyn PersistentStore) -> PathBuf {
    let configured = settings
        .export_base_directory
        .as_deref()
        .is_some_and(|dir| !dir.trim().is_empty());
    if !configured {
        if let Some(stored) = store.get_non_empty(keys::EXPORT_BASE_DIRECTORY) {
            return PathBuf::from(stored);
        }
    }
    settings.export_base_directory()
}
