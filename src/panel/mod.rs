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

//! src/panel/mod.rs
//!
//! Export panel layer
//!
//! Host-facing controllers built on `core`:
//! - `ExportPanel`: naming fields, export directory and export actions
//! - `LibraryDialog`: session metadata and new library creation
//! - Deferred readiness updates and single-instance dialogs
//! - Writers and project switch bookkeeping
//!
//! The host (or the command-line front end) supplies the seams in `host`.

pub mod controller;
pub mod dialog_slot;
pub mod host;
pub mod library_dialog;
pub mod notifier;
pub mod project;
pub mod writer;

pub use controller::{ExportPanel, PanelContext, PanelOptions};
pub use dialog_slot::{DialogSlot, DialogTicket};
pub use host::{ActionControl, DocumentHost, ProjectHost, TaskQueue, UiTaskQueue, WarningPresenter};
pub use library_dialog::{DialogContext, LibraryDialog};
pub use notifier::ReadinessNotifier;
pub use writer::{CopyWriter, MemoryItem, WriterRegistry};

#[cfg(test)]
mod tests;
