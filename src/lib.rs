// Copyright 2025 bakri (tidynest@proton.me)
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

//! SuperSTEM Export
//!
//! Naming, export-directory and safe-export logic behind the SuperSTEM
//! microscopy export panels, independent of any GUI toolkit.
//!
//! # Features
//!
//! - **Field Gating:** Export actions stay disabled until the required naming
//!   fields (and the export directory) are filled in
//! - **Naming Convention:** `NNN_ACTION[_sub]_FOVnm_descr.dm4` labels
//! - **Export Directories:** `YYYY_MM_DD_MICROSCOPIST_sample_area` below a
//!   configurable base directory
//! - **Non-Destructive Writes:** An existing file is never overwritten
//! - **New Libraries:** Unique library names and empty workspace files
//!
//! # Architecture
//!
//! - **`core`:** Business logic (fields, completeness, labels, export paths)
//! - **`config`:** Settings file and persistent key/value store
//! - **`panel`:** Panel controllers talking to the host through traits
//! - **`logging`:** Subscriber setup for the command-line front end
//!
//! # Examples
//!
//! ## Building a label
//!
//! ```
//! use superstem_export::core::{naming::build_label, NamingFields};
//!
//! let fields = NamingFields::new("12", "A", "20", "edge");
//! assert_eq!(build_label(&fields, "BF")?, "012_BF_A_20nm_edge");
//! # Ok::<(), superstem_export::core::NamingError>(())
//! ```
//!
//! ## Gating on field completeness
//!
//! ```
//! use superstem_export::core::{FieldCompletenessTracker, NamingField};
//!
//! let mut tracker = FieldCompletenessTracker::<NamingField>::new();
//! tracker.record_field_change(NamingField::No, "3");
//! tracker.record_field_change(NamingField::Fov, "50");
//! assert!(!tracker.is_ready());
//!
//! tracker.record_field_change(NamingField::Descr, "overview");
//! assert!(tracker.is_ready());
//! ```

pub mod config;
pub mod core;
pub mod logging;
pub mod panel;

pub use crate::core::{ExportError, ExportPathResolver, FieldCompletenessTracker, NamingFields};
pub use crate::panel::ExportPanel;
