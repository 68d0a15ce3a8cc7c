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

//! src/core/types.rs
//!
//! Core type definitions for session naming and export
//!
//! This module defines the fundamental types used throughout the crate:
//! - `NamingField`: The four editable quick-export fields (No, Sub, FOV, Description)
//! - `SessionField`: Session metadata keys shared with the host library
//! - `FieldEdit`: A committed edit of one field (replaces keyword dispatch)
//! - `NamingFields`: Current values of the quick-export fields
//! - `DmExtension` / `ExportTarget`: The derived write target
//!
//! Field kinds implement `TrackedField` so the completeness tracker can be
//! reused by every form with its own required subset.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::path::PathBuf;

/// A form field whose presence is tracked for readiness.
pub trait TrackedField: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Fields that must hold a value before dependent actions may run
    fn required() -> &'static [Self];

    /// Resolves a host-side field id (e.g. `"fov"`) to a field
    fn from_id(id: &str) -> Option<Self>;

    /// Host-side field id
    fn id(&self) -> &'static str;
}

/// Editable fields of the quick-export row
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum NamingField {
    /// Running image number, zero-padded to three digits
    No,
    /// Optional sub-index
    Sub,
    /// Field of view in nanometres
    Fov,
    /// Free-text description
    Descr,
}

impl NamingField {
    /// All fields in panel order
    pub const ALL: [NamingField; 4] = [
        NamingField::No,
        NamingField::Sub,
        NamingField::Fov,
        NamingField::Descr,
    ];
}

impl TrackedField for NamingField {
    fn required() -> &'static [Self] {
        &[NamingField::No, NamingField::Fov, NamingField::Descr]
    }

    fn from_id(id: &str) -> Option<Self> {
        match id {
            "no" => Some(NamingField::No),
            "sub" => Some(NamingField::Sub),
            "fov" => Some(NamingField::Fov),
            "descr" => Some(NamingField::Descr),
            _ => None,
        }
    }

    fn id(&self) -> &'static str {
        match self {
            NamingField::No => "no",
            NamingField::Sub => "sub",
            NamingField::Fov => "fov",
            NamingField::Descr => "descr",
        }
    }
}

impl fmt::Display for NamingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingField::No => write!(f, "No"),
            NamingField::Sub => write!(f, "Sub"),
            NamingField::Fov => write!(f, "FOV"),
            NamingField::Descr => write!(f, "Description"),
        }
    }
}

/// Session metadata keys
///
/// The host stores these as `stem.session.<id>` library values.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum SessionField {
    Site,
    Instrument,
    /// Project number, optional
    Task,
    /// Three-letter acronym of the operator, uppercased in derived names
    Microscopist,
    Sample,
    /// Sample description
    SampleArea,
}

impl SessionField {
    /// All fields in new-library dialog order
    pub const ALL: [SessionField; 6] = [
        SessionField::Site,
        SessionField::Instrument,
        SessionField::Task,
        SessionField::Microscopist,
        SessionField::Sample,
        SessionField::SampleArea,
    ];

    /// Key under which the host library stores this field
    pub fn library_key(&self) -> String {
        format!("stem.session.{}", self.id())
    }
}

impl TrackedField for SessionField {
    fn required() -> &'static [Self] {
        &[
            SessionField::Microscopist,
            SessionField::Sample,
            SessionField::SampleArea,
        ]
    }

    fn from_id(id: &str) -> Option<Self> {
        match id {
            "site" => Some(SessionField::Site),
            "instrument" => Some(SessionField::Instrument),
            "task" => Some(SessionField::Task),
            "microscopist" => Some(SessionField::Microscopist),
            "sample" => Some(SessionField::Sample),
            "sample_area" => Some(SessionField::SampleArea),
            _ => None,
        }
    }

    fn id(&self) -> &'static str {
        match self {
            SessionField::Site => "site",
            SessionField::Instrument => "instrument",
            SessionField::Task => "task",
            SessionField::Microscopist => "microscopist",
            SessionField::Sample => "sample",
            SessionField::SampleArea => "sample_area",
        }
    }
}

/// A committed edit of a single field ("editing finished", not per keystroke)
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldEdit<F> {
    pub field: F,
    pub text: String,
}

impl<F> FieldEdit<F> {
    pub fn new(field: F, text: impl Into<String>) -> Self {
        Self {
            field,
            text: text.into(),
        }
    }
}

/// Current values of the quick-export naming fields
///
/// Created blank per panel and never persisted; values are stored trimmed.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct NamingFields {
    pub no: String,
    pub sub: String,
    pub fov: String,
    pub descr: String,
}

impl NamingFields {
    /// Convenience constructor, mostly for tests and the CLI
    pub fn new(no: &str, sub: &str, fov: &str, descr: &str) -> Self {
        Self {
            no: no.trim().to_string(),
            sub: sub.trim().to_string(),
            fov: fov.trim().to_string(),
            descr: descr.trim().to_string(),
        }
    }

    /// Applies a committed edit
    pub fn apply(&mut self, edit: &FieldEdit<NamingField>) {
        let value = edit.text.trim().to_string();
        match edit.field {
            NamingField::No => self.no = value,
            NamingField::Sub => self.sub = value,
            NamingField::Fov => self.fov = value,
            NamingField::Descr => self.descr = value,
        }
    }

    pub fn get(&self, field: NamingField) -> &str {
        match field {
            NamingField::No => &self.no,
            NamingField::Sub => &self.sub,
            NamingField::Fov => &self.fov,
            NamingField::Descr => &self.descr,
        }
    }
}

/// DigitalMicrograph file flavours accepted by the export filter
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum DmExtension {
    Dm3,
    #[default]
    Dm4,
}

impl DmExtension {
    /// Parses a writer extension, case-insensitively and with or without a dot
    pub fn parse(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "dm3" => Some(DmExtension::Dm3),
            "dm4" => Some(DmExtension::Dm4),
            _ => None,
        }
    }
}

impl fmt::Display for DmExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DmExtension::Dm3 => write!(f, "dm3"),
            DmExtension::Dm4 => write!(f, "dm4"),
        }
    }
}

/// A fully derived write target
///
/// Never stored: recomputed from the naming fields, the action and the
/// persisted export directory every time an export runs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExportTarget {
    pub base_directory: PathBuf,
    /// `NNN_`
    pub label_prefix: String,
    /// The action name, e.g. `HAADF`
    pub label_body: String,
    /// `[_sub]_FOVnm_descr`
    pub label_suffix: String,
    pub extension: DmExtension,
}

impl ExportTarget {
    /// Display item title this target names
    pub fn label(&self) -> String {
        format!("{}{}{}", self.label_prefix, self.label_body, self.label_suffix)
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.label(), self.extension)
    }

    pub fn path(&self) -> PathBuf {
        self.base_directory.join(self.file_name())
    }
}
