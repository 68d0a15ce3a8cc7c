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

//! Naming field validation
//!
//! Labels become file names inside the export directory, so every piece
//! that goes into one is checked before any filesystem call:
//! - `No` must be one to three ASCII digits (it is zero-padded to three)
//! - No component may contain a path separator or a NUL byte

use thiserror::Error;

use crate::core::types::NamingField;

/// Width the `No` field is zero-padded to
pub const NUMBER_WIDTH: usize = 3;

/// Characters that would let a label escape the export directory
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '\0'];

/// Naming validation errors
#[derive(Debug, Error, PartialEq)]
pub enum NamingError {
    /// `No` contains something other than ASCII digits
    #[error("Image number '{0}' is not numeric")]
    NonNumericNumber(String),

    /// `No` has more digits than the padding width
    #[error("Image number '{0}' has more than three digits")]
    NumberTooWide(String),

    /// A component would change the directory the file lands in
    #[error("{field} '{value}' contains a path separator")]
    PathSeparator { field: String, value: String },
}

/// Validates the `No` field and returns it trimmed.
pub fn validate_number(no: &str) -> Result<&str, NamingError> {
    let no = no.trim();

    if no.is_empty() || !no.chars().all(|c| c.is_ascii_digit()) {
        return Err(NamingError::NonNumericNumber(no.to_string()));
    }

    if no.len() > NUMBER_WIDTH {
        return Err(NamingError::NumberTooWide(no.to_string()));
    }

    Ok(no)
}

/// Rejects label components containing path separators
pub fn validate_component(field: &str, value: &str) -> Result<(), NamingError> {
    if value.contains(FORBIDDEN_CHARS) {
        return Err(NamingError::PathSeparator {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Validates every naming field plus the action name.
pub fn validate_naming_fields(
    fields: &crate::core::types::NamingFields,
    action: &str,
) -> Result<(), NamingError> {
    validate_number(&fields.no)?;

    for field in NamingField::ALL {
        validate_component(&field.to_string(), fields.get(field))?;
    }
    validate_component("Action", action)
}
