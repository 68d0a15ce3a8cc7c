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

//! Display item label construction
//!
//! A label is `prefix + action + suffix`:
//!
//! ```text
//! 003_  BF  _A_50nm_overview
//! ^^^^  ^^  ^^^^^^^^^^^^^^^^
//! no    action    [_sub]_fov"nm"_descr
//! ```
//!
//! Everything here is pure: the same fields and action always give the same
//! label.

use std::path::Path;

use crate::core::types::{DmExtension, ExportTarget, NamingFields};
use crate::core::validator::{validate_naming_fields, validate_number, NamingError, NUMBER_WIDTH};

/// Zero-pads `No` to three digits and appends the separator.
///
/// # Errors
///
/// `NamingError::NonNumericNumber` for anything but digits,
/// `NamingError::NumberTooWide` for more than three digits.
pub fn label_prefix(no: &str) -> Result<String, NamingError> {
    let no = validate_number(no)?;
    Ok(format!("{:0>width$}_", no, width = NUMBER_WIDTH))
}

/// Builds `[_sub]_FOVnm_descr`. An empty `sub` drops its whole segment.
pub fn label_suffix(sub: &str, fov: &str, descr: &str) -> String {
    if sub.is_empty() {
        format!("_{}nm_{}", fov, descr)
    } else {
        format!("_{}_{}nm_{}", sub, fov, descr)
    }
}

/// Builds the display item label for one export action.
///
/// # Example
///
/// ```
/// use superstem_export::core::{naming::build_label, NamingFields};
///
/// let fields = NamingFields::new("3", "", "50", "overview");
/// assert_eq!(build_label(&fields, "HAADF")?, "003_HAADF_50nm_overview");
/// # Ok::<(), superstem_export::core::NamingError>(())
/// ```
pub fn build_label(fields: &NamingFields, action: &str) -> Result<String, NamingError> {
    let target = build_target(fields, action, Path::new(""), DmExtension::default())?;
    Ok(target.label())
}

/// Derives the full write target for an action inside `directory`.
pub fn build_target(
    fields: &NamingFields,
    action: &str,
    directory: &Path,
    extension: DmExtension,
) -> Result<ExportTarget, NamingError> {
    validate_naming_fields(fields, action)?;

    Ok(ExportTarget {
        base_directory: directory.to_path_buf(),
        label_prefix: label_prefix(&fields.no)?,
        label_body: action.to_string(),
        label_suffix: label_suffix(&fields.sub, &fields.fov, &fields.descr),
        extension,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_padding() {
        assert_eq!(label_prefix("7").unwrap(), "007_");
        assert_eq!(label_prefix("42").unwrap(), "042_");
        assert_eq!(label_prefix("123").unwrap(), "123_");
    }

    #[test]
    fn test_suffix_without_sub() {
        assert_eq!(label_suffix("", "50", "overview"), "_50nm_overview");
    }

    #[test]
    fn test_suffix_with_sub() {
        assert_eq!(label_suffix("A", "50", "overview"), "_A_50nm_overview");
    }

    #[test]
    fn test_target_file_name() {
        let fields = NamingFields::new("12", "", "20", "edge");
        let target = build_target(&fields, "BF", Path::new("/data/exp"), DmExtension::Dm3).unwrap();

        assert_eq!(target.file_name(), "012_BF_20nm_edge.dm3");
        assert_eq!(target.path(), Path::new("/data/exp/012_BF_20nm_edge.dm3"));
    }
}
