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

//! src/core/mod.rs
//!
//! Core business logic module
//!
//! This module contains the data structures and algorithms behind the
//! export panels:
//! - Type definitions for naming fields, session keys and write targets
//! - Field completeness tracking that gates export actions
//! - Label construction and naming validation
//! - Export directory derivation and the non-destructive write
//! - New library naming and creation
//!
//! All business logic is isolated from the host UI so it can be tested
//! without a running application.

pub mod completeness;
pub mod error;
pub mod library;
pub mod naming;
pub mod resolver;
pub mod session;
pub mod types;
pub mod validator;

pub use completeness::FieldCompletenessTracker;
pub use error::ExportError;
pub use resolver::{DisplayItem, ExportPathResolver, Writer};
pub use session::{SessionMetadata, SessionStore};
pub use types::*;
pub use validator::NamingError;

#[cfg(test)]
mod tests;
