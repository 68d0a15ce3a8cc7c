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

//! Writer lookup and the stand-in writers used outside a host
//!
//! Real DigitalMicrograph encoding belongs to the host's import/export
//! manager. `CopyWriter` lets the command-line front end export an already
//! encoded file under its derived name.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::warn;

use crate::core::{DisplayItem, Writer};

/// Id of the DigitalMicrograph writer
pub const DM_WRITER_ID: &str = "dm-io-handler";

/// Writers by id, resolved once when a panel is built
#[derive(Clone, Default)]
pub struct WriterRegistry {
    writers: HashMap<String, Rc<dyn Writer>>,
}

impl WriterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a writer under its own id, replacing any previous one.
    pub fn register(&mut self, writer: Rc<dyn Writer>) {
        self.writers.insert(writer.id().to_string(), writer);
    }

    pub fn get_writer_by_id(&self, id: &str) -> Option<Rc<dyn Writer>> {
        self.writers.get(id).cloned()
    }
}

/// A display item that is nothing but a title
#[derive(Debug)]
pub struct MemoryItem {
    title: RefCell<String>,
}

impl MemoryItem {
    pub fn new(title: &str) -> Self {
        Self {
            title: RefCell::new(title.to_string()),
        }
    }
}

impl DisplayItem for MemoryItem {
    fn title(&self) -> String {
        self.title.borrow().clone()
    }

    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }
}

/// Writes a copy of an existing file, registered as `dm-io-handler`.
///
/// Opens the target with `create_new`, so even a file appearing between the
/// existence check and the write is never clobbered.
#[derive(Debug)]
pub struct CopyWriter {
    source: PathBuf,
    extensions: Vec<String>,
}

impl CopyWriter {
    /// Creates a writer copying `source`; the extension follows the source
    /// file (`dm3` or `dm4`), defaulting to `dm4`.
    pub fn new(source: PathBuf) -> Self {
        let extension = match source.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("dm3") => "dm3",
            _ => "dm4",
        };
        Self {
            source,
            extensions: vec![extension.to_string(), "dm3".to_string()],
        }
    }
}

impl Writer for CopyWriter {
    fn id(&self) -> &str {
        DM_WRITER_ID
    }

    fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn write(&self, _item: &dyn DisplayItem, path: &Path) -> io::Result<()> {
        let mut source = fs::File::open(&self.source)?;
        let mut target = OpenOptions::new().write(true).create_new(true).open(path)?;

        let copied = io::copy(&mut source, &mut target).and_then(|_| target.sync_all());
        if let Err(e) = copied {
            // Never leave a truncated file at the target
            drop(target);
            if let Err(remove_error) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %remove_error, "Could not remove partial export");
            }
            return Err(e);
        }
        Ok(())
    }
}
