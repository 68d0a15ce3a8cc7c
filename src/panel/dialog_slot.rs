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

//! One-dialog-at-a-time guard
//!
//! A panel opens at most one dialog of each kind. `DialogSlot::open` hands
//! out a `DialogTicket`; the slot stays taken until the ticket is dropped.

use std::cell::Cell;
use std::rc::Rc;

/// Tracks whether a dialog of one kind is open
#[derive(Clone, Debug, Default)]
pub struct DialogSlot {
    open: Rc<Cell<bool>>,
}

/// Proof that a dialog is open. Dropping it closes the slot.
#[derive(Debug)]
pub struct DialogTicket {
    open: Rc<Cell<bool>>,
}

impl DialogSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the slot, or returns `None` if a dialog is already open.
    pub fn open(&self) -> Option<DialogTicket> {
        if self.open.replace(true) {
            return None;
        }
        Some(DialogTicket {
            open: self.open.clone(),
        })
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }
}

impl Drop for DialogTicket {
    fn drop(&mut self) {
        self.open.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_open_refused_until_close() {
        let slot = DialogSlot::new();

        let ticket = slot.open();
        assert!(ticket.is_some());
        assert!(slot.open().is_none());
        assert!(slot.is_open());

        drop(ticket);
        assert!(!slot.is_open());
        assert!(slot.open().is_some());
    }
}
