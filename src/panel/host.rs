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

//! Seams to the host application
//!
//! The host owns the event loop, the widgets and the document model. The
//! panel only talks to it through these traits, which keeps every panel
//! behaviour testable without a display.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

use crate::core::DisplayItem;
use crate::panel::dialog_slot::DialogTicket;

/// Deferred work for the UI thread
pub type Task = Box<dyn FnOnce()>;

/// Host task queue: tasks run on the UI thread after the current handler
/// returns.
pub trait TaskQueue {
    fn queue_task(&self, task: Task);
}

/// A control whose enabled state follows panel readiness (an export button)
pub trait ActionControl {
    fn set_enabled(&self, enabled: bool);
    fn is_enabled(&self) -> bool;
}

/// Access to the host's current document window
pub trait DocumentHost {
    /// The display item currently selected, if any
    fn selected_display_item(&self) -> Option<Rc<dyn DisplayItem>>;
}

/// Shows modal warnings.
///
/// The host keeps `ticket` alive while the dialog is open and drops it on
/// close, which frees the panel's warning slot.
pub trait WarningPresenter {
    fn show_warning(&self, message: &str, ticket: DialogTicket);
}

/// Registers newly created libraries as host projects
pub trait ProjectHost {
    fn create_project_reference(&self, directory: &Path, name: &str);
}

/// Simple FIFO task queue drained explicitly, one "UI tick" at a time.
///
/// Used by the command-line front end and tests in place of a real event loop.
#[derive(Default)]
pub struct UiTaskQueue {
    tasks: RefCell<VecDeque<Task>>,
}

impl UiTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs queued tasks until the queue is empty, including tasks queued by
    /// tasks. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            // Release the borrow before running so tasks may queue more work
            let next = self.tasks.borrow_mut().pop_front();
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }
}

impl TaskQueue for UiTaskQueue {
    fn queue_task(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}
