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

//! Deferred readiness propagation
//!
//! Field handlers never touch controls directly. `ReadinessNotifier` keeps a
//! single pending slot: the first change in a handler queues one apply task
//! on the host queue, later changes before the next tick only overwrite the
//! pending value. When the task runs, every registered control is set to
//! the latest value.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::debug;

use crate::panel::host::{ActionControl, TaskQueue};

/// Synchronises registered controls with the panel's readiness flag.
pub struct ReadinessNotifier {
    controls: Rc<RefCell<Vec<Rc<dyn ActionControl>>>>,
    /// `Some` while an apply task is queued
    pending: Rc<Cell<Option<bool>>>,
    queue: Rc<dyn TaskQueue>,
}

impl ReadinessNotifier {
    pub fn new(queue: Rc<dyn TaskQueue>) -> Self {
        Self {
            controls: Rc::new(RefCell::new(Vec::new())),
            pending: Rc::new(Cell::new(None)),
            queue,
        }
    }

    pub fn register(&self, control: Rc<dyn ActionControl>) {
        self.controls.borrow_mut().push(control);
    }

    pub fn control_count(&self) -> usize {
        self.controls.borrow().len()
    }

    /// Drops every registered control (panel close).
    pub fn clear(&self) {
        self.controls.borrow_mut().clear();
    }

    /// Schedules all controls to follow `ready` on the next UI tick.
    ///
    /// Safe to call redundantly.
    pub fn on_ready_changed(&self, ready: bool) {
        if self.pending.replace(Some(ready)).is_some() {
            debug!(ready, "Readiness update already queued, value replaced");
            return;
        }

        let pending = self.pending.clone();
        let controls = self.controls.clone();
        self.queue.queue_task(Box::new(move || {
            if let Some(ready) = pending.take() {
                for control in controls.borrow().iter() {
                    control.set_enabled(ready);
                }
                debug!(ready, "Applied readiness to export controls");
            }
        }));
    }

    pub fn has_pending_update(&self) -> bool {
        self.pending.get().is_some()
    }
}
