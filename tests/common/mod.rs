//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use slint_node_canvas::{ContextMenuRequest, Reaction};
use std::cell::RefCell;
use std::rc::Rc;

/// Records reactions forwarded by an `EditorHandle`.
#[derive(Default, Clone)]
pub struct ReactionTracker {
    /// Count of redraw requests
    pub redraws: Rc<RefCell<usize>>,
    /// Context menu requests in order
    pub context_menus: Rc<RefCell<Vec<ContextMenuRequest>>>,
}

impl ReactionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, reaction: Reaction) {
        match reaction {
            Reaction::Redraw => *self.redraws.borrow_mut() += 1,
            Reaction::ContextMenu(request) => self.context_menus.borrow_mut().push(request),
            Reaction::Ignored => {}
        }
    }

    pub fn redraw_count(&self) -> usize {
        *self.redraws.borrow()
    }

    pub fn last_context_menu(&self) -> Option<ContextMenuRequest> {
        self.context_menus.borrow().last().copied()
    }

    /// Clear all recorded reactions.
    pub fn clear(&self) {
        *self.redraws.borrow_mut() = 0;
        self.context_menus.borrow_mut().clear();
    }
}
