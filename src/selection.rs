use crate::node::{ConnectionId, NodeId};
use indexmap::IndexSet;
use slint::{Model, VecModel};
use std::hash::Hash;

/// Something the user can select on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectedItem {
    Node(NodeId),
    Connection(ConnectionId),
}

impl SelectedItem {
    pub fn node(self) -> Option<NodeId> {
        match self {
            SelectedItem::Node(id) => Some(id),
            SelectedItem::Connection(_) => None,
        }
    }

    pub fn connection(self) -> Option<ConnectionId> {
        match self {
            SelectedItem::Connection(id) => Some(id),
            SelectedItem::Node(_) => None,
        }
    }
}

/// Node and connection ids come from one counter, so the raw id alone is
/// unambiguous.
impl From<SelectedItem> for i32 {
    fn from(item: SelectedItem) -> i32 {
        match item {
            SelectedItem::Node(id) => id.0,
            SelectedItem::Connection(id) => id.0,
        }
    }
}

impl From<NodeId> for SelectedItem {
    fn from(id: NodeId) -> Self {
        SelectedItem::Node(id)
    }
}

impl From<ConnectionId> for SelectedItem {
    fn from(id: ConnectionId) -> Self {
        SelectedItem::Connection(id)
    }
}

/// Set of selected items with click / shift-click semantics.
///
/// Iteration follows the order items were selected in.
#[derive(Debug, Clone)]
pub struct SelectionManager<T = SelectedItem> {
    selected: IndexSet<T>,
}

impl<T> Default for SelectionManager<T> {
    fn default() -> Self {
        Self {
            selected: IndexSet::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> SelectionManager<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a click on an item based on interaction modifiers
    ///
    /// Shift toggles the item. A plain click makes it the only selected item.
    pub fn handle_interaction(&mut self, item: T, shift_held: bool) {
        if shift_held {
            if !self.selected.shift_remove(&item) {
                self.selected.insert(item);
            }
        } else {
            if self.selected.len() == 1 && self.selected.contains(&item) {
                return;
            }
            self.selected.clear();
            self.selected.insert(item);
        }
    }

    /// Handle a press that may start a drag.
    ///
    /// Like [`handle_interaction`](Self::handle_interaction), except a plain
    /// press on an already selected item keeps the whole selection so that
    /// it can be dragged together.
    pub fn handle_press(&mut self, item: T, shift_held: bool) {
        if !shift_held && self.selected.contains(&item) {
            return;
        }
        self.handle_interaction(item, shift_held);
    }

    /// Clear the current selection
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Replace the current selection with a new set of items
    pub fn replace_selection<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.selected.clear();
        self.selected.extend(items);
    }

    /// Add items without removing existing ones
    pub fn extend<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.selected.extend(items);
    }

    /// Drop items for which `keep` returns false, e.g. after deletions
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.selected.retain(|item| keep(item));
    }

    /// Check if an item is selected
    pub fn contains(&self, item: T) -> bool {
        self.selected.contains(&item)
    }

    /// Get an iterator over the selected items
    pub fn iter(&self) -> indexmap::set::Iter<'_, T> {
        self.selected.iter()
    }

    /// Get the number of selected items
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if the selection is empty
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

impl<T: Copy + Eq + Hash + Into<i32>> SelectionManager<T> {
    /// Sync the selection set to a Slint VecModel of raw ids
    pub fn sync_to_model(&self, model: &VecModel<i32>) {
        let ids: Vec<i32> = self.selected.iter().map(|&item| item.into()).collect();
        if model.iter().eq(ids.iter().copied()) {
            return;
        }
        model.set_vec(ids);
    }
}

impl SelectionManager<SelectedItem> {
    /// Selected node ids in selection order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.selected.iter().filter_map(|item| item.node())
    }

    /// Selected connection ids in selection order
    pub fn connections(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.selected.iter().filter_map(|item| item.connection())
    }
}
