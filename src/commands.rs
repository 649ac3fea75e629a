//! Toolbar and context menu commands.
//!
//! Each command maps onto one [`CanvasController`] command method; the
//! labels are what the default toolbar and menu show.

use crate::controller::{CanvasController, ContextMenuRequest, Reaction};
use crate::node::{NodeId, NodeKind};
use std::fmt;

/// A toolbar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarCommand {
    /// Add a node of the kind at the view centre.
    AddNode(NodeKind),
    ClearAll,
}

impl ToolbarCommand {
    /// Toolbar buttons in display order.
    pub const ALL: [ToolbarCommand; 4] = [
        ToolbarCommand::AddNode(NodeKind::Input),
        ToolbarCommand::AddNode(NodeKind::Process),
        ToolbarCommand::AddNode(NodeKind::Output),
        ToolbarCommand::ClearAll,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ToolbarCommand::AddNode(NodeKind::Input) => "Add Input Node",
            ToolbarCommand::AddNode(NodeKind::Process) => "Add Process Node",
            ToolbarCommand::AddNode(NodeKind::Output) => "Add Output Node",
            ToolbarCommand::ClearAll => "Clear All",
        }
    }

    /// Run the command. Returns the created node for `AddNode`.
    pub fn apply(self, controller: &mut CanvasController) -> Option<NodeId> {
        match self {
            ToolbarCommand::AddNode(kind) => Some(controller.add_node(kind)),
            ToolbarCommand::ClearAll => {
                controller.clear();
                None
            }
        }
    }
}

impl fmt::Display for ToolbarCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An entry of the canvas context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMenuAction {
    /// Add a node of the configured default kind at the click position.
    AddNode,
    ToggleGrid,
    ResetZoom,
}

impl ContextMenuAction {
    /// Menu entries in display order.
    pub const ALL: [ContextMenuAction; 3] = [
        ContextMenuAction::AddNode,
        ContextMenuAction::ToggleGrid,
        ContextMenuAction::ResetZoom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ContextMenuAction::AddNode => "Add Node",
            ContextMenuAction::ToggleGrid => "Toggle Grid",
            ContextMenuAction::ResetZoom => "Reset Zoom",
        }
    }

    /// Look up an entry by its position in [`ALL`](Self::ALL), as reported
    /// by a Slint menu.
    pub fn from_index(index: i32) -> Option<ContextMenuAction> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn apply(self, controller: &mut CanvasController, request: &ContextMenuRequest) -> Reaction {
        controller.apply_context_action(self, request)
    }
}

impl fmt::Display for ContextMenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
