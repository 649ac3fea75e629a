//! Interaction state machine for the node canvas.
//!
//! The [`CanvasController`] owns the graph, the view transform and the
//! selection. Raw pointer and key events go in, graph mutations and a
//! [`Reaction`] come out. Toolbar and menu actions use the command methods
//! directly.
//!
//! # Example
//!
//! ```
//! use slint_node_canvas::{CanvasController, Modifiers, NodeKind, Point, PointerButton, PointerEvent};
//!
//! let mut ctrl = CanvasController::new();
//! let source = ctrl.add_node_at(NodeKind::Input, Point::new(0.0, 0.0));
//! let sink = ctrl.add_node_at(NodeKind::Output, Point::new(300.0, 0.0));
//!
//! // Drag from the output socket of `source` onto the input socket of `sink`
//! ctrl.handle_pointer(PointerEvent::Pressed {
//!     button: PointerButton::Primary,
//!     position: Point::new(156.0, 65.0),
//!     modifiers: Modifiers::default(),
//! });
//! ctrl.handle_pointer(PointerEvent::Moved { position: Point::new(294.0, 65.0) });
//! ctrl.handle_pointer(PointerEvent::Released {
//!     button: PointerButton::Primary,
//!     position: Point::new(294.0, 65.0),
//!     modifiers: Modifiers::default(),
//! });
//!
//! assert_eq!(ctrl.graph().connection_count(), 1);
//! # let _ = (source, sink);
//! ```

use crate::commands::ContextMenuAction;
use crate::config::{ConfigError, CreateModifier, EditorConfig};
use crate::graph::{ConnectError, Graph, PendingConnection};
use crate::hit_test::{
    connection_segments, connections_in_selection_box, hit_test, nodes_in_selection_box,
    HitTarget, HitTolerance,
};
use crate::node::{ConnectionId, NodeId, NodeKind, SocketId};
use crate::selection::{SelectedItem, SelectionManager};
use crate::viewport::{Point, Rect, ViewTransform};
use log::{debug, trace};
use slint::platform::{Key, PointerEventButton};
use slint::SharedString;

// === Input ===

/// Mouse button, reduced to what the canvas distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    Other,
}

impl From<PointerEventButton> for PointerButton {
    fn from(button: PointerEventButton) -> Self {
        match button {
            PointerEventButton::Left => PointerButton::Primary,
            PointerEventButton::Middle => PointerButton::Middle,
            PointerEventButton::Right => PointerButton::Secondary,
            _ => PointerButton::Other,
        }
    }
}

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Modifiers { shift: true, ..Self::NONE }
    }

    pub fn control() -> Self {
        Modifiers { control: true, ..Self::NONE }
    }

    /// True when `modifier` is the only modifier held.
    fn is_only(&self, modifier: CreateModifier) -> bool {
        let expected = match modifier {
            CreateModifier::Control => Modifiers::control(),
            CreateModifier::Shift => Modifiers::shift(),
            CreateModifier::Alt => Modifiers { alt: true, ..Self::NONE },
            CreateModifier::Meta => Modifiers { meta: true, ..Self::NONE },
        };
        *self == expected
    }
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed {
        button: PointerButton,
        position: Point,
        modifiers: Modifiers,
    },
    Released {
        button: PointerButton,
        position: Point,
        modifiers: Modifiers,
    },
    Moved {
        position: Point,
    },
    /// Wheel rotation; positive `delta` zooms in.
    Wheel {
        position: Point,
        delta: f32,
    },
    /// Pointer capture lost (left the window, focus lost, device gone).
    Cancelled,
}

/// Keyboard commands understood by the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Delete or Backspace.
    Delete,
    /// `G`.
    ToggleGrid,
    /// Escape.
    Cancel,
}

impl KeyCommand {
    /// Map Slint key event text to a command.
    pub fn from_text(text: &str) -> Option<KeyCommand> {
        let is = |key: Key| SharedString::from(key).as_str() == text;
        if is(Key::Delete) || is(Key::Backspace) {
            Some(KeyCommand::Delete)
        } else if is(Key::Escape) {
            Some(KeyCommand::Cancel)
        } else if text.eq_ignore_ascii_case("g") {
            Some(KeyCommand::ToggleGrid)
        } else {
            None
        }
    }
}

// === Output ===

/// Where a context menu was requested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenuRequest {
    /// Screen position of the click, for placing the menu.
    pub screen: Point,
    /// World position of the click, where "Add Node" creates the node.
    pub world: Point,
}

impl ContextMenuRequest {
    /// Actions offered by the canvas context menu, in display order.
    pub fn actions(&self) -> &'static [ContextMenuAction] {
        &ContextMenuAction::ALL
    }
}

/// What the UI should do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reaction {
    /// Nothing visible changed.
    Ignored,
    /// Model or view changed; repaint.
    Redraw,
    /// Show the context menu.
    ContextMenu(ContextMenuRequest),
}

impl Reaction {
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, Reaction::Ignored)
    }
}

/// Live compatibility feedback while dragging a connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFeedback {
    /// Socket currently under the free end.
    pub socket: SocketId,
    /// `Ok` if releasing here would complete the connection.
    pub verdict: Result<(), ConnectError>,
}

impl DragFeedback {
    pub fn is_compatible(&self) -> bool {
        self.verdict.is_ok()
    }
}

// === State ===

/// Public view of the controller's interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Panning,
    ConnectingDrag,
    DraggingNodes,
    BoxSelecting,
}

#[derive(Debug, Clone)]
enum Interaction {
    Idle,
    Panning {
        last: Point,
    },
    ConnectingDrag {
        pending: PendingConnection,
        hover: Option<SocketId>,
    },
    DraggingNodes {
        last_world: Point,
    },
    BoxSelecting {
        origin: Point,
        current: Point,
        additive: bool,
    },
}

impl Interaction {
    fn state(&self) -> InteractionState {
        match self {
            Interaction::Idle => InteractionState::Idle,
            Interaction::Panning { .. } => InteractionState::Panning,
            Interaction::ConnectingDrag { .. } => InteractionState::ConnectingDrag,
            Interaction::DraggingNodes { .. } => InteractionState::DraggingNodes,
            Interaction::BoxSelecting { .. } => InteractionState::BoxSelecting,
        }
    }

    /// Button held for the interaction, `None` when idle.
    fn button(&self) -> Option<PointerButton> {
        match self {
            Interaction::Idle => None,
            Interaction::Panning { .. } => Some(PointerButton::Middle),
            Interaction::ConnectingDrag { .. }
            | Interaction::DraggingNodes { .. }
            | Interaction::BoxSelecting { .. } => Some(PointerButton::Primary),
        }
    }
}

/// The socket a dragged connection would land on: only when a socket is the
/// topmost item under the pointer.
fn drop_target(graph: &Graph, world: Point, tolerance: &HitTolerance) -> Option<SocketId> {
    match hit_test(graph, world, tolerance) {
        HitTarget::Socket(socket) => Some(socket),
        _ => None,
    }
}

/// Owns the graph, view and selection and turns input into edits.
#[derive(Debug)]
pub struct CanvasController {
    graph: Graph,
    view: ViewTransform,
    selection: SelectionManager<SelectedItem>,
    interaction: Interaction,
    grid_visible: bool,
    viewport_size: (f32, f32),
    config: EditorConfig,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasController {
    /// Create a controller with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(EditorConfig::default())
    }

    /// Create a controller with a custom configuration.
    pub fn with_config(config: EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EditorConfig) -> Self {
        Self {
            graph: Graph::new(),
            view: ViewTransform::identity(),
            selection: SelectionManager::new(),
            interaction: Interaction::Idle,
            grid_visible: config.grid_visible,
            viewport_size: (0.0, 0.0),
            config,
        }
    }

    // === Accessors ===

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn set_view(&mut self, view: ViewTransform) {
        self.view = view;
    }

    pub fn selection(&self) -> &SelectionManager<SelectedItem> {
        &self.selection
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn grid_visible(&self) -> bool {
        self.grid_visible
    }

    pub fn state(&self) -> InteractionState {
        self.interaction.state()
    }

    /// Size of the canvas widget in screen pixels.
    pub fn viewport_size(&self) -> (f32, f32) {
        self.viewport_size
    }

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport_size = (width.max(0.0), height.max(0.0));
    }

    /// The connection being drawn, if any.
    pub fn pending_connection(&self) -> Option<&PendingConnection> {
        match &self.interaction {
            Interaction::ConnectingDrag { pending, .. } => Some(pending),
            _ => None,
        }
    }

    /// Compatibility of the socket under the dragged connection end.
    ///
    /// `None` when not dragging a connection or not over a socket. Never
    /// changes the graph.
    pub fn drag_feedback(&self) -> Option<DragFeedback> {
        match &self.interaction {
            Interaction::ConnectingDrag {
                pending,
                hover: Some(socket),
            } => Some(DragFeedback {
                socket: *socket,
                verdict: self.graph.check_connection(pending.source(), *socket),
            }),
            _ => None,
        }
    }

    /// Rubber band rectangle in world space, while box selecting.
    pub fn selection_box(&self) -> Option<Rect> {
        match &self.interaction {
            Interaction::BoxSelecting { origin, current, .. } => {
                Some(Rect::from_corners(*origin, *current))
            }
            _ => None,
        }
    }

    pub fn is_node_selected(&self, id: NodeId) -> bool {
        self.selection.contains(SelectedItem::Node(id))
    }

    pub fn is_connection_selected(&self, id: ConnectionId) -> bool {
        self.selection.contains(SelectedItem::Connection(id))
    }

    fn tolerance(&self) -> HitTolerance {
        HitTolerance {
            socket_radius: self.config.socket_hit_radius,
            connection_distance: self
                .view
                .to_world_length(self.config.connection_hover_distance),
            connection_samples: self.config.connection_hit_samples,
        }
    }

    /// Hit test at a screen position.
    pub fn hit_test_screen(&self, screen: Point) -> HitTarget {
        hit_test(&self.graph, self.view.to_world(screen), &self.tolerance())
    }

    fn set_interaction(&mut self, next: Interaction) {
        let (from, to) = (self.interaction.state(), next.state());
        if from != to {
            debug!("interaction {:?} -> {:?}", from, to);
        }
        self.interaction = next;
    }

    // === Event handling ===

    /// Dispatch a pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Reaction {
        match event {
            PointerEvent::Pressed {
                button,
                position,
                modifiers,
            } => self.pointer_pressed(button, position, modifiers),
            PointerEvent::Released {
                button, position, ..
            } => self.pointer_released(button, position),
            PointerEvent::Moved { position } => self.pointer_moved(position),
            PointerEvent::Wheel { position, delta } => self.wheel(position, delta),
            PointerEvent::Cancelled => self.cancel_interaction(),
        }
    }

    /// Handle a button press at a screen position.
    pub fn pointer_pressed(
        &mut self,
        button: PointerButton,
        screen: Point,
        modifiers: Modifiers,
    ) -> Reaction {
        let aborted = match self.interaction.button() {
            None => Reaction::Ignored,
            // The same button again means its release was missed
            Some(active) if active == button => {
                debug!("press during {:?}, aborting", self.state());
                self.cancel_interaction()
            }
            Some(_) => {
                trace!("{:?} press ignored during {:?}", button, self.state());
                return Reaction::Ignored;
            }
        };

        let reaction = self.pressed_idle(button, screen, modifiers);
        if reaction == Reaction::Ignored {
            aborted
        } else {
            reaction
        }
    }

    fn pressed_idle(&mut self, button: PointerButton, screen: Point, modifiers: Modifiers) -> Reaction {
        let world = self.view.to_world(screen);
        match button {
            PointerButton::Primary => self.primary_pressed(world, modifiers),
            PointerButton::Middle => {
                self.set_interaction(Interaction::Panning { last: screen });
                Reaction::Ignored
            }
            PointerButton::Secondary => Reaction::ContextMenu(ContextMenuRequest { screen, world }),
            PointerButton::Other => Reaction::Ignored,
        }
    }

    fn primary_pressed(&mut self, world: Point, modifiers: Modifiers) -> Reaction {
        match hit_test(&self.graph, world, &self.tolerance()) {
            HitTarget::Socket(socket) => match self.graph.begin_connection(socket) {
                Some(pending) => {
                    self.set_interaction(Interaction::ConnectingDrag {
                        pending,
                        hover: None,
                    });
                    Reaction::Redraw
                }
                None => Reaction::Ignored,
            },
            HitTarget::Node(node) => {
                self.selection
                    .handle_press(SelectedItem::Node(node), modifiers.shift);
                self.set_interaction(Interaction::DraggingNodes { last_world: world });
                Reaction::Redraw
            }
            HitTarget::Connection(connection) => {
                self.selection
                    .handle_interaction(SelectedItem::Connection(connection), modifiers.shift);
                Reaction::Redraw
            }
            HitTarget::Empty if modifiers.is_only(self.config.create_modifier) => {
                self.graph.create_node(self.config.default_node_kind, world);
                Reaction::Redraw
            }
            HitTarget::Empty => {
                if !modifiers.shift {
                    self.selection.clear();
                }
                self.set_interaction(Interaction::BoxSelecting {
                    origin: world,
                    current: world,
                    additive: modifiers.shift,
                });
                Reaction::Redraw
            }
        }
    }

    /// Handle pointer motion at a screen position.
    pub fn pointer_moved(&mut self, screen: Point) -> Reaction {
        let world = self.view.to_world(screen);
        let tolerance = self.tolerance();

        match &mut self.interaction {
            Interaction::Idle => Reaction::Ignored,
            Interaction::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                self.view.pan_by(delta);
                Reaction::Redraw
            }
            Interaction::ConnectingDrag { pending, hover } => {
                pending.set_free_end(world);
                *hover = drop_target(&self.graph, world, &tolerance);
                Reaction::Redraw
            }
            Interaction::DraggingNodes { last_world } => {
                let delta = world - *last_world;
                *last_world = world;
                let nodes: Vec<NodeId> = self.selection.nodes().collect();
                trace!("moving {} nodes by ({}, {})", nodes.len(), delta.x, delta.y);
                self.graph.move_nodes(nodes, delta);
                Reaction::Redraw
            }
            Interaction::BoxSelecting { current, .. } => {
                *current = world;
                Reaction::Redraw
            }
        }
    }

    /// Handle a button release at a screen position.
    pub fn pointer_released(&mut self, button: PointerButton, screen: Point) -> Reaction {
        let world = self.view.to_world(screen);

        match (self.interaction.state(), button) {
            (InteractionState::ConnectingDrag, PointerButton::Primary) => {
                if let Interaction::ConnectingDrag { pending, .. } =
                    std::mem::replace(&mut self.interaction, Interaction::Idle)
                {
                    self.finish_connection(pending, world);
                }
                debug!("interaction ConnectingDrag -> Idle");
                Reaction::Redraw
            }
            (InteractionState::Panning, PointerButton::Middle)
            | (InteractionState::DraggingNodes, PointerButton::Primary) => {
                self.set_interaction(Interaction::Idle);
                Reaction::Ignored
            }
            (InteractionState::BoxSelecting, PointerButton::Primary) => {
                if let Interaction::BoxSelecting { origin, additive, .. } = self.interaction {
                    self.apply_box_selection(Rect::from_corners(origin, world), additive);
                }
                self.set_interaction(Interaction::Idle);
                Reaction::Redraw
            }
            _ => Reaction::Ignored,
        }
    }

    fn finish_connection(&mut self, pending: PendingConnection, world: Point) {
        match drop_target(&self.graph, world, &self.tolerance()) {
            Some(socket) => match self.graph.try_complete_connection(&pending, socket) {
                Ok(_) => {}
                Err(_) => self.graph.cancel_connection(pending),
            },
            None => self.graph.cancel_connection(pending),
        }
    }

    fn apply_box_selection(&mut self, rect: Rect, additive: bool) {
        let mut items: Vec<SelectedItem> = nodes_in_selection_box(rect, self.graph.nodes())
            .into_iter()
            .map(SelectedItem::Node)
            .collect();
        items.extend(
            connections_in_selection_box(rect, connection_segments(&self.graph))
                .into_iter()
                .map(SelectedItem::Connection),
        );
        debug!("box selected {} items", items.len());
        if additive {
            self.selection.extend(items);
        } else {
            self.selection.replace_selection(items);
        }
    }

    /// Zoom around a screen position. Works in every state.
    pub fn wheel(&mut self, screen: Point, delta: f32) -> Reaction {
        let changed = self.view.zoom_at(
            screen,
            delta,
            self.config.zoom_step,
            self.config.min_zoom,
            self.config.max_zoom,
        );
        if changed {
            trace!("zoom {} at ({}, {})", self.view.zoom(), screen.x, screen.y);
            // Keep the dragged connection end under the cursor
            if let Interaction::ConnectingDrag { pending, .. } = &mut self.interaction {
                pending.set_free_end(self.view.to_world(screen));
            }
            Reaction::Redraw
        } else {
            Reaction::Ignored
        }
    }

    /// Handle a keyboard command.
    pub fn handle_key(&mut self, key: KeyCommand) -> Reaction {
        match key {
            KeyCommand::Cancel => self.cancel_interaction(),
            _ if !matches!(self.interaction, Interaction::Idle) => Reaction::Ignored,
            KeyCommand::Delete => {
                if self.delete_selected() {
                    Reaction::Redraw
                } else {
                    Reaction::Ignored
                }
            }
            KeyCommand::ToggleGrid => {
                self.toggle_grid();
                Reaction::Redraw
            }
        }
    }

    /// Handle key event text from Slint. Unknown keys are ignored.
    pub fn handle_key_text(&mut self, text: &str) -> Reaction {
        match KeyCommand::from_text(text) {
            Some(key) => self.handle_key(key),
            None => Reaction::Ignored,
        }
    }

    /// Abort the current interaction and return to Idle.
    ///
    /// A pending connection is discarded; node moves already applied stay.
    pub fn cancel_interaction(&mut self) -> Reaction {
        match std::mem::replace(&mut self.interaction, Interaction::Idle) {
            Interaction::Idle => Reaction::Ignored,
            Interaction::ConnectingDrag { pending, .. } => {
                debug!("interaction ConnectingDrag -> Idle (cancelled)");
                self.graph.cancel_connection(pending);
                Reaction::Redraw
            }
            other => {
                debug!("interaction {:?} -> Idle (cancelled)", other.state());
                Reaction::Redraw
            }
        }
    }

    // === Commands ===

    /// Add a node of `kind` with its top-left corner at the view centre.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let (width, height) = self.viewport_size;
        let center = self.view.world_center(width, height);
        self.add_node_at(kind, center)
    }

    /// Add a node of `kind` with its top-left corner at `world`.
    pub fn add_node_at(&mut self, kind: NodeKind, world: Point) -> NodeId {
        self.graph.create_node(kind, world)
    }

    /// Connect two sockets directly, bypassing the pointer.
    pub fn connect_sockets(
        &mut self,
        from: SocketId,
        to: SocketId,
    ) -> Result<ConnectionId, ConnectError> {
        let pending = self
            .graph
            .begin_connection(from)
            .ok_or(ConnectError::SocketNotFound(from))?;
        self.graph.try_complete_connection(&pending, to)
    }

    /// Remove everything from the canvas.
    pub fn clear(&mut self) {
        self.cancel_interaction();
        self.graph.clear();
        self.selection.clear();
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.grid_visible = !self.grid_visible;
        debug!("grid {}", if self.grid_visible { "shown" } else { "hidden" });
        self.grid_visible
    }

    /// Zoom 1, no pan.
    pub fn reset_zoom(&mut self) {
        self.view.reset();
    }

    /// Delete selected connections, then selected nodes with their
    /// connections. Returns `true` if anything was removed.
    pub fn delete_selected(&mut self) -> bool {
        let connections: Vec<ConnectionId> = self.selection.connections().collect();
        let nodes: Vec<NodeId> = self.selection.nodes().collect();

        let mut removed = false;
        for id in connections {
            removed |= self.graph.delete_connection(id);
        }
        for id in nodes {
            removed |= self.graph.delete_node(id);
        }

        let graph = &self.graph;
        self.selection.retain(|item| match *item {
            SelectedItem::Node(id) => graph.contains_node(id),
            SelectedItem::Connection(id) => graph.contains_connection(id),
        });
        removed
    }

    /// Run a context menu action for the request it was offered with.
    pub fn apply_context_action(
        &mut self,
        action: ContextMenuAction,
        request: &ContextMenuRequest,
    ) -> Reaction {
        match action {
            ContextMenuAction::AddNode => {
                self.add_node_at(self.config.default_node_kind, request.world);
            }
            ContextMenuAction::ToggleGrid => {
                self.toggle_grid();
            }
            ContextMenuAction::ResetZoom => self.reset_zoom(),
        }
        Reaction::Redraw
    }

    /// Select exactly the given items.
    pub fn select<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = SelectedItem>,
    {
        self.selection.replace_selection(items);
    }
}
