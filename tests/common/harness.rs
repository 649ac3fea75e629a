//! Test harness driving an `EditorHandle` the way a Slint window would.
//!
//! All interaction helpers take screen coordinates; helpers for locating
//! sockets and nodes convert from world space with the current view.

#![allow(dead_code)]

use super::ReactionTracker;
use slint::platform::{Key, PointerEventButton};
use slint::SharedString;
use slint_node_canvas::{
    ConnectionId, EditorConfig, EditorHandle, KeyCommand, Modifiers, NodeId, NodeKind, Point,
    PointerButton, PointerEvent, Reaction, SocketId,
};

/// Install the test logger once per process.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Default canvas size used by the harness.
pub const CANVAS_WIDTH: f32 = 800.0;
pub const CANVAS_HEIGHT: f32 = 600.0;

/// Editor with a reaction tracker and screen-space input helpers.
pub struct CanvasHarness {
    pub editor: EditorHandle,
    pub tracker: ReactionTracker,
}

impl CanvasHarness {
    /// Empty canvas with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        init_logging();
        let editor = EditorHandle::with_config(config).unwrap();
        editor.resize(CANVAS_WIDTH, CANVAS_HEIGHT);

        let tracker = ReactionTracker::new();
        editor.on_reaction({
            let tracker = tracker.clone();
            move |reaction| tracker.record(reaction)
        });

        Self { editor, tracker }
    }

    /// Canvas with an Input node N1 at (0,0) and a Process node N2 at (200,0).
    pub fn with_two_nodes() -> (Self, NodeId, NodeId) {
        let harness = Self::new();
        let n1 = harness.add_node(NodeKind::Input, 0.0, 0.0);
        let n2 = harness.add_node(NodeKind::Process, 200.0, 0.0);
        (harness, n1, n2)
    }

    // === Graph setup ===

    pub fn add_node(&self, kind: NodeKind, x: f32, y: f32) -> NodeId {
        self.editor.borrow_mut().add_node_at(kind, Point::new(x, y))
    }

    pub fn output_socket(&self, node: NodeId) -> SocketId {
        self.editor.borrow().graph().node(node).unwrap().outputs()[0]
    }

    pub fn input_socket(&self, node: NodeId) -> SocketId {
        self.editor.borrow().graph().node(node).unwrap().inputs()[0]
    }

    /// Screen position of a socket centre.
    pub fn socket_screen(&self, socket: SocketId) -> Point {
        let ctrl = self.editor.borrow();
        let world = ctrl.graph().socket_position(socket).unwrap();
        ctrl.view().to_screen(world)
    }

    /// Screen position of the centre of a node's body.
    pub fn node_screen(&self, node: NodeId) -> Point {
        let ctrl = self.editor.borrow();
        let rect = ctrl.graph().node(node).unwrap().rect();
        ctrl.view().to_screen(rect.center())
    }

    pub fn node_position(&self, node: NodeId) -> Point {
        self.editor.borrow().graph().node(node).unwrap().position
    }

    pub fn connection_screen_midpoint(&self, connection: ConnectionId) -> Point {
        let ctrl = self.editor.borrow();
        let (start, end) = ctrl.graph().connection_endpoints(connection).unwrap();
        let mid = slint_node_canvas::CubicBezier::from_endpoints(start, end).eval(0.5);
        ctrl.view().to_screen(mid)
    }

    /// Connect the first output of `from` to the first input of `to` by
    /// dragging.
    pub fn connect(&self, from: NodeId, to: NodeId) -> Option<ConnectionId> {
        let before: Vec<ConnectionId> = self.connection_ids();
        let start = self.socket_screen(self.output_socket(from));
        let end = self.socket_screen(self.input_socket(to));
        self.drag(start, end);
        self.connection_ids().into_iter().find(|c| !before.contains(c))
    }

    // === Queries ===

    pub fn node_count(&self) -> usize {
        self.editor.borrow().graph().node_count()
    }

    pub fn connection_count(&self) -> usize {
        self.editor.borrow().graph().connection_count()
    }

    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.editor.borrow().graph().connections().map(|c| c.id).collect()
    }

    pub fn zoom(&self) -> f32 {
        self.editor.borrow().view().zoom()
    }

    // === Pointer ===

    pub fn press(&self, button: PointerButton, pos: Point, modifiers: Modifiers) -> Reaction {
        self.editor.handle_pointer(PointerEvent::Pressed {
            button,
            position: pos,
            modifiers,
        })
    }

    pub fn release(&self, button: PointerButton, pos: Point) -> Reaction {
        self.editor.handle_pointer(PointerEvent::Released {
            button,
            position: pos,
            modifiers: Modifiers::NONE,
        })
    }

    pub fn move_to(&self, pos: Point) -> Reaction {
        self.editor.handle_pointer(PointerEvent::Moved { position: pos })
    }

    /// Primary press and release without moving.
    pub fn click(&self, pos: Point, modifiers: Modifiers) {
        self.press(PointerButton::Primary, pos, modifiers);
        self.release(PointerButton::Primary, pos);
    }

    /// Primary drag in a few intermediate steps.
    pub fn drag(&self, from: Point, to: Point) {
        self.drag_with(PointerButton::Primary, from, to, Modifiers::NONE);
    }

    pub fn drag_with(&self, button: PointerButton, from: Point, to: Point, modifiers: Modifiers) {
        self.press(button, from, modifiers);
        for step in 1..=4 {
            let t = step as f32 / 4.0;
            self.move_to(from + (to - from) * t);
        }
        self.release(button, to);
    }

    pub fn right_click(&self, pos: Point) -> Reaction {
        self.press(PointerButton::Secondary, pos, Modifiers::NONE)
    }

    /// Press with a raw Slint button, as a `TouchArea` would report it.
    pub fn press_slint(&self, button: PointerEventButton, pos: Point) -> Reaction {
        self.press(button.into(), pos, Modifiers::NONE)
    }

    pub fn scroll(&self, pos: Point, delta: f32) -> bool {
        (self.editor.scroll_callback())(pos.x, pos.y, delta)
    }

    pub fn focus_lost(&self) {
        (self.editor.focus_lost_callback())();
    }

    // === Keyboard ===

    pub fn key(&self, key: KeyCommand) -> Reaction {
        self.editor.handle_key(key)
    }

    /// Send a key as Slint key text.
    pub fn key_text(&self, text: &str) -> bool {
        (self.editor.key_callback())(SharedString::from(text))
    }

    pub fn key_slint(&self, key: Key) -> bool {
        (self.editor.key_callback())(SharedString::from(key))
    }
}
