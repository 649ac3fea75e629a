//! Render-ready snapshots of the canvas and Slint model syncing.
//!
//! The controller never draws. [`CanvasController::snapshot`] resolves all
//! positions, selection flags and colours into plain values that a renderer
//! reads once per frame. [`SceneModels`] pushes those values into Slint
//! `VecModel`s.
//!
//! # Example
//!
//! ```ignore
//! let models = SceneModels::new()
//!     .bind_nodes(node_model.clone(), |node, view| NodeData {
//!         id: node.id.0,
//!         title: node.title.clone().into(),
//!         x: view.to_screen(node.position).x,
//!         y: view.to_screen(node.position).y,
//!         selected: node.selected,
//!     })
//!     .bind_connections(link_model.clone(), |link, view| LinkData {
//!         path: link.screen_path(view).into(),
//!         color: link.color,
//!     });
//!
//! // After every handled event that asked for a redraw
//! models.sync(&ctrl.snapshot());
//! ```

use crate::controller::{CanvasController, DragFeedback};
use crate::grid::generate_grid_commands;
use crate::node::{ConnectionId, Direction, NodeId, NodeKind, SocketId, TITLE_BAND_HEIGHT};
use crate::path::generate_bezier_path;
use crate::viewport::{Point, Rect, ViewTransform};
use slint::{Color, Model, VecModel};
use std::rc::Rc;

/// Colours used for the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub canvas_background: Color,
    pub grid: Color,
    pub node_background: Color,
    pub node_background_selected: Color,
    pub node_border: Color,
    pub node_border_selected: Color,
    pub node_title: Color,
    pub node_title_selected: Color,
    pub text: Color,
    pub socket_unconnected: Color,
    pub socket_input_connected: Color,
    pub socket_output_connected: Color,
    pub socket_border: Color,
    pub connection: Color,
    pub connection_selected: Color,
    pub connection_pending: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            canvas_background: Color::from_rgb_u8(35, 35, 35),
            grid: Color::from_argb_u8(150, 60, 60, 60),
            node_background: Color::from_rgb_u8(250, 250, 250),
            node_background_selected: Color::from_rgb_u8(255, 240, 240),
            node_border: Color::from_rgb_u8(200, 200, 200),
            node_border_selected: Color::from_rgb_u8(255, 0, 0),
            node_title: Color::from_rgb_u8(240, 240, 240),
            node_title_selected: Color::from_rgb_u8(255, 100, 100),
            text: Color::from_rgb_u8(60, 60, 60),
            socket_unconnected: Color::from_rgb_u8(100, 100, 100),
            socket_input_connected: Color::from_rgb_u8(255, 255, 100),
            socket_output_connected: Color::from_rgb_u8(150, 255, 150),
            socket_border: Color::from_rgb_u8(180, 180, 180),
            connection: Color::from_rgb_u8(200, 200, 200),
            connection_selected: Color::from_rgb_u8(255, 255, 100),
            connection_pending: Color::from_rgb_u8(200, 200, 200),
        }
    }
}

impl Palette {
    fn socket_color(&self, direction: Direction, connected: bool) -> Color {
        match (direction, connected) {
            (_, false) => self.socket_unconnected,
            (Direction::Input, true) => self.socket_input_connected,
            (Direction::Output, true) => self.socket_output_connected,
        }
    }
}

/// A socket as drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SocketView {
    pub id: SocketId,
    pub direction: Direction,
    pub label: String,
    /// Centre in world space.
    pub position: Point,
    pub connected: bool,
    pub color: Color,
}

/// A node as drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub id: NodeId,
    pub kind: NodeKind,
    pub title: String,
    /// Top-left corner in world space.
    pub position: Point,
    pub width: f32,
    pub height: f32,
    /// Height of the title band at the top of the body.
    pub title_height: f32,
    pub selected: bool,
    pub background: Color,
    pub border: Color,
    pub title_background: Color,
    pub sockets: Vec<SocketView>,
}

impl NodeView {
    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    /// Body rectangle in screen space.
    pub fn screen_rect(&self, view: &ViewTransform) -> Rect {
        let top_left = view.to_screen(self.position);
        Rect::new(
            top_left.x,
            top_left.y,
            self.width * view.zoom(),
            self.height * view.zoom(),
        )
    }
}

/// A connection as drawn, completed or pending.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionView {
    /// `None` for the connection being dragged.
    pub id: Option<ConnectionId>,
    /// World-space start (output end, or the drag source when pending).
    pub start: Point,
    /// World-space end (input end, or the free end when pending).
    pub end: Point,
    pub selected: bool,
    pub pending: bool,
    pub color: Color,
}

impl ConnectionView {
    /// SVG path in world space.
    pub fn world_path(&self) -> String {
        generate_bezier_path(self.start, self.end)
    }

    /// SVG path in screen space, for a Slint `Path` drawn over the canvas.
    pub fn screen_path(&self, view: &ViewTransform) -> String {
        generate_bezier_path(view.to_screen(self.start), view.to_screen(self.end))
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSnapshot {
    /// Nodes bottom to top.
    pub nodes: Vec<NodeView>,
    /// Completed connections, then the pending one if any.
    pub connections: Vec<ConnectionView>,
    pub view: ViewTransform,
    pub grid_visible: bool,
    pub grid_spacing: f32,
    /// Rubber band in world space.
    pub selection_box: Option<Rect>,
    pub drag_feedback: Option<DragFeedback>,
}

impl SceneSnapshot {
    /// Grid path commands for a canvas of the given size, empty when hidden.
    pub fn grid_commands(&self, width: f32, height: f32) -> String {
        if !self.grid_visible {
            return String::new();
        }
        generate_grid_commands(width, height, &self.view, self.grid_spacing)
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeView> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn pending_connection(&self) -> Option<&ConnectionView> {
        self.connections.iter().find(|c| c.pending)
    }
}

impl CanvasController {
    /// Snapshot with the default palette.
    pub fn snapshot(&self) -> SceneSnapshot {
        self.snapshot_with(&Palette::default())
    }

    pub fn snapshot_with(&self, palette: &Palette) -> SceneSnapshot {
        let graph = self.graph();

        let nodes = graph
            .nodes()
            .map(|node| {
                let selected = self.is_node_selected(node.id);
                let sockets = node
                    .sockets()
                    .filter_map(|id| graph.socket(id))
                    .map(|socket| SocketView {
                        id: socket.id,
                        direction: socket.direction,
                        label: socket.label.clone(),
                        position: node.socket_position(socket.direction, socket.ordinal),
                        connected: socket.is_connected(),
                        color: palette.socket_color(socket.direction, socket.is_connected()),
                    })
                    .collect();
                NodeView {
                    id: node.id,
                    kind: node.kind,
                    title: node.title.clone(),
                    position: node.position,
                    width: node.width,
                    height: node.height,
                    title_height: TITLE_BAND_HEIGHT,
                    selected,
                    background: if selected {
                        palette.node_background_selected
                    } else {
                        palette.node_background
                    },
                    border: if selected {
                        palette.node_border_selected
                    } else {
                        palette.node_border
                    },
                    title_background: if selected {
                        palette.node_title_selected
                    } else {
                        palette.node_title
                    },
                    sockets,
                }
            })
            .collect();

        let mut connections: Vec<ConnectionView> = graph
            .connections()
            .filter_map(|c| {
                let (start, end) = graph.connection_endpoints(c.id)?;
                let selected = self.is_connection_selected(c.id);
                Some(ConnectionView {
                    id: Some(c.id),
                    start,
                    end,
                    selected,
                    pending: false,
                    color: if selected {
                        palette.connection_selected
                    } else {
                        palette.connection
                    },
                })
            })
            .collect();

        if let Some(pending) = self.pending_connection() {
            if let Some(anchor) = graph.socket_position(pending.source()) {
                // Draw output-to-input so the curve bends the right way
                let from_input = graph
                    .socket(pending.source())
                    .map_or(false, |s| s.direction == Direction::Input);
                let (start, end) = if from_input {
                    (pending.free_end(), anchor)
                } else {
                    (anchor, pending.free_end())
                };
                connections.push(ConnectionView {
                    id: None,
                    start,
                    end,
                    selected: false,
                    pending: true,
                    color: palette.connection_pending,
                });
            }
        }

        SceneSnapshot {
            nodes,
            connections,
            view: *self.view(),
            grid_visible: self.grid_visible(),
            grid_spacing: self.config().grid_spacing,
            selection_box: self.selection_box(),
            drag_feedback: self.drag_feedback(),
        }
    }
}

/// Internal trait for syncing snapshot rows into a Slint model.
trait ModelSyncer<V> {
    fn sync(&self, rows: &[V], view: &ViewTransform);
}

/// Concrete implementation of ModelSyncer for a specific row type.
struct ConcreteModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<V, P, F> ModelSyncer<V> for ConcreteModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(&V, &ViewTransform) -> P,
{
    fn sync(&self, rows: &[V], view: &ViewTransform) {
        // Update existing rows or add new ones
        for (i, row) in rows.iter().enumerate() {
            let item = (self.constructor)(row, view);
            if i < self.model.row_count() {
                self.model.set_row_data(i, item);
            } else {
                self.model.push(item);
            }
        }
        // Remove excess rows
        while self.model.row_count() > rows.len() {
            self.model.remove(self.model.row_count() - 1);
        }
    }
}

/// Slint models kept in step with snapshots.
///
/// Bind each model once with a row constructor, then call
/// [`sync`](Self::sync) with every new snapshot. Rows are updated in place
/// and excess rows removed.
#[derive(Default)]
pub struct SceneModels {
    nodes: Option<Box<dyn ModelSyncer<NodeView>>>,
    connections: Option<Box<dyn ModelSyncer<ConnectionView>>>,
}

impl SceneModels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the node model.
    pub fn bind_nodes<P, F>(mut self, model: Rc<VecModel<P>>, constructor: F) -> Self
    where
        P: Clone + 'static,
        F: Fn(&NodeView, &ViewTransform) -> P + 'static,
    {
        self.nodes = Some(Box::new(ConcreteModelSyncer { model, constructor }));
        self
    }

    /// Bind the connection model. The pending connection is included.
    pub fn bind_connections<P, F>(mut self, model: Rc<VecModel<P>>, constructor: F) -> Self
    where
        P: Clone + 'static,
        F: Fn(&ConnectionView, &ViewTransform) -> P + 'static,
    {
        self.connections = Some(Box::new(ConcreteModelSyncer { model, constructor }));
        self
    }

    pub fn sync(&self, snapshot: &SceneSnapshot) {
        if let Some(nodes) = &self.nodes {
            nodes.sync(&snapshot.nodes, &snapshot.view);
        }
        if let Some(connections) = &self.connections {
            connections.sync(&snapshot.connections, &snapshot.view);
        }
    }
}
