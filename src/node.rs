//! Node and socket entities.
//!
//! These are plain data: no drawing, no event handling. Cross references are
//! stable ids owned by the [`Graph`](crate::graph::Graph), never borrows.

use crate::viewport::{Point, Rect};
use std::fmt;

/// Width of every node in world units.
pub const NODE_WIDTH: f32 = 150.0;
/// Height of every node in world units.
pub const NODE_HEIGHT: f32 = 100.0;
/// Height of the title band drawn at the top of a node.
pub const TITLE_BAND_HEIGHT: f32 = 25.0;
/// Vertical offset below which sockets are distributed.
pub const SOCKET_AREA_TOP: f32 = 30.0;
/// Radius of a socket circle in world units.
pub const SOCKET_RADIUS: f32 = 6.0;

/// Identifier of a node in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub i32);

/// Identifier of a socket in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SocketId(pub i32);

/// Identifier of a completed connection in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub i32);

macro_rules! id_display {
    ($($ty:ident => $prefix:literal),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, concat!($prefix, "#{}"), self.0)
                }
            }
        )*
    };
}

id_display!(NodeId => "node", SocketId => "socket", ConnectionId => "connection");

/// The kind of a node. Determines its socket layout at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Source node: a single output.
    Input,
    /// One input, one output.
    Process,
    /// Sink node: a single input.
    Output,
}

impl NodeKind {
    pub const ALL: [NodeKind; 3] = [NodeKind::Input, NodeKind::Process, NodeKind::Output];

    /// Capitalized name used in default titles and toolbar labels.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Input => "Input",
            NodeKind::Process => "Process",
            NodeKind::Output => "Output",
        }
    }

    /// Labels of the input sockets this kind is created with, in order.
    pub fn input_labels(self) -> &'static [&'static str] {
        match self {
            NodeKind::Input => &[],
            NodeKind::Process | NodeKind::Output => &["Input"],
        }
    }

    /// Labels of the output sockets this kind is created with, in order.
    pub fn output_labels(self) -> &'static [&'static str] {
        match self {
            NodeKind::Output => &[],
            NodeKind::Input | NodeKind::Process => &["Output"],
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            NodeKind::Input => 0,
            NodeKind::Process => 1,
            NodeKind::Output => 2,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction of a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

/// A connection point owned by a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Socket {
    pub id: SocketId,
    /// Owning node (back-reference, not ownership).
    pub node: NodeId,
    pub direction: Direction,
    /// Position among siblings of the same direction.
    pub ordinal: usize,
    pub label: String,
    pub(crate) connections: Vec<ConnectionId>,
}

impl Socket {
    /// Connections currently attached to this socket.
    pub fn connections(&self) -> &[ConnectionId] {
        &self.connections
    }

    pub fn is_connected(&self) -> bool {
        !self.connections.is_empty()
    }
}

/// A positioned, titled container of sockets.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub title: String,
    pub kind: NodeKind,
    /// Top-left corner in world space.
    pub position: Point,
    pub width: f32,
    pub height: f32,
    pub(crate) inputs: Vec<SocketId>,
    pub(crate) outputs: Vec<SocketId>,
}

impl Node {
    pub fn inputs(&self) -> &[SocketId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[SocketId] {
        &self.outputs
    }

    /// All sockets, inputs first.
    pub fn sockets(&self) -> impl Iterator<Item = SocketId> + '_ {
        self.inputs.iter().chain(self.outputs.iter()).copied()
    }

    /// World-space body rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    /// Number of sockets in the given direction.
    pub fn socket_count(&self, direction: Direction) -> usize {
        match direction {
            Direction::Input => self.inputs.len(),
            Direction::Output => self.outputs.len(),
        }
    }

    /// World-space centre of a socket with the given direction and ordinal.
    pub fn socket_position(&self, direction: Direction, ordinal: usize) -> Point {
        self.position
            + socket_offset(
                direction,
                ordinal,
                self.socket_count(direction),
                self.width,
                self.height,
            )
    }
}

/// Position of a socket centre relative to its node's top-left corner.
///
/// Sockets are spread evenly below the title area; inputs sit just outside
/// the left edge and outputs just outside the right edge.
pub fn socket_offset(
    direction: Direction,
    ordinal: usize,
    count: usize,
    width: f32,
    height: f32,
) -> Point {
    let spacing = (height - SOCKET_AREA_TOP) / (count + 1).max(1) as f32;
    let y = SOCKET_AREA_TOP + spacing * (ordinal + 1) as f32;
    let x = match direction {
        Direction::Input => -SOCKET_RADIUS,
        Direction::Output => width + SOCKET_RADIUS,
    };
    Point::new(x, y)
}
