use crate::node::{
    ConnectionId, Direction, Node, NodeId, NodeKind, Socket, SocketId, NODE_HEIGHT, NODE_WIDTH,
};
use crate::viewport::Point;
use indexmap::IndexMap;
use log::{debug, trace};
use thiserror::Error;

/// Reasons why two sockets cannot be joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// Socket does not exist in the graph
    #[error("{0} not found")]
    SocketNotFound(SocketId),
    /// Cannot connect a socket to itself
    #[error("cannot connect a socket to itself")]
    SameSocket,
    /// Cannot connect two sockets of the same node
    #[error("cannot connect sockets on the same node")]
    SameNode,
    /// Both sockets are inputs or both are outputs
    #[error("must connect an input to an output")]
    SameDirection,
}

/// A completed edge between an output socket and an input socket.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    /// Output end.
    pub source: SocketId,
    /// Input end.
    pub target: SocketId,
}

impl Connection {
    /// True if either end is `socket`.
    pub fn touches(&self, socket: SocketId) -> bool {
        self.source == socket || self.target == socket
    }
}

/// A connection being drawn: anchored at one socket, the other end follows
/// the pointer.
///
/// Pending connections are never stored in the graph, so creating and
/// dropping one cannot change the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConnection {
    source: SocketId,
    free_end: Point,
}

impl PendingConnection {
    /// The socket the drag started from.
    pub fn source(&self) -> SocketId {
        self.source
    }

    /// Free-floating endpoint in world space.
    pub fn free_end(&self) -> Point {
        self.free_end
    }

    pub fn set_free_end(&mut self, world: Point) {
        self.free_end = world;
    }
}

/// The aggregate of all nodes, sockets and connections.
///
/// The graph is the only place entities are created or destroyed, which lets
/// it guarantee that every completed connection joins an output and an input
/// on two different nodes and that no connection outlives its sockets.
///
/// Node iteration order is creation order, which doubles as z-order: later
/// nodes are drawn above earlier ones.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: IndexMap<NodeId, Node>,
    sockets: IndexMap<SocketId, Socket>,
    connections: IndexMap<ConnectionId, Connection>,
    /// Per-kind creation counts used for default titles.
    title_counters: [u32; 3],
    next_id: i32,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    // === Nodes ===

    /// Create a node of `kind` with its top-left corner at `position`.
    ///
    /// The socket layout is fixed by the kind. The title is
    /// `"<Kind> Node <n>"` with `n` counting creations of that kind since the
    /// last [`clear`](Self::clear).
    pub fn create_node(&mut self, kind: NodeKind, position: Point) -> NodeId {
        let counter = &mut self.title_counters[kind.index()];
        *counter += 1;
        let title = format!("{} Node {}", kind.name(), *counter);

        let id = NodeId(self.allocate_id());
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();

        for (direction, labels, list) in [
            (Direction::Input, kind.input_labels(), &mut inputs),
            (Direction::Output, kind.output_labels(), &mut outputs),
        ] {
            for (ordinal, label) in labels.iter().enumerate() {
                let socket_id = SocketId(self.allocate_id());
                self.sockets.insert(
                    socket_id,
                    Socket {
                        id: socket_id,
                        node: id,
                        direction,
                        ordinal,
                        label: (*label).to_string(),
                        connections: Vec::new(),
                    },
                );
                list.push(socket_id);
            }
        }

        debug!("created {} '{}' at ({}, {})", id, title, position.x, position.y);

        self.nodes.insert(
            id,
            Node {
                id,
                title,
                kind,
                position,
                width: NODE_WIDTH,
                height: NODE_HEIGHT,
                inputs,
                outputs,
            },
        );
        id
    }

    /// Delete a node, first destroying every connection attached to any of
    /// its sockets.
    ///
    /// Returns `false` if the node does not exist.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        let sockets: Vec<SocketId> = node.sockets().collect();

        for socket in &sockets {
            let attached = self
                .sockets
                .get(socket)
                .map(|s| s.connections.clone())
                .unwrap_or_default();
            for connection in attached {
                self.delete_connection(connection);
            }
        }

        for socket in &sockets {
            self.sockets.shift_remove(socket);
        }
        self.nodes.shift_remove(&id);
        debug!("deleted {} ({} sockets)", id, sockets.len());
        true
    }

    /// Translate a node in world space. Its sockets follow.
    pub fn move_node(&mut self, id: NodeId, delta: Point) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.position += delta;
                true
            }
            None => false,
        }
    }

    /// Translate several nodes by the same delta. Unknown ids are skipped.
    pub fn move_nodes<I>(&mut self, ids: I, delta: Point)
    where
        I: IntoIterator<Item = NodeId>,
    {
        for id in ids {
            self.move_node(id, delta);
        }
    }

    // === Connections ===

    /// Start drawing a connection from `source`.
    ///
    /// The free end starts on the socket itself. Returns `None` if the socket
    /// does not exist.
    pub fn begin_connection(&self, source: SocketId) -> Option<PendingConnection> {
        let start = self.socket_position(source)?;
        trace!("begin connection from {}", source);
        Some(PendingConnection {
            source,
            free_end: start,
        })
    }

    /// Try to finish `pending` on `candidate`.
    ///
    /// On success the connection is registered on both sockets and its id is
    /// returned. On failure nothing changes and the reason is returned; the
    /// pending connection stays valid so the caller can retry or cancel.
    pub fn try_complete_connection(
        &mut self,
        pending: &PendingConnection,
        candidate: SocketId,
    ) -> Result<ConnectionId, ConnectError> {
        if let Err(err) = self.check_connection(pending.source, candidate) {
            debug!(
                "rejected connection {} -> {}: {}",
                pending.source, candidate, err
            );
            return Err(err);
        }

        let (source, target) = self.normalize_direction(pending.source, candidate);
        let id = ConnectionId(self.allocate_id());

        for socket in [source, target] {
            if let Some(s) = self.sockets.get_mut(&socket) {
                s.connections.push(id);
            }
        }
        self.connections.insert(id, Connection { id, source, target });
        debug!("connected {} -> {} as {}", source, target, id);
        Ok(id)
    }

    /// Drop a pending connection. Nothing was registered, so nothing needs
    /// to be undone.
    pub fn cancel_connection(&self, pending: PendingConnection) {
        trace!("cancelled pending connection from {}", pending.source);
    }

    /// Remove a completed connection and unregister it from both sockets.
    ///
    /// Returns `false` if it was already gone.
    pub fn delete_connection(&mut self, id: ConnectionId) -> bool {
        let Some(connection) = self.connections.shift_remove(&id) else {
            return false;
        };
        for socket in [connection.source, connection.target] {
            if let Some(s) = self.sockets.get_mut(&socket) {
                s.connections.retain(|&c| c != id);
            }
        }
        debug!("deleted {}", id);
        true
    }

    /// Remove every node and connection and restart default titles at 1.
    ///
    /// Ids keep counting up so stale handles from before the clear never
    /// resolve to new entities.
    pub fn clear(&mut self) {
        debug!(
            "clearing graph ({} nodes, {} connections)",
            self.nodes.len(),
            self.connections.len()
        );
        self.nodes.clear();
        self.sockets.clear();
        self.connections.clear();
        self.title_counters = [0; 3];
    }

    // === Compatibility ===

    /// Check whether `a` and `b` may be joined, with the reason if not.
    ///
    /// Rules, in order: both exist, they are different sockets, they belong
    /// to different nodes, and one is an input while the other is an output.
    pub fn check_connection(&self, a: SocketId, b: SocketId) -> Result<(), ConnectError> {
        let sa = self.sockets.get(&a).ok_or(ConnectError::SocketNotFound(a))?;
        let sb = self.sockets.get(&b).ok_or(ConnectError::SocketNotFound(b))?;

        if a == b {
            return Err(ConnectError::SameSocket);
        }
        if sa.node == sb.node {
            return Err(ConnectError::SameNode);
        }
        if sa.direction == sb.direction {
            return Err(ConnectError::SameDirection);
        }
        Ok(())
    }

    /// Pure compatibility query. Symmetric in its arguments.
    pub fn can_connect(&self, a: SocketId, b: SocketId) -> bool {
        self.check_connection(a, b).is_ok()
    }

    /// Order a compatible pair as (output, input).
    fn normalize_direction(&self, a: SocketId, b: SocketId) -> (SocketId, SocketId) {
        match self.sockets.get(&a).map(|s| s.direction) {
            Some(Direction::Input) => (b, a),
            _ => (a, b),
        }
    }

    // === Queries ===

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn socket(&self, id: SocketId) -> Option<&Socket> {
        self.sockets.get(&id)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn contains_connection(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    /// Nodes in z-order (bottom first).
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    pub fn sockets(&self) -> impl Iterator<Item = &Socket> + '_ {
        self.sockets.values()
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.connections.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// World-space centre of a socket.
    pub fn socket_position(&self, id: SocketId) -> Option<Point> {
        let socket = self.sockets.get(&id)?;
        let node = self.nodes.get(&socket.node)?;
        Some(node.socket_position(socket.direction, socket.ordinal))
    }

    /// World-space (output, input) endpoints of a connection.
    pub fn connection_endpoints(&self, id: ConnectionId) -> Option<(Point, Point)> {
        let connection = self.connections.get(&id)?;
        Some((
            self.socket_position(connection.source)?,
            self.socket_position(connection.target)?,
        ))
    }

    /// Ids of all connections touching any socket of `node`.
    pub fn connections_of_node(&self, node: NodeId) -> Vec<ConnectionId> {
        let Some(node) = self.nodes.get(&node) else {
            return Vec::new();
        };
        let mut ids: Vec<ConnectionId> = node
            .sockets()
            .filter_map(|s| self.sockets.get(&s))
            .flat_map(|s| s.connections.iter().copied())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}
