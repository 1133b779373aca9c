//! The document store: single owner of nodes, connections and settings.
//!
//! Array order is paint order. Every mutating method bumps `revision` so
//! hosts can tell cheaply whether anything changed since the last frame.

use crate::geometry::{AnchorHit, Point, closest_anchor};
use crate::id::Id;
use crate::model::{AppSettings, Connection, Node, Snapshot};
use crate::resolve;

#[derive(Debug, Clone)]
pub struct Document {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    pub settings: AppSettings,
    anchor_count: usize,
    revision: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(crate::config::EngineConfig::default().anchor_count)
    }
}

impl Document {
    pub fn new(anchor_count: usize) -> Self {
        Self {
            nodes: Vec::new(),
            connections: Vec::new(),
            settings: AppSettings::default(),
            anchor_count,
            revision: 0,
        }
    }

    pub fn from_snapshot(snapshot: Snapshot, anchor_count: usize) -> Self {
        let mut doc = Self::new(anchor_count);
        doc.restore(snapshot);
        doc
    }

    pub fn anchor_count(&self) -> usize {
        self.anchor_count
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Record that the document changed.
    pub fn touch(&mut self) {
        self.revision += 1;
    }

    // ─── Snapshots ───────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes.clone(),
            connections: self.connections.clone(),
            app_settings: self.settings.clone(),
        }
    }

    /// Replace the whole content with `snapshot`.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.nodes = snapshot.nodes;
        self.connections = snapshot.connections;
        self.settings = snapshot.app_settings;
        self.touch();
    }

    // ─── Lookup ──────────────────────────────────────────────────────────

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: Id) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn connection(&self, id: Id) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn connection_mut(&mut self, id: Id) -> Option<&mut Connection> {
        self.connections.iter_mut().find(|c| c.id == id)
    }

    fn contains_id(&self, id: Id) -> bool {
        self.node(id).is_some() || self.connection(id).is_some()
    }

    /// A generated id not used by any node or connection. Loaded files may
    /// already contain ids from the generator's sequence, so retry.
    pub fn fresh_id(&self, prefix: &str) -> Id {
        loop {
            let id = Id::with_prefix(prefix);
            if !self.contains_id(id) {
                return id;
            }
        }
    }

    // ─── Resolution ──────────────────────────────────────────────────────

    pub fn resolve_endpoint(&self, endpoint: &crate::model::Endpoint) -> Point {
        resolve::resolve_endpoint(&self.nodes, endpoint, self.anchor_count)
    }

    /// Raw (untrimmed) start and end of a connection.
    pub fn connection_endpoints(&self, conn: &Connection) -> (Point, Point) {
        (
            self.resolve_endpoint(&conn.start),
            self.resolve_endpoint(&conn.end),
        )
    }

    pub fn closest_anchor(&self, p: Point, max_distance: f64) -> Option<AnchorHit> {
        closest_anchor(
            p,
            self.nodes.iter().map(|n| (n.id, n.bounds())),
            max_distance,
            self.anchor_count,
        )
    }

    // ─── Mutation ────────────────────────────────────────────────────────

    pub fn add_node(&mut self, node: Node) -> Id {
        let id = node.id;
        self.nodes.push(node);
        self.touch();
        id
    }

    pub fn add_connection(&mut self, conn: Connection) -> Id {
        let id = conn.id;
        self.connections.push(conn);
        self.touch();
        id
    }

    /// Remove the given nodes and connections.
    ///
    /// Surviving connections anchored to a removed node are detached first
    /// and keep their current visual position. Connections are never
    /// deleted because a node they touch was.
    pub fn delete(&mut self, nodes: &[Id], connections: &[Id]) {
        if nodes.is_empty() && connections.is_empty() {
            return;
        }
        resolve::detach_endpoints(
            &mut self.connections,
            &self.nodes,
            nodes,
            connections,
            self.anchor_count,
        );
        self.nodes.retain(|n| !nodes.contains(&n.id));
        self.connections.retain(|c| !connections.contains(&c.id));
        self.touch();
    }

    /// Clone a node with a fresh id, offset by `(offset, offset)`.
    pub fn duplicate_node(&mut self, id: Id, offset: f64) -> Option<Id> {
        let mut copy = self.node(id)?.clone();
        copy.id = self.fresh_id("node");
        copy.x += offset;
        copy.y += offset;
        Some(self.add_node(copy))
    }

    /// Clone a connection with a fresh id. Free points and waypoints shift
    /// by `offset`; a straight connection gains one waypoint at its shifted
    /// midpoint so the copy is visibly distinct even when both ends are
    /// anchored.
    pub fn duplicate_connection(&mut self, id: Id, offset: f64) -> Option<Id> {
        let source = self.connection(id)?;
        let mut copy = source.clone();
        if copy.waypoints.is_empty() {
            let (a, b) = self.connection_endpoints(source);
            copy.waypoints.push(a.midpoint(b).offset(offset, offset));
            copy.start.map_point(|p| p.offset(offset, offset));
            copy.end.map_point(|p| p.offset(offset, offset));
        } else {
            copy.map_free_points(|p| p.offset(offset, offset));
        }
        copy.id = self.fresh_id("conn");
        Some(self.add_connection(copy))
    }

    // ─── Z-order ─────────────────────────────────────────────────────────

    /// Move a node or connection to the end of its list (drawn last).
    pub fn bring_to_front(&mut self, id: Id) -> bool {
        let moved = move_to(&mut self.nodes, |n| n.id == id, true)
            || move_to(&mut self.connections, |c| c.id == id, true);
        if moved {
            self.touch();
        }
        moved
    }

    /// Move a node or connection to the start of its list (drawn first).
    pub fn send_to_back(&mut self, id: Id) -> bool {
        let moved = move_to(&mut self.nodes, |n| n.id == id, false)
            || move_to(&mut self.connections, |c| c.id == id, false);
        if moved {
            self.touch();
        }
        moved
    }
}

fn move_to<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool, to_end: bool) -> bool {
    let Some(i) = items.iter().position(pred) else {
        return false;
    };
    let item = items.remove(i);
    if to_end {
        items.push(item);
    } else {
        items.insert(0, item);
    }
    true
}
