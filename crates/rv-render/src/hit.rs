//! Hit testing: world point → interaction target.
//!
//! Targets are checked front to back in the order the page stacks them:
//! connection handles and waypoints, resize handles of selected nodes,
//! node labels, node bodies, connection labels, connection lines. Within
//! each layer the last painted item wins.

use crate::frame::Frame;
use crate::route::HANDLE_RADIUS;
use rv_core::geometry::{Point, Rect};
use rv_core::{Document, Id, ResizeHandle};

/// Which end of a connection a handle controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionEnd {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitTarget {
    ConnectionHandle { connection: Id, end: ConnectionEnd },
    Waypoint { connection: Id, index: usize },
    ResizeHandle { node: Id, handle: ResizeHandle },
    NodeLabel(Id),
    Node(Id),
    ConnectionLabel(Id),
    ConnectionLine(Id),
    Background,
}

/// Classify world point `p` against a built frame.
pub fn hit_test(frame: &Frame, p: Point) -> HitTarget {
    // Handles of unselected connections are invisible but still grabbable.
    for conn in frame.connections.iter().rev() {
        for (index, wp) in conn.waypoints.iter().enumerate().rev() {
            if wp.distance(p) <= HANDLE_RADIUS {
                return HitTarget::Waypoint {
                    connection: conn.id,
                    index,
                };
            }
        }
        for (end, at) in [(ConnectionEnd::End, conn.end), (ConnectionEnd::Start, conn.start)] {
            if at.distance(p) <= HANDLE_RADIUS {
                return HitTarget::ConnectionHandle {
                    connection: conn.id,
                    end,
                };
            }
        }
    }

    for node in frame.nodes.iter().rev() {
        if let Some(handle) = node.handle_at(p) {
            return HitTarget::ResizeHandle {
                node: node.id,
                handle,
            };
        }
    }

    for node in frame.nodes.iter().rev() {
        if node.label.bounds.contains(p) && !node.label.lines.iter().all(|l| l.is_empty()) {
            return HitTarget::NodeLabel(node.id);
        }
        if node.bounds.contains(p) {
            return HitTarget::Node(node.id);
        }
    }

    if let Some(conn) = frame.connections.iter().rev().find(|c| c.hits_label(p)) {
        return HitTarget::ConnectionLabel(conn.id);
    }
    if let Some(conn) = frame.connections.iter().rev().find(|c| c.hits_line(p)) {
        return HitTarget::ConnectionLine(conn.id);
    }

    HitTarget::Background
}

/// Nodes whose boxes overlap `rect` (touching edges do not count).
pub fn nodes_in_rect(doc: &Document, rect: &Rect) -> Vec<Id> {
    doc.nodes
        .iter()
        .filter(|n| n.bounds().intersects(rect))
        .map(|n| n.id)
        .collect()
}

/// Connections with a resolved end or any waypoint inside `rect`
/// (inclusive).
pub fn connections_in_rect(doc: &Document, rect: &Rect) -> Vec<Id> {
    doc.connections
        .iter()
        .filter(|c| {
            let (a, b) = doc.connection_endpoints(c);
            rect.contains(a) || rect.contains(b) || c.waypoints.iter().any(|wp| rect.contains(*wp))
        })
        .map(|c| c.id)
        .collect()
}
