//! Anchor resolution: turn stored endpoints into world coordinates.
//!
//! Connections never store coordinates for attached ends. Every frame the
//! resolver looks the node up and recomputes the anchor, so moving or
//! resizing a node moves every attached end with it.

use crate::geometry::{Point, anchor_coordinate};
use crate::id::Id;
use crate::model::{Connection, Endpoint, Node};

/// World coordinate of `endpoint`.
///
/// A dangling anchor (node missing) resolves to the origin and logs a
/// warning; it never panics.
pub fn resolve_endpoint(nodes: &[Node], endpoint: &Endpoint, anchor_count: usize) -> Point {
    match *endpoint {
        Endpoint::Point { x, y } => Point::new(x, y).finite_or(Point::ORIGIN),
        Endpoint::Anchor {
            node_id,
            side,
            index,
        } => match nodes.iter().find(|n| n.id == node_id) {
            Some(node) => anchor_coordinate(&node.bounds(), side, index, anchor_count),
            None => {
                log::warn!("dangling anchor to missing node {node_id}");
                Point::ORIGIN
            }
        },
    }
}

/// Freeze every endpoint anchored to a node in `removed` at its current
/// resolved coordinate. Must run before those nodes leave `nodes`.
///
/// Connections whose id is in `skip` are about to be deleted and are left
/// untouched. Returns how many endpoints were detached.
pub fn detach_endpoints(
    connections: &mut [Connection],
    nodes: &[Node],
    removed: &[Id],
    skip: &[Id],
    anchor_count: usize,
) -> usize {
    let mut detached = 0;
    for conn in connections.iter_mut().filter(|c| !skip.contains(&c.id)) {
        for end in [&mut conn.start, &mut conn.end] {
            if let Some(node_id) = end.anchored_to()
                && removed.contains(&node_id)
            {
                let p = resolve_endpoint(nodes, end, anchor_count);
                *end = Endpoint::point(p);
                detached += 1;
            }
        }
    }
    if detached > 0 {
        log::debug!("detached {detached} endpoint(s) from {} removed node(s)", removed.len());
    }
    detached
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Side;
    use crate::model::NodeKind;

    fn node(id: &str, x: f64, y: f64) -> Node {
        Node::new(Id::intern(id), NodeKind::Person, x, y)
    }

    #[test]
    fn anchor_follows_node() {
        let mut nodes = vec![node("rs_a", 0.0, 0.0)];
        let end = Endpoint::Anchor {
            node_id: Id::intern("rs_a"),
            side: Side::Bottom,
            index: 10,
        };
        assert_eq!(resolve_endpoint(&nodes, &end, 21), Point::new(30.0, 60.0));
        nodes[0].x = 100.0;
        assert_eq!(resolve_endpoint(&nodes, &end, 21), Point::new(130.0, 60.0));
    }

    #[test]
    fn dangling_anchor_is_origin() {
        let end = Endpoint::Anchor {
            node_id: Id::intern("rs_missing"),
            side: Side::Top,
            index: 3,
        };
        assert_eq!(resolve_endpoint(&[], &end, 21), Point::ORIGIN);
    }

    #[test]
    fn detach_skips_connections_being_deleted() {
        let nodes = vec![node("rs_b", 10.0, 10.0)];
        let anchored = Endpoint::Anchor {
            node_id: Id::intern("rs_b"),
            side: Side::Left,
            index: 0,
        };
        let mut keep = Connection::between(Id::intern("rs_keep"), Point::ORIGIN, Point::ORIGIN);
        keep.end = anchored;
        let mut gone = keep.clone();
        gone.id = Id::intern("rs_gone");

        let mut conns = vec![keep, gone];
        let n = detach_endpoints(&mut conns, &nodes, &[Id::intern("rs_b")], &[Id::intern("rs_gone")], 21);
        assert_eq!(n, 1);
        assert_eq!(conns[0].end, Endpoint::Point { x: 10.0, y: 10.0 });
        assert_eq!(conns[1].end, anchored);
    }
}
