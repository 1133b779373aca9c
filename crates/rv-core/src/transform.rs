//! Geometric edits on selections: move, single resize and group resize.
//!
//! Resizes are computed from the state captured when the gesture began
//! plus the total cursor delta, never incrementally, so rounding never
//! accumulates and the group anchor stays exactly fixed.

use crate::config::EngineConfig;
use crate::document::Document;
use crate::geometry::{Point, Rect};
use crate::id::Id;
use crate::model::Endpoint;
use smallvec::SmallVec;

// ─── Handles ─────────────────────────────────────────────────────────────

/// Corner resize handle of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 4] = [
        ResizeHandle::Nw,
        ResizeHandle::Ne,
        ResizeHandle::Sw,
        ResizeHandle::Se,
    ];

    fn east(self) -> bool {
        matches!(self, ResizeHandle::Ne | ResizeHandle::Se)
    }

    fn north(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::Ne)
    }

    /// Position of this handle on `bounds`.
    pub fn position(self, bounds: &Rect) -> Point {
        let x = if self.east() { bounds.right() } else { bounds.x };
        let y = if self.north() { bounds.y } else { bounds.bottom() };
        Point::new(x, y)
    }

    /// The corner of `bounds` diagonally opposite this handle.
    pub fn opposite_corner(self, bounds: &Rect) -> Point {
        let x = if self.east() { bounds.x } else { bounds.right() };
        let y = if self.north() { bounds.bottom() } else { bounds.y };
        Point::new(x, y)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeHandle::Nw => "nw",
            ResizeHandle::Ne => "ne",
            ResizeHandle::Sw => "sw",
            ResizeHandle::Se => "se",
        }
    }
}

/// Size implied by dragging `handle` by `(dx, dy)` from `(w, h)`, before
/// any minimum is applied.
fn naive_size(w: f64, h: f64, handle: ResizeHandle, dx: f64, dy: f64) -> (f64, f64) {
    let w = if handle.east() { w + dx } else { w - dx };
    let h = if handle.north() { h - dy } else { h + dy };
    (w, h)
}

// ─── Move ────────────────────────────────────────────────────────────────

/// Translate selected nodes and the free coordinates (point endpoints and
/// waypoints) of selected connections by a world-space delta. Anchored
/// ends follow their nodes through the resolver.
pub fn move_selection(doc: &mut Document, nodes: &[Id], connections: &[Id], dx: f64, dy: f64) {
    if dx == 0.0 && dy == 0.0 {
        return;
    }
    for node in doc.nodes.iter_mut().filter(|n| nodes.contains(&n.id)) {
        node.x += dx;
        node.y += dy;
    }
    for conn in doc
        .connections
        .iter_mut()
        .filter(|c| connections.contains(&c.id))
    {
        conn.map_free_points(|p| p.offset(dx, dy));
    }
    doc.touch();
}

// ─── Single resize ───────────────────────────────────────────────────────

/// New bounds for one node dragged by `handle`.
///
/// West and north handles move the origin so the opposite edge stays put.
/// `square` forces both sides to the larger one.
pub fn resize_single(start: Rect, handle: ResizeHandle, dx: f64, dy: f64, square: bool, min_size: f64) -> Rect {
    let (w, h) = naive_size(start.width, start.height, handle, dx, dy);
    let (mut w, mut h) = (w.max(min_size), h.max(min_size));
    if square {
        let side = w.max(h);
        w = side;
        h = side;
    }
    let x = if handle.east() { start.x } else { start.right() - w };
    let y = if handle.north() { start.bottom() - h } else { start.y };
    Rect::new(x, y, w, h)
}

// ─── Group resize ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct NodeStart {
    id: Id,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    text_x: f64,
    text_y: f64,
    font_size: f64,
}

#[derive(Debug, Clone)]
struct ConnStart {
    id: Id,
    start: Option<Point>,
    end: Option<Point>,
    waypoints: SmallVec<[Point; 4]>,
    label: Option<(f64, f64, f64)>,
}

/// Proportional resize of several nodes (and selected connections)
/// driven by one leader node's corner handle.
///
/// Captures every participant's initial state in `begin`; each `apply`
/// recomputes everything from that state and the total cursor delta.
#[derive(Debug, Clone)]
pub struct GroupResize {
    handle: ResizeHandle,
    anchor: Point,
    leader_w: f64,
    leader_h: f64,
    nodes: Vec<NodeStart>,
    connections: Vec<ConnStart>,
}

impl GroupResize {
    /// Returns `None` when the leader is missing from the document.
    pub fn begin(doc: &Document, leader: Id, handle: ResizeHandle, nodes: &[Id], connections: &[Id]) -> Option<Self> {
        let lead = doc.node(leader)?;
        let bounds = lead.bounds();

        let nodes = doc
            .nodes
            .iter()
            .filter(|n| nodes.contains(&n.id))
            .map(|n| NodeStart {
                id: n.id,
                x: n.x,
                y: n.y,
                w: n.style.width,
                h: n.style.height,
                text_x: n.text.x.unwrap_or(n.style.width / 2.0),
                text_y: n.text.y.unwrap_or(n.style.height / 2.0),
                font_size: n.text.font_size,
            })
            .collect();

        let connections = doc
            .connections
            .iter()
            .filter(|c| connections.contains(&c.id))
            .map(|c| ConnStart {
                id: c.id,
                start: c.start.as_point(),
                end: c.end.as_point(),
                waypoints: c.waypoints.clone(),
                label: c
                    .label
                    .as_ref()
                    .map(|l| (l.font_size, l.offset_x, l.offset_y)),
            })
            .collect();

        Some(Self {
            handle,
            anchor: handle.opposite_corner(&bounds),
            leader_w: bounds.width,
            leader_h: bounds.height,
            nodes,
            connections,
        })
    }

    /// Fixed point of the transform: the leader corner opposite the handle.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Uniform factor for a total cursor delta. Picks whichever axis
    /// deviates more from 1 so the group keeps its aspect ratio.
    pub fn scale_for(&self, dx: f64, dy: f64, config: &EngineConfig) -> f64 {
        let (w, h) = naive_size(self.leader_w, self.leader_h, self.handle, dx, dy);
        let w = w.max(config.min_node_size);
        let h = h.max(config.min_node_size);
        let sx = if self.leader_w > 0.0 { w / self.leader_w } else { 1.0 };
        let sy = if self.leader_h > 0.0 { h / self.leader_h } else { 1.0 };
        if (sx - 1.0).abs() > (sy - 1.0).abs() { sx } else { sy }
    }

    /// Apply the resize for a total cursor delta and return the factor used.
    pub fn apply(&self, doc: &mut Document, dx: f64, dy: f64, config: &EngineConfig) -> f64 {
        let s = self.scale_for(dx, dy, config);
        let a = self.anchor;

        for start in &self.nodes {
            let Some(node) = doc.node_mut(start.id) else {
                continue;
            };
            let p = Point::new(start.x, start.y).scale_about(a, s);
            node.x = p.x;
            node.y = p.y;
            node.style.width = (start.w * s).max(config.group_min_node_size);
            node.style.height = (start.h * s).max(config.group_min_node_size);
            node.text.x = Some(start.text_x * s);
            node.text.y = Some(start.text_y * s);
            node.text.font_size = (start.font_size * s).max(config.min_font_size);
        }

        for start in &self.connections {
            let Some(conn) = doc.connection_mut(start.id) else {
                continue;
            };
            if let Some(p) = start.start
                && matches!(conn.start, Endpoint::Point { .. })
            {
                conn.start = Endpoint::point(p.scale_about(a, s));
            }
            if let Some(p) = start.end
                && matches!(conn.end, Endpoint::Point { .. })
            {
                conn.end = Endpoint::point(p.scale_about(a, s));
            }
            for (wp, init) in conn.waypoints.iter_mut().zip(start.waypoints.iter()) {
                *wp = init.scale_about(a, s);
            }
            if let (Some(label), Some((fs, ox, oy))) = (conn.label.as_mut(), start.label) {
                label.font_size = (fs * s).max(config.min_label_font_size);
                label.offset_x = ox * s;
                label.offset_y = oy * s;
            }
        }

        doc.touch();
        s
    }
}
