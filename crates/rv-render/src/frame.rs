//! Frame assembly: the complete, paintable projection of one editor state.
//!
//! A `Frame` is recomputed from the document on every change and never
//! stored back; painters (Vello natively, Canvas2D in the browser) only
//! read it.

use crate::node::{NodeVisual, project_node};
use crate::route::{ConnectionGeometry, route_connection};
use rv_core::geometry::{Point, Rect};
use rv_core::{Document, Id, Rgba, Viewport, hex_to_rgba};
use serde::Serialize;

/// Radius of the presentation spotlight, in screen pixels.
pub const SPOTLIGHT_RADIUS: f64 = 150.0;

/// Ids currently selected, borrowed from the editor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionView<'a> {
    pub nodes: &'a [Id],
    pub connections: &'a [Id],
}

/// Transient decorations that are not part of the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlays {
    /// World position of the anchor a dragged handle would snap to.
    pub snap_indicator: Option<Point>,
    /// World-space range-selection rectangle.
    pub selection_rect: Option<Rect>,
    /// Screen position of the presentation spotlight.
    pub spotlight: Option<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spotlight {
    pub center: Point,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub revision: u64,
    pub background: Rgba,
    pub viewport: Viewport,
    /// Connections in paint order, drawn beneath nodes.
    pub connections: Vec<ConnectionGeometry>,
    /// Nodes in paint order (last is topmost).
    pub nodes: Vec<NodeVisual>,
    pub snap_indicator: Option<Point>,
    pub selection_rect: Option<Rect>,
    pub spotlight: Option<Spotlight>,
}

impl Frame {
    pub fn node(&self, id: Id) -> Option<&NodeVisual> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn connection(&self, id: Id) -> Option<&ConnectionGeometry> {
        self.connections.iter().find(|c| c.id == id)
    }
}

pub fn build_frame(doc: &Document, viewport: Viewport, selection: SelectionView<'_>, overlays: &Overlays) -> Frame {
    let connections = doc
        .connections
        .iter()
        .map(|c| route_connection(doc, c, selection.connections.contains(&c.id)))
        .collect();

    let nodes = doc
        .nodes
        .iter()
        .map(|n| project_node(n, selection.nodes.contains(&n.id)))
        .collect::<Vec<_>>();

    log::trace!(
        "frame r{}: {} nodes, {} connections",
        doc.revision(),
        nodes.len(),
        doc.connections.len()
    );

    Frame {
        revision: doc.revision(),
        background: hex_to_rgba(&doc.settings.background_color, 100.0),
        viewport,
        connections,
        nodes,
        snap_indicator: overlays.snap_indicator,
        selection_rect: overlays.selection_rect,
        spotlight: overlays.spotlight.map(|center| Spotlight {
            center,
            radius: SPOTLIGHT_RADIUS,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rv_core::sample::sample_snapshot;

    #[test]
    fn frame_marks_selection_and_serializes() {
        let doc = Document::from_snapshot(sample_snapshot(), 21);
        let sel = [Id::intern("conn-tutorial")];
        let frame = build_frame(
            &doc,
            Viewport::default(),
            SelectionView {
                nodes: &[],
                connections: &sel,
            },
            &Overlays {
                spotlight: Some(Point::new(10.0, 10.0)),
                ..Overlays::default()
            },
        );
        assert_eq!(frame.nodes.len(), 5);
        assert!(frame.connections[0].selected);
        assert!(frame.nodes.iter().all(|n| !n.selected));
        assert_eq!(frame.spotlight.map(|s| s.radius), Some(SPOTLIGHT_RADIUS));

        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["connections"][0]["strokeColor"], crate::route::SELECTED_COLOR);
        assert_eq!(json["nodes"][0]["id"], "node-a");
    }
}
