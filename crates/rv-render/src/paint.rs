//! Frame → Vello drawing commands.
//!
//! Walks a built `Frame` and emits Vello fills and strokes under the
//! viewport transform. The caller presents the scene via wgpu.

use crate::frame::Frame;
use crate::node::NodeVisual;
use crate::route::{ArrowHead, ConnectionGeometry};
use kurbo::{Affine, BezPath, Circle, Point as KPoint, Rect as KRect, RoundedRect, Stroke as KurboStroke};
use peniko::{Color, Fill};
use rv_core::Rgba;
use rv_core::geometry::{Point, Rect};
use rv_core::model::Shadow;
use vello::Scene;

const HANDLE_FILL: Rgba = Rgba::WHITE;
const HANDLE_STROKE: Rgba = Rgba::new(0, 0x7b, 0xff, 1.0);
const SNAP_COLOR: Rgba = Rgba::new(0xff, 0x98, 0x00, 0.9);
const SELECTION_FILL: Rgba = Rgba::new(0, 0x7b, 0xff, 0.1);

/// Paint the entire frame to a Vello scene.
///
/// Call once per frame with a freshly-cleared `Scene`.
pub fn paint_frame(scene: &mut Scene, frame: &Frame, screen_width: f64, screen_height: f64) {
    let screen = KRect::new(0.0, 0.0, screen_width, screen_height);
    scene.fill(Fill::NonZero, Affine::IDENTITY, color(frame.background), None, &screen);

    let vp = frame.viewport;
    let world = Affine::translate((vp.x, vp.y)) * Affine::scale(vp.scale);

    for conn in &frame.connections {
        paint_connection(scene, world, conn);
    }
    for node in &frame.nodes {
        paint_node(scene, world, node);
    }

    if let Some(p) = frame.snap_indicator {
        scene.fill(Fill::NonZero, world, color(SNAP_COLOR), None, &Circle::new(kp(p), 6.0));
    }
    if let Some(r) = frame.selection_rect {
        let shape = krect(&r);
        scene.fill(Fill::NonZero, world, color(SELECTION_FILL), None, &shape);
        scene.stroke(&KurboStroke::new(1.0 / vp.scale), world, color(HANDLE_STROKE), None, &shape);
    }
    if let Some(spot) = frame.spotlight {
        paint_spotlight(scene, screen, kp(spot.center), spot.radius);
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

fn paint_connection(scene: &mut Scene, world: Affine, conn: &ConnectionGeometry) {
    let Some(stroke_color) = Rgba::parse(&conn.stroke_color) else {
        log::warn!("connection {} has unparseable color {:?}", conn.id, conn.stroke_color);
        return;
    };

    let mut path = BezPath::new();
    let pts = conn.points();
    if let Some((first, rest)) = pts.split_first() {
        path.move_to(kp(*first));
        for p in rest {
            path.line_to(kp(*p));
        }
    }

    let mut stroke = KurboStroke::new(conn.stroke_width);
    if let Some([dash, gap]) = conn.dash {
        stroke = stroke.with_dashes(0.0, [dash, gap]);
    }
    scene.stroke(&stroke, world, color(stroke_color), None, &path);

    for head in [conn.start_arrow, conn.end_arrow].into_iter().flatten() {
        paint_arrow(scene, world, &head, stroke_color);
    }

    if let Some(label) = &conn.label {
        if let Some(bg) = label.background.as_deref().and_then(Rgba::parse) {
            let shape = krect(&label.bounds).to_rounded_rect(4.0);
            scene.fill(Fill::NonZero, world, color(bg), None, &shape);
        }
        for line in &label.lines {
            log::trace!(
                "LABEL {} {:?} at ({}, {}) {}px{}",
                conn.id,
                line.text,
                line.x,
                line.y,
                label.font_size,
                if label.vertical { " vertical" } else { "" }
            );
        }
    }

    if conn.selected {
        let mut handles = vec![conn.start, conn.end];
        handles.extend(conn.waypoints.iter().copied());
        for p in handles {
            paint_handle(scene, world, p, 5.0);
        }
    }
}

fn paint_arrow(scene: &mut Scene, world: Affine, head: &ArrowHead, c: Rgba) {
    let mut tri = BezPath::new();
    tri.move_to(kp(head.base_left));
    tri.line_to(kp(head.tip));
    tri.line_to(kp(head.base_right));
    tri.close_path();
    scene.fill(Fill::NonZero, world, color(c), None, &tri);
}

// ─── Nodes ───────────────────────────────────────────────────────────────

fn paint_node(scene: &mut Scene, world: Affine, node: &NodeVisual) {
    let shape: RoundedRect = krect(&node.bounds).to_rounded_rect(node.radius);

    match node.shadow {
        Shadow::None => {}
        Shadow::Black => {
            let offset = world * Affine::translate((0.0, 4.0));
            scene.fill(Fill::NonZero, offset, Color::from_rgba8(0, 0, 0, 102), None, &shape);
        }
        Shadow::White => {
            let glow = krect(&node.bounds.inflate(4.0)).to_rounded_rect(node.radius + 4.0);
            scene.fill(Fill::NonZero, world, Color::from_rgba8(255, 255, 255, 102), None, &glow);
        }
    }

    if !node.fill.is_transparent() {
        scene.fill(Fill::NonZero, world, color(node.fill), None, &shape);
    }

    if let Some(image) = &node.image {
        // Decoded pixels live in the host; the native painter only logs.
        log::trace!("IMAGE {} opacity {} ({} bytes)", node.id, image.opacity, image.source.len());
    }

    if node.border_width > 0.0 && !node.border_color.is_transparent() {
        let mut stroke = KurboStroke::new(node.border_width);
        if node.dashed {
            stroke = stroke.with_dashes(0.0, [node.border_width * 3.0, node.border_width * 2.0]);
        }
        scene.stroke(&stroke, world, color(node.border_color), None, &shape);
    }

    let label = &node.label;
    if let Some(bg) = label.background {
        let shape = krect(&label.bounds).to_rounded_rect(4.0);
        scene.fill(Fill::NonZero, world, color(bg), None, &shape);
    }
    log::trace!(
        "TEXT {} {:?} at ({}, {})",
        node.id,
        label.lines,
        label.anchor.x,
        label.anchor.y
    );
    // Full text shaping requires a font context; the browser painter draws text.

    for h in &node.handles {
        paint_handle(scene, world, h.position, 5.0);
    }
}

fn paint_handle(scene: &mut Scene, world: Affine, p: Point, r: f64) {
    let dot = Circle::new(kp(p), r);
    scene.fill(Fill::NonZero, world, color(HANDLE_FILL), None, &dot);
    scene.stroke(&KurboStroke::new(1.5), world, color(HANDLE_STROKE), None, &dot);
}

/// Darken everything outside a circle around the cursor.
fn paint_spotlight(scene: &mut Scene, screen: KRect, center: KPoint, radius: f64) {
    let mut mask = BezPath::new();
    mask.move_to((screen.x0, screen.y0));
    mask.line_to((screen.x1, screen.y0));
    mask.line_to((screen.x1, screen.y1));
    mask.line_to((screen.x0, screen.y1));
    mask.close_path();
    mask.extend(kurbo::Shape::path_elements(&Circle::new(center, radius), 0.1));
    scene.fill(Fill::EvenOdd, Affine::IDENTITY, Color::from_rgba8(0, 0, 0, 178), None, &mask);
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn color(c: Rgba) -> Color {
    let [r, g, b, a] = c.to_rgba8();
    Color::from_rgba8(r, g, b, a)
}

fn kp(p: Point) -> KPoint {
    KPoint::new(p.x, p.y)
}

fn krect(r: &Rect) -> KRect {
    KRect::new(r.x, r.y, r.right(), r.bottom())
}
