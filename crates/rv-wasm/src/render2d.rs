//! Canvas2D painter.
//!
//! Walks a built `Frame` and draws it onto an HTML `<canvas>` via
//! `CanvasRenderingContext2d`. Geometry comes fully resolved from
//! `rv-render`; this module only issues drawing calls.

use rv_core::geometry::{Point, Rect};
use rv_core::model::{Shadow, TextAlign};
use rv_render::node::NodeVisual;
use rv_render::route::{ArrowHead, ConnectionGeometry, LINE_HEIGHT};
use rv_render::Frame;
use std::collections::HashMap;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

const FONT_FAMILY: &str = "\"Helvetica Neue\", Arial, sans-serif";
const HANDLE_STROKE: &str = "#007bff";
const SNAP_COLOR: &str = "rgba(255,152,0,0.9)";
const SELECTION_FILL: &str = "rgba(0,123,255,0.1)";
const SPOTLIGHT_SHADE: &str = "rgba(0,0,0,0.7)";

/// Decoded node images keyed by their data URL.
#[derive(Default)]
pub struct ImageCache {
    images: HashMap<String, HtmlImageElement>,
}

impl ImageCache {
    /// Image element for `source`, created on first use. The browser
    /// decodes it asynchronously; incomplete images are skipped.
    fn get(&mut self, source: &str) -> Option<&HtmlImageElement> {
        if !self.images.contains_key(source) {
            let img = HtmlImageElement::new().ok()?;
            img.set_src(source);
            self.images.insert(source.to_string(), img);
        }
        self.images.get(source).filter(|img| img.complete())
    }

    /// Drop images no longer referenced by any node.
    pub fn retain_used(&mut self, frame: &Frame) {
        self.images.retain(|src, _| {
            frame
                .nodes
                .iter()
                .any(|n| n.image.as_ref().is_some_and(|i| &i.source == src))
        });
    }
}

pub fn render_frame(ctx: &CanvasRenderingContext2d, frame: &Frame, width: f64, height: f64, images: &mut ImageCache) {
    let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    ctx.set_fill_style_str(&frame.background.to_string());
    ctx.fill_rect(0.0, 0.0, width, height);

    ctx.save();
    let vp = frame.viewport;
    let _ = ctx.translate(vp.x, vp.y);
    let _ = ctx.scale(vp.scale, vp.scale);

    for conn in &frame.connections {
        draw_connection(ctx, conn, vp.scale);
    }
    for node in &frame.nodes {
        draw_node(ctx, node, vp.scale, images);
    }

    if let Some(p) = frame.snap_indicator {
        ctx.set_fill_style_str(SNAP_COLOR);
        circle(ctx, p, 6.0 / vp.scale);
        ctx.fill();
    }
    if let Some(r) = frame.selection_rect {
        ctx.set_fill_style_str(SELECTION_FILL);
        ctx.fill_rect(r.x, r.y, r.width, r.height);
        ctx.set_stroke_style_str(HANDLE_STROKE);
        ctx.set_line_width(1.0 / vp.scale);
        ctx.stroke_rect(r.x, r.y, r.width, r.height);
    }
    ctx.restore();

    if let Some(spot) = frame.spotlight {
        ctx.save();
        ctx.begin_path();
        ctx.rect(0.0, 0.0, width, height);
        let _ = ctx.arc(spot.center.x, spot.center.y, spot.radius, 0.0, std::f64::consts::TAU);
        ctx.set_fill_style_str(SPOTLIGHT_SHADE);
        ctx.fill_with_canvas_winding_rule(web_sys::CanvasWindingRule::Evenodd);
        ctx.restore();
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

fn draw_connection(ctx: &CanvasRenderingContext2d, conn: &ConnectionGeometry, scale: f64) {
    ctx.save();
    ctx.set_stroke_style_str(&conn.stroke_color);
    ctx.set_line_width(conn.stroke_width);
    ctx.set_line_join("round");
    if let Some([dash, gap]) = conn.dash {
        let _ = ctx.set_line_dash(&js_sys::Array::of2(&dash.into(), &gap.into()));
    }
    ctx.begin_path();
    let pts = conn.points();
    if let Some((first, rest)) = pts.split_first() {
        ctx.move_to(first.x, first.y);
        for p in rest {
            ctx.line_to(p.x, p.y);
        }
    }
    ctx.stroke();
    ctx.restore();

    ctx.set_fill_style_str(&conn.stroke_color);
    for head in [conn.start_arrow, conn.end_arrow].iter().flatten() {
        draw_arrow(ctx, head);
    }

    if let Some(label) = &conn.label {
        ctx.save();
        if let Some(bg) = &label.background {
            ctx.set_fill_style_str(bg);
            rounded_rect(ctx, &label.bounds, 4.0);
            ctx.fill();
        }
        let weight = if label.bold { "bold" } else { "normal" };
        ctx.set_font(&format!("{weight} {}px {FONT_FAMILY}", label.font_size));
        ctx.set_fill_style_str(&label.color);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        for line in &label.lines {
            if label.vertical {
                // Upright glyphs stacked top to bottom.
                let count = line.text.chars().count() as f64;
                for (i, ch) in line.text.chars().enumerate() {
                    let y = line.y + (i as f64 - (count - 1.0) / 2.0) * label.font_size;
                    let _ = ctx.fill_text(&ch.to_string(), line.x, y);
                }
            } else {
                let _ = ctx.fill_text(&line.text, line.x, line.y);
            }
        }
        ctx.restore();
    }

    if conn.selected {
        for p in [conn.start, conn.end].iter().chain(conn.waypoints.iter()) {
            draw_handle(ctx, *p, scale);
        }
    }
}

fn draw_arrow(ctx: &CanvasRenderingContext2d, head: &ArrowHead) {
    ctx.begin_path();
    ctx.move_to(head.base_left.x, head.base_left.y);
    ctx.line_to(head.tip.x, head.tip.y);
    ctx.line_to(head.base_right.x, head.base_right.y);
    ctx.close_path();
    ctx.fill();
}

// ─── Nodes ───────────────────────────────────────────────────────────────

fn draw_node(ctx: &CanvasRenderingContext2d, node: &NodeVisual, scale: f64, images: &mut ImageCache) {
    let b = &node.bounds;

    ctx.save();
    match node.shadow {
        Shadow::None => {}
        Shadow::Black => {
            ctx.set_shadow_color("rgba(0,0,0,0.4)");
            ctx.set_shadow_blur(8.0 * scale);
            ctx.set_shadow_offset_y(4.0 * scale);
        }
        Shadow::White => {
            ctx.set_shadow_color("rgba(255,255,255,0.4)");
            ctx.set_shadow_blur(8.0 * scale);
        }
    }
    rounded_rect(ctx, b, node.radius);
    // Fill even when transparent so the shadow has a shape to follow.
    ctx.set_fill_style_str(&node.fill.to_string());
    ctx.fill();
    ctx.restore();

    if let Some(layer) = &node.image
        && let Some(img) = images.get(&layer.source)
    {
        ctx.save();
        let inset = node.border_width;
        let inner = Rect::new(
            b.x + inset,
            b.y + inset,
            (b.width - 2.0 * inset).max(0.0),
            (b.height - 2.0 * inset).max(0.0),
        );
        rounded_rect(ctx, &inner, layer.radius);
        ctx.clip();
        ctx.set_global_alpha(layer.opacity);
        let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, inner.x, inner.y, inner.width, inner.height);
        ctx.restore();
    }

    if node.border_width > 0.0 && !node.border_color.is_transparent() {
        ctx.save();
        ctx.set_stroke_style_str(&node.border_color.to_string());
        ctx.set_line_width(node.border_width);
        if node.dashed {
            let w = node.border_width;
            let _ = ctx.set_line_dash(&js_sys::Array::of2(&(w * 3.0).into(), &(w * 2.0).into()));
        }
        rounded_rect(ctx, b, node.radius);
        ctx.stroke();
        ctx.restore();
    }

    draw_node_label(ctx, node);

    for h in &node.handles {
        draw_handle(ctx, h.position, scale);
    }
}

fn draw_node_label(ctx: &CanvasRenderingContext2d, node: &NodeVisual) {
    let label = &node.label;
    if label.lines.iter().all(|l| l.is_empty()) {
        return;
    }
    ctx.save();
    if let Some(bg) = label.background {
        ctx.set_fill_style_str(&bg.to_string());
        rounded_rect(ctx, &label.bounds, 4.0);
        ctx.fill();
    }
    match label.shadow {
        Shadow::None => {}
        Shadow::Black => {
            ctx.set_shadow_color("rgba(0,0,0,0.6)");
            ctx.set_shadow_blur(3.0);
        }
        Shadow::White => {
            ctx.set_shadow_color("rgba(255,255,255,0.9)");
            ctx.set_shadow_blur(3.0);
        }
    }
    let weight = if label.bold { "bold" } else { "normal" };
    ctx.set_font(&format!("{weight} {}px {FONT_FAMILY}", label.font_size));
    ctx.set_fill_style_str(&label.color.to_string());
    ctx.set_text_baseline("middle");
    let (align, x) = match label.align {
        TextAlign::Left => ("left", label.bounds.x + 4.0),
        TextAlign::Center => ("center", label.anchor.x),
        TextAlign::Right => ("right", label.bounds.right() - 4.0),
    };
    ctx.set_text_align(align);

    let step = label.font_size * LINE_HEIGHT;
    let mid = (label.lines.len() as f64 - 1.0) / 2.0;
    for (i, line) in label.lines.iter().enumerate() {
        let y = label.anchor.y + (i as f64 - mid) * step;
        let _ = ctx.fill_text(line, x, y);
    }
    ctx.restore();
}

// ─── Helpers ─────────────────────────────────────────────────────────────

/// Handles keep a constant on-screen size whatever the zoom.
fn draw_handle(ctx: &CanvasRenderingContext2d, p: Point, scale: f64) {
    ctx.save();
    ctx.set_fill_style_str("#ffffff");
    ctx.set_stroke_style_str(HANDLE_STROKE);
    ctx.set_line_width(1.5 / scale);
    circle(ctx, p, 5.0 / scale);
    ctx.fill();
    ctx.stroke();
    ctx.restore();
}

fn circle(ctx: &CanvasRenderingContext2d, p: Point, r: f64) {
    ctx.begin_path();
    let _ = ctx.arc(p.x, p.y, r, 0.0, std::f64::consts::TAU);
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, r: &Rect, radius: f64) {
    let radius = radius.min(r.width / 2.0).min(r.height / 2.0).max(0.0);
    ctx.begin_path();
    ctx.move_to(r.x + radius, r.y);
    let _ = ctx.arc_to(r.right(), r.y, r.right(), r.bottom(), radius);
    let _ = ctx.arc_to(r.right(), r.bottom(), r.x, r.bottom(), radius);
    let _ = ctx.arc_to(r.x, r.bottom(), r.x, r.y, radius);
    let _ = ctx.arc_to(r.x, r.y, r.right(), r.y, radius);
    ctx.close_path();
}
