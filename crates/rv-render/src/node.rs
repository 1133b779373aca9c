//! Node → visual projection: resolved colors, radii and label placement.

use rv_core::geometry::{Point, Rect};
use rv_core::model::{FontWeight, LineStyle, Node, Shadow, TextAlign};
use rv_core::{Id, ResizeHandle, Rgba, hex_to_rgba};
use serde::Serialize;

/// Grab radius of a node's corner resize handle.
pub const RESIZE_HANDLE_RADIUS: f64 = 6.0;
/// Horizontal and vertical padding around a label with a background.
const LABEL_PAD: (f64, f64) = (4.0, 2.0);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLayer {
    pub source: String,
    pub opacity: f64,
    /// Corner radius inside the border.
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLabelVisual {
    pub lines: Vec<String>,
    /// World-space anchor the text block is centred on.
    pub anchor: Point,
    /// Estimated text box, used for hit testing and the background.
    pub bounds: Rect,
    pub color: Rgba,
    pub font_size: f64,
    pub bold: bool,
    pub align: TextAlign,
    pub background: Option<Rgba>,
    pub shadow: Shadow,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandleVisual {
    pub corner: &'static str,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeVisual {
    pub id: Id,
    pub selected: bool,
    pub bounds: Rect,
    pub fill: Rgba,
    pub border_color: Rgba,
    pub border_width: f64,
    pub dashed: bool,
    pub radius: f64,
    pub shadow: Shadow,
    pub image: Option<ImageLayer>,
    pub label: NodeLabelVisual,
    /// Corner handles; only present on selected nodes.
    pub handles: Vec<HandleVisual>,
}

impl NodeVisual {
    pub fn handle_at(&self, p: Point) -> Option<ResizeHandle> {
        if !self.selected {
            return None;
        }
        ResizeHandle::ALL
            .into_iter()
            .find(|h| h.position(&self.bounds).distance(p) <= RESIZE_HANDLE_RADIUS)
    }
}

/// Estimated box of a block of text centred on `anchor`.
///
/// Uses one em per character, which over-covers Latin text and matches
/// full-width text, so labels stay grabbable either way.
pub fn text_box(lines: &[String], font_size: f64, anchor: Point) -> Rect {
    let max_chars = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as f64;
    let w = max_chars * font_size + LABEL_PAD.0 * 2.0;
    let h = lines.len() as f64 * font_size * crate::route::LINE_HEIGHT + LABEL_PAD.1 * 2.0;
    Rect::new(anchor.x - w / 2.0, anchor.y - h / 2.0, w, h)
}

pub fn project_node(node: &Node, selected: bool) -> NodeVisual {
    let style = &node.style;
    let text = &node.text;
    let bounds = node.bounds();
    let radius = style.radius_px();

    let lines: Vec<String> = node.label_lines().map(str::to_string).collect();
    let anchor = node.text_position();
    let label_bg = hex_to_rgba(&text.bg_color, 100.0);

    let label = NodeLabelVisual {
        bounds: text_box(&lines, text.font_size, anchor),
        lines,
        anchor,
        color: hex_to_rgba(&text.color, 100.0),
        font_size: text.font_size,
        bold: text.font_weight == FontWeight::Bold,
        align: text.align,
        background: (!label_bg.is_transparent()).then_some(label_bg),
        shadow: text.shadow,
    };

    let image = style.background_image.as_ref().map(|src| ImageLayer {
        source: src.clone(),
        opacity: (style.image_opacity / 100.0).clamp(0.0, 1.0),
        radius: (radius - style.border_width).max(0.0),
    });

    let handles = if selected {
        ResizeHandle::ALL
            .into_iter()
            .map(|h| HandleVisual {
                corner: h.as_str(),
                position: h.position(&bounds),
            })
            .collect()
    } else {
        Vec::new()
    };

    NodeVisual {
        id: node.id,
        selected,
        bounds,
        fill: hex_to_rgba(&style.background_color, style.opacity),
        border_color: hex_to_rgba(&style.border_color, 100.0),
        border_width: style.border_width.max(0.0),
        dashed: style.border_style == LineStyle::Dashed,
        radius,
        shadow: style.box_shadow,
        image,
        label,
        handles,
    }
}
