//! Diagram data model: nodes, connections and their styles.
//!
//! Field names serialize in camelCase so saved files stay readable by the
//! browser page. Every style struct carries `#[serde(default)]` so files
//! written by older versions, which omit most style keys, still load.

use crate::geometry::{Point, Rect, Side};
use crate::id::Id;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

// ─── Shared style enums ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Drop shadow preset for node boxes and label text.
///
/// Older files stored raw CSS here; anything unrecognized reads as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Shadow {
    #[default]
    None,
    Black,
    White,
}

impl From<String> for Shadow {
    fn from(s: String) -> Self {
        match s.as_str() {
            "black" => Shadow::Black,
            "white" => Shadow::White,
            _ => Shadow::None,
        }
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// Node variant. Only affects creation defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Person,
    Box,
}

impl NodeKind {
    pub fn is_person(&self) -> bool {
        matches!(self, NodeKind::Person)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeStyle {
    pub width: f64,
    pub height: f64,
    pub border_color: String,
    pub border_width: f64,
    pub border_style: LineStyle,
    pub background_color: String,
    /// Fill opacity, 0–100.
    pub opacity: f64,
    /// Corner rounding as a percentage of `min(width, height) / 2`.
    pub border_radius: f64,
    pub box_shadow: Shadow,
    /// Image layer source, usually a `url('data:...')` string.
    #[serde(with = "none_string")]
    pub background_image: Option<String>,
    pub image_opacity: f64,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            width: 120.0,
            height: 60.0,
            border_color: "#333333".into(),
            border_width: 2.0,
            border_style: LineStyle::Solid,
            background_color: "#ffffff".into(),
            opacity: 100.0,
            border_radius: 10.0,
            box_shadow: Shadow::None,
            background_image: None,
            image_opacity: 100.0,
        }
    }
}

impl NodeStyle {
    /// Corner radius in pixels.
    pub fn radius_px(&self) -> f64 {
        let max = self.width.min(self.height) / 2.0;
        ((self.border_radius / 100.0) * max).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    /// Label anchor relative to the node origin. `None` means centred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    pub color: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub align: TextAlign,
    pub bg_color: String,
    pub shadow: Shadow,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            color: "#333333".into(),
            font_size: 14.0,
            font_weight: FontWeight::Normal,
            align: TextAlign::Center,
            bg_color: "transparent".into(),
            shadow: Shadow::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: Id,
    #[serde(rename = "type", default, skip_serializing_if = "NodeKind::is_person")]
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub style: NodeStyle,
    #[serde(default)]
    pub text: TextStyle,
}

impl Node {
    /// A node of `kind` with its creation defaults, top-left at `(x, y)`.
    pub fn new(id: Id, kind: NodeKind, x: f64, y: f64) -> Self {
        let (w, h, label) = match kind {
            NodeKind::Person => (60.0, 60.0, "New person"),
            NodeKind::Box => (150.0, 100.0, "New box\nwith line breaks"),
        };
        Self {
            id,
            kind,
            x,
            y,
            label: label.into(),
            style: NodeStyle {
                width: w,
                height: h,
                ..NodeStyle::default()
            },
            text: TextStyle {
                x: Some(w / 2.0),
                y: Some(h / 2.0),
                ..TextStyle::default()
            },
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.style.width, self.style.height)
    }

    /// Label anchor in world coordinates.
    pub fn text_position(&self) -> Point {
        Point::new(
            self.x + self.text.x.unwrap_or(self.style.width / 2.0),
            self.y + self.text.y.unwrap_or(self.style.height / 2.0),
        )
    }

    pub fn label_lines(&self) -> impl Iterator<Item = &str> {
        self.label.split('\n')
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

/// One end of a connection: attached to a node anchor, or a free point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Endpoint {
    Anchor {
        #[serde(rename = "nodeId")]
        node_id: Id,
        side: Side,
        index: usize,
    },
    Point {
        x: f64,
        y: f64,
    },
}

impl Endpoint {
    pub fn point(p: Point) -> Self {
        Endpoint::Point { x: p.x, y: p.y }
    }

    pub fn anchored_to(&self) -> Option<Id> {
        match self {
            Endpoint::Anchor { node_id, .. } => Some(*node_id),
            Endpoint::Point { .. } => None,
        }
    }

    /// Literal coordinate of a point endpoint.
    pub fn as_point(&self) -> Option<Point> {
        match self {
            Endpoint::Point { x, y } => Some(Point::new(*x, *y)),
            Endpoint::Anchor { .. } => None,
        }
    }

    /// Apply `f` to a point endpoint; anchors are left alone.
    pub fn map_point(&mut self, f: impl FnOnce(Point) -> Point) {
        if let Endpoint::Point { x, y } = self {
            let p = f(Point::new(*x, *y));
            *x = p.x;
            *y = p.y;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowKind {
    None,
    Start,
    #[default]
    End,
    Both,
}

impl ArrowKind {
    pub fn has_start(self) -> bool {
        matches!(self, ArrowKind::Start | ArrowKind::Both)
    }

    pub fn has_end(self) -> bool {
        matches!(self, ArrowKind::End | ArrowKind::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionStyle {
    pub color: String,
    pub width: f64,
    pub dash: LineStyle,
    pub arrow: ArrowKind,
}

impl Default for ConnectionStyle {
    fn default() -> Self {
        Self {
            color: "#555".into(),
            width: 2.0,
            dash: LineStyle::Solid,
            arrow: ArrowKind::End,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionLabel {
    pub text: String,
    pub font_size: f64,
    pub color: String,
    pub font_weight: FontWeight,
    pub bg_color: String,
    pub offset_x: f64,
    pub offset_y: f64,
    pub is_vertical: bool,
}

impl Default for ConnectionLabel {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 12.0,
            color: "#333".into(),
            font_weight: FontWeight::Normal,
            bg_color: "transparent".into(),
            offset_x: 0.0,
            offset_y: 0.0,
            is_vertical: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: Id,
    pub start: Endpoint,
    pub end: Endpoint,
    #[serde(default)]
    pub waypoints: SmallVec<[Point; 4]>,
    #[serde(default)]
    pub style: ConnectionStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<ConnectionLabel>,
}

impl Connection {
    /// A straight, unlabelled connection between two free points.
    pub fn between(id: Id, start: Point, end: Point) -> Self {
        Self {
            id,
            start: Endpoint::point(start),
            end: Endpoint::point(end),
            waypoints: SmallVec::new(),
            style: ConnectionStyle::default(),
            label: None,
        }
    }

    /// Visit every stored (non-anchored) coordinate: point endpoints and
    /// waypoints.
    pub fn map_free_points(&mut self, mut f: impl FnMut(Point) -> Point) {
        self.start.map_point(&mut f);
        self.end.map_point(&mut f);
        for wp in self.waypoints.iter_mut() {
            *wp = f(*wp);
        }
    }
}

// ─── Settings & snapshots ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub background_color: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            background_color: "#f0f2f5".into(),
        }
    }
}

/// Structural copy of the whole document, compared with `==` by history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    pub app_settings: AppSettings,
}

// ─── "none" ⇄ Option ─────────────────────────────────────────────────────

mod none_string {
    use super::*;

    pub fn serialize<S: Serializer>(v: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(v.as_deref().unwrap_or("none"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.filter(|s| !s.is_empty() && s != "none"))
    }
}
