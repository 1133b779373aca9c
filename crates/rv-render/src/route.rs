//! Connection router: document connection → drawable and hittable geometry.
//!
//! Pipeline per connection:
//! resolve raw ends → trim for arrowheads → polyline through waypoints →
//! hit geometry → visible stroke → arrowheads → label layout.
//!
//! Ends are trimmed back from the node edge so an arrowhead drawn beyond
//! the trimmed end lands its tip just short of the anchor.

use rv_core::geometry::{Point, Rect, direction, distance_to_segment, move_point_towards};
use rv_core::model::{Connection, LineStyle};
use rv_core::{Document, Id};
use serde::Serialize;

pub const SELECTED_COLOR: &str = "#007bff";
/// Radius of the invisible circle covering each arrowhead.
pub const HIT_CIRCLE_RADIUS: f64 = 15.0;
/// Grab radius of end handles and waypoints.
pub const HANDLE_RADIUS: f64 = 8.0;
pub const LINE_HEIGHT: f64 = 1.2;
const END_MARGIN: f64 = 6.0;

/// Polyline vertices; most connections have few waypoints.
pub type PointList = rv_core::SmallVec<[Point; 6]>;

// ─── Output types ────────────────────────────────────────────────────────

/// Filled triangle drawn at one end of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowHead {
    pub tip: Point,
    pub base_left: Point,
    pub base_right: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelLine {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelLayout {
    pub center: Point,
    /// Background box. Always computed; painted only when `background` is set.
    pub bounds: Rect,
    pub background: Option<String>,
    pub lines: Vec<LabelLine>,
    pub font_size: f64,
    pub color: String,
    pub bold: bool,
    pub vertical: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionGeometry {
    pub id: Id,
    pub selected: bool,
    pub raw_start: Point,
    pub raw_end: Point,
    /// Trimmed ends; also where the end handles sit.
    pub start: Point,
    pub end: Point,
    pub waypoints: Vec<Point>,
    /// SVG path data `M x y L x y ...` through start, waypoints, end.
    pub path: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub dash: Option<[f64; 2]>,
    pub hit_width: f64,
    pub hit_circles: Vec<Point>,
    pub start_arrow: Option<ArrowHead>,
    pub end_arrow: Option<ArrowHead>,
    pub label: Option<LabelLayout>,
}

impl ConnectionGeometry {
    /// Polyline vertices `[start, ...waypoints, end]`.
    pub fn points(&self) -> PointList {
        let mut pts = PointList::new();
        pts.push(self.start);
        pts.extend(self.waypoints.iter().copied());
        pts.push(self.end);
        pts
    }

    /// Whether `p` falls on the wide invisible stroke or an arrowhead circle.
    pub fn hits_line(&self, p: Point) -> bool {
        let half = self.hit_width / 2.0;
        let pts = self.points();
        pts.windows(2).any(|w| distance_to_segment(p, w[0], w[1]) <= half)
            || self
                .hit_circles
                .iter()
                .any(|c| c.distance(p) <= HIT_CIRCLE_RADIUS)
    }

    pub fn hits_label(&self, p: Point) -> bool {
        self.label.as_ref().is_some_and(|l| l.bounds.contains(p))
    }
}

// ─── Sizing ──────────────────────────────────────────────────────────────

/// Arrowhead dimensions for a stroke width: `(base, length)`.
pub fn arrow_size(stroke_width: f64) -> (f64, f64) {
    let base = 12.0 + stroke_width * 1.5;
    (base, base * 1.3)
}

fn effective_width(w: f64) -> f64 {
    if w > 0.0 && w.is_finite() { w } else { 2.0 }
}

// ─── Routing ─────────────────────────────────────────────────────────────

/// Compute the full geometry of `conn` against the current document.
pub fn route_connection(doc: &Document, conn: &Connection, selected: bool) -> ConnectionGeometry {
    let (raw_start, raw_end) = doc.connection_endpoints(conn);
    let style = &conn.style;
    let w = effective_width(style.width);
    let (arrow_base, arrow_len) = arrow_size(w);
    let gap = arrow_len + END_MARGIN;

    let has_start = style.arrow.has_start();
    let has_end = style.arrow.has_end();

    let next = conn.waypoints.first().copied().unwrap_or(raw_end);
    let start = move_point_towards(raw_start, next, if has_start { gap } else { END_MARGIN });
    let prev = conn.waypoints.last().copied().unwrap_or(start);
    let end = move_point_towards(raw_end, prev, if has_end { gap } else { END_MARGIN });

    let waypoints: Vec<Point> = conn.waypoints.to_vec();
    let path = path_data(start, &waypoints, end);

    let mut hit_circles = Vec::new();
    if has_start {
        hit_circles.push(start);
    }
    if has_end {
        hit_circles.push(end);
    }

    let start_arrow = has_start.then(|| {
        let toward = waypoints.first().copied().unwrap_or(end);
        let (dx, dy) = direction(start, toward).unwrap_or((1.0, 0.0));
        // points backwards, away from the line
        arrow_head(start, (-dx, -dy), arrow_base, arrow_len)
    });
    let end_arrow = has_end.then(|| {
        let from = waypoints.last().copied().unwrap_or(start);
        let dir = direction(from, end).unwrap_or((1.0, 0.0));
        arrow_head(end, dir, arrow_base, arrow_len)
    });

    let label = conn
        .label
        .as_ref()
        .filter(|l| !l.text.is_empty())
        .map(|l| {
            layout_label(
                start.midpoint(end).offset(l.offset_x, l.offset_y),
                &l.text,
                l.font_size,
                l.is_vertical,
                &l.color,
                (l.bg_color != "transparent" && !l.bg_color.is_empty()).then(|| l.bg_color.clone()),
                matches!(l.font_weight, rv_core::FontWeight::Bold),
            )
        });

    log::trace!(
        "route {} → {} vertices, arrows ({has_start}, {has_end})",
        conn.id,
        waypoints.len() + 2
    );

    ConnectionGeometry {
        id: conn.id,
        selected,
        raw_start,
        raw_end,
        start,
        end,
        waypoints,
        path,
        stroke_color: if selected {
            SELECTED_COLOR.to_string()
        } else {
            style.color.clone()
        },
        stroke_width: w,
        dash: (style.dash == LineStyle::Dashed).then_some([w * 4.0, w * 2.5]),
        hit_width: (w + 12.0).max(15.0),
        hit_circles,
        start_arrow,
        end_arrow,
        label,
    }
}

fn path_data(start: Point, waypoints: &[Point], end: Point) -> String {
    use std::fmt::Write;
    let mut d = format!("M {} {}", start.x, start.y);
    for wp in waypoints {
        let _ = write!(d, " L {} {}", wp.x, wp.y);
    }
    let _ = write!(d, " L {} {}", end.x, end.y);
    d
}

/// Triangle whose base sits 1 unit beyond `at` along `dir` and whose tip
/// extends `len` further.
fn arrow_head(at: Point, dir: (f64, f64), base: f64, len: f64) -> ArrowHead {
    let (dx, dy) = dir;
    let (nx, ny) = (-dy, dx);
    let base_center = at.offset(dx, dy);
    let half = base / 2.0;
    ArrowHead {
        tip: base_center.offset(dx * len, dy * len),
        base_left: base_center.offset(nx * half, ny * half),
        base_right: base_center.offset(-nx * half, -ny * half),
    }
}

/// Lay out a multi-line label centred on `center`.
///
/// Horizontal text stacks lines top to bottom; vertical text stacks
/// columns right to left, the first line rightmost.
pub fn layout_label(
    center: Point,
    text: &str,
    font_size: f64,
    vertical: bool,
    color: &str,
    background: Option<String>,
    bold: bool,
) -> LabelLayout {
    let lines: Vec<&str> = text.split('\n').collect();
    let n = lines.len() as f64;
    let max_chars = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as f64;
    let step = font_size * LINE_HEIGHT;

    let long = max_chars * font_size + 10.0;
    let across = n * step + 10.0;
    let (w, h) = if vertical { (across, long) } else { (long, across) };
    let bounds = Rect::new(center.x - w / 2.0, center.y - h / 2.0, w, h);

    let mid = (n - 1.0) / 2.0;
    let lines = lines
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let i = i as f64;
            let (x, y) = if vertical {
                (center.x - 1.0 + (mid - i) * step, center.y)
            } else {
                (center.x, center.y + 1.0 + (i - mid) * step)
            };
            LabelLine {
                text: (*s).to_string(),
                x,
                y,
            }
        })
        .collect();

    LabelLayout {
        center,
        bounds,
        background,
        lines,
        font_size,
        color: color.to_string(),
        bold,
        vertical,
    }
}

// ─── Editing helpers ─────────────────────────────────────────────────────

/// Index at which a waypoint clicked at `click` should be inserted into
/// the waypoint list of a polyline `[start, ...waypoints, end]`.
///
/// Picks the segment with the smallest detour `|AC| + |CB| - |AB|`.
pub fn waypoint_insert_index(vertices: &[Point], click: Point) -> usize {
    let mut best = 0;
    let mut best_cost = f64::INFINITY;
    for (i, seg) in vertices.windows(2).enumerate() {
        let cost = seg[0].distance(click) + click.distance(seg[1]) - seg[0].distance(seg[1]);
        if cost < best_cost {
            best_cost = cost;
            best = i;
        }
    }
    best
}

/// Snap a dragged vertex so both neighbouring segments are axis-aligned,
/// picking whichever of the two L-corners is closer to the cursor.
/// An exact tie goes to the vertical-first corner `(prev.x, next.y)`.
pub fn orthogonal_snap(prev: Point, next: Point, cursor: Point) -> Point {
    let horizontal_first = Point::new(next.x, prev.y);
    let vertical_first = Point::new(prev.x, next.y);
    if cursor.distance(horizontal_first) < cursor.distance(vertical_first) {
        horizontal_first
    } else {
        vertical_first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rv_core::model::{ArrowKind, ConnectionLabel};

    fn straight(arrow: ArrowKind) -> (Document, Connection) {
        let mut c = Connection::between(Id::intern("rt"), Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        c.style.arrow = arrow;
        (Document::default(), c)
    }

    #[test]
    fn arrow_gap_trims_only_arrowed_end() {
        let (doc, c) = straight(ArrowKind::End);
        let g = route_connection(&doc, &c, false);
        let (_, len) = arrow_size(2.0);
        assert_eq!(g.start, Point::new(6.0, 0.0));
        assert!((g.end.x - (100.0 - len - 6.0)).abs() < 1e-9);
        assert_eq!(g.hit_circles, vec![g.end]);
        assert!(g.start_arrow.is_none());

        let tip = g.end_arrow.unwrap().tip;
        assert!((tip.x - (g.end.x + 1.0 + len)).abs() < 1e-9);
    }

    #[test]
    fn start_arrow_points_away_from_line() {
        let (doc, c) = straight(ArrowKind::Both);
        let g = route_connection(&doc, &c, false);
        let tip = g.start_arrow.unwrap().tip;
        assert!(tip.x < g.start.x);
        assert_eq!(g.hit_circles.len(), 2);
    }

    #[test]
    fn selection_color_and_dash() {
        let (doc, mut c) = straight(ArrowKind::None);
        c.style.dash = LineStyle::Dashed;
        c.style.width = 4.0;
        let g = route_connection(&doc, &c, true);
        assert_eq!(g.stroke_color, SELECTED_COLOR);
        assert_eq!(g.dash, Some([16.0, 10.0]));
        assert_eq!(g.hit_width, 16.0);
        assert_eq!(g.path, "M 6 0 L 94 0");
    }

    #[test]
    fn label_box_and_line_positions() {
        let (doc, mut c) = straight(ArrowKind::None);
        c.label = Some(ConnectionLabel {
            text: "ab\nc".into(),
            font_size: 10.0,
            offset_y: -20.0,
            ..Default::default()
        });
        let l = route_connection(&doc, &c, false).label.unwrap();
        assert_eq!(l.center, Point::new(50.0, -20.0));
        assert_eq!(l.bounds.width, 30.0);
        assert_eq!(l.bounds.height, 34.0);
        assert_eq!(l.lines[0].y, -20.0 + 1.0 - 6.0);
        assert_eq!(l.lines[1].y, -20.0 + 1.0 + 6.0);
        assert!(l.background.is_none());
    }

    #[test]
    fn vertical_label_stacks_right_to_left() {
        let l = layout_label(Point::new(0.0, 0.0), "a\nb", 10.0, true, "#333", None, false);
        assert!(l.lines[0].x > l.lines[1].x);
        assert_eq!(l.bounds.width, 34.0);
        assert_eq!(l.bounds.height, 20.0);
    }

    #[test]
    fn empty_label_text_is_not_laid_out() {
        let (doc, mut c) = straight(ArrowKind::None);
        c.label = Some(ConnectionLabel::default());
        assert!(route_connection(&doc, &c, false).label.is_none());
    }

    #[test]
    fn insert_index_picks_min_detour() {
        let verts = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
        ];
        assert_eq!(waypoint_insert_index(&verts, Point::new(50.0, 5.0)), 0);
        assert_eq!(waypoint_insert_index(&verts, Point::new(95.0, 60.0)), 1);
    }

    #[test]
    fn orthogonal_snap_picks_nearer_corner() {
        let prev = Point::new(0.0, 0.0);
        let next = Point::new(100.0, 100.0);
        assert_eq!(orthogonal_snap(prev, next, Point::new(90.0, 10.0)), Point::new(100.0, 0.0));
        assert_eq!(orthogonal_snap(prev, next, Point::new(10.0, 90.0)), Point::new(0.0, 100.0));
    }

    #[test]
    fn orthogonal_snap_tie_goes_vertical_first() {
        let prev = Point::new(0.0, 0.0);
        let next = Point::new(100.0, 100.0);
        // On the diagonal both corners are equally far.
        assert_eq!(orthogonal_snap(prev, next, Point::new(50.0, 50.0)), Point::new(0.0, 100.0));
    }

    #[test]
    fn degenerate_connection_stays_finite() {
        let mut c = Connection::between(Id::intern("rt_zero"), Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        c.style.arrow = ArrowKind::Both;
        let g = route_connection(&Document::default(), &c, false);
        assert!(g.start.is_finite() && g.end.is_finite());
        assert!(g.end_arrow.unwrap().tip.is_finite());
    }
}
