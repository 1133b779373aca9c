//! Pure geometry helpers shared by the resolver, router and transforms.
//!
//! Every function here returns a finite value for finite input, including
//! degenerate cases (zero-length segments, zero-sized nodes). NaN must
//! never reach the rendering layer.

use crate::id::Id;
use serde::{Deserialize, Serialize};

// ─── Points & rectangles ─────────────────────────────────────────────────

/// A point in world (or screen) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Scale this point about `anchor`: `anchor + (self - anchor) * factor`.
    /// `anchor` itself is a fixpoint for every factor.
    pub fn scale_about(self, anchor: Point, factor: f64) -> Point {
        Point::new(
            anchor.x + (self.x - anchor.x) * factor,
            anchor.y + (self.y - anchor.y) * factor,
        )
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Return `self` if finite, otherwise `fallback`.
    pub fn finite_or(self, fallback: Point) -> Point {
        if self.is_finite() { self } else { fallback }
    }
}

/// Axis-aligned rectangle with non-negative size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalize a drag rectangle from its start and current corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive point containment.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Strict AABB overlap (touching edges do not count).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }
}

// ─── Segment helpers ─────────────────────────────────────────────────────

/// Returns the point `distance` units from `p1` along the ray towards `p2`.
///
/// Returns `p1` unchanged when the segment has zero length.
pub fn move_point_towards(p1: Point, p2: Point, distance: f64) -> Point {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let total = dx.hypot(dy);
    if total == 0.0 || !total.is_finite() {
        return p1;
    }
    let ratio = distance / total;
    Point::new(p1.x + dx * ratio, p1.y + dy * ratio).finite_or(p1)
}

/// Shortest distance from `p` to the segment `a`–`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + dx * t, a.y + dy * t))
}

/// Unit direction from `from` to `to`, or `None` for a zero-length segment.
pub fn direction(from: Point, to: Point) -> Option<(f64, f64)> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = dx.hypot(dy);
    if len == 0.0 || !len.is_finite() {
        return None;
    }
    Some((dx / len, dy / len))
}

// ─── Anchors ─────────────────────────────────────────────────────────────

/// Node edge an anchor sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];
}

/// World coordinate of anchor `index` on edge `side` of `bounds`.
///
/// Anchors are `anchor_count` evenly spaced points, the first and last
/// sitting on the corners. Out-of-range indices are clamped; fewer than
/// two anchors collapse onto the edge midpoint.
pub fn anchor_coordinate(bounds: &Rect, side: Side, index: usize, anchor_count: usize) -> Point {
    let (step_x, step_y, i) = if anchor_count < 2 {
        (bounds.width / 2.0, bounds.height / 2.0, 1.0)
    } else {
        let divisions = (anchor_count - 1) as f64;
        (
            bounds.width / divisions,
            bounds.height / divisions,
            index.min(anchor_count - 1) as f64,
        )
    };

    let p = match side {
        Side::Top => Point::new(bounds.x + step_x * i, bounds.y),
        Side::Bottom => Point::new(bounds.x + step_x * i, bounds.bottom()),
        Side::Left => Point::new(bounds.x, bounds.y + step_y * i),
        Side::Right => Point::new(bounds.right(), bounds.y + step_y * i),
    };
    p.finite_or(Point::ORIGIN)
}

/// Result of a closest-anchor search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorHit {
    pub node_id: Id,
    pub side: Side,
    pub index: usize,
    pub position: Point,
}

/// Margin of the per-node bounding-box pre-filter in `closest_anchor`.
pub const ANCHOR_SEARCH_MARGIN: f64 = 50.0;

/// Scan all anchors of all candidate nodes and return the nearest one
/// strictly closer than `max_distance`.
///
/// Nodes whose box, grown by `ANCHOR_SEARCH_MARGIN`, does not contain `p`
/// are skipped without computing their anchors.
pub fn closest_anchor<I>(p: Point, candidates: I, max_distance: f64, anchor_count: usize) -> Option<AnchorHit>
where
    I: IntoIterator<Item = (Id, Rect)>,
{
    let mut best: Option<AnchorHit> = None;
    let mut best_dist = max_distance;

    for (node_id, bounds) in candidates {
        if !bounds.inflate(ANCHOR_SEARCH_MARGIN).contains(p) {
            continue;
        }
        for side in Side::ALL {
            for index in 0..anchor_count.max(1) {
                let position = anchor_coordinate(&bounds, side, index, anchor_count);
                let dist = p.distance(position);
                if dist < best_dist {
                    best_dist = dist;
                    best = Some(AnchorHit {
                        node_id,
                        side,
                        index,
                        position,
                    });
                }
            }
        }
    }

    best
}
