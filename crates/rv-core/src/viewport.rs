//! Pan/zoom state mapping screen pixels to world coordinates.
//!
//! `world = (screen - translate) / scale`, `screen = world * scale + translate`.

use crate::config::{Artboard, EngineConfig};
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Size of the drawing surface in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: f64,
    pub height: f64,
}

impl ScreenSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl Viewport {
    /// Viewport at scale 1 that shows `artboard` in the middle of `screen`.
    pub fn centered_on(artboard: Artboard, screen: ScreenSize) -> Self {
        Self {
            x: (screen.width - artboard.width) / 2.0,
            y: (screen.height - artboard.height) / 2.0,
            scale: 1.0,
        }
    }

    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.scale, (p.y - self.y) / self.scale)
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.x, p.y * self.scale + self.y)
    }

    /// Convert a screen-space distance to world space.
    pub fn screen_delta_to_world(&self, dx: f64, dy: f64) -> (f64, f64) {
        (dx / self.scale, dy / self.scale)
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Multiply the scale by `factor`, clamped to the configured limits,
    /// keeping the world point under `cursor` (screen) where it is.
    pub fn zoom(&mut self, cursor: Point, factor: f64, config: &EngineConfig) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.set_scale(cursor, self.scale * factor, config);
    }

    /// Mouse-wheel zoom: `delta_y > 0` zooms out, proportionally to the
    /// current scale.
    pub fn wheel_zoom(&mut self, cursor: Point, delta_y: f64, config: &EngineConfig) {
        let target = self.scale - delta_y * config.wheel_zoom_intensity * self.scale;
        self.set_scale(cursor, target, config);
    }

    fn set_scale(&mut self, cursor: Point, target: f64, config: &EngineConfig) {
        if !target.is_finite() {
            return;
        }
        let new_scale = target.clamp(config.min_scale, config.max_scale);
        let world = self.screen_to_world(cursor);
        self.x = cursor.x - world.x * new_scale;
        self.y = cursor.y - world.y * new_scale;
        self.scale = new_scale;
        log::trace!("zoom → {:.3} at ({:.0}, {:.0})", new_scale, cursor.x, cursor.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn zoom_keeps_cursor_world_point() {
        let config = EngineConfig::default();
        let mut vp = Viewport {
            x: 37.0,
            y: -12.0,
            scale: 1.3,
        };
        let cursor = Point::new(420.0, 310.0);
        let before = vp.screen_to_world(cursor);
        vp.zoom(cursor, 1.7, &config);
        assert!(close(vp.screen_to_world(cursor), before));
        vp.wheel_zoom(cursor, 250.0, &config);
        assert!(close(vp.screen_to_world(cursor), before));
    }

    #[test]
    fn zoom_is_clamped() {
        let config = EngineConfig::default();
        let mut vp = Viewport::default();
        vp.zoom(Point::ORIGIN, 100.0, &config);
        assert_eq!(vp.scale, 5.0);
        vp.zoom(Point::ORIGIN, 0.0001, &config);
        assert_eq!(vp.scale, 0.1);
    }

    #[test]
    fn screen_world_roundtrip() {
        let vp = Viewport {
            x: 100.0,
            y: 50.0,
            scale: 2.0,
        };
        let w = vp.screen_to_world(Point::new(300.0, 250.0));
        assert_eq!(w, Point::new(100.0, 100.0));
        assert_eq!(vp.world_to_screen(w), Point::new(300.0, 250.0));
    }

    #[test]
    fn centers_artboard() {
        let vp = Viewport::centered_on(Artboard::default(), ScreenSize::new(1323.0, 994.0));
        assert_eq!((vp.x, vp.y, vp.scale), (100.0, 100.0, 1.0));
    }
}
