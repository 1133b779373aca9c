//! Color helpers for turning stored style strings into paintable RGBA.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 8-bit RGB with a unit-range alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB` or `#RRGGBB` (leading `#` optional) or `transparent`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("transparent") {
            return Some(Self::TRANSPARENT);
        }
        let hex = s.strip_prefix('#').unwrap_or(s);
        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::new(r * 17, g * 17, b * 17, 1.0))
            }
            6 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                Some(Self::new(r, g, b, 1.0))
            }
            _ => None,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// `[r, g, b, a]` with alpha scaled to 0–255.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, (self.a.clamp(0.0, 1.0) * 255.0).round() as u8]
    }
}

impl fmt::Display for Rgba {
    /// CSS `rgba(r,g,b,a)` form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Combine a stored hex color with a 0–100 opacity percentage.
///
/// `transparent` stays fully transparent whatever the opacity. Strings that
/// do not parse fall back to black so a bad file still renders.
pub fn hex_to_rgba(hex: &str, opacity_percent: f64) -> Rgba {
    match Rgba::parse(hex) {
        Some(c) if c.is_transparent() => c,
        Some(c) => c.with_alpha((opacity_percent.clamp(0.0, 100.0) / 100.0) as f32),
        None => {
            log::warn!("unparseable color {hex:?}, using black");
            Rgba::BLACK.with_alpha((opacity_percent.clamp(0.0, 100.0) / 100.0) as f32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(Rgba::parse("#333"), Some(Rgba::new(0x33, 0x33, 0x33, 1.0)));
        assert_eq!(Rgba::parse("#007bff"), Some(Rgba::new(0, 0x7b, 0xff, 1.0)));
        assert_eq!(Rgba::parse("ffffff"), Some(Rgba::WHITE));
        assert_eq!(Rgba::parse("#12345"), None);
        assert_eq!(Rgba::parse("#gg0000"), None);
    }

    #[test]
    fn opacity_is_applied_to_alpha() {
        let c = hex_to_rgba("#ffffff", 50.0);
        assert_eq!(c, Rgba::new(255, 255, 255, 0.5));
        assert_eq!(c.to_string(), "rgba(255,255,255,0.5)");
    }

    #[test]
    fn transparent_ignores_opacity() {
        assert!(hex_to_rgba("transparent", 100.0).is_transparent());
    }

    #[test]
    fn rgba8_scales_alpha() {
        assert_eq!(Rgba::new(1, 2, 3, 1.0).to_rgba8(), [1, 2, 3, 255]);
        assert_eq!(Rgba::TRANSPARENT.to_rgba8(), [0, 0, 0, 0]);
    }
}
