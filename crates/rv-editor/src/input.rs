//! Input abstraction layer.
//!
//! Normalizes mouse, touch and wheel events from the host page into a
//! unified `InputEvent` consumed by the select tool. All coordinates are
//! screen pixels relative to the canvas origin; the editor converts them
//! to world space.

/// Keyboard modifier keys held during an input event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    /// Platform command key: ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Which mouse button started a pointer gesture. Touch maps to `Primary`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse down or touch start.
    PointerDown {
        x: f64,
        y: f64,
        button: PointerButton,
        modifiers: Modifiers,
    },

    PointerMove { x: f64, y: f64, modifiers: Modifiers },

    /// Mouse up or touch end.
    PointerUp { x: f64, y: f64 },

    /// Touch cancelled by the platform; transient state is dropped.
    PointerCancel,

    DoubleClick { x: f64, y: f64 },

    /// Mouse wheel. Positive `delta_y` scrolls down (zoom out).
    Wheel { x: f64, y: f64, delta_y: f64 },

    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    /// Screen position if this is a pointer event.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y }
            | Self::DoubleClick { x, y }
            | Self::Wheel { x, y, .. } => Some((*x, *y)),
            Self::PointerCancel | Self::Key { .. } => None,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::PointerDown { modifiers, .. } | Self::PointerMove { modifiers, .. } | Self::Key { modifiers, .. } => {
                *modifiers
            }
            _ => Modifiers::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_buttons() {
        assert_eq!(PointerButton::from_dom(0), PointerButton::Primary);
        assert_eq!(PointerButton::from_dom(1), PointerButton::Middle);
        assert_eq!(PointerButton::from_dom(2), PointerButton::Secondary);
        assert_eq!(PointerButton::from_dom(4), PointerButton::Primary);
    }

    #[test]
    fn position_and_modifiers() {
        let down = InputEvent::PointerDown {
            x: 3.0,
            y: 4.0,
            button: PointerButton::Primary,
            modifiers: Modifiers::SHIFT,
        };
        assert_eq!(down.position(), Some((3.0, 4.0)));
        assert!(down.modifiers().shift);
        assert_eq!(InputEvent::PointerCancel.position(), None);

        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert!(meta.command());
        assert!(!Modifiers::SHIFT.command());
    }
}
