//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s so the browser
//! page and native hosts share one binding table.

use crate::input::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    Delete,
    SelectAll,
    Duplicate,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ResetView,
    ToggleSpotlight,

    // ── Z-order ──
    SendToBack,
    BringToFront,

    // ── UI ──
    Deselect,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.command();

        if cmd && modifiers.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                "[" | "{" => Some(ShortcutAction::SendToBack),
                "]" | "}" => Some(ShortcutAction::BringToFront),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ResetView),
                _ => None,
            };
        }

        if modifiers.alt {
            return None;
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            "p" | "P" if !modifiers.shift => Some(ShortcutAction::ToggleSpotlight),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(shift: bool) -> Modifiers {
        Modifiers {
            ctrl: true,
            shift,
            ..Modifiers::NONE
        }
    }

    #[test]
    fn resolve_undo_redo() {
        assert_eq!(ShortcutMap::resolve("z", cmd(false)), Some(ShortcutAction::Undo));
        assert_eq!(
            ShortcutMap::resolve(
                "z",
                Modifiers {
                    meta: true,
                    ..Modifiers::NONE
                }
            ),
            Some(ShortcutAction::Undo)
        );
        // Shift turns the key uppercase in the browser.
        assert_eq!(ShortcutMap::resolve("Z", cmd(true)), Some(ShortcutAction::Redo));
        assert_eq!(ShortcutMap::resolve("y", cmd(false)), Some(ShortcutAction::Redo));
    }

    #[test]
    fn resolve_plain_keys() {
        assert_eq!(ShortcutMap::resolve("Delete", Modifiers::NONE), Some(ShortcutAction::Delete));
        assert_eq!(ShortcutMap::resolve("Backspace", Modifiers::NONE), Some(ShortcutAction::Delete));
        assert_eq!(ShortcutMap::resolve("Escape", Modifiers::NONE), Some(ShortcutAction::Deselect));
        assert_eq!(ShortcutMap::resolve("p", Modifiers::NONE), Some(ShortcutAction::ToggleSpotlight));
        assert_eq!(ShortcutMap::resolve("z", Modifiers::NONE), None);
    }

    #[test]
    fn resolve_z_order() {
        assert_eq!(ShortcutMap::resolve("]", cmd(true)), Some(ShortcutAction::BringToFront));
        assert_eq!(ShortcutMap::resolve("{", cmd(true)), Some(ShortcutAction::SendToBack));
    }
}
