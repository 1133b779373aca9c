//! WASM bridge for Relavas: exposes the Rust editor engine to the browser
//! page.
//!
//! Compiled via `wasm-pack build --target web`. The page forwards DOM
//! events here, repaints when a handler returns `true`, and drives
//! toolbar/property-panel actions through the methods below.

mod render2d;

use rv_core::model::{Connection, Node, NodeKind};
use rv_core::{EngineConfig, Id, ScreenSize};
use rv_editor::{Editor, InputEvent, Modifiers, PointerButton};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The main WASM-facing canvas controller.
#[wasm_bindgen]
pub struct RvCanvas {
    editor: Editor,
    width: f64,
    height: f64,
    images: render2d::ImageCache,
}

#[derive(Serialize)]
struct SelectionJson<'a> {
    nodes: &'a [Id],
    connections: &'a [Id],
    primary: Option<Id>,
}

#[wasm_bindgen]
impl RvCanvas {
    /// Create a controller showing the starter diagram.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        console_error_panic_hook_setup();
        Self {
            editor: Editor::with_sample(EngineConfig::default(), ScreenSize::new(width, height)),
            width,
            height,
            images: render2d::ImageCache::default(),
        }
    }

    /// Create a controller with an empty document.
    pub fn empty(width: f64, height: f64) -> Self {
        console_error_panic_hook_setup();
        Self {
            editor: Editor::new(EngineConfig::default(), ScreenSize::new(width, height)),
            width,
            height,
            images: render2d::ImageCache::default(),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.editor.resize(ScreenSize::new(width, height));
    }

    /// Paint the current frame onto a Canvas2D context.
    pub fn render(&mut self, ctx: &CanvasRenderingContext2d) {
        let frame = self.editor.frame();
        render2d::render_frame(ctx, &frame, self.width, self.height, &mut self.images);
        self.images.retain_used(&frame);
    }

    /// The current frame as JSON, for hosts that paint with SVG/DOM.
    pub fn frame_json(&self) -> String {
        serde_json::to_string(&self.editor.frame()).unwrap_or_else(|e| {
            log::warn!("frame serialization failed: {e}");
            "{}".to_string()
        })
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Pointer pressed. `button` is `MouseEvent.button` (0 for touch).
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(
        &mut self,
        x: f64,
        y: f64,
        button: i16,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.editor.handle_event(&InputEvent::PointerDown {
            x,
            y,
            button: PointerButton::from_dom(button),
            modifiers: modifiers(shift, ctrl, alt, meta),
        })
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        self.editor.handle_event(&InputEvent::PointerMove {
            x,
            y,
            modifiers: modifiers(shift, ctrl, alt, meta),
        })
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.editor.handle_event(&InputEvent::PointerUp { x, y })
    }

    pub fn handle_pointer_cancel(&mut self) -> bool {
        self.editor.handle_event(&InputEvent::PointerCancel)
    }

    pub fn handle_double_click(&mut self, x: f64, y: f64) -> bool {
        self.editor.handle_event(&InputEvent::DoubleClick { x, y })
    }

    pub fn handle_wheel(&mut self, x: f64, y: f64, delta_y: f64) -> bool {
        self.editor.handle_event(&InputEvent::Wheel { x, y, delta_y })
    }

    /// Keyboard shortcut. Returns `true` if the key was consumed.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        self.editor.handle_event(&InputEvent::Key {
            key: key.to_string(),
            modifiers: modifiers(shift, ctrl, alt, meta),
        })
    }

    // ─── Actions ─────────────────────────────────────────────────────────

    /// Add a node (`"person"` or `"box"`) and return its id.
    pub fn add_node(&mut self, kind: &str) -> String {
        let kind = match kind {
            "box" => NodeKind::Box,
            _ => NodeKind::Person,
        };
        self.editor.add_node(kind).to_string()
    }

    pub fn add_connection(&mut self) -> String {
        self.editor.add_connection().to_string()
    }

    pub fn delete_selected(&mut self) -> bool {
        self.editor.delete_selected()
    }

    /// Duplicate the primary item; returns the copy's id or `""`.
    pub fn duplicate_selected(&mut self) -> String {
        self.editor
            .duplicate_selected()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    pub fn bring_to_front(&mut self) -> bool {
        self.editor.bring_to_front()
    }

    pub fn send_to_back(&mut self) -> bool {
        self.editor.send_to_back()
    }

    pub fn toggle_spotlight(&mut self) -> bool {
        self.editor.toggle_spotlight()
    }

    pub fn set_background(&mut self, color: &str) {
        self.editor.set_background(color);
    }

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    // ─── Property panel ──────────────────────────────────────────────────

    /// `{"nodes": [...], "connections": [...], "primary": id|null}`.
    pub fn get_selection_json(&self) -> String {
        let sel = self.editor.selection();
        serde_json::to_string(&SelectionJson {
            nodes: sel.nodes(),
            connections: sel.connections(),
            primary: sel.primary(),
        })
        .unwrap_or_default()
    }

    /// The stored node as JSON, or `""` if it does not exist.
    pub fn get_node_json(&self, id: &str) -> String {
        self.editor
            .document()
            .node(Id::intern(id))
            .and_then(|n| serde_json::to_string(n).ok())
            .unwrap_or_default()
    }

    pub fn get_connection_json(&self, id: &str) -> String {
        self.editor
            .document()
            .connection(Id::intern(id))
            .and_then(|c| serde_json::to_string(c).ok())
            .unwrap_or_default()
    }

    /// Replace a node's properties from panel JSON. The id is kept.
    /// Call `commit` when the edit is final.
    pub fn set_node_json(&mut self, id: &str, json: &str) -> Result<(), JsValue> {
        let id = Id::intern(id);
        let mut parsed: Node = serde_json::from_str(json).map_err(to_js)?;
        parsed.id = id;
        self.editor.edit_node(id, |n| *n = parsed).map_err(to_js)
    }

    pub fn set_connection_json(&mut self, id: &str, json: &str) -> Result<(), JsValue> {
        let id = Id::intern(id);
        let mut parsed: Connection = serde_json::from_str(json).map_err(to_js)?;
        parsed.id = id;
        self.editor.edit_connection(id, |c| *c = parsed).map_err(to_js)
    }

    pub fn set_node_size(&mut self, id: &str, width: f64, height: f64) -> Result<(), JsValue> {
        self.editor
            .set_node_size(Id::intern(id), width, height)
            .map_err(to_js)
    }

    /// Record pending property edits as one history step.
    pub fn commit(&mut self) -> bool {
        self.editor.commit()
    }

    // ─── Images ──────────────────────────────────────────────────────────

    /// Attach a decoded (resized, re-encoded) data URL to a node.
    pub fn apply_image(&mut self, node_id: &str, data_url: String) -> bool {
        self.editor
            .apply_image(Id::intern(node_id), Ok(data_url))
            .is_ok()
    }

    /// Report a failed decode; the node keeps its previous image.
    pub fn image_failed(&mut self, node_id: &str, message: String) {
        if let Err(e) = self.editor.apply_image(Id::intern(node_id), Err(message)) {
            log::warn!("image for node `{node_id}` not applied: {e}");
        }
    }

    pub fn clear_image(&mut self, node_id: &str) -> bool {
        self.editor.clear_image(Id::intern(node_id)).is_ok()
    }

    // ─── Files ───────────────────────────────────────────────────────────

    /// Save file contents stamped with the browser clock.
    pub fn save(&self) -> Result<String, JsValue> {
        let timestamp: String = js_sys::Date::new_0().to_iso_string().into();
        self.editor.save(&timestamp).map_err(to_js)
    }

    /// Replace the document from a save file. Throws on a rejected file
    /// and leaves the current document untouched.
    pub fn load(&mut self, json: &str) -> Result<(), JsValue> {
        self.editor.load(json).map_err(to_js)
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Relavas WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn actions_round_trip_through_json() {
        let mut canvas = RvCanvas::empty(800.0, 600.0);
        let id = canvas.add_node("box");
        let node: serde_json::Value = serde_json::from_str(&canvas.get_node_json(&id)).unwrap();
        assert_eq!(node["type"], "box");

        let sel: serde_json::Value = serde_json::from_str(&canvas.get_selection_json()).unwrap();
        assert_eq!(sel["primary"], id.as_str());

        let frame: serde_json::Value = serde_json::from_str(&canvas.frame_json()).unwrap();
        assert_eq!(frame["nodes"].as_array().map(Vec::len), Some(1));

        assert!(canvas.undo());
        assert_eq!(canvas.get_node_json(&id), "");
    }

    #[test]
    fn panel_json_cannot_shrink_below_minimum() {
        let mut canvas = RvCanvas::empty(800.0, 600.0);
        let id = canvas.add_node("box");
        let mut node: serde_json::Value = serde_json::from_str(&canvas.get_node_json(&id)).unwrap();
        node["style"]["width"] = 4.0.into();
        node["id"] = "someone-else".into();
        assert!(canvas.set_node_json(&id, &node.to_string()).is_ok());
        assert!(canvas.commit());

        let stored: serde_json::Value = serde_json::from_str(&canvas.get_node_json(&id)).unwrap();
        assert_eq!(stored["style"]["width"], 30.0);
        assert_eq!(stored["id"], id.as_str());
    }

    #[test]
    fn key_shortcuts_reach_the_editor() {
        let mut canvas = RvCanvas::empty(800.0, 600.0);
        canvas.add_node("person");
        assert!(canvas.handle_key("Delete", false, false, false, false));
        assert!(canvas.handle_key("z", true, false, false, false));
        assert!(!canvas.handle_key("q", false, false, false, false));
    }
}
