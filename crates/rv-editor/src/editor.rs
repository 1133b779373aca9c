//! The editor facade: owns the document, selection, history, viewport and
//! active tool, and exposes every user-level action as a method.
//!
//! Hosts feed `InputEvent`s through `handle_event` and repaint whenever it
//! returns `true`. Discrete actions record one history entry each.

use crate::EditorError;
use crate::history::History;
use crate::input::{InputEvent, Modifiers};
use crate::selection::Selection;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{Gesture, SelectTool, Tool, ToolContext, ToolOutcome};
use rv_core::geometry::Point;
use rv_core::model::{Connection, ConnectionLabel, Node, NodeKind, Snapshot};
use rv_core::sample::sample_snapshot;
use rv_core::{Document, EngineConfig, Id, ScreenSize, Viewport, load_document, save_document};
use rv_render::{Frame, HitTarget, Overlays, build_frame, hit_test};

/// Step between successive toolbar adds so new items do not stack exactly.
const ADD_CASCADE_STEP: f64 = 20.0;
const ADD_CASCADE_LEN: u32 = 8;
/// Half the length of a freshly added connection.
const NEW_CONNECTION_HALF: f64 = 60.0;
const ZOOM_STEP: f64 = 1.2;

pub struct Editor {
    doc: Document,
    config: EngineConfig,
    viewport: Viewport,
    screen: ScreenSize,
    selection: Selection,
    history: History,
    tool: SelectTool,
    overlays: Overlays,
    spotlight: bool,
    adds: u32,
}

impl Editor {
    /// Empty document, viewport centred on the artboard.
    pub fn new(config: EngineConfig, screen: ScreenSize) -> Self {
        Self::with_snapshot(Snapshot::default(), config, screen)
    }

    /// The starter diagram shown on first launch.
    pub fn with_sample(config: EngineConfig, screen: ScreenSize) -> Self {
        Self::with_snapshot(sample_snapshot(), config, screen)
    }

    pub fn with_snapshot(snapshot: Snapshot, config: EngineConfig, screen: ScreenSize) -> Self {
        let doc = Document::from_snapshot(snapshot, config.anchor_count);
        let history = History::new(doc.snapshot(), config.history_capacity);
        Self {
            viewport: Viewport::centered_on(config.artboard, screen),
            doc,
            config,
            screen,
            selection: Selection::default(),
            history,
            tool: SelectTool::new(),
            overlays: Overlays::default(),
            spotlight: false,
            adds: 0,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn gesture(&self) -> &Gesture {
        self.tool.gesture()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn spotlight_enabled(&self) -> bool {
        self.spotlight
    }

    pub fn resize(&mut self, screen: ScreenSize) {
        self.screen = screen;
    }

    /// Paintable projection of the current state.
    pub fn frame(&self) -> Frame {
        build_frame(&self.doc, self.viewport, self.selection.view(), &self.overlays)
    }

    /// Classify a screen position.
    pub fn hit_test(&self, screen: Point) -> HitTarget {
        hit_test(&self.frame(), self.viewport.screen_to_world(screen))
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Route one input event. Returns `true` when the host should repaint.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        if let InputEvent::Key { key, modifiers } = event {
            return self.handle_key(key, *modifiers);
        }

        let mut spotlight_moved = false;
        if self.spotlight
            && let InputEvent::PointerMove { x, y, .. } = event
        {
            self.overlays.spotlight = Some(Point::new(*x, *y));
            spotlight_moved = true;
        }

        let hit = match event {
            InputEvent::PointerDown { x, y, .. } | InputEvent::DoubleClick { x, y } => {
                self.hit_test(Point::new(*x, *y))
            }
            _ => HitTarget::Background,
        };

        let mut ctx = ToolContext {
            doc: &mut self.doc,
            selection: &mut self.selection,
            viewport: &mut self.viewport,
            overlays: &mut self.overlays,
            config: &self.config,
            screen: self.screen,
        };
        let outcome = self.tool.handle(event, hit, &mut ctx);
        if outcome == ToolOutcome::Commit {
            self.record();
        }
        outcome != ToolOutcome::Ignored || spotlight_moved
    }

    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> bool {
        match ShortcutMap::resolve(key, modifiers) {
            Some(action) => self.run_shortcut(action),
            None => false,
        }
    }

    pub fn run_shortcut(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::SelectAll => {
                self.selection.select_all(&self.doc);
                true
            }
            ShortcutAction::Duplicate => self.duplicate_selected().is_some(),
            ShortcutAction::ZoomIn => self.zoom_by(ZOOM_STEP),
            ShortcutAction::ZoomOut => self.zoom_by(1.0 / ZOOM_STEP),
            ShortcutAction::ResetView => {
                self.viewport = Viewport::centered_on(self.config.artboard, self.screen);
                true
            }
            ShortcutAction::ToggleSpotlight => {
                self.toggle_spotlight();
                true
            }
            ShortcutAction::SendToBack => self.send_to_back(),
            ShortcutAction::BringToFront => self.bring_to_front(),
            ShortcutAction::Deselect => {
                let had = !self.selection.is_empty();
                self.selection.clear();
                had
            }
        }
    }

    fn zoom_by(&mut self, factor: f64) -> bool {
        self.viewport.zoom(self.screen.center(), factor, &self.config);
        true
    }

    fn cancel_gesture(&mut self) {
        let mut ctx = ToolContext {
            doc: &mut self.doc,
            selection: &mut self.selection,
            viewport: &mut self.viewport,
            overlays: &mut self.overlays,
            config: &self.config,
            screen: self.screen,
        };
        self.tool.cancel(&mut ctx);
    }

    // ─── Document actions ────────────────────────────────────────────────

    /// World position of the visible centre, shifted along a short
    /// diagonal cascade for each successive add.
    fn next_add_position(&mut self) -> Point {
        let step = f64::from(self.adds % ADD_CASCADE_LEN) * ADD_CASCADE_STEP;
        self.adds += 1;
        self.viewport
            .screen_to_world(self.screen.center())
            .offset(step, step)
    }

    /// Add a node centred in the view, select it and record.
    pub fn add_node(&mut self, kind: NodeKind) -> Id {
        let at = self.next_add_position();
        let id = self.doc.fresh_id("node");
        let mut node = Node::new(id, kind, at.x, at.y);
        node.x -= node.style.width / 2.0;
        node.y -= node.style.height / 2.0;
        self.doc.add_node(node);
        self.selection.select_node(id);
        self.record();
        id
    }

    /// Add a free horizontal connection labelled "New line".
    pub fn add_connection(&mut self) -> Id {
        let at = self.next_add_position();
        let id = self.doc.fresh_id("conn");
        let mut conn = Connection::between(
            id,
            at.offset(-NEW_CONNECTION_HALF, 0.0),
            at.offset(NEW_CONNECTION_HALF, 0.0),
        );
        conn.label = Some(ConnectionLabel {
            text: "New line".into(),
            ..ConnectionLabel::default()
        });
        self.doc.add_connection(conn);
        self.selection.select_connection(id);
        self.record();
        id
    }

    /// Delete every selected node and connection. Connections anchored to
    /// a deleted node are detached, not removed.
    pub fn delete_selected(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.doc
            .delete(self.selection.nodes(), self.selection.connections());
        self.selection.clear();
        self.record();
        true
    }

    /// Duplicate the primary node, or else the primary connection, and
    /// select the copy.
    pub fn duplicate_selected(&mut self) -> Option<Id> {
        let offset = self.config.duplicate_offset;
        let copy = if let Some(node) = self.selection.primary_node() {
            let copy = self.doc.duplicate_node(node, offset)?;
            self.selection.select_node(copy);
            copy
        } else {
            let conn = self.selection.primary_connection()?;
            let copy = self.doc.duplicate_connection(conn, offset)?;
            self.selection.select_connection(copy);
            copy
        };
        self.record();
        Some(copy)
    }

    pub fn bring_to_front(&mut self) -> bool {
        let Some(id) = self.selection.primary() else {
            return false;
        };
        self.doc.bring_to_front(id) && self.record_changed()
    }

    pub fn send_to_back(&mut self) -> bool {
        let Some(id) = self.selection.primary() else {
            return false;
        };
        self.doc.send_to_back(id) && self.record_changed()
    }

    // ─── Property edits ──────────────────────────────────────────────────

    /// Mutate a node in place. Call `commit` once the edit is final
    /// (inputs fire per keystroke; history records per commit).
    ///
    /// Width and height never end below `min_node_size`, whatever the
    /// closure wrote.
    pub fn edit_node(&mut self, id: Id, edit: impl FnOnce(&mut Node)) -> Result<(), EditorError> {
        let min = self.config.min_node_size;
        let node = self.doc.node_mut(id).ok_or(EditorError::UnknownNode(id))?;
        edit(node);
        node.style.width = node.style.width.max(min);
        node.style.height = node.style.height.max(min);
        self.doc.touch();
        Ok(())
    }

    pub fn edit_connection(&mut self, id: Id, edit: impl FnOnce(&mut Connection)) -> Result<(), EditorError> {
        let conn = self
            .doc
            .connection_mut(id)
            .ok_or(EditorError::UnknownConnection(id))?;
        edit(conn);
        self.doc.touch();
        Ok(())
    }

    /// Record the current document as one history step.
    pub fn commit(&mut self) -> bool {
        self.record()
    }

    pub fn set_node_size(&mut self, id: Id, width: f64, height: f64) -> Result<(), EditorError> {
        self.edit_node(id, |n| {
            n.style.width = width;
            n.style.height = height;
        })?;
        self.record();
        Ok(())
    }

    pub fn set_background(&mut self, color: &str) {
        self.doc.settings.background_color = color.to_string();
        self.doc.touch();
        self.record();
    }

    /// Toggle presentation mode. Returns the new state.
    pub fn toggle_spotlight(&mut self) -> bool {
        self.spotlight = !self.spotlight;
        if !self.spotlight {
            self.overlays.spotlight = None;
        }
        log::debug!("spotlight {}", if self.spotlight { "on" } else { "off" });
        self.spotlight
    }

    /// Commit decoded image data for a node, or log a decode failure.
    ///
    /// Decoding runs in the host; the node may have been deleted or the
    /// document replaced in the meantime.
    pub fn apply_image(&mut self, id: Id, decoded: Result<String, String>) -> Result<(), EditorError> {
        let data = decoded.map_err(|msg| {
            log::warn!("image for {id} failed to decode: {msg}");
            EditorError::Image(msg)
        })?;
        let Some(node) = self.doc.node_mut(id) else {
            log::warn!("image arrived for {id}, which no longer exists");
            return Err(EditorError::UnknownNode(id));
        };
        node.style.background_image = Some(data);
        self.doc.touch();
        self.record();
        Ok(())
    }

    pub fn clear_image(&mut self, id: Id) -> Result<(), EditorError> {
        self.edit_node(id, |n| n.style.background_image = None)?;
        self.record();
        Ok(())
    }

    // ─── History ─────────────────────────────────────────────────────────

    fn record(&mut self) -> bool {
        self.history.record(self.doc.snapshot())
    }

    fn record_changed(&mut self) -> bool {
        self.record();
        true
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.replace_document(snapshot);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.replace_document(snapshot);
        true
    }

    fn replace_document(&mut self, snapshot: Snapshot) {
        self.cancel_gesture();
        self.doc.restore(snapshot);
        self.selection.clear();
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Serialize the document as a save file stamped with `timestamp`.
    pub fn save(&self, timestamp: &str) -> Result<String, EditorError> {
        Ok(save_document(&self.doc, timestamp)?)
    }

    /// Replace the document with a save file. On error nothing changes.
    pub fn load(&mut self, json: &str) -> Result<(), EditorError> {
        let loaded = load_document(json).inspect_err(|e| log::warn!("rejected load: {e}"))?;
        let snapshot = loaded.into_snapshot(&self.doc.settings);
        self.replace_document(snapshot);
        self.record();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn editor() -> Editor {
        Editor::new(EngineConfig::default(), ScreenSize::new(1200.0, 900.0))
    }

    #[test]
    fn add_node_centres_in_view_and_cascades() {
        let mut ed = editor();
        let first = ed.add_node(NodeKind::Person);
        let second = ed.add_node(NodeKind::Person);
        let centre = ed.viewport().screen_to_world(Point::new(600.0, 450.0));
        let a = ed.document().node(first).unwrap();
        assert_eq!(a.bounds().center(), centre);
        let b = ed.document().node(second).unwrap();
        assert_eq!((b.x - a.x, b.y - a.y), (ADD_CASCADE_STEP, ADD_CASCADE_STEP));
        assert_eq!(ed.selection().primary_node(), Some(second));
        assert_eq!(ed.history().depth(), 3);
    }

    #[test]
    fn add_connection_is_free_and_labelled() {
        let mut ed = editor();
        let id = ed.add_connection();
        let c = ed.document().connection(id).unwrap();
        let (a, b) = (c.start.as_point().unwrap(), c.end.as_point().unwrap());
        assert_eq!(b.x - a.x, 2.0 * NEW_CONNECTION_HALF);
        assert_eq!(c.label.as_ref().map(|l| l.text.as_str()), Some("New line"));
        assert_eq!(ed.selection().primary_connection(), Some(id));
    }

    #[test]
    fn set_node_size_enforces_minimum() {
        let mut ed = editor();
        let id = ed.add_node(NodeKind::Box);
        ed.set_node_size(id, 5.0, 80.0).unwrap();
        let n = ed.document().node(id).unwrap();
        assert_eq!((n.style.width, n.style.height), (30.0, 80.0));
        assert!(matches!(
            ed.set_node_size(Id::intern("ed_missing"), 1.0, 1.0),
            Err(EditorError::UnknownNode(_))
        ));
    }

    #[test]
    fn replacing_a_node_keeps_minimum_size() {
        let mut ed = editor();
        let id = ed.add_node(NodeKind::Box);
        let mut shrunk = ed.document().node(id).unwrap().clone();
        shrunk.style.width = 0.0;
        shrunk.style.height = 12.0;
        shrunk.label = "Tiny".into();
        ed.edit_node(id, |n| *n = shrunk).unwrap();
        let n = ed.document().node(id).unwrap();
        assert_eq!((n.style.width, n.style.height), (30.0, 30.0));
        assert_eq!(n.label, "Tiny");
    }

    #[test]
    fn image_for_deleted_node_is_rejected() {
        let mut ed = editor();
        let id = ed.add_node(NodeKind::Box);
        ed.delete_selected();
        let depth = ed.history().depth();
        assert!(matches!(
            ed.apply_image(id, Ok("data:image/jpeg;base64,AAAA".into())),
            Err(EditorError::UnknownNode(_))
        ));
        assert!(matches!(ed.apply_image(id, Err("decode".into())), Err(EditorError::Image(_))));
        assert_eq!(ed.history().depth(), depth);
    }

    #[test]
    fn z_order_moves_primary() {
        let mut ed = editor();
        let a = ed.add_node(NodeKind::Person);
        let b = ed.add_node(NodeKind::Person);
        assert!(ed.send_to_back());
        assert_eq!(ed.document().nodes[0].id, b);
        assert_eq!(ed.document().nodes[1].id, a);
        assert!(ed.undo());
        assert_eq!(ed.document().nodes[1].id, b);

        ed.selection.clear();
        assert!(!ed.bring_to_front());
    }

    #[test]
    fn spotlight_follows_pointer_only_when_enabled() {
        let mut ed = editor();
        let mv = InputEvent::PointerMove {
            x: 5.0,
            y: 6.0,
            modifiers: Modifiers::NONE,
        };
        assert!(!ed.handle_event(&mv));
        ed.toggle_spotlight();
        assert!(ed.handle_event(&mv));
        assert_eq!(ed.overlays().spotlight, Some(Point::new(5.0, 6.0)));
        ed.toggle_spotlight();
        assert_eq!(ed.overlays().spotlight, None);
    }
}
