//! Pointer gestures on the canvas.
//!
//! The select tool turns input events plus a hit-test result into
//! document mutations. At most one gesture is active; it starts on
//! pointer-down and ends on pointer-up or cancel.
//!
//! ## Modifier behaviors
//!
//! | Modifier | Node | Line | Waypoint drag | Resize |
//! |----------|------|------|---------------|--------|
//! | **Shift** | Toggle in selection | Toggle in selection | Orthogonal snap | Square |

use crate::input::{InputEvent, Modifiers, PointerButton};
use crate::selection::Selection;
use rv_core::geometry::{Point, Rect};
use rv_core::model::Endpoint;
use rv_core::transform::{self, GroupResize, ResizeHandle};
use rv_core::{Document, EngineConfig, Id, ScreenSize, Viewport};
use rv_render::{
    ConnectionEnd, HitTarget, Overlays, connections_in_rect, nodes_in_rect, orthogonal_snap, waypoint_insert_index,
};

/// What the editor should do after a tool handled an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Nothing visible changed.
    Ignored,
    /// Repaint; the document or view changed mid-gesture.
    Redraw,
    /// A discrete edit finished; repaint and record history.
    Commit,
}

/// Everything a tool may read or mutate while handling one event.
pub struct ToolContext<'a> {
    pub doc: &'a mut Document,
    pub selection: &'a mut Selection,
    pub viewport: &'a mut Viewport,
    pub overlays: &'a mut Overlays,
    pub config: &'a EngineConfig,
    pub screen: ScreenSize,
}

pub trait Tool {
    /// Handle one input event. `hit` classifies the pointer position for
    /// pointer-down and double-click; other events receive `Background`.
    fn handle(&mut self, event: &InputEvent, hit: HitTarget, ctx: &mut ToolContext<'_>) -> ToolOutcome;

    /// Drop any gesture in progress without recording it.
    fn cancel(&mut self, ctx: &mut ToolContext<'_>);
}

// ─── Gestures ────────────────────────────────────────────────────────────

/// The active pointer gesture. Screen positions are canvas pixels, world
/// positions are document coordinates.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    DraggingNodes {
        last: Point,
    },
    DraggingNodeText {
        node: Id,
        last: Point,
    },
    DraggingHandle {
        connection: Id,
        end: ConnectionEnd,
    },
    DraggingWaypoint {
        connection: Id,
        index: usize,
    },
    DraggingLabel {
        connection: Id,
        last: Point,
    },
    ResizingSingle {
        node: Id,
        handle: ResizeHandle,
        start: Rect,
        origin: Point,
    },
    ResizingGroup {
        resize: GroupResize,
        origin: Point,
    },
    Panning {
        last: Point,
    },
    RangeSelecting {
        origin: Point,
    },
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::DraggingNodes { .. } => "drag-nodes",
            Gesture::DraggingNodeText { .. } => "drag-node-text",
            Gesture::DraggingHandle { .. } => "drag-handle",
            Gesture::DraggingWaypoint { .. } => "drag-waypoint",
            Gesture::DraggingLabel { .. } => "drag-label",
            Gesture::ResizingSingle { .. } => "resize",
            Gesture::ResizingGroup { .. } => "group-resize",
            Gesture::Panning { .. } => "pan",
            Gesture::RangeSelecting { .. } => "range-select",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

// ─── Select Tool ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SelectTool {
    gesture: Gesture,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    fn set_gesture(&mut self, next: Gesture) {
        if self.gesture.name() != next.name() {
            log::debug!("gesture: {} → {}", self.gesture.name(), next.name());
        }
        self.gesture = next;
    }

    fn pointer_down(
        &mut self,
        screen: Point,
        button: PointerButton,
        modifiers: Modifiers,
        hit: HitTarget,
        ctx: &mut ToolContext<'_>,
    ) -> ToolOutcome {
        ctx.overlays.snap_indicator = None;
        ctx.overlays.selection_rect = None;
        let world = ctx.viewport.screen_to_world(screen);

        match button {
            PointerButton::Secondary => return self.secondary_down(world, hit, ctx),
            PointerButton::Middle => {
                self.set_gesture(Gesture::Panning { last: screen });
                return ToolOutcome::Ignored;
            }
            PointerButton::Primary => {}
        }

        let sel = &mut *ctx.selection;
        let next = match hit {
            HitTarget::Waypoint { connection, index } => {
                focus_connection(sel, connection);
                Gesture::DraggingWaypoint { connection, index }
            }
            HitTarget::ConnectionHandle { connection, end } => {
                focus_connection(sel, connection);
                Gesture::DraggingHandle { connection, end }
            }
            HitTarget::ResizeHandle { node, handle } => {
                if sel.nodes().len() > 1 && sel.contains_node(node) {
                    match GroupResize::begin(ctx.doc, node, handle, sel.nodes(), sel.connections()) {
                        Some(resize) => Gesture::ResizingGroup { resize, origin: screen },
                        None => Gesture::Idle,
                    }
                } else {
                    match ctx.doc.node(node) {
                        Some(n) => Gesture::ResizingSingle {
                            node,
                            handle,
                            start: n.bounds(),
                            origin: screen,
                        },
                        None => Gesture::Idle,
                    }
                }
            }
            HitTarget::NodeLabel(node) => {
                if sel.primary_node() != Some(node) {
                    sel.select_node(node);
                }
                Gesture::DraggingNodeText { node, last: screen }
            }
            HitTarget::Node(node) => {
                if modifiers.shift {
                    sel.toggle_node(node);
                } else if sel.contains_node(node) {
                    sel.focus_node(node);
                } else {
                    sel.select_node(node);
                }
                if sel.contains_node(node) {
                    Gesture::DraggingNodes { last: screen }
                } else {
                    Gesture::Idle
                }
            }
            HitTarget::ConnectionLabel(connection) => {
                focus_connection(sel, connection);
                Gesture::DraggingLabel {
                    connection,
                    last: screen,
                }
            }
            HitTarget::ConnectionLine(connection) => {
                if modifiers.shift {
                    sel.toggle_connection(connection);
                    Gesture::Idle
                } else if sel.primary_connection() != Some(connection) {
                    sel.select_connection(connection);
                    Gesture::Idle
                } else {
                    match insert_waypoint(ctx.doc, connection, world) {
                        Some(index) => Gesture::DraggingWaypoint { connection, index },
                        None => Gesture::Idle,
                    }
                }
            }
            HitTarget::Background => {
                sel.clear();
                Gesture::Panning { last: screen }
            }
        };
        self.set_gesture(next);
        ToolOutcome::Redraw
    }

    /// Secondary button: range selection from empty canvas, otherwise
    /// select what was clicked so a host context menu can act on it.
    fn secondary_down(&mut self, world: Point, hit: HitTarget, ctx: &mut ToolContext<'_>) -> ToolOutcome {
        let sel = &mut *ctx.selection;
        match hit {
            HitTarget::Background => {
                ctx.overlays.selection_rect = Some(Rect::from_corners(world, world));
                self.set_gesture(Gesture::RangeSelecting { origin: world });
            }
            HitTarget::Node(node) | HitTarget::NodeLabel(node) | HitTarget::ResizeHandle { node, .. } => {
                if sel.contains_node(node) {
                    sel.focus_node(node);
                } else {
                    sel.select_node(node);
                }
            }
            HitTarget::Waypoint { connection, .. }
            | HitTarget::ConnectionHandle { connection, .. }
            | HitTarget::ConnectionLabel(connection)
            | HitTarget::ConnectionLine(connection) => focus_connection(sel, connection),
        }
        ToolOutcome::Redraw
    }

    fn pointer_move(&mut self, screen: Point, modifiers: Modifiers, ctx: &mut ToolContext<'_>) -> ToolOutcome {
        if let Gesture::DraggingWaypoint { connection, index } = self.gesture {
            return self.drag_waypoint(connection, index, screen, modifiers, ctx);
        }

        let vp = *ctx.viewport;
        let world = ctx.viewport.screen_to_world(screen);
        match &mut self.gesture {
            Gesture::Idle | Gesture::DraggingWaypoint { .. } => return ToolOutcome::Ignored,
            Gesture::DraggingNodes { last } => {
                let (dx, dy) = step(last, screen, &vp);
                transform::move_selection(ctx.doc, ctx.selection.nodes(), ctx.selection.connections(), dx, dy);
            }
            Gesture::DraggingNodeText { node, last } => {
                let (dx, dy) = step(last, screen, &vp);
                if let Some(n) = ctx.doc.node_mut(*node) {
                    let (w, h) = (n.style.width, n.style.height);
                    n.text.x = Some(n.text.x.unwrap_or(w / 2.0) + dx);
                    n.text.y = Some(n.text.y.unwrap_or(h / 2.0) + dy);
                    ctx.doc.touch();
                }
            }
            Gesture::DraggingLabel { connection, last } => {
                let (dx, dy) = step(last, screen, &vp);
                if let Some(label) = ctx
                    .doc
                    .connection_mut(*connection)
                    .and_then(|c| c.label.as_mut())
                {
                    label.offset_x += dx;
                    label.offset_y += dy;
                    ctx.doc.touch();
                }
            }
            Gesture::DraggingHandle { connection, end } => {
                let endpoint = match ctx.doc.closest_anchor(world, ctx.config.snap_distance) {
                    Some(hit) => {
                        ctx.overlays.snap_indicator = Some(hit.position);
                        Endpoint::Anchor {
                            node_id: hit.node_id,
                            side: hit.side,
                            index: hit.index,
                        }
                    }
                    None => {
                        ctx.overlays.snap_indicator = None;
                        Endpoint::point(world)
                    }
                };
                if let Some(conn) = ctx.doc.connection_mut(*connection) {
                    match end {
                        ConnectionEnd::Start => conn.start = endpoint,
                        ConnectionEnd::End => conn.end = endpoint,
                    }
                    ctx.doc.touch();
                }
            }
            Gesture::ResizingSingle {
                node,
                handle,
                start,
                origin,
            } => {
                let (dx, dy) = vp.screen_delta_to_world(screen.x - origin.x, screen.y - origin.y);
                let r = transform::resize_single(*start, *handle, dx, dy, modifiers.shift, ctx.config.min_node_size);
                if let Some(n) = ctx.doc.node_mut(*node) {
                    n.x = r.x;
                    n.y = r.y;
                    n.style.width = r.width;
                    n.style.height = r.height;
                    ctx.doc.touch();
                }
            }
            Gesture::ResizingGroup { resize, origin } => {
                let (dx, dy) = vp.screen_delta_to_world(screen.x - origin.x, screen.y - origin.y);
                resize.apply(ctx.doc, dx, dy, ctx.config);
            }
            Gesture::Panning { last } => {
                ctx.viewport.pan(screen.x - last.x, screen.y - last.y);
                *last = screen;
            }
            Gesture::RangeSelecting { origin } => {
                ctx.overlays.selection_rect = Some(Rect::from_corners(*origin, world));
            }
        }
        ToolOutcome::Redraw
    }

    fn drag_waypoint(
        &mut self,
        connection: Id,
        index: usize,
        screen: Point,
        modifiers: Modifiers,
        ctx: &mut ToolContext<'_>,
    ) -> ToolOutcome {
        let margin = ctx.config.waypoint_delete_margin;
        let near_edge = screen.x < margin
            || screen.y < margin
            || screen.x > ctx.screen.width - margin
            || screen.y > ctx.screen.height - margin;
        if near_edge {
            self.set_gesture(Gesture::Idle);
            return if remove_waypoint(ctx.doc, connection, index) {
                log::debug!("waypoint {index} of {connection} dragged off screen");
                ToolOutcome::Commit
            } else {
                ToolOutcome::Redraw
            };
        }

        let world = ctx.viewport.screen_to_world(screen);
        let Some(conn) = ctx.doc.connection(connection) else {
            self.set_gesture(Gesture::Idle);
            return ToolOutcome::Ignored;
        };
        let count = conn.waypoints.len();
        if index >= count {
            self.set_gesture(Gesture::Idle);
            return ToolOutcome::Ignored;
        }
        let target = if modifiers.shift {
            let prev = if index == 0 {
                ctx.doc.resolve_endpoint(&conn.start)
            } else {
                conn.waypoints[index - 1]
            };
            let next = if index + 1 == count {
                ctx.doc.resolve_endpoint(&conn.end)
            } else {
                conn.waypoints[index + 1]
            };
            orthogonal_snap(prev, next, world)
        } else {
            world
        };
        if let Some(conn) = ctx.doc.connection_mut(connection) {
            conn.waypoints[index] = target;
            ctx.doc.touch();
        }
        ToolOutcome::Redraw
    }

    fn pointer_up(&mut self, screen: Point, ctx: &mut ToolContext<'_>) -> ToolOutcome {
        let finished = std::mem::take(&mut self.gesture);
        log::debug!("gesture: {} → idle", finished.name());
        ctx.overlays.snap_indicator = None;
        match finished {
            Gesture::Idle => ToolOutcome::Ignored,
            Gesture::Panning { .. } => ToolOutcome::Redraw,
            Gesture::RangeSelecting { origin } => {
                let rect = Rect::from_corners(origin, ctx.viewport.screen_to_world(screen));
                let nodes = nodes_in_rect(ctx.doc, &rect);
                let connections = connections_in_rect(ctx.doc, &rect);
                ctx.selection.set_range(nodes, connections);
                ctx.overlays.selection_rect = None;
                ToolOutcome::Redraw
            }
            _ => ToolOutcome::Commit,
        }
    }

    fn double_click(&mut self, hit: HitTarget, ctx: &mut ToolContext<'_>) -> ToolOutcome {
        match hit {
            HitTarget::Waypoint { connection, index } if remove_waypoint(ctx.doc, connection, index) => {
                ToolOutcome::Commit
            }
            _ => ToolOutcome::Ignored,
        }
    }
}

impl Tool for SelectTool {
    fn handle(&mut self, event: &InputEvent, hit: HitTarget, ctx: &mut ToolContext<'_>) -> ToolOutcome {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers,
            } => self.pointer_down(Point::new(*x, *y), *button, *modifiers, hit, ctx),
            InputEvent::PointerMove { x, y, modifiers } => self.pointer_move(Point::new(*x, *y), *modifiers, ctx),
            InputEvent::PointerUp { x, y } => self.pointer_up(Point::new(*x, *y), ctx),
            InputEvent::PointerCancel => {
                self.cancel(ctx);
                ToolOutcome::Redraw
            }
            InputEvent::DoubleClick { .. } => self.double_click(hit, ctx),
            InputEvent::Wheel { x, y, delta_y } => {
                ctx.viewport.wheel_zoom(Point::new(*x, *y), *delta_y, ctx.config);
                ToolOutcome::Redraw
            }
            InputEvent::Key { .. } => ToolOutcome::Ignored,
        }
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        self.set_gesture(Gesture::Idle);
        ctx.overlays.snap_indicator = None;
        ctx.overlays.selection_rect = None;
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

/// World delta since `last`, advancing `last` to `now`.
fn step(last: &mut Point, now: Point, vp: &Viewport) -> (f64, f64) {
    let d = vp.screen_delta_to_world(now.x - last.x, now.y - last.y);
    *last = now;
    d
}

/// Select `id` alone unless it already is the primary connection.
fn focus_connection(sel: &mut Selection, id: Id) {
    if sel.primary_connection() != Some(id) {
        sel.select_connection(id);
    }
}

/// Insert a waypoint at `at` on the segment that detours least.
fn insert_waypoint(doc: &mut Document, connection: Id, at: Point) -> Option<usize> {
    let conn = doc.connection(connection)?;
    let (start, end) = doc.connection_endpoints(conn);
    let mut vertices = Vec::with_capacity(conn.waypoints.len() + 2);
    vertices.push(start);
    vertices.extend(conn.waypoints.iter().copied());
    vertices.push(end);
    let index = waypoint_insert_index(&vertices, at);

    let conn = doc.connection_mut(connection)?;
    conn.waypoints.insert(index, at);
    doc.touch();
    Some(index)
}

fn remove_waypoint(doc: &mut Document, connection: Id, index: usize) -> bool {
    let Some(conn) = doc.connection_mut(connection) else {
        return false;
    };
    if index >= conn.waypoints.len() {
        return false;
    }
    conn.waypoints.remove(index);
    doc.touch();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rv_core::model::{Connection, Node, NodeKind};

    struct Rig {
        doc: Document,
        selection: Selection,
        viewport: Viewport,
        overlays: Overlays,
        config: EngineConfig,
        tool: SelectTool,
    }

    impl Rig {
        fn new() -> Self {
            let mut doc = Document::default();
            doc.add_node(Node::new(Id::intern("tl_a"), NodeKind::Person, 100.0, 100.0));
            doc.add_connection(Connection::between(
                Id::intern("tl_c"),
                Point::new(300.0, 300.0),
                Point::new(500.0, 300.0),
            ));
            Self {
                doc,
                selection: Selection::default(),
                viewport: Viewport::default(),
                overlays: Overlays::default(),
                config: EngineConfig::default(),
                tool: SelectTool::new(),
            }
        }

        fn send(&mut self, event: InputEvent, hit: HitTarget) -> ToolOutcome {
            let mut ctx = ToolContext {
                doc: &mut self.doc,
                selection: &mut self.selection,
                viewport: &mut self.viewport,
                overlays: &mut self.overlays,
                config: &self.config,
                screen: ScreenSize::new(1000.0, 800.0),
            };
            self.tool.handle(&event, hit, &mut ctx)
        }
    }

    fn down(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerDown {
            x,
            y,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    fn mv(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn drag_node_moves_by_world_delta() {
        let mut rig = Rig::new();
        rig.viewport.scale = 2.0;
        let a = Id::intern("tl_a");
        rig.send(down(250.0, 250.0), HitTarget::Node(a));
        assert_eq!(rig.selection.nodes(), &[a]);
        rig.send(mv(270.0, 260.0), HitTarget::Background);
        rig.send(mv(290.0, 270.0), HitTarget::Background);
        let n = rig.doc.node(a).unwrap();
        assert_eq!((n.x, n.y), (120.0, 110.0));
        assert_eq!(rig.send(InputEvent::PointerUp { x: 290.0, y: 270.0 }, HitTarget::Background), ToolOutcome::Commit);
        assert!(rig.tool.gesture().is_idle());
    }

    #[test]
    fn background_clears_and_pans() {
        let mut rig = Rig::new();
        rig.selection.select_node(Id::intern("tl_a"));
        rig.send(down(10.0, 10.0), HitTarget::Background);
        assert!(rig.selection.is_empty());
        rig.send(mv(40.0, 30.0), HitTarget::Background);
        assert_eq!((rig.viewport.x, rig.viewport.y), (30.0, 20.0));
        assert_eq!(rig.send(InputEvent::PointerUp { x: 40.0, y: 30.0 }, HitTarget::Background), ToolOutcome::Redraw);
    }

    #[test]
    fn first_line_click_only_selects() {
        let mut rig = Rig::new();
        let c = Id::intern("tl_c");
        rig.send(down(400.0, 302.0), HitTarget::ConnectionLine(c));
        assert_eq!(rig.selection.primary_connection(), Some(c));
        assert!(rig.doc.connection(c).unwrap().waypoints.is_empty());
        assert!(rig.tool.gesture().is_idle());
    }

    #[test]
    fn waypoint_dragged_to_edge_is_removed() {
        let mut rig = Rig::new();
        let c = Id::intern("tl_c");
        rig.selection.select_connection(c);
        rig.send(down(400.0, 302.0), HitTarget::ConnectionLine(c));
        assert_eq!(rig.doc.connection(c).unwrap().waypoints.len(), 1);
        rig.send(mv(420.0, 350.0), HitTarget::Background);
        assert_eq!(rig.doc.connection(c).unwrap().waypoints[0], Point::new(420.0, 350.0));

        assert_eq!(rig.send(mv(420.0, 10.0), HitTarget::Background), ToolOutcome::Commit);
        assert!(rig.doc.connection(c).unwrap().waypoints.is_empty());
        assert!(rig.tool.gesture().is_idle());
    }

    #[test]
    fn handle_snaps_to_anchor_or_goes_free() {
        let mut rig = Rig::new();
        let c = Id::intern("tl_c");
        rig.send(
            down(500.0, 300.0),
            HitTarget::ConnectionHandle {
                connection: c,
                end: ConnectionEnd::End,
            },
        );
        // Next to the person's right edge midpoint (160, 130).
        rig.send(mv(165.0, 131.0), HitTarget::Background);
        let end = rig.doc.connection(c).unwrap().end.clone();
        assert!(matches!(end, Endpoint::Anchor { node_id, .. } if node_id == Id::intern("tl_a")));
        assert!(rig.overlays.snap_indicator.is_some());

        rig.send(mv(700.0, 600.0), HitTarget::Background);
        assert_eq!(rig.doc.connection(c).unwrap().end, Endpoint::point(Point::new(700.0, 600.0)));
        assert_eq!(rig.overlays.snap_indicator, None);

        rig.send(InputEvent::PointerCancel, HitTarget::Background);
        assert!(rig.tool.gesture().is_idle());
    }

    #[test]
    fn secondary_drag_range_selects() {
        let mut rig = Rig::new();
        rig.send(
            InputEvent::PointerDown {
                x: 50.0,
                y: 50.0,
                button: PointerButton::Secondary,
                modifiers: Modifiers::NONE,
            },
            HitTarget::Background,
        );
        rig.send(mv(350.0, 350.0), HitTarget::Background);
        assert_eq!(rig.overlays.selection_rect, Some(Rect::new(50.0, 50.0, 300.0, 300.0)));
        rig.send(InputEvent::PointerUp { x: 350.0, y: 350.0 }, HitTarget::Background);
        assert_eq!(rig.selection.nodes(), &[Id::intern("tl_a")]);
        assert_eq!(rig.selection.connections(), &[Id::intern("tl_c")]);
        assert_eq!(rig.overlays.selection_rect, None);
    }
}
