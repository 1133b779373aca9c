//! Integration tests: input events → editor → document and history.
//!
//! Drives the `Editor` facade the way the browser page does, with screen
//! coordinates, and checks the resulting document state.

use pretty_assertions::assert_eq;
use rv_core::*;
use rv_editor::*;

const SCREEN: ScreenSize = ScreenSize::new(1000.0, 800.0);

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Editor over `nodes`/`connections` with screen == world unless panned.
fn editor_with(nodes: Vec<Node>, connections: Vec<Connection>) -> Editor {
    init_logs();
    let snapshot = Snapshot {
        nodes,
        connections,
        app_settings: AppSettings::default(),
    };
    let mut ed = Editor::with_snapshot(snapshot, EngineConfig::default(), SCREEN);
    ed.set_viewport(Viewport::default());
    ed
}

fn down(ed: &mut Editor, x: f64, y: f64, modifiers: Modifiers) -> bool {
    ed.handle_event(&InputEvent::PointerDown {
        x,
        y,
        button: PointerButton::Primary,
        modifiers,
    })
}

fn drag(ed: &mut Editor, from: (f64, f64), to: (f64, f64)) {
    down(ed, from.0, from.1, Modifiers::NONE);
    ed.handle_event(&InputEvent::PointerMove {
        x: (from.0 + to.0) / 2.0,
        y: (from.1 + to.1) / 2.0,
        modifiers: Modifiers::NONE,
    });
    ed.handle_event(&InputEvent::PointerMove {
        x: to.0,
        y: to.1,
        modifiers: Modifiers::NONE,
    });
    ed.handle_event(&InputEvent::PointerUp { x: to.0, y: to.1 });
}

// ─── Undo / redo ────────────────────────────────────────────────────────

#[test]
fn add_delete_undo_twice_redo_once() {
    let mut ed = editor_with(vec![], vec![]);
    let before = ed.document().snapshot();

    let id = ed.add_node(NodeKind::Box);
    let added = ed.document().snapshot();
    assert!(ed.document().node(id).is_some());

    assert!(ed.delete_selected());
    assert!(ed.document().nodes.is_empty());

    assert!(ed.undo());
    assert_eq!(ed.document().snapshot(), added);
    assert!(ed.undo());
    assert_eq!(ed.document().snapshot(), before);
    assert!(!ed.undo());

    assert!(ed.redo());
    assert_eq!(ed.document().snapshot(), added);
    assert!(ed.selection().is_empty());
}

#[test]
fn each_drag_is_one_undo_step() {
    let node = Node::new(Id::intern("sc_drag"), NodeKind::Person, 100.0, 100.0);
    let original = node.clone();
    let mut ed = editor_with(vec![node], vec![]);

    // Grab below the label so the body, not the text, is hit.
    for k in 0..3 {
        let x = 105.0 + 10.0 * f64::from(k);
        drag(&mut ed, (x, 155.0), (x + 10.0, 155.0));
    }
    let moved = ed.document().node(Id::intern("sc_drag")).unwrap();
    assert_eq!((moved.x, moved.y), (130.0, 100.0));
    assert_eq!(ed.history().depth(), 4);

    for _ in 0..3 {
        assert!(ed.undo());
    }
    assert!(!ed.undo());
    assert_eq!(ed.document().nodes, vec![original]);
}

// ─── Waypoints ──────────────────────────────────────────────────────────

#[test]
fn second_click_on_line_inserts_waypoint() {
    let line = Connection::between(Id::intern("sc_line"), Point::new(0.0, 0.0), Point::new(100.0, 0.0));
    let mut ed = editor_with(vec![], vec![line]);
    // Pan so world (0, 0) sits at screen (100, 100).
    ed.set_viewport(Viewport {
        x: 100.0,
        y: 100.0,
        scale: 1.0,
    });
    let id = Id::intern("sc_line");

    down(&mut ed, 150.0, 105.0, Modifiers::NONE);
    ed.handle_event(&InputEvent::PointerUp { x: 150.0, y: 105.0 });
    assert_eq!(ed.selection().primary_connection(), Some(id));
    assert!(ed.document().connection(id).unwrap().waypoints.is_empty());

    down(&mut ed, 150.0, 105.0, Modifiers::NONE);
    assert!(matches!(ed.gesture(), Gesture::DraggingWaypoint { index: 0, .. }));
    ed.handle_event(&InputEvent::PointerUp { x: 150.0, y: 105.0 });

    let conn = ed.document().connection(id).unwrap();
    assert_eq!(conn.waypoints.as_slice(), &[Point::new(50.0, 5.0)]);
    assert_eq!(ed.history().depth(), 2);

    // Double click removes it again.
    assert!(ed.handle_event(&InputEvent::DoubleClick { x: 150.0, y: 105.0 }));
    assert!(ed.document().connection(id).unwrap().waypoints.is_empty());
    assert_eq!(ed.history().depth(), 3);
}

// ─── Group resize ───────────────────────────────────────────────────────

#[test]
fn group_resize_keeps_leader_corner_fixed() {
    let a = Node::new(Id::intern("sc_ga"), NodeKind::Box, 100.0, 100.0);
    let b = Node::new(Id::intern("sc_gb"), NodeKind::Box, 300.0, 100.0);
    let mut ed = editor_with(vec![a, b], vec![]);

    down(&mut ed, 110.0, 110.0, Modifiers::NONE);
    ed.handle_event(&InputEvent::PointerUp { x: 110.0, y: 110.0 });
    down(&mut ed, 310.0, 110.0, Modifiers::SHIFT);
    ed.handle_event(&InputEvent::PointerUp { x: 310.0, y: 110.0 });
    assert_eq!(ed.selection().nodes().len(), 2);
    // Clicks without movement leave nothing to undo.
    assert_eq!(ed.history().depth(), 1);

    // Drag the second box's south-east corner 150 px right: scale 2
    // about its north-west corner.
    down(&mut ed, 450.0, 200.0, Modifiers::NONE);
    assert!(matches!(ed.gesture(), Gesture::ResizingGroup { .. }));
    ed.handle_event(&InputEvent::PointerMove {
        x: 600.0,
        y: 200.0,
        modifiers: Modifiers::NONE,
    });
    ed.handle_event(&InputEvent::PointerUp { x: 600.0, y: 200.0 });

    let doc = ed.document();
    let lead = doc.node(Id::intern("sc_gb")).unwrap();
    assert_eq!(lead.bounds(), Rect::new(300.0, 100.0, 300.0, 200.0));
    let other = doc.node(Id::intern("sc_ga")).unwrap();
    assert_eq!(other.bounds(), Rect::new(-100.0, 100.0, 300.0, 200.0));
    assert_eq!(other.text.x, Some(150.0));
    assert_eq!(other.text.font_size, 28.0);
    assert_eq!(ed.history().depth(), 2);
}

// ─── Handles ────────────────────────────────────────────────────────────

#[test]
fn dragging_free_end_onto_node_anchors_it() {
    let person = Node::new(Id::intern("sc_p"), NodeKind::Person, 300.0, 300.0);
    let mut line = Connection::between(Id::intern("sc_h"), Point::new(100.0, 330.0), Point::new(200.0, 330.0));
    line.style.arrow = ArrowKind::None;
    let mut ed = editor_with(vec![person], vec![line]);

    // The end handle sits END_MARGIN short of the raw end.
    drag(&mut ed, (194.0, 330.0), (296.0, 331.0));

    let conn = ed.document().connection(Id::intern("sc_h")).unwrap();
    assert_eq!(
        conn.end,
        Endpoint::Anchor {
            node_id: Id::intern("sc_p"),
            side: Side::Left,
            index: 10,
        }
    );
    assert_eq!(ed.overlays().snap_indicator, None);

    // Moving the node drags the anchored end along.
    let before = ed.document().connection_endpoints(conn).1;
    assert!(ed.edit_node(Id::intern("sc_p"), |n| n.y += 40.0).is_ok());
    let doc = ed.document();
    let after = doc.connection_endpoints(doc.connection(Id::intern("sc_h")).unwrap()).1;
    assert_eq!(after, before.offset(0.0, 40.0));
}

// ─── Persistence ────────────────────────────────────────────────────────

#[test]
fn rejected_load_changes_nothing() {
    let mut ed = Editor::with_sample(EngineConfig::default(), SCREEN);
    let before = ed.document().snapshot();

    let err = ed.load(r#"{"nodes": []}"#).unwrap_err();
    assert!(matches!(err, EditorError::Persist(PersistError::InvalidFormat)));
    assert!(matches!(
        ed.load("not json"),
        Err(EditorError::Persist(PersistError::Unreadable(_)))
    ));
    assert_eq!(ed.document().snapshot(), before);
    assert_eq!(ed.history().depth(), 1);
}

#[test]
fn saved_file_loads_into_fresh_editor() {
    let source = Editor::with_sample(EngineConfig::default(), SCREEN);
    let json = source.save("2026-01-01T00:00:00.000Z").unwrap();

    let mut ed = Editor::new(EngineConfig::default(), SCREEN);
    ed.load(&json).unwrap();
    assert_eq!(ed.document().snapshot(), source.document().snapshot());
    assert!(ed.can_undo());
    assert!(ed.undo());
    assert!(ed.document().nodes.is_empty());
}

// ─── Keyboard ───────────────────────────────────────────────────────────

#[test]
fn keyboard_duplicate_and_delete() {
    let mut ed = editor_with(vec![Node::new(Id::intern("sc_k"), NodeKind::Box, 0.0, 0.0)], vec![]);
    down(&mut ed, 10.0, 90.0, Modifiers::NONE);
    ed.handle_event(&InputEvent::PointerUp { x: 10.0, y: 90.0 });

    let ctrl = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    assert!(ed.handle_key("d", ctrl));
    assert_eq!(ed.document().nodes.len(), 2);
    let copy = ed.selection().primary_node().unwrap();
    assert_ne!(copy, Id::intern("sc_k"));
    assert_eq!(ed.document().node(copy).unwrap().x, 30.0);

    assert!(ed.handle_key("Delete", Modifiers::NONE));
    assert_eq!(ed.document().nodes.len(), 1);
    assert!(ed.handle_key("z", ctrl));
    assert_eq!(ed.document().nodes.len(), 2);
}
