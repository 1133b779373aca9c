//! Starter diagram shown on a fresh page: three people, two text boxes and
//! one routed connection, laid out inside the default artboard.

use crate::geometry::{Point, Side};
use crate::id::Id;
use crate::model::*;
use smallvec::smallvec;

fn person(id: &str, x: f64, y: f64, size: f64, label: &str) -> Node {
    let mut n = Node::new(Id::intern(id), NodeKind::Person, x, y);
    n.label = label.into();
    n.style.width = size;
    n.style.height = size;
    n.text.x = Some(size / 2.0);
    n.text.y = Some(size / 2.0 + 5.0);
    n
}

pub fn sample_snapshot() -> Snapshot {
    let a = person("node-a", 400.0, 200.0, 60.0, "Lira");
    let b = person("node-b", 650.0, 340.0, 60.0, "Vas");
    let mut c = person("node-c", 395.0, 330.0, 70.0, "Liravas\nwatcher");
    c.style.background_color = "#e1bee7".into();
    c.text.y = Some(72.0);
    c.text.font_size = 13.0;

    let mut help = Node::new(Id::intern("tutorial-box"), NodeKind::Box, 360.0, 470.0);
    help.label = "Basics\n\nEdit: right click\nPan: drag the background\nRange select: right drag\n\nClick a line to add a bend\nDouble click a bend to remove it\nShift drag for right angles".into();
    help.style.width = 380.0;
    help.style.height = 180.0;
    help.style.border_color = "#007bff".into();
    help.style.border_style = LineStyle::Dashed;
    help.style.background_color = "#f0f7ff".into();
    help.style.opacity = 90.0;
    help.text.align = TextAlign::Left;
    help.text.x = Some(190.0);
    help.text.y = Some(90.0);

    let mut title = Node::new(Id::intern("title-box"), NodeKind::Box, 430.0, 420.0);
    title.label = "Try moving the arrow!".into();
    title.style.width = 240.0;
    title.style.height = 50.0;
    title.style.border_color = "transparent".into();
    title.style.background_color = "#fff176".into();
    title.text.color = "#e65100".into();
    title.text.font_size = 16.0;
    title.text.font_weight = FontWeight::Bold;
    title.text.x = Some(120.0);
    title.text.y = Some(25.0);

    let conn = Connection {
        id: Id::intern("conn-tutorial"),
        start: Endpoint::Anchor {
            node_id: a.id,
            side: Side::Right,
            index: 10,
        },
        end: Endpoint::Anchor {
            node_id: b.id,
            side: Side::Top,
            index: 10,
        },
        waypoints: smallvec![Point::new(680.0, 230.0)],
        style: ConnectionStyle {
            arrow: ArrowKind::Both,
            ..ConnectionStyle::default()
        },
        label: Some(ConnectionLabel {
            text: "Partners".into(),
            bg_color: "#ffffff".into(),
            offset_y: -60.0,
            ..ConnectionLabel::default()
        }),
    };

    Snapshot {
        nodes: vec![a, b, c, help, title],
        connections: vec![conn],
        app_settings: AppSettings::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_anchors_resolve() {
        let snap = sample_snapshot();
        let conn = &snap.connections[0];
        for end in [&conn.start, &conn.end] {
            let id = end.anchored_to().unwrap();
            assert!(snap.nodes.iter().any(|n| n.id == id));
        }
    }
}
