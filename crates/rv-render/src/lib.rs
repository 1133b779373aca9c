pub mod frame;
pub mod hit;
pub mod node;
pub mod paint;
pub mod route;

pub use frame::{Frame, Overlays, SelectionView, build_frame};
pub use hit::{ConnectionEnd, HitTarget, connections_in_rect, hit_test, nodes_in_rect};
pub use node::{NodeVisual, project_node};
pub use route::{ConnectionGeometry, orthogonal_snap, route_connection, waypoint_insert_index};
