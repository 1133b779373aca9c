pub mod color;
pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;
pub mod persist;
pub mod resolve;
pub mod sample;
pub mod transform;
pub mod viewport;

pub use color::{Rgba, hex_to_rgba};
pub use config::{Artboard, EngineConfig};
pub use document::Document;
pub use error::PersistError;
pub use geometry::{AnchorHit, Point, Rect, Side};
pub use id::Id;
pub use model::*;
pub use persist::{FORMAT_VERSION, LoadedDocument, load_document, save_document};
pub use transform::{GroupResize, ResizeHandle};
pub use viewport::{ScreenSize, Viewport};

// Re-export so downstream crates build waypoint lists without a direct dependency
pub use smallvec::{SmallVec, smallvec};
