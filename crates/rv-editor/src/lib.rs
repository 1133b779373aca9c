pub mod editor;
pub mod history;
pub mod input;
pub mod selection;
pub mod shortcuts;
pub mod tools;

pub use editor::Editor;
pub use history::History;
pub use input::{InputEvent, Modifiers, PointerButton};
pub use selection::Selection;
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::{Gesture, SelectTool, Tool, ToolContext, ToolOutcome};

use rv_core::{Id, PersistError};
use thiserror::Error;

/// Failure of an editor action. The document is unchanged when one is
/// returned.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("no node with id `{0}`")]
    UnknownNode(Id),
    #[error("no connection with id `{0}`")]
    UnknownConnection(Id),
    #[error("image could not be decoded: {0}")]
    Image(String),
}
