//! Versioned JSON save files.
//!
//! ```json
//! { "version": "0.5", "timestamp": "...", "appSettings": {...},
//!   "nodes": [...], "connections": [...] }
//! ```
//!
//! Loading is all-or-nothing: the caller gets a complete `Snapshot` or an
//! error, never a half-applied document.

use crate::document::Document;
use crate::error::PersistError;
use crate::model::{AppSettings, Connection, Node, Snapshot};
use serde::{Deserialize, Serialize};

pub const FORMAT_VERSION: &str = "0.5";

/// On-disk layout, borrowed for writing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedDocumentRef<'a> {
    version: &'a str,
    timestamp: &'a str,
    app_settings: &'a AppSettings,
    nodes: &'a [Node],
    connections: &'a [Connection],
}

/// On-disk layout, owned for reading. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedDocument {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    app_settings: Option<AppSettings>,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
}

/// A successfully parsed file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    /// `None` when the file carried no settings; callers keep their own.
    pub app_settings: Option<AppSettings>,
}

impl LoadedDocument {
    /// Merge into a snapshot, falling back to `current` settings.
    pub fn into_snapshot(self, current: &AppSettings) -> Snapshot {
        Snapshot {
            nodes: self.nodes,
            connections: self.connections,
            app_settings: self.app_settings.unwrap_or_else(|| current.clone()),
        }
    }
}

/// Serialize `doc` as a pretty-printed save file stamped with `timestamp`
/// (ISO 8601, supplied by the host clock).
pub fn save_document(doc: &Document, timestamp: &str) -> Result<String, PersistError> {
    let saved = SavedDocumentRef {
        version: FORMAT_VERSION,
        timestamp,
        app_settings: &doc.settings,
        nodes: &doc.nodes,
        connections: &doc.connections,
    };
    serde_json::to_string_pretty(&saved).map_err(PersistError::Serialize)
}

/// Parse a save file.
///
/// The shape check (both arrays present) runs on the untyped value first
/// so a foreign JSON file reports `InvalidFormat` rather than a serde
/// message about a missing field.
pub fn load_document(json: &str) -> Result<LoadedDocument, PersistError> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(PersistError::Unreadable)?;
    let has_arrays = value.get("nodes").is_some_and(|v| v.is_array())
        && value.get("connections").is_some_and(|v| v.is_array());
    if !has_arrays {
        return Err(PersistError::InvalidFormat);
    }

    let saved: SavedDocument = serde_json::from_value(value).map_err(PersistError::Unreadable)?;
    if let Some(v) = saved.version.as_deref()
        && v != FORMAT_VERSION
    {
        log::info!("loading file written by format version {v}");
    }
    Ok(LoadedDocument {
        nodes: saved.nodes,
        connections: saved.connections,
        app_settings: saved.app_settings,
    })
}
