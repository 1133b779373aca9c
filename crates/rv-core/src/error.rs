use thiserror::Error;

/// Failure to save or load a document file.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Valid JSON without the `nodes` and `connections` arrays.
    #[error("not a diagram file: missing `nodes` or `connections` array")]
    InvalidFormat,
    /// Syntax error, or a node/connection that does not match the model.
    #[error("unreadable diagram file: {0}")]
    Unreadable(#[source] serde_json::Error),
    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}
