//! Error types for story graph and session operations.

use thiserror::Error;

use crate::node::NodeId;

/// Errors from graph queries, graph mutation and traversal.
///
/// Every variant is recoverable by the caller. Operations that fail leave the
/// graph and the session exactly as they were before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Story has no root node")]
    NoRootDefined,

    #[error("Malformed story definition: {0}")]
    MalformedDefinition(String),

    #[error("Choice '{label}' is not available at node {node}")]
    InvalidChoice { node: NodeId, label: String },

    #[error("Choice '{label}' at node {from} points to missing node {target}")]
    DanglingLink {
        from: NodeId,
        label: String,
        target: NodeId,
    },

    #[error("Scene text cannot be empty")]
    EmptySceneText,
}

impl From<serde_json::Error> for StoryError {
    fn from(err: serde_json::Error) -> Self {
        StoryError::MalformedDefinition(err.to_string())
    }
}

/// Errors from reading and writing story files.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Story(#[from] StoryError),
}
