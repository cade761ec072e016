//! Error types for bulbtree

use thiserror::Error;

/// Main error type for the crate
///
/// Building a tree never fails; these cover configuration, reassembling a
/// tree from raw arrays, and snapshot I/O.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
