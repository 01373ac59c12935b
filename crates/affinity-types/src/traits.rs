//! Reader source abstraction and error types.

use crate::{ReaderId, ReaderRecord};
use async_trait::async_trait;

/// System of record for reader identities and their declared friendships.
///
/// The affinity graph is a derived cache of this data; it is rebuilt from `load_readers`.
#[async_trait]
pub trait ReaderSource: Send + Sync {
    /// Load every reader with its declared connections.
    async fn load_readers(&self) -> Result<Vec<ReaderRecord>, ReaderSourceError>;

    /// Look up one reader. Returns `Ok(None)` when the id is unknown.
    async fn get_reader(&self, id: &str) -> Result<Option<ReaderRecord>, ReaderSourceError>;
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GraphError {
    #[error("invalid connection weight: {0} (must be finite and non-negative)")]
    InvalidWeight(f64),
}

#[derive(Debug, thiserror::Error)]
pub enum ReaderSourceError {
    #[error("reader source error: {0}")]
    Other(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum AffinityError {
    #[error("graph: {0}")]
    Graph(#[from] GraphError),
    #[error("source: {0}")]
    Source(#[from] ReaderSourceError),
    #[error("reader not found: {0}")]
    ReaderNotFound(ReaderId),
}
