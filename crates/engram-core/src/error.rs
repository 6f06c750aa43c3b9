//! Error types for engram operations.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for the memory service.
///
/// No variant is recovered from locally; every failure surfaces to the
/// caller of `store`/`find` as a failed operation.
#[derive(Error, Debug)]
pub enum Error {
    /// A required setting is missing or malformed at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// The embedding backend call failed (auth, network, malformed response).
    #[error("embedding provider error: {0}")]
    Provider(String),

    /// The vector index call failed (connection, collection, payload).
    #[error("vector store error: {0}")]
    Store(String),
}

impl From<qdrant_client::QdrantError> for Error {
    fn from(err: qdrant_client::QdrantError) -> Self {
        Error::Store(err.to_string())
    }
}
