//! ============================================================================
//! Engram Core - Semantic memory over a Qdrant vector index
//! ============================================================================
//! Stores free-text notes as embeddings and retrieves them again by meaning.
//!
//! ## Architecture
//! ```text
//! store/find request
//!       │
//!   MemoryService ──format──> confirmation / result lines
//!       │
//!   QdrantConnector ──ensure collection──> Qdrant (named vector, cosine)
//!       │
//!   EmbeddingProvider ──/embeddings──> OpenAI-compatible API
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use engram_core::{create_embedding_provider, MemoryService, QdrantConnector, Settings};
//!
//! let settings = Settings::from_env()?;
//! let provider = create_embedding_provider(&settings.openai)?;
//! let connector = QdrantConnector::new(&settings.qdrant, provider)?;
//! let service = MemoryService::new(connector, settings.qdrant.search_limit);
//!
//! let confirmation = service.store_memory("User prefers dark mode", None).await?;
//! let hits = service.find_memories("display preferences").await?;
//! ```
//! ============================================================================

mod config;
mod embedding;
mod error;
mod service;
mod store;
mod types;

// Re-export public types
pub use config::{OpenAiSettings, QdrantSettings, Settings};
pub use embedding::{
    create_embedding_provider, EmbeddingProvider, OpenAiEmbeddingProvider,
    DEFAULT_EMBEDDING_MODEL,
};
pub use error::{Error, Result};
pub use service::MemoryService;
pub use store::QdrantConnector;
pub use types::{Entry, Metadata};
