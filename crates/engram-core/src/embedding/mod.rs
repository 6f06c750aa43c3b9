//! ============================================================================
//! Embedding Providers - Text to fixed-size vectors
//! ============================================================================
//! The provider interface is the seam for alternative embedding backends
//! (local models, other vendors); one remote OpenAI-compatible
//! implementation exists today.
//! ============================================================================

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::OpenAiSettings;
use crate::error::Result;

mod openai;

pub use openai::{OpenAiEmbeddingProvider, DEFAULT_EMBEDDING_MODEL};

/// Converts text to fixed-size vectors and declares the named-vector slot
/// those vectors are stored under.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of documents, preserving input order.
    ///
    /// An empty batch yields an empty result without touching the backend.
    async fn embed_documents(&self, documents: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query string.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Stable named-vector key derived from the model name.
    fn vector_name(&self) -> String;

    /// Output dimensionality of the model, fixed per model family.
    fn vector_size(&self) -> u64;
}

/// Build the configured embedding provider.
pub fn create_embedding_provider(settings: &OpenAiSettings) -> Result<Arc<dyn EmbeddingProvider>> {
    let provider = OpenAiEmbeddingProvider::new(
        settings.api_key.clone(),
        settings.base_url.clone(),
        settings.embedding_model.clone(),
    )?;
    Ok(Arc::new(provider))
}
