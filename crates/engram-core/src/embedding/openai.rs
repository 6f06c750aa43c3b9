//! ============================================================================
//! OpenAI Embedding Provider - Remote embeddings over an OpenAI-compatible API
//! ============================================================================

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::EmbeddingProvider;
use crate::error::{Error, Result};

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Default API endpoint base.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Known output dimensionality per model family. Adding support for a new
/// model means adding its size here; sizes are never introspected from a
/// live response.
fn model_vector_size(model: &str) -> Option<u64> {
    match model {
        "text-embedding-3-small" => Some(1536),
        "text-embedding-3-large" => Some(3072),
        "text-embedding-ada-002" => Some(1536),
        _ => None,
    }
}

/// Embedding provider backed by an OpenAI-compatible `/embeddings` endpoint.
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    vector_size: u64,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
    model: String,
    usage: Option<EmbeddingUsage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingUsage {
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl OpenAiEmbeddingProvider {
    /// Create a provider for a known model.
    ///
    /// Rejects models without a registered vector size so dimension
    /// mismatches surface at startup rather than inside the index.
    pub fn new(api_key: String, base_url: Option<String>, model: String) -> Result<Self> {
        let vector_size = model_vector_size(&model).ok_or_else(|| {
            Error::Config(format!("unknown embedding model: {model}"))
        })?;

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model,
            vector_size,
        })
    }

    /// The configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The configured endpoint base.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request_embeddings(&self, input: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input,
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("failed to send embedding request: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Provider(format!("failed to read embedding response: {e}")))?;

        if !status.is_success() {
            // Surface the API's own message when the body parses as one
            if let Ok(error) = serde_json::from_str::<ErrorResponse>(&body) {
                return Err(Error::Provider(format!(
                    "embedding API error ({status}): {}",
                    error.error.message
                )));
            }
            return Err(Error::Provider(format!(
                "embedding API error ({status}): {body}"
            )));
        }

        let parsed: EmbeddingResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Provider(format!("failed to parse embedding response: {e}")))?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "Embedding tokens used: {} (model: {})",
                usage.total_tokens, parsed.model
            );
        }

        // The API does not guarantee response order; sort by index
        let mut embeddings: Vec<(usize, Vec<f32>)> = parsed
            .data
            .into_iter()
            .map(|d| (d.index, d.embedding))
            .collect();
        embeddings.sort_by_key(|(idx, _)| *idx);

        Ok(embeddings.into_iter().map(|(_, e)| e).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed_documents(&self, documents: &[String]) -> Result<Vec<Vec<f32>>> {
        if documents.is_empty() {
            return Ok(vec![]);
        }

        debug!("Embedding {} documents", documents.len());
        self.request_embeddings(documents).await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.request_embeddings(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::Provider("no embedding returned".to_string()))
    }

    fn vector_name(&self) -> String {
        normalized_vector_name(&self.model)
    }

    fn vector_size(&self) -> u64 {
        self.vector_size
    }
}

/// Named-vector key for a model: separators that Qdrant keys should not
/// carry are replaced with underscores.
fn normalized_vector_name(model: &str) -> String {
    model.replace('/', "_").replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(model: &str) -> Result<OpenAiEmbeddingProvider> {
        OpenAiEmbeddingProvider::new("test-key".to_string(), None, model.to_string())
    }

    #[test]
    fn default_base_url_is_openai() {
        let provider = provider(DEFAULT_EMBEDDING_MODEL).unwrap();
        assert_eq!(provider.base_url(), DEFAULT_BASE_URL);
        assert_eq!(provider.model(), DEFAULT_EMBEDDING_MODEL);
    }

    #[test]
    fn custom_base_url_is_kept() {
        let provider = OpenAiEmbeddingProvider::new(
            "test-key".to_string(),
            Some("https://api.example.com/v1".to_string()),
            DEFAULT_EMBEDDING_MODEL.to_string(),
        )
        .unwrap();
        assert_eq!(provider.base_url(), "https://api.example.com/v1");
    }

    #[test]
    fn unknown_model_is_a_config_error() {
        let err = provider("totally-made-up-model").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn vector_sizes_are_fixed_per_model() {
        assert_eq!(provider("text-embedding-3-small").unwrap().vector_size(), 1536);
        assert_eq!(provider("text-embedding-3-large").unwrap().vector_size(), 3072);
        assert_eq!(provider("text-embedding-ada-002").unwrap().vector_size(), 1536);
    }

    #[test]
    fn vector_name_is_normalized() {
        assert_eq!(
            provider("text-embedding-3-small").unwrap().vector_name(),
            "text_embedding_3_small"
        );
        assert_eq!(normalized_vector_name("org/model-v2"), "org_model_v2");
        assert_eq!(
            normalized_vector_name("already_normalized"),
            "already_normalized"
        );
    }

    #[tokio::test]
    async fn empty_batch_returns_empty_without_network() {
        let provider = provider(DEFAULT_EMBEDDING_MODEL).unwrap();
        let result = provider.embed_documents(&[]).await.unwrap();
        assert!(result.is_empty());
    }
}
