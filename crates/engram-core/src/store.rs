//! ============================================================================
//! Qdrant Connector - Vector index lifecycle, upsert, and similarity search
//! ============================================================================
//! The only component that talks to Qdrant. Provisions the collection
//! lazily and re-checks existence before every operation.
//! ============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use qdrant_client::qdrant::{
    value::Kind, CreateCollectionBuilder, Distance, NamedVectors, PointStruct,
    SearchPointsBuilder, UpsertPointsBuilder, Value, VectorParamsBuilder, VectorsConfigBuilder,
};
use qdrant_client::{Payload, Qdrant};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::QdrantSettings;
use crate::embedding::EmbeddingProvider;
use crate::error::{Error, Result};
use crate::types::{Entry, Metadata};

/// Connector owning one Qdrant client, one target collection, and one
/// embedding provider. Stateless across calls apart from this configuration.
pub struct QdrantConnector {
    client: Qdrant,
    collection_name: String,
    provider: Arc<dyn EmbeddingProvider>,
}

impl QdrantConnector {
    /// Create a connector for the configured Qdrant endpoint.
    pub fn new(settings: &QdrantSettings, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        debug!(
            "Connecting to Qdrant at {} (collection: {})",
            settings.url, settings.collection_name
        );

        let client = Qdrant::from_url(&settings.url)
            .api_key(settings.api_key.clone())
            .build()?;

        Ok(Self {
            client,
            collection_name: settings.collection_name.clone(),
            provider,
        })
    }

    /// Create the target collection if it does not exist yet.
    ///
    /// Idempotent and called before every store/search; existence is never
    /// cached, so a collection dropped behind our back is recreated on the
    /// next operation. Two concurrent first-time calls may both attempt
    /// creation; the loser's error surfaces as a `Store` failure.
    pub async fn ensure_collection(&self) -> Result<()> {
        let collections = self.client.list_collections().await?;
        if collections
            .collections
            .iter()
            .any(|c| c.name == self.collection_name)
        {
            debug!("Collection {} already exists", self.collection_name);
            return Ok(());
        }

        let vector_name = self.provider.vector_name();
        let vector_size = self.provider.vector_size();

        info!(
            "Creating collection {} (vector: {}, size: {})",
            self.collection_name, vector_name, vector_size
        );

        let mut vectors_config = VectorsConfigBuilder::default();
        vectors_config.add_named_vector_params(
            vector_name,
            VectorParamsBuilder::new(vector_size, Distance::Cosine),
        );

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection_name).vectors_config(vectors_config),
            )
            .await?;

        info!("Collection {} created", self.collection_name);
        Ok(())
    }

    /// Store an entry and return its generated id.
    ///
    /// No deduplication: storing identical content twice produces two
    /// independent records.
    pub async fn store(&self, entry: &Entry) -> Result<String> {
        self.ensure_collection().await?;

        let vector = self.provider.embed_query(&entry.content).await?;
        let id = Uuid::new_v4().to_string();

        let payload = Payload::try_from(payload_json(entry))
            .map_err(|e| Error::Store(format!("failed to build payload: {e}")))?;

        let point = PointStruct::new(
            id.clone(),
            NamedVectors::default().add_vector(self.provider.vector_name(), vector),
            payload,
        );

        self.client
            .upsert_points(
                UpsertPointsBuilder::new(&self.collection_name, vec![point]).wait(true),
            )
            .await?;

        info!("Stored entry {} in {}", id, self.collection_name);
        Ok(id)
    }

    /// Search for entries similar to `query`, best match first.
    ///
    /// Hits scoring below `score_threshold` are filtered by the index; a hit
    /// exactly at the threshold is included. An empty result is a normal
    /// outcome, never an error.
    pub async fn search(
        &self,
        query: &str,
        limit: u64,
        score_threshold: f32,
    ) -> Result<Vec<Entry>> {
        self.ensure_collection().await?;

        let query_vector = self.provider.embed_query(query).await?;

        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection_name, query_vector, limit)
                    .vector_name(self.provider.vector_name())
                    .score_threshold(score_threshold)
                    .with_payload(true),
            )
            .await?;

        let entries: Vec<Entry> = response
            .result
            .iter()
            .map(|point| entry_from_payload(&point.payload))
            .collect();

        debug!(
            "Search in {} returned {} entries",
            self.collection_name,
            entries.len()
        );
        Ok(entries)
    }
}

/// Payload for a stored entry. The `metadata` key is omitted entirely when
/// the entry has none, not stored as null.
fn payload_json(entry: &Entry) -> serde_json::Value {
    let mut payload = serde_json::Map::new();
    payload.insert(
        "content".to_string(),
        serde_json::Value::String(entry.content.clone()),
    );
    if let Some(metadata) = &entry.metadata {
        payload.insert(
            "metadata".to_string(),
            serde_json::Value::Object(metadata.clone()),
        );
    }
    serde_json::Value::Object(payload)
}

/// Rebuild an entry from a search hit's payload. Missing `content` defaults
/// to the empty string; missing or non-object `metadata` to absent.
fn entry_from_payload(payload: &HashMap<String, Value>) -> Entry {
    let content = payload
        .get("content")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_default();

    let metadata: Option<Metadata> = payload.get("metadata").and_then(|v| match value_to_json(v) {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    });

    Entry { content, metadata }
}

/// Convert a Qdrant payload value into plain JSON.
fn value_to_json(value: &Value) -> serde_json::Value {
    match &value.kind {
        None | Some(Kind::NullValue(_)) => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(*b),
        Some(Kind::IntegerValue(i)) => serde_json::Value::Number((*i).into()),
        Some(Kind::DoubleValue(d)) => serde_json::Number::from_f64(*d)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s.clone()),
        Some(Kind::ListValue(list)) => {
            serde_json::Value::Array(list.values.iter().map(value_to_json).collect())
        }
        Some(Kind::StructValue(object)) => serde_json::Value::Object(
            object
                .fields
                .iter()
                .map(|(key, value)| (key.clone(), value_to_json(value)))
                .collect(),
        ),
    }
}
