//! ============================================================================
//! Memory Service - The two public operations: store and find
//! ============================================================================
//! Wraps caller input into entries, delegates to the connector, and formats
//! results as text for the caller to render.
//! ============================================================================

use tracing::debug;

use crate::error::Result;
use crate::store::QdrantConnector;
use crate::types::{Entry, Metadata};

/// Confirmation previews are capped at this many characters.
const PREVIEW_CHARS: usize = 100;

/// Facade over the connector exposing `store` and `find`.
pub struct MemoryService {
    connector: QdrantConnector,
    search_limit: u64,
}

impl MemoryService {
    /// Create a service with a fixed result limit for `find`.
    pub fn new(connector: QdrantConnector, search_limit: u64) -> Self {
        Self {
            connector,
            search_limit,
        }
    }

    /// Store a note and return a human-readable confirmation containing a
    /// truncated preview and the generated id.
    pub async fn store_memory(
        &self,
        information: &str,
        metadata: Option<Metadata>,
    ) -> Result<String> {
        debug!("Storing memory: {}", preview(information, 50));

        let entry = Entry::new(information, metadata);
        let id = self.connector.store(&entry).await?;

        Ok(format!(
            "Stored: {} (id: {})",
            preview(information, PREVIEW_CHARS),
            id
        ))
    }

    /// Find notes related to `query`.
    ///
    /// Returns `None` when nothing qualifies — the explicit "searched, found
    /// nothing" signal — and otherwise a header line followed by one
    /// formatted line per entry, best match first.
    pub async fn find_memories(&self, query: &str) -> Result<Option<Vec<String>>> {
        debug!("Finding memories for query: {}", query);

        let entries = self
            .connector
            .search(query, self.search_limit, 0.0)
            .await?;

        if entries.is_empty() {
            return Ok(None);
        }

        let mut lines = Vec::with_capacity(entries.len() + 1);
        lines.push(format!("Results for the query '{query}':"));
        lines.extend(entries.iter().map(format_entry));
        Ok(Some(lines))
    }
}

/// Render an entry as a tagged line: content plus metadata as compact JSON,
/// empty when absent.
fn format_entry(entry: &Entry) -> String {
    let metadata = entry
        .metadata
        .as_ref()
        .and_then(|m| serde_json::to_string(m).ok())
        .unwrap_or_default();
    format!(
        "<entry><content>{}</content><metadata>{}</metadata></entry>",
        entry.content, metadata
    )
}

/// Truncate to at most `max_chars` characters, appending an ellipsis when
/// anything was cut. Operates on characters, not bytes.
fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
