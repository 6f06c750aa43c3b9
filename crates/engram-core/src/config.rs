//! ============================================================================
//! Configuration - Explicit settings read once at process start
//! ============================================================================
//! All settings are collected into one `Settings` struct and handed to the
//! component constructors; core logic never reads the environment itself.
//! ============================================================================

use crate::embedding::DEFAULT_EMBEDDING_MODEL;
use crate::error::{Error, Result};

/// Default Qdrant gRPC endpoint.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default collection holding stored memories.
pub const DEFAULT_COLLECTION_NAME: &str = "engram_memories";

/// Default maximum number of search results.
pub const DEFAULT_SEARCH_LIMIT: u64 = 5;

/// Qdrant connection settings.
#[derive(Debug, Clone)]
pub struct QdrantSettings {
    /// Qdrant server URL (gRPC port).
    pub url: String,
    /// Optional Qdrant API key.
    pub api_key: Option<String>,
    /// Collection the memories live in.
    pub collection_name: String,
    /// Maximum number of results returned by `find`.
    pub search_limit: u64,
}

/// Embedding API settings.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    /// API key for the embedding endpoint. Mandatory.
    pub api_key: String,
    /// Base URL of an OpenAI-compatible API. `None` uses the OpenAI default.
    pub base_url: Option<String>,
    /// Embedding model name.
    pub embedding_model: String,
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub qdrant: QdrantSettings,
    pub openai: OpenAiSettings,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    ///
    /// Factored out of [`Settings::from_env`] so parsing is testable without
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config("OPENAI_API_KEY is not set".to_string()))?;

        let search_limit = match lookup("QDRANT_SEARCH_LIMIT") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                Error::Config(format!("QDRANT_SEARCH_LIMIT is not a valid integer: {raw}"))
            })?,
            None => DEFAULT_SEARCH_LIMIT,
        };
        if search_limit == 0 {
            return Err(Error::Config(
                "QDRANT_SEARCH_LIMIT must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            qdrant: QdrantSettings {
                url: lookup("QDRANT_URL").unwrap_or_else(|| DEFAULT_QDRANT_URL.to_string()),
                api_key: lookup("QDRANT_API_KEY").filter(|key| !key.is_empty()),
                collection_name: lookup("QDRANT_COLLECTION_NAME")
                    .unwrap_or_else(|| DEFAULT_COLLECTION_NAME.to_string()),
                search_limit,
            },
            openai: OpenAiSettings {
                api_key,
                base_url: lookup("OPENAI_BASE_URL").filter(|url| !url.is_empty()),
                embedding_model: lookup("OPENAI_EMBEDDING_MODEL")
                    .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_applied() {
        let settings = Settings::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap();

        assert_eq!(settings.qdrant.url, DEFAULT_QDRANT_URL);
        assert_eq!(settings.qdrant.collection_name, DEFAULT_COLLECTION_NAME);
        assert_eq!(settings.qdrant.search_limit, DEFAULT_SEARCH_LIMIT);
        assert!(settings.qdrant.api_key.is_none());
        assert_eq!(settings.openai.embedding_model, DEFAULT_EMBEDDING_MODEL);
        assert!(settings.openai.base_url.is_none());
    }

    #[test]
    fn overrides_are_respected() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "https://example.com/v1"),
            ("OPENAI_EMBEDDING_MODEL", "text-embedding-3-large"),
            ("QDRANT_URL", "http://qdrant.internal:6334"),
            ("QDRANT_API_KEY", "qd-secret"),
            ("QDRANT_COLLECTION_NAME", "notes"),
            ("QDRANT_SEARCH_LIMIT", "12"),
        ]))
        .unwrap();

        assert_eq!(settings.qdrant.url, "http://qdrant.internal:6334");
        assert_eq!(settings.qdrant.api_key.as_deref(), Some("qd-secret"));
        assert_eq!(settings.qdrant.collection_name, "notes");
        assert_eq!(settings.qdrant.search_limit, 12);
        assert_eq!(settings.openai.base_url.as_deref(), Some("https://example.com/v1"));
        assert_eq!(settings.openai.embedding_model, "text-embedding-3-large");
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let err = Settings::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn empty_api_key_is_a_config_error() {
        let err = Settings::from_lookup(lookup_from(&[("OPENAI_API_KEY", "")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn non_numeric_search_limit_is_rejected() {
        let err = Settings::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("QDRANT_SEARCH_LIMIT", "many"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn zero_search_limit_is_rejected() {
        let err = Settings::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("QDRANT_SEARCH_LIMIT", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
