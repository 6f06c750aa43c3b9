//! Data structures shared across the memory service.

use serde::{Deserialize, Serialize};

/// Structured metadata attached to an entry: an arbitrary JSON object.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A text note plus optional structured metadata, the unit of storage and
/// retrieval. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// The note text.
    pub content: String,
    /// Optional metadata stored alongside the note.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metadata: Option<Metadata>,
}

impl Entry {
    /// Create a new entry.
    pub fn new(content: impl Into<String>, metadata: Option<Metadata>) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_metadata_is_not_serialized() {
        let entry = Entry::new("note", None);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"content":"note"}"#);
    }

    #[test]
    fn metadata_round_trips() {
        let mut metadata = Metadata::new();
        metadata.insert("topic".to_string(), serde_json::json!("color"));
        let entry = Entry::new("the sky is blue", Some(metadata));

        let json = serde_json::to_string(&entry).unwrap();
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
