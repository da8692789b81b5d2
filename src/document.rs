//! Indexable documents.
//!
//! A [`Document`] is the unit handed to the downstream indexer: a text body
//! plus a flat metadata map. Documents are built once and never mutated.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flat metadata attached to a document
pub type Metadata = serde_json::Map<String, Value>;

/// Text plus metadata, one per emitted record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    text: String,
    metadata: Metadata,
}

impl Document {
    pub fn new(text: String, metadata: Metadata) -> Self {
        Self { text, metadata }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Metadata value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// String metadata value for `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    pub fn into_parts(self) -> (String, Metadata) {
        (self.text, self.metadata)
    }
}

/// Concatenate title and abstract into the document body.
///
/// Both non-empty gives `"title abstract"`; an empty abstract gives the title
/// as-is (even when the title itself is empty). A non-empty abstract with an
/// empty title yields an empty body.
pub fn assemble_text(title: &str, abstract_text: &str) -> String {
    if !abstract_text.is_empty() && !title.is_empty() {
        format!("{} {}", title, abstract_text)
    } else if abstract_text.is_empty() {
        title.to_string()
    } else {
        String::new()
    }
}
