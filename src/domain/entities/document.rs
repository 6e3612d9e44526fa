use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A text blob the grounded chain can retrieve from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub content: String,
    pub metadata: serde_json::Value,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            metadata: serde_json::json!({}),
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub document: Document,
    pub score: f32,
}

/// Splits content into documents by paragraph boundaries.
///
/// Paragraphs are joined until they would exceed `chunk_size`, then a new
/// document starts. A single paragraph longer than `chunk_size` is kept whole.
/// Every document carries `metadata` with a sequential `chunk_index` added.
pub fn split_text(content: &str, chunk_size: usize, metadata: &serde_json::Value) -> Vec<Document> {
    let paragraphs = content
        .split("\n\n")
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for paragraph in paragraphs {
        if !current.is_empty() && current.len() + paragraph.len() + 2 > chunk_size {
            chunks.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(paragraph);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
        .into_iter()
        .enumerate()
        .map(|(index, text)| Document::new(text).with_metadata(chunk_metadata(metadata, index)))
        .collect()
}

fn chunk_metadata(base: &serde_json::Value, index: usize) -> serde_json::Value {
    let mut metadata = match base {
        serde_json::Value::Object(map) => map.clone(),
        serde_json::Value::Null => serde_json::Map::new(),
        other => {
            let mut map = serde_json::Map::new();
            map.insert("source".to_string(), other.clone());
            map
        }
    };
    metadata.insert("chunk_index".to_string(), index.into());
    serde_json::Value::Object(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_text_single_document() {
        let docs = split_text("Hello world.\n\nThis is a test.", 100, &json!({}));

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "Hello world.\n\nThis is a test.");
        assert_eq!(docs[0].metadata["chunk_index"], 0);
    }

    #[test]
    fn test_split_text_multiple_documents_keep_metadata() {
        let content = "First paragraph.\n\nSecond paragraph.\n\nThird paragraph.";
        let docs = split_text(content, 30, &json!({ "source": "notes.txt" }));

        assert_eq!(docs.len(), 3);
        for (i, doc) in docs.iter().enumerate() {
            assert_eq!(doc.metadata["chunk_index"], i);
            assert_eq!(doc.metadata["source"], "notes.txt");
        }
        assert_eq!(docs[2].content, "Third paragraph.");
    }

    #[test]
    fn test_split_text_oversized_paragraph_kept_whole() {
        let long = "x".repeat(50);
        let docs = split_text(&long, 10, &serde_json::Value::Null);

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content.len(), 50);
    }

    #[test]
    fn test_split_text_empty() {
        assert!(split_text("  \n\n ", 100, &json!({})).is_empty());
    }
}
