//! Chunk type definitions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chunkers::estimate_token_count;

/// A fragment of the input document produced by one chunking strategy.
///
/// Chunks are the unit handed to downstream embedding and retrieval
/// pipelines. They are immutable once built: `length` and `token_count`
/// are derived from `content` at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Strategy-tagged unique identifier, e.g. `recursive-4f1c…`
    pub id: String,

    /// Position of this chunk in the output sequence (0-indexed)
    pub index: usize,

    /// The verbatim text (or re-serialized JSON fragment) of the chunk
    pub content: String,

    /// Length of `content` in Unicode scalar values, not bytes
    pub length: usize,

    /// Estimated token count of `content`
    pub token_count: usize,
}

impl Chunk {
    /// Create a new chunk at `index` for the given strategy.
    pub fn new(strategy: &str, index: usize, content: String) -> Self {
        let length = content.chars().count();
        let token_count = estimate_token_count(&content);

        Self {
            id: format!("{}-{}", strategy, Uuid::new_v4()),
            index,
            content,
            length,
            token_count,
        }
    }

    /// Number contents in emission order, producing a contiguous sequence.
    pub fn sequence<I>(strategy: &str, contents: I) -> Vec<Chunk>
    where
        I: IntoIterator<Item = String>,
    {
        contents
            .into_iter()
            .enumerate()
            .map(|(index, content)| Chunk::new(strategy, index, content))
            .collect()
    }

    /// Get the length of the chunk content in characters.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Check if the chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_counts_code_points() {
        let chunk = Chunk::new("fixed", 0, "héllo 测试".to_string());
        assert_eq!(chunk.length, 8);
        assert_eq!(chunk.len(), 8);
        assert!(chunk.content.len() > chunk.length);
    }

    #[test]
    fn test_sequence_is_contiguous() {
        let chunks = Chunk::sequence("json", vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        let indices: Vec<usize> = chunks.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(chunks.iter().all(|c| c.id.starts_with("json-")));
        assert_ne!(chunks[0].id, chunks[1].id);
    }

    #[test]
    fn test_token_count_is_annotated() {
        let chunk = Chunk::new("fixed", 0, "abcd测试".to_string());
        assert_eq!(chunk.token_count, 3);
    }
}
