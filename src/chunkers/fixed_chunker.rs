//! Fixed-window chunker with character overlap.

use tracing::debug;

use super::base::{char_windows, Chunker};
use crate::types::{Chunk, ChunkingConfig};

/// Simple window chunker that slices text into fixed-size character windows.
///
/// This is the most basic chunker that doesn't consider any boundaries.
/// It's fast and predictable, useful as a fallback or for unstructured content.
pub struct FixedWindowChunker;

impl FixedWindowChunker {
    /// Create a new fixed-window chunker.
    pub fn new() -> Self {
        Self
    }
}

impl Default for FixedWindowChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for FixedWindowChunker {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn description(&self) -> &'static str {
        "Splits text into fixed-size character windows with optional overlap"
    }

    fn chunk(&self, text: &str, config: &ChunkingConfig) -> Vec<Chunk> {
        if config.chunk_size == 0 || text.is_empty() {
            return vec![];
        }

        let step = config.chunk_size - config.effective_overlap();
        let windows = char_windows(text, config.chunk_size, step);
        debug!(size = config.chunk_size, step, windows = windows.len(), "Fixed-window split");

        Chunk::sequence(self.name(), windows.into_iter().map(String::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn contents(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.content.as_str()).collect()
    }

    #[test]
    fn test_empty_content() {
        let chunks = FixedWindowChunker::new().chunk("", &ChunkingConfig::with_size(5));
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_zero_size_yields_nothing() {
        let chunks = FixedWindowChunker::new().chunk("some text", &ChunkingConfig::with_size(0));
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_exact_windows_without_overlap() {
        let chunks = FixedWindowChunker::new().chunk("AAAAABBBBBCCCCC", &ChunkingConfig::with_size(5));
        assert_eq!(contents(&chunks), vec!["AAAAA", "BBBBB", "CCCCC"]);
        assert_eq!(chunks.iter().map(|c| c.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_windows_with_overlap() {
        let config = ChunkingConfig::with_size(5).with_overlap(2);
        let chunks = FixedWindowChunker::new().chunk("AAAAABBBBBCCCCC", &config);
        // Windows start at offsets 0, 3, 6, 9, 12
        assert_eq!(contents(&chunks), vec!["AAAAA", "AABBB", "BBBBC", "BCCCC", "CCC"]);
    }

    #[test]
    fn test_reconstruction_and_sizes() {
        let text = "The quick brown fox jumps over the lazy dog. 敏捷的棕色狐狸。";
        let config = ChunkingConfig::with_size(7).with_overlap(3);
        let chunks = FixedWindowChunker::new().chunk(text, &config);

        let mut rebuilt = chunks[0].content.clone();
        for chunk in &chunks[1..] {
            rebuilt.extend(chunk.content.chars().skip(3));
        }
        assert_eq!(rebuilt, text);

        let (last, rest) = chunks.split_last().unwrap();
        assert!(rest.iter().all(|c| c.length == 7));
        assert!(last.length <= 7);
    }

    #[test]
    fn test_oversized_overlap_still_advances() {
        let config = ChunkingConfig::with_size(4).with_overlap(10);
        let chunks = FixedWindowChunker::new().chunk("abcdefg", &config);
        // Behaves as overlap = 3, step = 1
        assert_eq!(contents(&chunks), vec!["abcd", "bcde", "cdef", "defg"]);
    }

    #[test]
    fn test_token_counts_annotated() {
        let chunks = FixedWindowChunker::new().chunk("测试测试abcdabcd", &ChunkingConfig::with_size(4));
        let tokens: Vec<usize> = chunks.iter().map(|c| c.token_count).collect();
        assert_eq!(tokens, vec![4, 1, 1]);
    }
}
