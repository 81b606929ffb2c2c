//! Markdown chunker.

use super::base::Chunker;
use super::recursive_chunker::RecursiveChunker;
use crate::types::{Chunk, ChunkingConfig};

/// Document chunker for markdown content.
///
/// Runs the recursive algorithm with the caller's separators, which for
/// markdown should run from the largest structural unit to the smallest
/// (see [`ChunkingConfig::for_markdown`]).
pub struct MarkdownChunker {
    inner: RecursiveChunker,
}

impl MarkdownChunker {
    /// Create a new markdown chunker.
    pub fn new() -> Self {
        Self {
            inner: RecursiveChunker::new(),
        }
    }
}

impl Default for MarkdownChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for MarkdownChunker {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn description(&self) -> &'static str {
        "Heading-aware recursive chunker for markdown content"
    }

    fn chunk(&self, text: &str, config: &ChunkingConfig) -> Vec<Chunk> {
        Chunk::sequence(self.name(), self.inner.split_text(text, config))
    }
}
