//! Chunking strategies.

mod base;
mod fixed_chunker;
mod json_chunker;
mod markdown_chunker;
mod recursive_chunker;

pub use base::{estimate_token_count, Chunker};
pub use fixed_chunker::FixedWindowChunker;
pub use json_chunker::JsonChunker;
pub use markdown_chunker::MarkdownChunker;
pub use recursive_chunker::RecursiveChunker;

use crate::types::{Chunk, ChunkingConfig};

/// Slice `text` into fixed-size windows.
pub fn chunk_fixed(text: &str, config: &ChunkingConfig) -> Vec<Chunk> {
    FixedWindowChunker::new().chunk(text, config)
}

/// Split `text` recursively on the configured separators.
pub fn chunk_recursive(text: &str, config: &ChunkingConfig) -> Vec<Chunk> {
    RecursiveChunker::new().chunk(text, config)
}

/// Split markdown `text`; pass separators ordered from headings down.
pub fn chunk_markdown(text: &str, config: &ChunkingConfig) -> Vec<Chunk> {
    MarkdownChunker::new().chunk(text, config)
}

/// Split JSON `text` along array elements and object entries.
pub fn chunk_json_structural(text: &str, config: &ChunkingConfig) -> Vec<Chunk> {
    JsonChunker::new().chunk(text, config)
}
