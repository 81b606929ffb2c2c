//! Chunking strategy router.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::chunkers::{Chunker, FixedWindowChunker, JsonChunker, MarkdownChunker, RecursiveChunker};
use crate::semantic::{chunk_semantic, LlmSemanticSplitter, SemanticError, SemanticSplitter};
use crate::types::{Chunk, ChunkingConfig, ServiceConfig, Strategy};

/// Router-level failure.
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error("unknown chunking profile: {0}")]
    UnknownProfile(String),
}

/// Router that dispatches a strategy to its chunker.
pub struct ChunkingRouter {
    /// Fixed-window chunker
    fixed_chunker: Arc<FixedWindowChunker>,
    /// Recursive chunker (for plain text)
    recursive_chunker: Arc<RecursiveChunker>,
    /// Markdown chunker
    markdown_chunker: Arc<MarkdownChunker>,
    /// JSON chunker
    json_chunker: Arc<JsonChunker>,
    /// Remote semantic splitter
    semantic_splitter: Arc<dyn SemanticSplitter>,
}

impl ChunkingRouter {
    /// Create a router with the HTTP semantic splitter.
    pub fn new(config: &ServiceConfig) -> Result<Self, ChunkError> {
        let splitter = LlmSemanticSplitter::new(Duration::from_secs(config.semantic_timeout_secs))?;
        Ok(Self::with_splitter(Arc::new(splitter)))
    }

    /// Create a router with a custom semantic splitter.
    pub fn with_splitter(semantic_splitter: Arc<dyn SemanticSplitter>) -> Self {
        Self {
            fixed_chunker: Arc::new(FixedWindowChunker::new()),
            recursive_chunker: Arc::new(RecursiveChunker::new()),
            markdown_chunker: Arc::new(MarkdownChunker::new()),
            json_chunker: Arc::new(JsonChunker::new()),
            semantic_splitter,
        }
    }

    /// Get the synchronous chunker for a strategy, if it has one.
    pub fn get_chunker(&self, strategy: Strategy) -> Option<Arc<dyn Chunker>> {
        match strategy {
            Strategy::Fixed => Some(Arc::clone(&self.fixed_chunker) as Arc<dyn Chunker>),
            Strategy::Recursive => Some(Arc::clone(&self.recursive_chunker) as Arc<dyn Chunker>),
            Strategy::Markdown => Some(Arc::clone(&self.markdown_chunker) as Arc<dyn Chunker>),
            Strategy::Json => Some(Arc::clone(&self.json_chunker) as Arc<dyn Chunker>),
            Strategy::Semantic => None,
        }
    }

    /// Get a chunker by name.
    pub fn get_chunker_by_name(&self, name: &str) -> Option<Arc<dyn Chunker>> {
        name.parse::<Strategy>().ok().and_then(|s| self.get_chunker(s))
    }

    /// Chunk `text` with the given strategy.
    pub async fn chunk(&self, strategy: Strategy, text: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, ChunkError> {
        let chunks = match self.get_chunker(strategy) {
            Some(chunker) => chunker.chunk(text, config),
            None => chunk_semantic(text, config, self.semantic_splitter.as_ref()).await?,
        };

        info!(
            strategy = %strategy,
            chars = text.chars().count(),
            chunks = chunks.len(),
            "Chunked document"
        );

        Ok(chunks)
    }

    /// List all available strategies.
    pub fn list_strategies(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            (self.fixed_chunker.name(), self.fixed_chunker.description()),
            (self.recursive_chunker.name(), self.recursive_chunker.description()),
            (self.markdown_chunker.name(), self.markdown_chunker.description()),
            (self.json_chunker.name(), self.json_chunker.description()),
            ("semantic", "Delegates splitting to a remote language model"),
        ]
    }
}
