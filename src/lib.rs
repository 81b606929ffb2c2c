//! Chunkwise Library
//!
//! Deterministic text segmentation for retrieval and embedding pipelines.
//! Splits plain text, Markdown and JSON into size-bounded chunks, and can
//! delegate meaning-based splitting to a remote language model.

pub mod api;
pub mod chunkers;
pub mod router;
pub mod semantic;
pub mod types;

pub use types::{Chunk, ChunkingConfig, ChunkingProfile, Provider, SemanticSettings, Strategy};
pub use chunkers::{
    chunk_fixed, chunk_json_structural, chunk_markdown, chunk_recursive, estimate_token_count, Chunker,
};
pub use router::{ChunkError, ChunkingRouter};
pub use semantic::{chunk_semantic, LlmSemanticSplitter, SemanticError, SemanticSplitter};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::types::*;
    pub use crate::chunkers::*;
    pub use crate::router::{ChunkError, ChunkingRouter};
    pub use crate::semantic::{chunk_semantic, SemanticError, SemanticSplitter};
}

/// Default chunk size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default chunk overlap in characters
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3017;

/// Default timeout for semantic provider requests
pub const DEFAULT_SEMANTIC_TIMEOUT_SECS: u64 = 60;
