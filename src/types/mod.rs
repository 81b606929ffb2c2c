//! Core types for the chunking engine.

mod chunk;
mod config;
mod request;

pub use chunk::Chunk;
pub use config::{
    ChunkingConfig, ChunkingProfile, Provider, SemanticSettings, ServiceConfig,
    DEFAULT_SEPARATORS, MARKDOWN_SEPARATORS,
};
pub use request::{ChunkRequest, ChunkResponse, ChunkingOverrides, Strategy};
