//! Strategy selection and request/response definitions.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Chunk, ChunkingConfig, SemanticSettings};

/// The chunking strategy applied to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Fixed-length windows with overlap
    Fixed,
    /// Hierarchical separator-based splitting
    Recursive,
    /// Recursive splitting with markdown separators
    Markdown,
    /// Structure-aware JSON batching
    Json,
    /// Remote model splitting
    Semantic,
}

impl Strategy {
    /// All strategies in display order.
    pub const ALL: [Strategy; 5] = [
        Strategy::Fixed,
        Strategy::Recursive,
        Strategy::Markdown,
        Strategy::Json,
        Strategy::Semantic,
    ];

    /// Whether this strategy performs network I/O.
    pub fn is_remote(&self) -> bool {
        matches!(self, Strategy::Semantic)
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" | "fixed_window" | "character" => Ok(Strategy::Fixed),
            "recursive" => Ok(Strategy::Recursive),
            "markdown" | "md" => Ok(Strategy::Markdown),
            "json" | "json_structural" => Ok(Strategy::Json),
            "semantic" | "llm" => Ok(Strategy::Semantic),
            other => Err(format!("unknown strategy: {}", other)),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Fixed => write!(f, "fixed"),
            Strategy::Recursive => write!(f, "recursive"),
            Strategy::Markdown => write!(f, "markdown"),
            Strategy::Json => write!(f, "json"),
            Strategy::Semantic => write!(f, "semantic"),
        }
    }
}

/// Request to chunk a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRequest {
    /// Strategy to apply
    pub strategy: Strategy,

    /// The full document text
    pub text: String,

    /// Explicit settings; each given field takes precedence over `profile`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ChunkingOverrides>,

    /// Name of a preset profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

/// Per-request chunking settings. Omitted fields keep the value from the
/// profile, the strategy default or the service default, in that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_overlap: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub separators: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic: Option<SemanticSettings>,
}

impl ChunkingOverrides {
    /// Apply the given fields on top of `config`.
    pub fn apply(self, mut config: ChunkingConfig) -> ChunkingConfig {
        if let Some(size) = self.chunk_size {
            config.chunk_size = size;
        }
        if let Some(overlap) = self.chunk_overlap {
            config.chunk_overlap = overlap;
        }
        if let Some(separators) = self.separators {
            config.separators = separators;
        }
        if let Some(semantic) = self.semantic {
            config.semantic = semantic;
        }
        config
    }
}

/// Response carrying the produced chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkResponse {
    /// Strategy that produced the chunks
    pub strategy: Strategy,

    /// Chunks in index order
    pub chunks: Vec<Chunk>,

    /// Number of chunks
    pub total_chunks: usize,

    /// Sum of the chunks' estimated token counts
    pub total_tokens: usize,

    /// When the chunks were produced
    pub generated_at: DateTime<Utc>,
}

impl ChunkResponse {
    /// Build a response with aggregate counts.
    pub fn new(strategy: Strategy, chunks: Vec<Chunk>) -> Self {
        let total_tokens = chunks.iter().map(|c| c.token_count).sum();
        Self {
            strategy,
            total_chunks: chunks.len(),
            total_tokens,
            chunks,
            generated_at: Utc::now(),
        }
    }
}
