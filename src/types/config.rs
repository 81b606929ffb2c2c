//! Configuration types for chunking.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_PORT, DEFAULT_SEMANTIC_TIMEOUT_SECS};

/// Separators used by the recursive strategy when none are configured.
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

/// Separators for markdown, largest structural unit first.
pub const MARKDOWN_SEPARATORS: &[&str] = &[
    "\n# ",      // Level-1 headings
    "\n## ",     // Level-2 headings
    "\n### ",    // Level-3 headings
    "\n#### ",
    "\n##### ",
    "\n###### ",
    "\n- ",      // List items
    "\n\n",      // Paragraphs
    "\n",        // Lines
    " ",         // Words
    "",
];

/// Configuration for a single chunking invocation.
///
/// Created fresh per call; the engine keeps no state between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk (serialized characters for JSON).
    /// Zero is the degenerate size.
    pub chunk_size: usize,

    /// Trailing characters repeated at the start of the next chunk
    pub chunk_overlap: usize,

    /// Separators for recursive splitting, highest priority first
    pub separators: Vec<String>,

    /// Settings consumed only by the semantic strategy
    pub semantic: SemanticSettings,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            semantic: SemanticSettings::default(),
        }
    }
}

impl ChunkingConfig {
    /// Create a config with the given chunk size and no overlap.
    pub fn with_size(size: usize) -> Self {
        Self {
            chunk_size: size,
            chunk_overlap: 0,
            ..Default::default()
        }
    }

    /// Create a config carrying the markdown separator ordering.
    pub fn for_markdown(size: usize) -> Self {
        Self::with_size(size).with_separators(MARKDOWN_SEPARATORS)
    }

    /// Set the overlap.
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.chunk_overlap = overlap;
        self
    }

    /// Replace the separator list.
    pub fn with_separators<S: AsRef<str>>(mut self, separators: &[S]) -> Self {
        self.separators = separators.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    /// Set the semantic provider settings.
    pub fn with_semantic(mut self, semantic: SemanticSettings) -> Self {
        self.semantic = semantic;
        self
    }

    /// Overlap clamped strictly below `chunk_size`, so every step advances.
    pub fn effective_overlap(&self) -> usize {
        self.chunk_overlap.min(self.chunk_size.saturating_sub(1))
    }
}

/// Remote model provider used for semantic splitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    #[default]
    OpenAi,
    Anthropic,
    Gemini,
    /// Any OpenAI-compatible endpoint; requires an explicit base URL
    Custom,
}

impl Provider {
    /// Base URL used when the settings do not carry one.
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("https://api.openai.com"),
            Provider::Anthropic => Some("https://api.anthropic.com"),
            Provider::Gemini => Some("https://generativelanguage.googleapis.com"),
            Provider::Custom => None,
        }
    }

    /// Model used when the settings do not name one.
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi | Provider::Custom => "gpt-4o-mini",
            Provider::Anthropic => "claude-3-5-haiku-latest",
            Provider::Gemini => "gemini-1.5-flash",
        }
    }

    /// Whether an API key is mandatory for this provider.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Provider::Custom)
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "open_ai" => Ok(Provider::OpenAi),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            "gemini" | "google" => Ok(Provider::Gemini),
            "custom" => Ok(Provider::Custom),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenAi => write!(f, "openai"),
            Provider::Anthropic => write!(f, "anthropic"),
            Provider::Gemini => write!(f, "gemini"),
            Provider::Custom => write!(f, "custom"),
        }
    }
}

/// Provider settings for the semantic strategy. Opaque to the core chunkers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticSettings {
    pub provider: Provider,

    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl SemanticSettings {
    /// Settings for a provider with an API key.
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// The configured model or the provider default.
    pub fn model_or_default(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_model())
    }
}

/// Global service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Port the HTTP server listens on
    pub port: u16,

    /// Default chunk size in characters
    pub default_chunk_size: usize,

    /// Default chunk overlap in characters
    pub default_chunk_overlap: usize,

    /// Semantic settings applied when a request carries none
    pub semantic: SemanticSettings,

    /// Timeout for one semantic provider request
    pub semantic_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            default_chunk_size: DEFAULT_CHUNK_SIZE,
            default_chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            semantic: SemanticSettings::default(),
            semantic_timeout_secs: DEFAULT_SEMANTIC_TIMEOUT_SECS,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            default_chunk_size: std::env::var("CHUNK_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CHUNK_SIZE),
            default_chunk_overlap: std::env::var("CHUNK_OVERLAP")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CHUNK_OVERLAP),
            semantic: SemanticSettings {
                provider: std::env::var("SEMANTIC_PROVIDER")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_default(),
                api_key: std::env::var("SEMANTIC_API_KEY").ok(),
                base_url: std::env::var("SEMANTIC_BASE_URL").ok(),
                model: std::env::var("SEMANTIC_MODEL").ok(),
            },
            semantic_timeout_secs: std::env::var("SEMANTIC_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SEMANTIC_TIMEOUT_SECS),
        }
    }

    /// Per-call config seeded from the service defaults.
    pub fn chunking_config(&self) -> ChunkingConfig {
        ChunkingConfig {
            chunk_size: self.default_chunk_size,
            chunk_overlap: self.default_chunk_overlap,
            semantic: self.semantic.clone(),
            ..Default::default()
        }
    }
}

/// A named chunking profile with preset configurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingProfile {
    /// Profile name
    pub name: String,

    /// Profile description
    pub description: String,

    /// Chunk size for this profile
    pub chunk_size: usize,

    /// Chunk overlap for this profile
    pub chunk_overlap: usize,

    /// Separators for this profile
    pub separators: Vec<String>,
}

impl ChunkingProfile {
    /// Create default profiles.
    pub fn defaults() -> Vec<Self> {
        let text_separators: Vec<String> = DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect();
        vec![
            Self {
                name: "default".to_string(),
                description: "Default balanced profile for general use".to_string(),
                chunk_size: 1000,
                chunk_overlap: 200,
                separators: text_separators.clone(),
            },
            Self {
                name: "small".to_string(),
                description: "Smaller chunks for fine-grained retrieval".to_string(),
                chunk_size: 500,
                chunk_overlap: 50,
                separators: text_separators.clone(),
            },
            Self {
                name: "large".to_string(),
                description: "Larger chunks for more context".to_string(),
                chunk_size: 2000,
                chunk_overlap: 200,
                separators: text_separators,
            },
            Self {
                name: "markdown".to_string(),
                description: "Heading-first separators for markdown documents".to_string(),
                chunk_size: 1000,
                chunk_overlap: 100,
                separators: MARKDOWN_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            },
        ]
    }

    /// Look up a default profile by name.
    pub fn find(name: &str) -> Option<Self> {
        Self::defaults().into_iter().find(|p| p.name == name)
    }

    /// Build a per-call config from this profile.
    pub fn to_config(&self) -> ChunkingConfig {
        ChunkingConfig {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            separators: self.separators.clone(),
            ..Default::default()
        }
    }
}
