//! Semantic (meaning-based) splitting through a remote model.
//!
//! The engine itself does no splitting here: a [`SemanticSplitter`] returns
//! ordered verbatim substrings of the document and [`chunk_semantic`] wraps
//! them into chunks. Any failure aborts the whole call.

mod error;
mod llm_client;
mod response;

use async_trait::async_trait;
use tracing::warn;

pub use error::SemanticError;
pub use llm_client::LlmSemanticSplitter;

use crate::types::{Chunk, ChunkingConfig, SemanticSettings};

/// A collaborator that splits a document by meaning.
#[async_trait]
pub trait SemanticSplitter: Send + Sync {
    /// Split `text` into ordered verbatim substrings.
    async fn split(&self, text: &str, settings: &SemanticSettings) -> Result<Vec<String>, SemanticError>;
}

/// Chunk `text` with a semantic splitter.
///
/// Settings are validated before the splitter is called. Blank segments are
/// discarded; if none remain the call fails with [`SemanticError::EmptyResult`].
/// Empty input yields no chunks without contacting the provider.
pub async fn chunk_semantic(
    text: &str,
    config: &ChunkingConfig,
    splitter: &dyn SemanticSplitter,
) -> Result<Vec<Chunk>, SemanticError> {
    if text.trim().is_empty() {
        return Ok(vec![]);
    }

    llm_client::resolve(&config.semantic)?;

    let segments: Vec<String> = splitter
        .split(text, &config.semantic)
        .await?
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect();

    if segments.is_empty() {
        return Err(SemanticError::EmptyResult);
    }

    let rewritten = segments.iter().filter(|s| !text.contains(s.as_str())).count();
    if rewritten > 0 {
        warn!(rewritten, total = segments.len(), "Semantic segments are not verbatim substrings of the input");
    }

    Ok(Chunk::sequence("semantic", segments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::types::Provider;

    struct FixedSplitter {
        segments: Vec<String>,
        calls: Arc<AtomicUsize>,
    }

    impl FixedSplitter {
        fn new(segments: &[&str]) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let splitter = Self {
                segments: segments.iter().map(|s| s.to_string()).collect(),
                calls: calls.clone(),
            };
            (splitter, calls)
        }
    }

    #[async_trait]
    impl SemanticSplitter for FixedSplitter {
        async fn split(&self, _text: &str, _settings: &SemanticSettings) -> Result<Vec<String>, SemanticError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.segments.clone())
        }
    }

    struct FailingSplitter;

    #[async_trait]
    impl SemanticSplitter for FailingSplitter {
        async fn split(&self, _text: &str, _settings: &SemanticSettings) -> Result<Vec<String>, SemanticError> {
            Err(SemanticError::Upstream {
                status: 503,
                body: "overloaded".to_string(),
            })
        }
    }

    fn config() -> ChunkingConfig {
        ChunkingConfig::default().with_semantic(SemanticSettings::new(Provider::OpenAi, "test-key"))
    }

    #[tokio::test]
    async fn test_wraps_segments_into_chunks() {
        let text = "Cats purr. Dogs bark loudly.";
        let (splitter, calls) = FixedSplitter::new(&["Cats purr.", " Dogs bark loudly."]);

        let chunks = chunk_semantic(text, &config(), &splitter).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].index, 1);
        assert_eq!(chunks[1].content, " Dogs bark loudly.");
        assert_eq!(chunks[1].length, 18);
        assert_eq!(chunks[1].token_count, 5);
        assert!(chunks[0].id.starts_with("semantic-"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_calling_provider() {
        let (splitter, calls) = FixedSplitter::new(&["x"]);
        let config = ChunkingConfig::default();

        let err = chunk_semantic("some text", &config, &splitter).await.unwrap_err();
        assert!(matches!(err, SemanticError::MissingApiKey(Provider::OpenAi)));
        assert!(err.is_configuration());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_segments_are_empty_result() {
        let (splitter, _) = FixedSplitter::new(&["", "   "]);
        let err = chunk_semantic("some text", &config(), &splitter).await.unwrap_err();
        assert!(matches!(err, SemanticError::EmptyResult));
    }

    #[tokio::test]
    async fn test_provider_failure_is_surfaced() {
        let err = chunk_semantic("some text", &config(), &FailingSplitter).await.unwrap_err();
        assert_eq!(err.to_string(), "provider returned error status 503: overloaded");
        assert!(!err.is_configuration());
    }

    #[tokio::test]
    async fn test_empty_input_skips_provider() {
        let (splitter, calls) = FixedSplitter::new(&["x"]);
        let chunks = chunk_semantic("  \n", &config(), &splitter).await.unwrap();
        assert!(chunks.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
