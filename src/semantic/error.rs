//! Error type for semantic splitting.

use thiserror::Error;

use crate::types::Provider;

/// Failure of a semantic split. Always all-or-nothing: no chunks are
/// produced when any of these is returned.
#[derive(Debug, Error)]
pub enum SemanticError {
    #[error("missing API key for provider {0}")]
    MissingApiKey(Provider),

    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned error status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("provider returned no segments")]
    EmptyResult,
}

impl SemanticError {
    /// Whether the error stems from the caller's settings rather than the provider.
    pub fn is_configuration(&self) -> bool {
        matches!(self, SemanticError::MissingApiKey(_) | SemanticError::InvalidBaseUrl { .. })
    }
}
