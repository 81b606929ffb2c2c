//! HTTP client that asks a remote model to split a document.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::error::SemanticError;
use super::response::{extract_reply, parse_segments};
use super::SemanticSplitter;
use crate::types::{Provider, SemanticSettings};

/// Instructions sent with every split request.
const SYSTEM_PROMPT: &str = "You split documents into semantically coherent chunks. \
Return ONLY a JSON array of strings. Each string must be an exact, verbatim substring \
of the input, the strings must appear in document order, and together they must cover \
the whole document. Do not summarize, rewrite, or add commentary.";

/// Upper bound on reply tokens for providers that require one.
const MAX_OUTPUT_TOKENS: u32 = 8192;

/// Settings checked and filled in with provider defaults.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedSettings {
    pub provider: Provider,
    pub api_key: Option<String>,
    pub base_url: Url,
    pub model: String,
}

/// Validate settings without performing any I/O.
pub(crate) fn resolve(settings: &SemanticSettings) -> Result<ResolvedSettings, SemanticError> {
    let provider = settings.provider;
    let api_key = settings.api_key.clone().filter(|k| !k.trim().is_empty());

    if api_key.is_none() && provider.requires_api_key() {
        return Err(SemanticError::MissingApiKey(provider));
    }

    let raw_url = settings
        .base_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .or_else(|| provider.default_base_url())
        .ok_or_else(|| SemanticError::InvalidBaseUrl {
            url: String::new(),
            reason: format!("provider {} requires a base URL", provider),
        })?;

    let base_url = Url::parse(raw_url.trim()).map_err(|e| SemanticError::InvalidBaseUrl {
        url: raw_url.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(SemanticError::InvalidBaseUrl {
            url: raw_url.to_string(),
            reason: format!("unsupported scheme {}", base_url.scheme()),
        });
    }

    Ok(ResolvedSettings {
        provider,
        api_key,
        base_url,
        model: settings.model_or_default().to_string(),
    })
}

/// Join an API path onto a base URL, tolerating a trailing `/v1` on the base.
fn endpoint(base: &Url, path: &str) -> String {
    let base = base.as_str().trim_end_matches('/');
    match (base.ends_with("/v1"), path.strip_prefix("/v1")) {
        (true, Some(rest)) => format!("{}{}", base, rest),
        _ => format!("{}{}", base, path),
    }
}

/// Semantic splitter backed by a chat-completion style HTTP API.
///
/// Sends exactly one request per call and never retries; retry policy
/// belongs to the caller.
pub struct LlmSemanticSplitter {
    client: Client,
}

impl LlmSemanticSplitter {
    /// Create a splitter whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, SemanticError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    fn build_request(&self, settings: &ResolvedSettings, text: &str) -> RequestBuilder {
        match settings.provider {
            Provider::OpenAi | Provider::Custom => {
                let url = endpoint(&settings.base_url, "/v1/chat/completions");
                let body = json!({
                    "model": settings.model,
                    "temperature": 0,
                    "messages": [
                        { "role": "system", "content": SYSTEM_PROMPT },
                        { "role": "user", "content": text },
                    ],
                });
                let request = self.client.post(url).json(&body);
                match &settings.api_key {
                    Some(key) => request.bearer_auth(key),
                    None => request,
                }
            }
            Provider::Anthropic => {
                let url = endpoint(&settings.base_url, "/v1/messages");
                let body = json!({
                    "model": settings.model,
                    "system": SYSTEM_PROMPT,
                    "max_tokens": MAX_OUTPUT_TOKENS,
                    "temperature": 0,
                    "messages": [{ "role": "user", "content": text }],
                });
                self.client
                    .post(url)
                    .header("x-api-key", settings.api_key.as_deref().unwrap_or_default())
                    .header("anthropic-version", "2023-06-01")
                    .json(&body)
            }
            Provider::Gemini => {
                let url = endpoint(
                    &settings.base_url,
                    &format!("/v1beta/models/{}:generateContent", settings.model),
                );
                let body = json!({
                    "system_instruction": { "parts": [{ "text": SYSTEM_PROMPT }] },
                    "contents": [{ "role": "user", "parts": [{ "text": text }] }],
                    "generationConfig": {
                        "temperature": 0,
                        "maxOutputTokens": MAX_OUTPUT_TOKENS,
                    },
                });
                self.client
                    .post(url)
                    .query(&[("key", settings.api_key.as_deref().unwrap_or_default())])
                    .json(&body)
            }
        }
    }
}

#[async_trait]
impl SemanticSplitter for LlmSemanticSplitter {
    async fn split(&self, text: &str, settings: &SemanticSettings) -> Result<Vec<String>, SemanticError> {
        let resolved = resolve(settings)?;

        info!(
            provider = %resolved.provider,
            model = %resolved.model,
            chars = text.chars().count(),
            "Requesting semantic split"
        );

        let response = self.build_request(&resolved, text).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SemanticError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| SemanticError::MalformedResponse(format!("response body is not JSON: {}", e)))?;

        let reply = extract_reply(resolved.provider, &payload)?;
        let segments = parse_segments(&reply)?;
        debug!(segments = segments.len(), "Semantic split received");

        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::{
        extract::{Path, Query},
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn splitter() -> LlmSemanticSplitter {
        LlmSemanticSplitter::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_resolve_requires_api_key_for_named_providers() {
        let settings = SemanticSettings {
            provider: Provider::Anthropic,
            ..Default::default()
        };
        assert!(matches!(resolve(&settings), Err(SemanticError::MissingApiKey(Provider::Anthropic))));

        let blank = SemanticSettings::new(Provider::OpenAi, "   ");
        assert!(matches!(resolve(&blank), Err(SemanticError::MissingApiKey(_))));
    }

    #[test]
    fn test_resolve_custom_needs_valid_base_url() {
        let settings = SemanticSettings {
            provider: Provider::Custom,
            ..Default::default()
        };
        assert!(matches!(resolve(&settings), Err(SemanticError::InvalidBaseUrl { .. })));

        let bad = settings.clone().with_base_url("not a url");
        assert!(matches!(resolve(&bad), Err(SemanticError::InvalidBaseUrl { .. })));

        let ftp = settings.clone().with_base_url("ftp://models.local");
        assert!(matches!(resolve(&ftp), Err(SemanticError::InvalidBaseUrl { .. })));

        let ok = settings.with_base_url("http://localhost:11434");
        let resolved = resolve(&ok).unwrap();
        assert_eq!(resolved.model, "gpt-4o-mini");
        assert!(resolved.api_key.is_none());
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let resolved = resolve(&SemanticSettings::new(Provider::Gemini, "k")).unwrap();
        assert_eq!(resolved.base_url.as_str(), "https://generativelanguage.googleapis.com/");
        assert_eq!(resolved.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_endpoint_joining() {
        let base = Url::parse("https://api.openai.com").unwrap();
        assert_eq!(endpoint(&base, "/v1/chat/completions"), "https://api.openai.com/v1/chat/completions");

        let versioned = Url::parse("http://localhost:8080/v1/").unwrap();
        assert_eq!(endpoint(&versioned, "/v1/chat/completions"), "http://localhost:8080/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_custom_provider_round_trip() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer local-key");
                assert_eq!(body["model"], "tiny");
                assert_eq!(body["messages"][1]["content"], "Hello there. General Kenobi.");
                Json(json!({
                    "choices": [{
                        "message": { "content": "```json\n[\"Hello there.\", \" General Kenobi.\"]\n```" }
                    }]
                }))
            }),
        );
        let base = serve(router).await;

        let settings = SemanticSettings::new(Provider::Custom, "local-key")
            .with_base_url(base)
            .with_model("tiny");
        let segments = splitter().split("Hello there. General Kenobi.", &settings).await.unwrap();
        assert_eq!(segments, vec!["Hello there.", " General Kenobi."]);
    }

    #[tokio::test]
    async fn test_anthropic_request_shape() {
        let router = Router::new().route(
            "/v1/messages",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                if headers.get("x-api-key").map(|v| v == "secret") != Some(true) {
                    return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
                }
                assert_eq!(body["system"].as_str().map(|s| s.contains("JSON array")), Some(true));
                (StatusCode::OK, Json(json!({"content": [{"type": "text", "text": "[\"one\"]"}]})))
            }),
        );
        let base = serve(router).await;

        let settings = SemanticSettings::new(Provider::Anthropic, "secret").with_base_url(base.clone());
        assert_eq!(splitter().split("one", &settings).await.unwrap(), vec!["one"]);

        let wrong = SemanticSettings::new(Provider::Anthropic, "other").with_base_url(base);
        match splitter().split("one", &wrong).await {
            Err(SemanticError::Upstream { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("bad key"));
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_gemini_key_in_query() {
        let router = Router::new().route(
            "/v1beta/models/:target",
            post(|Path(target): Path<String>, Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(target, "gemini-1.5-flash:generateContent");
                assert_eq!(q.get("key").map(String::as_str), Some("g-key"));
                Json(json!({"candidates": [{"content": {"parts": [{"text": "[\"seg\"]"}]}}]}))
            }),
        );
        let base = serve(router).await;

        let settings = SemanticSettings::new(Provider::Gemini, "g-key").with_base_url(base);
        assert_eq!(splitter().split("seg", &settings).await.unwrap(), vec!["seg"]);
    }

    #[tokio::test]
    async fn test_non_json_reply_is_malformed() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                Json(json!({"choices": [{"message": {"content": "I could not split this."}}]}))
            }),
        );
        let base = serve(router).await;

        let settings = SemanticSettings::new(Provider::OpenAi, "k").with_base_url(base);
        let err = splitter().split("text", &settings).await.unwrap_err();
        assert!(matches!(err, SemanticError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_http_error() {
        // Bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let settings = SemanticSettings::new(Provider::OpenAi, "k").with_base_url(format!("http://{}", addr));
        let err = splitter().split("text", &settings).await.unwrap_err();
        assert!(matches!(err, SemanticError::Http(_)));
    }
}
