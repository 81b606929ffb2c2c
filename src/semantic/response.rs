//! Parsing of provider replies into segments.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::error::SemanticError;
use crate::types::Provider;

lazy_static! {
    static ref CODE_FENCE: Regex = Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$").unwrap();
}

/// Pull the model's reply text out of a provider response body.
pub(crate) fn extract_reply(provider: Provider, payload: &Value) -> Result<String, SemanticError> {
    let (reply, path) = match provider {
        Provider::OpenAi | Provider::Custom => (
            payload["choices"][0]["message"]["content"].as_str(),
            "choices[0].message.content",
        ),
        Provider::Anthropic => (payload["content"][0]["text"].as_str(), "content[0].text"),
        Provider::Gemini => (
            payload["candidates"][0]["content"]["parts"][0]["text"].as_str(),
            "candidates[0].content.parts[0].text",
        ),
    };

    reply
        .map(String::from)
        .ok_or_else(|| SemanticError::MalformedResponse(format!("missing {}", path)))
}

/// Parse a reply holding a JSON array of strings, optionally fenced.
pub(crate) fn parse_segments(reply: &str) -> Result<Vec<String>, SemanticError> {
    let body = CODE_FENCE
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or_else(|| reply.trim());

    let value: Value = serde_json::from_str(body)
        .map_err(|e| SemanticError::MalformedResponse(format!("reply is not JSON: {}", e)))?;

    let Value::Array(items) = value else {
        return Err(SemanticError::MalformedResponse(
            "expected a JSON array of strings".to_string(),
        ));
    };

    let segments = items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(SemanticError::MalformedResponse(format!(
                "expected string segment, found {}",
                other
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if segments.iter().all(|s| s.trim().is_empty()) {
        return Err(SemanticError::EmptyResult);
    }

    Ok(segments)
}
