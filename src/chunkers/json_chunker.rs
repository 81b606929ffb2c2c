//! Structure-aware JSON chunker.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::base::{char_len, Chunker};
use super::recursive_chunker::RecursiveChunker;
use crate::types::{Chunk, ChunkingConfig};

/// Characters reserved for the enclosing `[]` or `{}` of a batch.
const BASE_OVERHEAD: usize = 2;

/// Characters reserved per entry for the separating comma and newline.
const ENTRY_OVERHEAD: usize = 2;

/// Indentation added to every line of an entry nested one level down.
const NESTED_INDENT: usize = 2;

/// JSON chunker that keeps array elements and object entries intact.
///
/// Oversized documents are cut into batches of whole elements (or whole
/// key/value pairs), each re-serialized with two-space indentation. Only a
/// scalar that cannot fit on its own is handed to the recursive text
/// splitter. Input that does not parse as JSON is split as plain text.
pub struct JsonChunker {
    fallback: RecursiveChunker,
}

/// The shape of a parsed value, as far as batching is concerned.
enum Shape {
    Array(Vec<Value>),
    Object(Map<String, Value>),
    Scalar(Value),
}

impl From<Value> for Shape {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Shape::Array(items),
            Value::Object(map) => Shape::Object(map),
            scalar => Shape::Scalar(scalar),
        }
    }
}

impl JsonChunker {
    /// Create a new JSON chunker.
    pub fn new() -> Self {
        Self {
            fallback: RecursiveChunker::new(),
        }
    }

    /// Split `text` into JSON fragments, or plain-text chunks if it is not JSON.
    fn split_text(&self, text: &str, config: &ChunkingConfig) -> Vec<String> {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Input is not valid JSON, falling back to recursive splitting");
                return self.fallback.split_text(text, config);
            }
        };

        let mut out = Vec::new();
        self.split_value(value, config, &mut out);
        out
    }

    fn split_value(&self, value: Value, config: &ChunkingConfig, out: &mut Vec<String>) {
        let rendered = pretty(&value);
        if char_len(&rendered) <= config.chunk_size || is_empty_container(&value) {
            out.push(rendered);
            return;
        }

        match Shape::from(value) {
            Shape::Array(items) => self.batch_array(items, config, out),
            Shape::Object(map) => self.batch_object(map, config, out),
            Shape::Scalar(scalar) => self.split_scalar(&scalar, config, out),
        }
    }

    fn batch_array(&self, items: Vec<Value>, config: &ChunkingConfig, out: &mut Vec<String>) {
        debug!(items = items.len(), size = config.chunk_size, "Batching JSON array");

        let mut batch: Vec<Value> = Vec::new();
        let mut batch_size = BASE_OVERHEAD;

        for item in items {
            let item_size = nested_size(&item) + ENTRY_OVERHEAD;

            if batch_size + item_size > config.chunk_size && !batch.is_empty() {
                self.flush_array(std::mem::take(&mut batch), config, out);
                batch_size = BASE_OVERHEAD;
            }

            batch.push(item);
            batch_size += item_size;
        }

        if !batch.is_empty() {
            self.flush_array(batch, config, out);
        }
    }

    fn flush_array(&self, batch: Vec<Value>, config: &ChunkingConfig, out: &mut Vec<String>) {
        let oversized_scalar = matches!(batch.as_slice(), [only] if is_scalar(only))
            && char_len(&pretty(&Value::Array(batch.clone()))) > config.chunk_size;

        if oversized_scalar {
            self.split_scalar(&batch[0], config, out);
        } else {
            out.push(pretty(&Value::Array(batch)));
        }
    }

    fn batch_object(&self, map: Map<String, Value>, config: &ChunkingConfig, out: &mut Vec<String>) {
        debug!(entries = map.len(), size = config.chunk_size, "Batching JSON object");

        let mut batch = Map::new();
        let mut batch_size = BASE_OVERHEAD;

        for (key, value) in map {
            // `"key": ` followed by the value
            let key_size = char_len(&Value::String(key.clone()).to_string()) + 2;
            let entry_size = key_size + nested_size(&value) + ENTRY_OVERHEAD;

            if batch_size + entry_size > config.chunk_size && !batch.is_empty() {
                self.flush_object(std::mem::take(&mut batch), config, out);
                batch_size = BASE_OVERHEAD;
            }

            batch.insert(key, value);
            batch_size += entry_size;
        }

        if !batch.is_empty() {
            self.flush_object(batch, config, out);
        }
    }

    fn flush_object(&self, batch: Map<String, Value>, config: &ChunkingConfig, out: &mut Vec<String>) {
        let oversized_scalar = batch.len() == 1
            && batch.values().all(is_scalar)
            && char_len(&pretty(&Value::Object(batch.clone()))) > config.chunk_size;

        if !oversized_scalar {
            out.push(pretty(&Value::Object(batch)));
        } else if let Some((key, value)) = batch.iter().next() {
            // The text chunks carry the value only.
            debug!(key = %key, "Dropping key of oversized object value split as text");
            self.split_scalar(value, config, out);
        }
    }

    /// Split an oversized scalar's text with the recursive chunker.
    fn split_scalar(&self, scalar: &Value, config: &ChunkingConfig, out: &mut Vec<String>) {
        let text = match scalar {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        debug!(length = char_len(&text), "Splitting oversized JSON scalar as text");
        out.extend(self.fallback.split_text(&text, config));
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Rendered length of `value` once indented one level inside a batch.
fn nested_size(value: &Value) -> usize {
    let rendered = pretty(value);
    char_len(&rendered) + NESTED_INDENT * rendered.lines().count()
}

/// Serialize with stable two-space indentation.
fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

impl Default for JsonChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for JsonChunker {
    fn name(&self) -> &'static str {
        "json"
    }

    fn description(&self) -> &'static str {
        "Batches JSON array elements and object entries under a serialized size budget"
    }

    fn chunk(&self, text: &str, config: &ChunkingConfig) -> Vec<Chunk> {
        Chunk::sequence(self.name(), self.split_text(text, config))
    }
}
