//! Locating the model's text inside backend response envelopes.
//!
//! Prediction endpoints wrap the answer differently depending on the serving
//! container: chat-completions style `choices`, a bare `content`/`text`
//! field, Hugging Face style `generated_text`, and so on.

use serde_json::{json, Value};

/// JSON pointers tried, in order, on each prediction.
const CONTENT_POINTERS: &[&str] = &[
    "/choices/0/message/content",
    "/choices/0/text",
    "/candidates/0/content/parts",
    "/content",
    "/text",
    "/generated_text",
];

/// Parse a response body, keeping unparseable bodies as `{"_raw": text}`.
pub fn parse_or_raw(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "_raw": text }))
}

/// The model's text, or `None` when the envelope carries no non-blank content.
pub fn extract_content(envelope: &Value) -> Option<String> {
    let prediction = envelope.get("predictions").unwrap_or(envelope);
    let prediction = match prediction {
        Value::Array(items) => items.first()?,
        other => other,
    };

    CONTENT_POINTERS
        .iter()
        .filter_map(|pointer| prediction.pointer(pointer))
        .find_map(text_of)
        .or_else(|| text_of(prediction))
}

/// Usage block from `predictions.usage` or a top-level `usage`.
pub fn extract_usage(envelope: &Value) -> Option<Value> {
    envelope
        .pointer("/predictions/usage")
        .or_else(|| envelope.pointer("/predictions/0/usage"))
        .or_else(|| envelope.get("usage"))
        .filter(|usage| !usage.is_null())
        .cloned()
}

/// A string, or an array of strings / `{"text": …}` parts joined together.
fn text_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| match part {
                Value::String(s) => Some(s.as_str()),
                other => other.get("text").and_then(Value::as_str),
            })
            .collect::<Vec<_>>()
            .join(""),
        _ => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}
