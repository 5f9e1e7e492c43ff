//! Tolerant normalization of raw model output.
//!
//! The pipeline runs four stages, each with its own fallback:
//!
//! 1. take the inner text of the first fenced block, if any
//! 2. if that is not valid JSON, slice from the first `{` to the last `}`
//! 3. parse; anything that is not a JSON object becomes an empty object
//! 4. map alias keys onto the canonical fields and coerce their types
//!
//! None of the stages can fail, so [`normalize`] is total.

use serde_json::{Map, Value};
use tracing::debug;

use crate::risk::RiskLevel;
use crate::types::NormalizedResult;

const FENCE: &str = "```";
const JSON_TAG: &str = "json";

// Alias order is significant: models sometimes emit several of these at once
// and the first present key wins.
const CONDITION_KEYS: &[&str] = &["condition", "diagnosis", "prediction"];
const EXPLANATION_KEYS: &[&str] = &["explanation", "summary", "description"];
const CAUSES_KEYS: &[&str] = &["causes[]", "causes", "possible_causes"];
const STEPS_KEYS: &[&str] = &["steps[]", "steps", "recommendations", "next_steps"];
const DOCTOR_KEYS: &[&str] = &["doctor", "specialist", "referral"];
const RISK_KEY: &str = "risk";

/// Normalize raw model output into a [`NormalizedResult`].
///
/// Never fails: text without recoverable JSON yields a result with empty
/// strings, empty lists and no doctor guidance.
pub fn normalize(raw: &str) -> NormalizedResult {
    let candidate = extract_fenced_block(raw).unwrap_or(raw);
    let object = parse_object(candidate).unwrap_or_else(|| {
        debug!(len = raw.len(), "no JSON object in model output");
        Map::new()
    });
    normalize_object(&object)
}

/// Normalize output that may not be valid UTF-8. Invalid sequences are
/// replaced before normalizing.
pub fn normalize_bytes(raw: &[u8]) -> NormalizedResult {
    normalize(&String::from_utf8_lossy(raw))
}

/// Inner text of the first ```` ``` ```` fenced block, with an optional
/// `json` tag (any case) removed.
///
/// Returns `None` when there is no terminated fence or the block is blank.
pub fn extract_fenced_block(text: &str) -> Option<&str> {
    let open = text.find(FENCE)?;
    let after = &text[open + FENCE.len()..];
    let body = match after.get(..JSON_TAG.len()) {
        Some(tag) if tag.eq_ignore_ascii_case(JSON_TAG) => &after[JSON_TAG.len()..],
        _ => after,
    };
    let close = body.find(FENCE)?;
    let inner = body[..close].trim();
    (!inner.is_empty()).then_some(inner)
}

/// Slice from the first `{` to the last `}` inclusive.
pub fn extract_brace_region(text: &str) -> Option<&str> {
    let first = text.find('{')?;
    let last = text.rfind('}')?;
    (first < last).then(|| &text[first..=last])
}

/// Parse `candidate` as a JSON object, retrying on its brace region when the
/// whole text is not valid JSON.
fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    let value = serde_json::from_str::<Value>(candidate.trim())
        .ok()
        .or_else(|| {
            let region = extract_brace_region(candidate)?;
            serde_json::from_str::<Value>(region).ok()
        })?;

    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Map alias keys onto the canonical fields.
pub fn normalize_object(object: &Map<String, Value>) -> NormalizedResult {
    let doctor = lookup(object, DOCTOR_KEYS)
        .map(stringify)
        .filter(|s| !s.is_empty());

    let risk = object
        .get(RISK_KEY)
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<RiskLevel>().ok());

    NormalizedResult {
        condition: lookup(object, CONDITION_KEYS)
            .map(stringify)
            .unwrap_or_default(),
        explanation: lookup(object, EXPLANATION_KEYS)
            .map(stringify)
            .unwrap_or_default(),
        causes: to_list(lookup(object, CAUSES_KEYS)),
        steps: to_list(lookup(object, STEPS_KEYS)),
        doctor,
        risk,
    }
}

/// First alias whose value is present.
fn lookup<'a>(object: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| object.get(*key))
        .find(|value| is_present(value))
}

/// `null`, `false`, zero, blank strings and empty arrays count as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => value.to_string(),
        Value::Array(items) => items
            .iter()
            .map(stringify)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn to_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().map(stringify).collect(),
        Some(scalar) => {
            let s = stringify(scalar);
            if s.is_empty() {
                Vec::new()
            } else {
                vec![s]
            }
        }
        None => Vec::new(),
    }
}
