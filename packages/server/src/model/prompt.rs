use serde_json::{json, Value};

use crate::model::client::ModelRequest;

const SYSTEM_ANALYSIS: &str = include_str!("../../prompts/system_analysis.txt");
const DEFAULT_USER_PROMPT: &str = include_str!("../../prompts/default_user.txt");

/// System prompt asking for the canonical JSON shape.
pub fn system_prompt() -> &'static str {
    SYSTEM_ANALYSIS
}

/// The caller's prompt, or the default educational prompt when blank.
pub fn user_prompt(prompt: Option<&str>) -> String {
    match prompt.map(str::trim) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => DEFAULT_USER_PROMPT.to_string(),
    }
}

/// Chat-completions message list: the system prompt, then the user's text
/// with the image attached as an `image_url` part.
pub fn build_messages(request: &ModelRequest) -> Value {
    json!([
        {
            "role": "system",
            "content": [
                { "type": "text", "text": system_prompt() }
            ]
        },
        {
            "role": "user",
            "content": [
                { "type": "text", "text": request.prompt },
                { "type": "image_url", "image_url": { "url": request.image_url } }
            ]
        }
    ])
}
