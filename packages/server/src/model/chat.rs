use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::AlternateConfig;
use crate::error::{Result, ServerError};
use crate::model::client::{ModelClient, ModelRequest, ModelResponse};
use crate::model::envelope::{extract_content, extract_usage, parse_or_raw};
use crate::model::prompt::build_messages;

/// Client for an OpenAI-compatible chat-completions API.
///
/// NOTE: Do NOT derive `Debug` on this struct: `api_key` would be exposed.
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Value,
    max_tokens: u32,
}

impl ChatCompletionsClient {
    pub fn new(config: &AlternateConfig, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(ServerError::ModelRequest)?;

        Ok(Self {
            http,
            url: format!("{}/v1/chat/completions", config.api_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl ModelClient for ChatCompletionsClient {
    fn name(&self) -> &str {
        "alternate"
    }

    async fn analyze(&self, request: &ModelRequest) -> Result<ModelResponse> {
        let body = ChatRequest {
            model: &self.model,
            messages: build_messages(request),
            max_tokens: request.max_tokens,
        };

        let mut builder = self.http.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        let envelope = parse_or_raw(&text);

        if !status.is_success() {
            return Err(ServerError::ModelStatus {
                backend: "Alternate model".into(),
                status: status.as_u16(),
                details: envelope,
            });
        }

        let Some(content) = extract_content(&envelope) else {
            return Err(ServerError::EmptyModelContent { raw: envelope });
        };

        Ok(ModelResponse {
            content,
            usage: extract_usage(&envelope),
            source: self.model.clone(),
        })
    }
}
