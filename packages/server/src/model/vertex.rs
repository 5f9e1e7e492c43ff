use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::VertexConfig;
use crate::error::{Result, ServerError};
use crate::model::client::{ModelClient, ModelRequest, ModelResponse};
use crate::model::envelope::{extract_content, extract_usage, parse_or_raw};
use crate::model::prompt::build_messages;
use crate::model::token::TokenSource;

/// Label reported to callers for answers from the dedicated endpoint.
const SOURCE: &str = "medgemma";

/// Client for a dedicated Vertex AI endpoint serving a chat-completions
/// container.
pub struct VertexClient {
    http: reqwest::Client,
    predict_url: String,
    token: TokenSource,
}

impl VertexClient {
    pub fn new(config: &VertexConfig, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(ServerError::ModelRequest)?;

        Ok(Self {
            http,
            predict_url: config.predict_url(),
            token: TokenSource::from_config(config),
        })
    }

    pub fn with_token_source(mut self, token: TokenSource) -> Self {
        self.token = token;
        self
    }
}

/// `{instances: [...]}` body expected by the serving container.
pub fn build_payload(request: &ModelRequest) -> Value {
    json!({
        "instances": [
            {
                "@requestFormat": "chatCompletions",
                "messages": build_messages(request),
                "max_tokens": request.max_tokens,
            }
        ]
    })
}

#[async_trait]
impl ModelClient for VertexClient {
    fn name(&self) -> &str {
        "vertex"
    }

    async fn analyze(&self, request: &ModelRequest) -> Result<ModelResponse> {
        let token = self.token.access_token(&self.http).await?;
        debug!(token_source = self.token.kind(), url = %self.predict_url, "calling Vertex predict");

        let resp = self
            .http
            .post(&self.predict_url)
            .bearer_auth(token)
            .json(&build_payload(request))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        let envelope = parse_or_raw(&text);

        if !status.is_success() {
            return Err(ServerError::ModelStatus {
                backend: "Vertex".into(),
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
            source: SOURCE.to_string(),
        })
    }
}
