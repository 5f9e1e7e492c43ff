use async_trait::async_trait;

use crate::error::Result;

/// Request to a model backend.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub prompt: String,
    /// `data:` URL of a prepared upload, or a remote image URL.
    pub image_url: String,
    pub max_tokens: u32,
}

/// Raw answer from a model backend, before normalization.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub content: String,
    /// Token usage block as reported by the backend, if any.
    pub usage: Option<serde_json::Value>,
    /// Label reported to API callers as `source`.
    pub source: String,
}

/// Trait for model backends, enabling mocking in tests.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Short backend name used in logs and `/status`.
    fn name(&self) -> &str;

    async fn analyze(&self, request: &ModelRequest) -> Result<ModelResponse>;
}
