use async_trait::async_trait;

use crate::error::Result;
use crate::model::client::{ModelClient, ModelRequest, ModelResponse};

const MOCK_ANALYSIS: &str = include_str!("../../prompts/mock_analysis.json");

/// Local stand-in used when no real backend is configured, so the UI can be
/// exercised without cloud credentials.
#[derive(Debug, Clone)]
pub struct MockModelClient {
    content: String,
}

impl MockModelClient {
    pub fn new() -> Self {
        Self {
            content: MOCK_ANALYSIS.to_string(),
        }
    }

    /// Answer every request with `content` instead of the canned analysis.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl Default for MockModelClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn analyze(&self, _request: &ModelRequest) -> Result<ModelResponse> {
        Ok(ModelResponse {
            content: self.content.clone(),
            usage: None,
            source: "mock".to_string(),
        })
    }
}
