mod chat;
mod client;
mod envelope;
mod fallback;
mod mock;
mod prompt;
mod token;
mod vertex;

use std::sync::Arc;

use tracing::info;

use crate::config::ServerConfig;
use crate::error::Result;

pub use chat::ChatCompletionsClient;
pub use client::{ModelClient, ModelRequest, ModelResponse};
pub use envelope::{extract_content, extract_usage, parse_or_raw};
pub use fallback::FallbackChain;
pub use mock::MockModelClient;
pub use prompt::{build_messages, system_prompt, user_prompt};
pub use token::{TokenSource, METADATA_TOKEN_URL};
pub use vertex::{build_payload, VertexClient};

/// Build the backend chain from configuration: Vertex first when enabled,
/// then the alternate API when configured. With neither, the mock answers.
pub fn build_model_chain(config: &ServerConfig) -> Result<FallbackChain> {
    let mut clients: Vec<Arc<dyn ModelClient>> = Vec::new();

    if config.use_vertex {
        clients.push(Arc::new(VertexClient::new(
            &config.vertex,
            config.timeout_secs,
        )?));
    }

    if let Some(alternate) = &config.alternate {
        clients.push(Arc::new(ChatCompletionsClient::new(
            alternate,
            config.timeout_secs,
        )?));
    }

    if clients.is_empty() {
        info!("no model backend configured, using mock analysis");
        clients.push(Arc::new(MockModelClient::new()));
    }

    Ok(FallbackChain::new(clients))
}
