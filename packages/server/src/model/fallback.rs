use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{Result, ServerError};
use crate::model::client::{ModelClient, ModelRequest, ModelResponse};

/// Ordered list of backends with naive sequential fallback.
///
/// Each backend is tried once; the first success wins. There are no retries
/// and no backoff between attempts.
#[derive(Clone)]
pub struct FallbackChain {
    clients: Vec<Arc<dyn ModelClient>>,
}

impl FallbackChain {
    pub fn new(clients: Vec<Arc<dyn ModelClient>>) -> Self {
        Self { clients }
    }

    pub fn single(client: impl ModelClient + 'static) -> Self {
        Self::new(vec![Arc::new(client)])
    }

    /// Backend names in the order they are tried.
    pub fn names(&self) -> Vec<&str> {
        self.clients.iter().map(|c| c.name()).collect()
    }
}

#[async_trait]
impl ModelClient for FallbackChain {
    fn name(&self) -> &str {
        self.clients.first().map(|c| c.name()).unwrap_or("none")
    }

    async fn analyze(&self, request: &ModelRequest) -> Result<ModelResponse> {
        let mut last_error: Option<ServerError> = None;

        for (position, client) in self.clients.iter().enumerate() {
            match client.analyze(request).await {
                Ok(response) => {
                    if position > 0 {
                        info!(backend = client.name(), position, "fallback backend answered");
                    }
                    return Ok(response);
                }
                Err(e) => {
                    warn!(backend = client.name(), error = %e, "model backend failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(ServerError::NoBackend))
    }
}
