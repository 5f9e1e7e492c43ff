use std::sync::Arc;

use crate::config::ServerConfig;
use crate::model::FallbackChain;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub model: Arc<FallbackChain>,
}

impl AppState {
    pub fn new(config: ServerConfig, model: FallbackChain) -> Self {
        Self {
            config: Arc::new(config),
            model: Arc::new(model),
        }
    }
}
