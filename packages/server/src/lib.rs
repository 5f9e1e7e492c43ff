//! SkinSight server - upload a skin photo, ask a multimodal model, return a
//! normalized analysis.
//!
//! # Architecture
//!
//! - [`config`]: environment configuration
//! - [`error`]: error type and its HTTP mapping
//! - [`handlers`]: `/health`, `/status` and `/analyze`
//! - [`model`]: model backends (Vertex AI, chat-completions, mock) and
//!   sequential fallback between them
//! - [`upload`]: image downscaling and `data:` URL encoding
//!
//! Model text is turned into a result with [`skinsight_analysis::normalize`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{AlternateConfig, ServerConfig, VertexConfig};
pub use error::{Result, ServerError};
pub use state::AppState;

/// Room for multipart boundaries and text fields on top of the file itself.
const BODY_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn app(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(BODY_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/status", get(handlers::status))
        .route("/analyze", post(handlers::analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
