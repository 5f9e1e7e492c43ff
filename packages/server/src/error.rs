use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("No image provided. Upload a file or pass imageUrl.")]
    NoImage,

    #[error("File too large (max {}).", upload_limit(*max_bytes))]
    FileTooLarge { max_bytes: usize },

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("failed to obtain access token: {0}")]
    AccessToken(String),

    #[error("model request failed: {0}")]
    ModelRequest(#[from] reqwest::Error),

    #[error("{backend} predict failed {status}")]
    ModelStatus {
        backend: String,
        status: u16,
        details: serde_json::Value,
    },

    #[error("No content in model response")]
    EmptyModelContent { raw: serde_json::Value },

    #[error("no model backend configured")]
    NoBackend,

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;

const KIB: usize = 1024;
const MIB: usize = 1024 * KIB;

/// Upload limit for messages: whole MB rounded up, or KB below 1 MiB.
fn upload_limit(max_bytes: usize) -> String {
    if max_bytes >= MIB {
        format!("{}MB", max_bytes.div_ceil(MIB))
    } else {
        format!("{}KB", max_bytes.div_ceil(KIB))
    }
}

/// Error body returned to API callers.
#[derive(Debug, Serialize)]
struct ErrorBody {
    ok: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<serde_json::Value>,
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::NoImage
            | ServerError::FileTooLarge { .. }
            | ServerError::Upload(_)
            | ServerError::InvalidImage(_) => StatusCode::BAD_REQUEST,
            ServerError::ModelRequest(_)
            | ServerError::ModelStatus { .. }
            | ServerError::EmptyModelContent { .. } => StatusCode::BAD_GATEWAY,
            ServerError::Config(_)
            | ServerError::AccessToken(_)
            | ServerError::NoBackend
            | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "analyze request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "analyze request rejected");
        }

        let error = self.to_string();
        let (details, raw) = match self {
            ServerError::ModelStatus { details, .. } => (Some(details), None),
            ServerError::EmptyModelContent { raw } => (None, Some(raw)),
            _ => (None, None),
        };

        let body = ErrorBody {
            ok: false,
            error,
            details,
            raw,
        };
        (status, Json(body)).into_response()
    }
}
