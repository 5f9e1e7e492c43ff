use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequest, Multipart, Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use skinsight_analysis::{normalize, NormalizedResult};
use tracing::{info, warn};

use crate::error::{Result, ServerError};
use crate::model::{user_prompt, ModelClient, ModelRequest};
use crate::state::AppState;
use crate::upload::prepare_image_blocking;

/// Text parameters accepted from the body or query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeParams {
    pub prompt: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub result: NormalizedResult,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub mode: String,
    pub project: String,
    pub location: String,
    pub endpoint_id: String,
    pub project_number: String,
    pub gac: &'static str,
    pub fallback: Vec<String>,
}

#[derive(Default)]
struct Upload {
    params: AnalyzeParams,
    file: Option<Bytes>,
}

fn or_unset(value: &str) -> String {
    if value.is_empty() {
        "(unset)".to_string()
    } else {
        value.to_string()
    }
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let vertex = &state.config.vertex;
    let names = state.model.names();

    Json(StatusResponse {
        mode: names.first().copied().unwrap_or("none").to_string(),
        project: or_unset(&vertex.project_id),
        location: vertex.location.clone(),
        endpoint_id: or_unset(&vertex.endpoint_id),
        project_number: or_unset(&vertex.project_number),
        gac: if vertex.credentials_path.is_some() {
            "set"
        } else {
            "unset"
        },
        fallback: names.iter().skip(1).map(|n| n.to_string()).collect(),
    })
}

pub async fn analyze(
    State(state): State<AppState>,
    query: std::result::Result<Query<AnalyzeParams>, QueryRejection>,
    request: Request,
) -> Result<Json<AnalyzeResponse>> {
    let Query(query) = query.map_err(|e| ServerError::Upload(e.body_text()))?;
    let upload = read_upload(&state, request).await?;

    let uploaded = upload.file.is_some();
    let image_url = match upload.file {
        Some(bytes) => prepare_image_blocking(bytes.to_vec()).await?,
        None => upload
            .params
            .image_url
            .or(query.image_url)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or(ServerError::NoImage)?,
    };

    let model_request = ModelRequest {
        prompt: user_prompt(upload.params.prompt.as_deref()),
        image_url,
        max_tokens: state.config.max_tokens,
    };

    info!(backend = state.model.name(), uploaded, "analyzing image");
    let response = state.model.analyze(&model_request).await?;

    let result = normalize(&response.content).with_risk();
    if result.is_empty() {
        warn!(
            source = %response.source,
            len = response.content.len(),
            "model answer contained no structured analysis"
        );
    }

    Ok(Json(AnalyzeResponse {
        ok: true,
        result,
        source: response.source,
        usage: response.usage,
    }))
}

/// Read the image and text parameters from whichever body type was sent.
async fn read_upload(state: &AppState, request: Request) -> Result<Upload> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| ServerError::Upload(e.body_text()))?;
        read_multipart(multipart, state.config.max_upload_bytes).await
    } else if content_type.starts_with("application/json") {
        let Json(params) = Json::<AnalyzeParams>::from_request(request, state)
            .await
            .map_err(|e| ServerError::Upload(e.body_text()))?;
        Ok(Upload { params, file: None })
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(params) = Form::<AnalyzeParams>::from_request(request, state)
            .await
            .map_err(|e| ServerError::Upload(e.body_text()))?;
        Ok(Upload { params, file: None })
    } else {
        Ok(Upload::default())
    }
}

/// Accept any field name: the first field with a file name is the image.
async fn read_multipart(mut multipart: Multipart, max_bytes: usize) -> Result<Upload> {
    let mut upload = Upload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.file_name().is_some() {
            let data = field
                .bytes()
                .await
                .map_err(|e| multipart_error(e, max_bytes))?;
            if data.len() > max_bytes {
                return Err(ServerError::FileTooLarge { max_bytes });
            }
            if upload.file.is_none() && !data.is_empty() {
                upload.file = Some(data);
            }
            continue;
        }

        let name = field.name().unwrap_or_default().to_string();
        let target = match name.as_str() {
            "prompt" => &mut upload.params.prompt,
            "imageUrl" => &mut upload.params.image_url,
            _ => continue,
        };
        let text = field
            .text()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?;
        *target = Some(text);
    }

    Ok(upload)
}

fn multipart_error(err: MultipartError, max_bytes: usize) -> ServerError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::FileTooLarge { max_bytes }
    } else {
        ServerError::Upload(err.body_text())
    }
}
