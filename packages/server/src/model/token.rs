use serde::Deserialize;

use crate::config::VertexConfig;
use crate::error::{Result, ServerError};

/// Token endpoint of the GCE / Cloud Run metadata server.
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Where Vertex bearer tokens come from.
///
/// NOTE: Do NOT derive `Debug`, the static token would be exposed.
pub enum TokenSource {
    /// A pre-issued token, e.g. from `gcloud auth print-access-token`.
    Static(String),
    /// The metadata server of the instance the service runs on.
    Metadata { url: String },
}

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
}

impl TokenSource {
    pub fn from_config(config: &VertexConfig) -> Self {
        match &config.access_token {
            Some(token) => TokenSource::Static(token.clone()),
            None => TokenSource::Metadata {
                url: METADATA_TOKEN_URL.to_string(),
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TokenSource::Static(_) => "static",
            TokenSource::Metadata { .. } => "metadata",
        }
    }

    /// Fetch a bearer token. Tokens are not cached.
    pub async fn access_token(&self, http: &reqwest::Client) -> Result<String> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::Metadata { url } => {
                let resp = http
                    .get(url)
                    .header("Metadata-Flavor", "Google")
                    .send()
                    .await
                    .map_err(|e| ServerError::AccessToken(e.to_string()))?;

                let status = resp.status();
                if !status.is_success() {
                    return Err(ServerError::AccessToken(format!(
                        "metadata server returned {status}"
                    )));
                }

                let token: MetadataToken = resp
                    .json()
                    .await
                    .map_err(|e| ServerError::AccessToken(e.to_string()))?;

                if token.access_token.is_empty() {
                    return Err(ServerError::AccessToken(
                        "metadata server returned an empty token".into(),
                    ));
                }
                Ok(token.access_token)
            }
        }
    }
}
