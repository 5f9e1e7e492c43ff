use std::net::SocketAddr;

use crate::error::{Result, ServerError};

const DEFAULT_LOCATION: &str = "us-central1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_MAX_TOKENS: u32 = 400;
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_ALT_MODEL: &str = "google/medgemma-4b-it";

/// Dedicated Vertex AI prediction endpoint.
#[derive(Debug, Clone, Default)]
pub struct VertexConfig {
    pub project_id: String,
    pub location: String,
    pub endpoint_id: String,
    pub project_number: String,
    /// Value of `GOOGLE_APPLICATION_CREDENTIALS`; only reported by `/status`.
    pub credentials_path: Option<String>,
    /// Pre-issued bearer token. When unset the metadata server is asked.
    pub access_token: Option<String>,
    /// Overrides the dedicated endpoint host, e.g. for a local stub.
    pub base_url: Option<String>,
}

impl VertexConfig {
    /// `{ENDPOINT_ID}.{LOCATION}-{PROJECT_NUMBER}.prediction.vertexai.goog`
    pub fn host(&self) -> String {
        format!(
            "{}.{}-{}.prediction.vertexai.goog",
            self.endpoint_id, self.location, self.project_number
        )
    }

    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.host()),
        }
    }

    pub fn predict_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/endpoints/{}:predict?$alt=json;enum-encoding=int",
            self.base_url(),
            self.project_id,
            self.location,
            self.endpoint_id
        )
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.project_id.is_empty() {
            missing.push("PROJECT_ID");
        }
        if self.endpoint_id.is_empty() {
            missing.push("ENDPOINT_ID");
        }
        if self.project_number.is_empty() {
            missing.push("PROJECT_NUMBER");
        }
        missing
    }
}

/// OpenAI-compatible chat-completions API used as an alternate backend.
///
/// NOTE: Debug is implemented by hand so the API key never reaches logs.
#[derive(Clone)]
pub struct AlternateConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

impl std::fmt::Debug for AlternateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlternateConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .finish()
    }
}

/// Server configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub use_vertex: bool,
    pub vertex: VertexConfig,
    pub alternate: Option<AlternateConfig>,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub max_upload_bytes: usize,
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let use_vertex = std::env::var("USE_VERTEX")
            .map(|v| v == "true")
            .unwrap_or(false);

        let vertex = VertexConfig {
            project_id: env_opt("PROJECT_ID").unwrap_or_default(),
            location: env_opt("LOCATION").unwrap_or_else(|| DEFAULT_LOCATION.into()),
            endpoint_id: env_opt("ENDPOINT_ID").unwrap_or_default(),
            project_number: env_opt("PROJECT_NUMBER").unwrap_or_default(),
            credentials_path: env_opt("GOOGLE_APPLICATION_CREDENTIALS"),
            access_token: env_opt("GOOGLE_ACCESS_TOKEN"),
            base_url: env_opt("VERTEX_BASE_URL"),
        };

        let alternate = env_opt("ALT_MODEL_API_URL").map(|api_url| AlternateConfig {
            api_url,
            api_key: env_opt("ALT_MODEL_API_KEY"),
            model: env_opt("ALT_MODEL_NAME").unwrap_or_else(|| DEFAULT_ALT_MODEL.into()),
        });

        let config = Self {
            bind_addr: env_opt("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            port: env_parse("PORT", DEFAULT_PORT),
            use_vertex,
            vertex,
            alternate,
            max_tokens: env_parse("MODEL_MAX_TOKENS", DEFAULT_MAX_TOKENS),
            timeout_secs: env_parse("MODEL_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a config builder for testing.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder {
            config: Self {
                bind_addr: DEFAULT_BIND_ADDR.into(),
                port: DEFAULT_PORT,
                use_vertex: false,
                vertex: VertexConfig {
                    location: DEFAULT_LOCATION.into(),
                    ..Default::default()
                },
                alternate: None,
                max_tokens: DEFAULT_MAX_TOKENS,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.use_vertex {
            let missing = self.vertex.missing_fields();
            if !missing.is_empty() {
                return Err(ServerError::Config(format!(
                    "USE_VERTEX=true but {} not set",
                    missing.join(", ")
                )));
            }
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|e| ServerError::Config(format!("invalid bind address: {e}")))
    }
}

/// Builder for constructing `ServerConfig` in tests.
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn vertex(mut self, vertex: VertexConfig) -> Self {
        self.config.use_vertex = true;
        self.config.vertex = vertex;
        self
    }

    pub fn alternate(mut self, alternate: AlternateConfig) -> Self {
        self.config.alternate = Some(alternate);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    pub fn max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.config.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn build(self) -> ServerConfig {
        self.config
    }
}
