/// Server configuration loaded from environment variables.
///
/// Everything except the provider API key has a default suitable for
/// local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8787`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `300`). Does not apply to
    /// `/api/v1/generate-ref`, which is bounded per slot instead.
    pub request_timeout_secs: u64,
    /// Maximum accepted request body in bytes (default: 100 MiB).
    pub max_upload_bytes: usize,
    /// Upstream requests in flight per generation batch (default: `1`).
    pub generation_concurrency: usize,
    /// Deadline for a single reference-batch slot in seconds (default: `240`).
    pub generation_slot_timeout_secs: u64,
    /// Image provider settings.
    pub image_api: ImageApiConfig,
}

/// Connection settings for the image-generation provider.
#[derive(Clone)]
pub struct ImageApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl std::fmt::Debug for ImageApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                     |
    /// |--------------------------------|-----------------------------|
    /// | `HOST`                         | `0.0.0.0`                   |
    /// | `PORT`                         | `8787`                      |
    /// | `CORS_ORIGINS`                 | `http://localhost:5173`     |
    /// | `REQUEST_TIMEOUT_SECS`         | `300`                       |
    /// | `MAX_UPLOAD_BYTES`             | `104857600`                 |
    /// | `GENERATION_CONCURRENCY`       | `1`                         |
    /// | `GENERATION_SLOT_TIMEOUT_SECS` | `240`                       |
    /// | `OPENAI_API_KEY`               | required                    |
    /// | `OPENAI_BASE_URL`              | `https://api.openai.com/v1` |
    /// | `IMAGE_MODEL`                  | `gpt-image-1`               |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8787".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "104857600".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let generation_concurrency: usize = std::env::var("GENERATION_CONCURRENCY")
            .unwrap_or_else(|_| "1".into())
            .parse::<usize>()
            .expect("GENERATION_CONCURRENCY must be a valid usize")
            .max(1);

        let generation_slot_timeout_secs: u64 = std::env::var("GENERATION_SLOT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "240".into())
            .parse()
            .expect("GENERATION_SLOT_TIMEOUT_SECS must be a valid u64");

        let image_api = ImageApiConfig {
            api_key: std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set"),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| refshoot_imagegen::api::DEFAULT_BASE_URL.into()),
            model: std::env::var("IMAGE_MODEL")
                .unwrap_or_else(|_| refshoot_imagegen::api::DEFAULT_MODEL.into()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            generation_concurrency,
            generation_slot_timeout_secs,
            image_api,
        }
    }
}
