use std::{env, path::PathBuf, time::Duration};

use url::Url;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secret used to sign bearer tokens.
    pub jwt_secret: String,
    /// Bearer token lifetime in hours (default: 168, one week).
    pub token_ttl_hours: u64,
    /// Chat-completions endpoint of the text-generation collaborator.
    pub completions_url: Url,
    /// API key sent as a bearer token to the completions endpoint.
    pub completions_api_key: String,
    /// Model name requested from the completions endpoint.
    pub completions_model: String,
    /// OCR sidecar endpoint (image in, text + confidence out).
    pub ocr_url: Url,
    /// Document-render sidecar base URL (record in, PDF/PPTX bytes out).
    pub renderer_url: Url,
    /// Directory for uploaded images and temporary export files.
    pub upload_dir: PathBuf,
    /// Maximum accepted request body size in bytes (default: 10 MiB).
    pub max_upload_bytes: usize,
    /// Requests allowed per IP within one rate-limit window.
    pub rate_limit_max_requests: u32,
    /// Rate-limit window length in seconds (default: 900).
    pub rate_limit_window_secs: u64,
}

fn env_url(key: &str, default: &str) -> Url {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("{key} must be a valid URL"))
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `JWT_SECRET` - Token signing secret (defaults to a dev-only value)
    /// - `TOKEN_TTL_HOURS` - Bearer token lifetime (default: 168)
    /// - `COMPLETIONS_URL` - Chat-completions endpoint
    /// - `COMPLETIONS_API_KEY` / `OPENAI_API_KEY` - Completions credential
    /// - `COMPLETIONS_MODEL` - Model name (default: "gpt-4")
    /// - `OCR_URL` - OCR sidecar endpoint (default: http://localhost:8884)
    /// - `RENDERER_URL` - Render sidecar base URL (default: http://localhost:3001)
    /// - `UPLOAD_DIR` - Upload/export directory (default: "uploads")
    /// - `MAX_UPLOAD_BYTES` - Request body cap (default: 10485760)
    /// - `RATE_LIMIT_MAX_REQUESTS` - Requests per window (default: 100)
    /// - `RATE_LIMIT_WINDOW_SECS` - Window length (default: 900)
    pub fn from_env() -> Self {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using development default");
            "gurukul-dev-secret-change-in-production".to_string()
        });

        let completions_api_key = env::var("COMPLETIONS_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .unwrap_or_default();

        Self {
            jwt_secret,
            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(168),
            completions_url: env_url(
                "COMPLETIONS_URL",
                "https://api.openai.com/v1/chat/completions",
            ),
            completions_api_key,
            completions_model: env::var("COMPLETIONS_MODEL")
                .unwrap_or_else(|_| "gpt-4".to_string()),
            ocr_url: env_url("OCR_URL", "http://localhost:8884"),
            renderer_url: env_url("RENDERER_URL", "http://localhost:3001"),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            rate_limit_max_requests: env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            rate_limit_window_secs: env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(900),
        }
    }

    /// Bearer token lifetime as a chrono duration.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours as i64)
    }

    /// Rate-limit window as a std duration.
    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
