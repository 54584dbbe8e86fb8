use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use parlance_llm::openai::OpenAiConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long a turn waits for its advisory evaluation before dropping it
    /// (default: `8000` ms).
    pub evaluation_timeout_ms: u64,
    /// Directory holding progress records. `None` keeps progress in memory.
    pub progress_dir: Option<PathBuf>,
    /// Upstream model API settings.
    pub openai: OpenAiConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `EVALUATION_TIMEOUT_MS` | `8000`                     |
    /// | `PROGRESS_DIR`          | `data/progress` (empty = in-memory) |
    ///
    /// Upstream settings are documented on [`OpenAiConfig::from_env`].
    pub fn from_env() -> Self {
        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let progress_dir = env_or("PROGRESS_DIR", "data/progress").trim().to_string();

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: parse_env("PORT", 3000),
            cors_origins,
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 30),
            evaluation_timeout_ms: parse_env("EVALUATION_TIMEOUT_MS", 8_000),
            progress_dir: (!progress_dir.is_empty()).then(|| PathBuf::from(progress_dir)),
            openai: OpenAiConfig::from_env(),
        }
    }

    pub fn evaluation_timeout(&self) -> Duration {
        Duration::from_millis(self.evaluation_timeout_ms)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a numeric variable, panicking at startup on a malformed value.
fn parse_env<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid number: {e}")),
        Err(_) => default,
    }
}
