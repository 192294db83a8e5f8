use crate::error::{Error, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GITHUB_RAW_URL: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_IMAGEN_MODEL: &str = "imagen-3.0-generate-002";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_PROXY_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub github_raw_url: String,
    pub readme_branch: String,
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub imagen_model: String,
    pub bind_addr: String,
    pub http_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let gemini_api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| Error::Config("GEMINI_API_KEY environment variable not set".to_string()))?;

        if gemini_api_key.trim().is_empty() {
            return Err(Error::Config("GEMINI_API_KEY is empty".to_string()));
        }

        let github_token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());

        let http_timeout = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            gemini_api_key,
            github_token,
            github_api_url: env_or("GITHUB_API_URL", DEFAULT_GITHUB_API_URL),
            github_raw_url: env_or("GITHUB_RAW_URL", DEFAULT_GITHUB_RAW_URL),
            readme_branch: env_or("README_BRANCH", "main"),
            gemini_api_url: env_or("GEMINI_API_URL", DEFAULT_GEMINI_API_URL),
            gemini_model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            imagen_model: env_or("IMAGEN_MODEL", DEFAULT_IMAGEN_MODEL),
            bind_addr: env_or("BIND_ADDR", DEFAULT_BIND_ADDR),
            http_timeout,
        })
    }

    pub fn with_api_key(gemini_api_key: impl Into<String>) -> Self {
        Self {
            gemini_api_key: gemini_api_key.into(),
            github_token: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            github_raw_url: DEFAULT_GITHUB_RAW_URL.to_string(),
            readme_branch: "main".to_string(),
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            imagen_model: DEFAULT_IMAGEN_MODEL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            http_timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub proxy_url: String,
    pub http_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let http_timeout = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .map(Duration::from_secs);

        Self {
            proxy_url: env_or("CODENARRATOR_PROXY_URL", DEFAULT_PROXY_URL),
            http_timeout,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            http_timeout: None,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|| default.to_string())
}

pub(crate) fn http_client(
    timeout: Option<Duration>,
    headers: reqwest::header::HeaderMap,
) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().default_headers(headers);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}
