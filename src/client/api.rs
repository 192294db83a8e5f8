use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::{http_client, ClientConfig};
use crate::error::{Error, Result};
use crate::models::{AnalysisRequest, NarrationResponse, ThumbnailRequest, ThumbnailResponse};

#[async_trait]
pub trait NarratorApi: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<NarrationResponse>;
    async fn generate_thumbnail(&self, request: &ThumbnailRequest) -> Result<ThumbnailResponse>;
}

pub struct ProxyClient {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl ProxyClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("codenarrator-client/0.1"),
        );

        Ok(Self {
            client: http_client(config.http_timeout, headers)?,
            base_url: config.proxy_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post<B, T>(&self, path: &str, body: &B, fallback: &str) -> Result<T>
    where
        B: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {}", url);
        let response = self.client.post(&url).json(body).send().await?;
        read_response(response, fallback).await
    }
}

async fn read_response<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string());

    Err(Error::Proxy {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl NarratorApi for ProxyClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<NarrationResponse> {
        self.post(
            "/api/analyze-github",
            request,
            "Failed to perform AI analysis via backend.",
        )
        .await
    }

    async fn generate_thumbnail(&self, request: &ThumbnailRequest) -> Result<ThumbnailResponse> {
        self.post(
            "/api/generate-video-thumbnail",
            request,
            "Failed to generate video thumbnail via backend.",
        )
        .await
    }
}
