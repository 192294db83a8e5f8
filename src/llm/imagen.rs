use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use crate::config::{http_client, Config};
use crate::error::{Error, Result};
use crate::llm::gemini::GeminiError;
use crate::llm::provider::ThumbnailProvider;

pub struct ImagenProvider {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictRequest<'a> {
    instances: Vec<PredictInstance<'a>>,
    parameters: PredictParameters,
}

#[derive(Serialize)]
struct PredictInstance<'a> {
    prompt: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: &'static str,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
    #[serde(default)]
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}

impl PredictResponse {
    fn into_data_url(self) -> Result<String> {
        let prediction = self
            .predictions
            .into_iter()
            .find(|p| p.bytes_base64_encoded.is_some())
            .ok_or_else(|| Error::Thumbnail("image model returned no image".to_string()))?;

        let mime = prediction.mime_type.unwrap_or_else(|| "image/png".to_string());
        let bytes = prediction.bytes_base64_encoded.unwrap_or_default();
        Ok(format!("data:{};base64,{}", mime, bytes))
    }
}

pub fn thumbnail_prompt(script_title: &str, scene_visual: &str) -> String {
    format!(
        "A cinematic 16:9 thumbnail for a technical video trailer titled \"{}\". \
         Visual: {}. Bold, clean composition, no text overlays.",
        script_title.trim(),
        scene_visual.trim()
    )
}

impl ImagenProvider {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let mut key = header::HeaderValue::from_str(&config.gemini_api_key)?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);

        Ok(Self {
            client: http_client(config.http_timeout, headers)?,
            base_url: config.gemini_api_url.clone(),
            model: config.imagen_model.clone(),
        })
    }
}

#[async_trait]
impl ThumbnailProvider for ImagenProvider {
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1beta/models/{}:predict", self.base_url, self.model);
        tracing::debug!("Requesting thumbnail from {}", self.model);

        let body = PredictRequest {
            instances: vec![PredictInstance { prompt }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: "16:9",
            },
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        let parsed: Option<PredictResponse> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let message = parsed.and_then(|r| r.error).map(|e| e.message).unwrap_or(text);
            return Err(Error::Thumbnail(format!("{}: {}", status, message)));
        }

        parsed
            .ok_or_else(|| Error::Thumbnail("unreadable image model response".to_string()))?
            .into_data_url()
    }

    fn name(&self) -> &str {
        "Imagen"
    }
}
