use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{http_client, Config};
use crate::error::{Error, Result};
use crate::llm::parser::parse_llm_response;
use crate::llm::prompts::{response_schema, NarrationRequest};
use crate::llm::provider::LLMProvider;
use crate::models::RawNarration;

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct GeminiError {
    pub(crate) message: String,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or(Error::InvalidAiResponse)
    }
}

impl GeminiProvider {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let mut key = header::HeaderValue::from_str(&config.gemini_api_key)?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);

        Ok(Self {
            client: http_client(config.http_timeout, headers)?,
            base_url: config.gemini_api_url.clone(),
            model: config.gemini_model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn generate_narration(&self, request: &NarrationRequest) -> Result<RawNarration> {
        let prompt = request.to_prompt();
        tracing::debug!("Sending ~{} tokens to {}", request.estimate_tokens(), self.model);

        let request_body = GenerateContentRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GenerateContentResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(Error::LLMApi(format!("Gemini API error ({}): {}", status, message)));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::LLMApi(format!("Failed to parse Gemini response: {}", e)))?;

        if let Some(error) = result.error {
            return Err(Error::LLMApi(error.message));
        }

        let text = result.into_text()?;
        parse_llm_response(&text)
    }

    fn name(&self) -> &str {
        "Gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_unwrap_first_text_part() {
        let response = envelope(
            r#"{"candidates": [{"content": {"parts": [{"text": "{\"a\": 1}"}, {"text": "ignored"}]}}]}"#,
        );
        assert_eq!(response.into_text().unwrap(), r#"{"a": 1}"#);
    }

    #[test]
    fn test_missing_envelope_pieces_are_invalid() {
        for json in [
            r#"{}"#,
            r#"{"candidates": []}"#,
            r#"{"candidates": [{}]}"#,
            r#"{"candidates": [{"content": {"parts": []}}]}"#,
            r#"{"candidates": [{"content": {"parts": [{"inlineData": {}}]}}]}"#,
        ] {
            let err = envelope(json).into_text().unwrap_err();
            assert!(matches!(err, Error::InvalidAiResponse), "{}", json);
            assert_eq!(err.to_string(), "AI did not return a valid structured response.");
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest {
            contents: vec![GeminiContent {
                role: "user".into(),
                parts: vec![GeminiPart { text: "hi".into() }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: response_schema(),
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert!(value["generationConfig"]["responseSchema"]["properties"]["generatedScript"].is_object());
    }

    #[test]
    fn test_debug_redacts_key() {
        let provider = GeminiProvider::new(&Config::with_api_key("secret-key")).unwrap();
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("secret-key"));
        assert!(provider.endpoint().ends_with("/v1beta/models/gemini-2.0-flash:generateContent"));
    }
}
