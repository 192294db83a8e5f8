use async_trait::async_trait;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use crate::error::{Error, Result};
use crate::github::RepositorySource;
use crate::llm::{LLMProvider, NarrationRequest, ThumbnailProvider};
use crate::models::script::fixtures::script;
use crate::models::{
    ProjectInsights, RawNarration, RepositoryMetadata, RepositoryOwner, RepositoryRef,
};

pub fn sample_metadata() -> RepositoryMetadata {
    RepositoryMetadata {
        name: "widget".into(),
        full_name: Some("acme/widget".into()),
        description: None,
        language: None,
        stargazers_count: 10,
        forks_count: 2,
        subscribers_count: 1,
        updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        owner: RepositoryOwner { login: "acme".into() },
    }
}

pub fn sample_insights() -> ProjectInsights {
    ProjectInsights {
        goal: "Track every widget".into(),
        pain_points: vec!["Widgets go missing".into(), "Spreadsheets rot".into()],
        solution: "A tiny tracking daemon".into(),
        key_features: vec!["Realtime sync".into()],
        tech_stack: vec!["Rust".into(), "SQLite".into()],
        target_audience: "Warehouse teams".into(),
        market_position: "niche".into(),
        competitive_advantage: "Zero config".into(),
        complexity_level: "Intermediate".into(),
        confidence_score: 87.0,
    }
}

pub struct FakeSource {
    metadata: Option<RepositoryMetadata>,
    readme: Option<String>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeSource {
    pub fn new(metadata: Option<RepositoryMetadata>, readme: Option<String>) -> Self {
        Self {
            metadata,
            readme,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl RepositorySource for FakeSource {
    async fn get_repository(&self, repo: &RepositoryRef) -> Result<RepositoryMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.metadata
            .clone()
            .ok_or_else(|| Error::GitHubApi(format!("500 Internal Server Error ({})", repo)))
    }

    async fn get_readme(&self, repo: &RepositoryRef) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.readme
            .clone()
            .ok_or_else(|| Error::GitHubApi(format!("README for {}: 404 Not Found", repo)))
    }
}

pub fn sample_narration(title: &str) -> RawNarration {
    serde_json::from_value(json!({
        "analysisResult": sample_insights(),
        "generatedScript": script(title),
    }))
    .unwrap()
}

pub async fn serve_stub(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

// API and raw content on one router: acme/widget has no README, acme/docs
// has one, acme/broken answers 502.
pub fn github_stub() -> Router {
    async fn handle(uri: Uri) -> Response {
        let repo = |name: &str| {
            Json(json!({
                "name": name,
                "full_name": format!("acme/{}", name),
                "description": null,
                "language": "Rust",
                "stargazers_count": 10,
                "forks_count": 2,
                "subscribers_count": 1,
                "updated_at": "2024-01-01T00:00:00Z",
                "owner": {"login": "acme"}
            }))
            .into_response()
        };
        match uri.path() {
            "/repos/acme/widget" => repo("widget"),
            "/repos/acme/docs" => repo("docs"),
            "/repos/acme/broken" => (StatusCode::BAD_GATEWAY, "upstream down").into_response(),
            "/acme/docs/main/README.md" => "# Docs\n\nWidgets, documented.".into_response(),
            _ => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        }
    }
    Router::new().fallback(handle)
}

pub fn fixed_stub(status: StatusCode, body: Value) -> Router {
    Router::new().fallback(move || {
        let body = body.clone();
        async move { (status, Json(body)) }
    })
}

pub fn gemini_envelope(text: &str) -> Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

// Later calls get a different goal so regenerations are distinguishable.
pub struct FakeLlm {
    narration: Option<RawNarration>,
    pub calls: Arc<AtomicUsize>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeLlm {
    pub fn succeeding(title: &str) -> Self {
        Self::returning(sample_narration(title))
    }

    pub fn returning(narration: RawNarration) -> Self {
        Self {
            narration: Some(narration),
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            narration: None,
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl LLMProvider for FakeLlm {
    async fn generate_narration(&self, request: &NarrationRequest) -> Result<RawNarration> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.to_prompt());
        let mut narration = self.narration.clone().ok_or(Error::InvalidAiResponse)?;

        if call > 0 {
            let goal = format!("{} (take {})", sample_insights().goal, call + 1);
            narration.analysis_result.insert("goal".into(), json!(goal));
        }
        Ok(narration)
    }

    fn name(&self) -> &str {
        "fake"
    }
}

pub struct FakeThumbnails {
    pub image: Option<String>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeThumbnails {
    pub fn new(image: Option<&str>) -> Self {
        Self {
            image: image.map(str::to_string),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ThumbnailProvider for FakeThumbnails {
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.image
            .clone()
            .ok_or_else(|| Error::Thumbnail("429 Too Many Requests: quota".into()))
    }

    fn name(&self) -> &str {
        "fake"
    }
}
