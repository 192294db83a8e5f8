use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::Error;
use crate::llm::thumbnail_prompt;
use crate::models::{AnalysisRequest, RawNarration, ThumbnailRequest, ThumbnailResponse};
use crate::server::state::AppState;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn analysis(err: Error) -> Self {
        if err.is_client_error() {
            return Self::new(StatusCode::BAD_REQUEST, err.to_string());
        }
        tracing::error!("Backend analysis error: {}", err);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Analysis failed: {}. Please check the URL and try again.", err),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub async fn analyze_github(
    State(state): State<AppState>,
    body: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<RawNarration>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?;

    state
        .pipeline
        .narrate(&request)
        .await
        .map(Json)
        .map_err(ApiError::analysis)
}

pub async fn generate_video_thumbnail(
    State(state): State<AppState>,
    body: Result<Json<ThumbnailRequest>, JsonRejection>,
) -> Result<Json<ThumbnailResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?;

    let (title, visual) = match (request.script_title.as_deref(), request.scene_visual.as_deref()) {
        (Some(title), Some(visual)) if !title.trim().is_empty() && !visual.trim().is_empty() => {
            (title, visual)
        }
        _ => {
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "scriptTitle and sceneVisual are required.",
            ))
        }
    };

    let prompt = thumbnail_prompt(title, visual);
    tracing::info!("Generating thumbnail with {}", state.thumbnails.name());

    let image_url = state.thumbnails.generate_image(&prompt).await.map_err(|e| {
        tracing::error!("Thumbnail generation error: {}", e);
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to generate video thumbnail: {}", e),
        )
    })?;

    Ok(Json(ThumbnailResponse { image_url }))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
