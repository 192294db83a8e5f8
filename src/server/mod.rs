pub mod routes;
pub mod state;

pub use state::AppState;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/analyze-github",
            post(routes::analyze_github).fallback(routes::method_not_allowed),
        )
        .route(
            "/api/generate-video-thumbnail",
            post(routes::generate_video_thumbnail).fallback(routes::method_not_allowed),
        )
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server(bind: &str, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind to {}", bind))?;

    tracing::info!("CodeNarrator proxy listening on http://{}", bind);
    tracing::info!("Analysis: POST http://{}/api/analyze-github", bind);
    tracing::info!("Thumbnails: POST http://{}/api/generate-video-thumbnail", bind);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutdown signal received, stopping server...");
        })
        .await
        .context("Server error")?;

    Ok(())
}
