//! Axum router configuration with middleware.
//!
//! Middleware: CORS (any origin), request tracing with a UUID v7 request id
//! on every request span.
//!
//! A static frontend is served from `frontend/` (configurable via
//! `CHATRELAY_WEB_DIR`) when that directory exists. API routes take priority;
//! unknown paths fall through to its `index.html`.

use std::path::Path;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router, picking up the web directory from the environment.
pub fn build_router(state: AppState) -> Router {
    let web_dir = std::env::var("CHATRELAY_WEB_DIR").unwrap_or_else(|_| "frontend".to_string());
    build_router_with_web_dir(state, Some(Path::new(&web_dir)))
}

/// Build the router with an explicit (optional) static file directory.
pub fn build_router_with_web_dir(state: AppState, web_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/history/{session_id}", get(handlers::history::get_history))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %req.method(),
                uri = %req.uri(),
                request_id = %Uuid::now_v7(),
            )
        }))
        .with_state(state);

    if let Some(dir) = web_dir.filter(|d| d.is_dir()) {
        let serve_dir = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %dir.display(), "Static frontend serving enabled");
    }

    router
}

/// GET /health
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
