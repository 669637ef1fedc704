use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::handlers::{chat, documents, health, stats};
use crate::state::AppState;

/// Creates the application router: CORS, request tracing, and the chat,
/// ingestion, health and stats endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat::chat))
        .route("/api/documents", post(documents::add_document))
        .route("/api/health", get(health::health))
        .route("/api/chatbot/stats", get(stats::chatbot_stats))
        .route("/api/chatbot/backend-test", get(health::backend_test))
        .with_state(state)
        .layer(build_cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn build_cors_layer() -> CorsLayer {
    let origins = default_local_origins()
        .into_iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
}

fn default_local_origins() -> Vec<&'static str> {
    vec![
        "http://localhost:3000",
        "http://127.0.0.1:3000",
        "http://localhost:5173",
        "http://127.0.0.1:5173",
    ]
}
