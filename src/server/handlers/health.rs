use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::core::errors::ApiError;
use crate::llm::{BackendHealth, BackendStatus};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: f64,
    pub version: &'static str,
    pub backend_configured: bool,
    pub documents_loaded: usize,
    pub generation: BackendHealth,
}

/// Health endpoint: service status plus a live probe of the generation
/// backend. "degraded" means the service answers but generation will fall
/// back to locally synthesized responses.
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let generation = state.generation.health_check(&state.config.default_model).await;
    let documents_loaded = state
        .index
        .read()
        .map_err(|_| ApiError::Internal("document index lock poisoned".to_string()))?
        .document_count();

    let status = if generation.status == BackendStatus::Healthy {
        "healthy"
    } else {
        "degraded"
    };

    Ok(Json(HealthResponse {
        status,
        timestamp: chrono::Utc::now().timestamp_millis() as f64 / 1000.0,
        version: env!("CARGO_PKG_VERSION"),
        backend_configured: true,
        documents_loaded,
        generation,
    }))
}

/// Raw backend probe, for debugging connectivity.
pub async fn backend_test(State(state): State<Arc<AppState>>) -> Json<BackendHealth> {
    Json(state.generation.health_check(&state.config.default_model).await)
}
