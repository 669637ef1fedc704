use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub documents_count: usize,
    pub embeddings_loaded: bool,
    pub default_model: String,
    pub backend_base_url: String,
    pub service_status: &'static str,
    pub conversations_stored: usize,
    pub users_remembered: usize,
}

/// Pure read accessors; no side effects.
pub async fn chatbot_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>, ApiError> {
    let (documents_count, embeddings_loaded) = {
        let index = state
            .index
            .read()
            .map_err(|_| ApiError::Internal("document index lock poisoned".to_string()))?;
        (index.document_count(), !index.is_empty())
    };

    Ok(Json(StatsResponse {
        documents_count,
        embeddings_loaded,
        default_model: state.config.default_model.clone(),
        backend_base_url: state.config.backend_base_url.clone(),
        service_status: "active",
        conversations_stored: state.memory.sessions_stored().await,
        users_remembered: state.memory.users_remembered().await,
    }))
}
