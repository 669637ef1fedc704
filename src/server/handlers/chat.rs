use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::chat::{ResponseMetadata, SourceRef};
use crate::core::errors::ApiError;
use crate::llm::GenerationSettings;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default = "default_session_id")]
    pub session_id: String,
    #[serde(default)]
    pub settings: GenerationSettings,
}

fn default_session_id() -> String {
    "default".to_string()
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub sources: Vec<SourceRef>,
    pub metadata: ResponseMetadata,
}

/// Chat endpoint. Pipeline failures are response variants, never HTTP
/// errors; only an empty message is rejected at the boundary.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let outcome = state
        .orchestrator
        .respond(&request.session_id, &request.message, &request.settings)
        .await;

    Ok(Json(ChatResponse {
        response: outcome.content,
        sources: outcome.sources,
        metadata: outcome.metadata,
    }))
}
