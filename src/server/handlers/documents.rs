use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;
use crate::state::AppState;

/// Ingestion boundary: callers supply plain text; format extraction
/// (PDF/DOCX) happens upstream of this service.
#[derive(Debug, Deserialize)]
pub struct AddDocumentRequest {
    pub text: String,
    pub filename: String,
    #[serde(default = "default_source_label")]
    pub source_label: String,
}

fn default_source_label() -> String {
    "uploaded_document".to_string()
}

#[derive(Debug, Serialize)]
pub struct AddDocumentResponse {
    pub chunks_added: usize,
    pub documents_count: usize,
}

pub async fn add_document(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddDocumentRequest>,
) -> Result<Json<AddDocumentResponse>, ApiError> {
    if request.filename.trim().is_empty() {
        return Err(ApiError::BadRequest("filename must not be empty".to_string()));
    }

    // Empty text is valid and yields zero chunks.
    let (chunks_added, documents_count) = {
        let mut index = state
            .index
            .write()
            .map_err(|_| ApiError::Internal("document index lock poisoned".to_string()))?;
        let added = index.add_document(&request.text, &request.filename, &request.source_label);
        (added, index.document_count())
    };

    tracing::info!(
        filename = %request.filename,
        chunks_added,
        "Ingested document"
    );

    Ok(Json(AddDocumentResponse {
        chunks_added,
        documents_count,
    }))
}
