//! Response objects produced by the orchestrator.

use serde::Serialize;

/// Which pipeline path produced a response. Serialized verbatim into the
/// response metadata; observability dashboards and tests key off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponsePath {
    InstantMath,
    InstantGreeting,
    InstantPersonal,
    RagWithGeneration,
    RagFallback,
    Error,
}

/// One retrieved source shown alongside an answer.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRef {
    pub title: String,
    pub source: String,
    pub snippet: String,
    pub similarity_score: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseMetadata {
    pub path: ResponsePath,
    pub model: String,
    pub tokens_used: u64,
    pub rag_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_retrieved: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseMetadata {
    /// Metadata for the instant paths: no generation call, no retrieval.
    pub fn instant(path: ResponsePath, model: &str) -> Self {
        Self {
            path,
            model: model.to_string(),
            tokens_used: 0,
            rag_enabled: false,
            documents_retrieved: None,
            error: None,
        }
    }
}

/// The terminal response object. Every pipeline path, including failures,
/// produces one of these; errors never propagate past the orchestrator.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOutcome {
    pub content: String,
    pub sources: Vec<SourceRef>,
    pub metadata: ResponseMetadata,
}
