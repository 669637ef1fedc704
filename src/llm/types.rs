use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-request sampling options supplied by the caller. All fields optional;
/// defaults are applied by the orchestrator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationSettings {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub top_k: Option<usize>,
}

/// A fully resolved generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// A successful generation. Failure is represented by absence (`None` from
/// the retry wrapper), never by a zero object: callers must distinguish
/// "no answer" from "empty answer".
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    pub text: String,
    pub tokens_used: u64,
}

/// The three distinguishable ways a single attempt can fail.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("request timed out")]
    Timeout,
    #[error("cannot connect to generation backend")]
    Connection,
    #[error("generation backend returned status {0}")]
    BadStatus(u16),
}

/// Health probe classification. Serialized onto the health surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendStatus {
    Healthy,
    Timeout,
    ConnectionError,
    Error,
}

/// Health probe result for the polling surface.
#[derive(Debug, Clone, Serialize)]
pub struct BackendHealth {
    pub status: BackendStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
    pub message: String,
}

/// Ollama `/api/generate` request body.
#[derive(Debug, Serialize)]
pub(super) struct GenerateBody<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    pub options: GenerateOptions,
}

#[derive(Debug, Serialize)]
pub(super) struct GenerateOptions {
    pub temperature: f64,
    pub num_predict: u32,
}

/// Ollama `/api/generate` success body.
#[derive(Debug, Deserialize)]
pub(super) struct GenerateReply {
    pub response: String,
    #[serde(default)]
    pub eval_count: u64,
}
