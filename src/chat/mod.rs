//! The response-generation pipeline: query triage, instant paths, retrieval,
//! prompt assembly and fallback synthesis.

mod classifier;
mod mathexpr;
mod orchestrator;
mod prompt;
mod smalltalk;
mod types;

pub use classifier::{classify, QueryClass};
pub use mathexpr::{evaluate, MathError};
pub use orchestrator::{OrchestratorConfig, ResponseOrchestrator};
pub use types::{ChatOutcome, ResponseMetadata, ResponsePath, SourceRef};
