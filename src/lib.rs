//! RAG chat backend: answers user messages by combining a local document
//! index with an Ollama-compatible generation backend, with per-session
//! conversational memory and graceful degradation when the backend is
//! unavailable.

pub mod chat;
pub mod core;
pub mod embedding;
pub mod llm;
pub mod memory;
pub mod rag;
pub mod server;
pub mod state;
pub mod vector_math;
