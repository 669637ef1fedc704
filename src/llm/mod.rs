//! Client for the external text-generation backend.

mod client;
mod types;

pub use client::{GenerationClient, RetryPolicy};
pub use types::{
    BackendHealth, BackendStatus, GenerationFailure, GenerationRequest, GenerationResponse,
    GenerationSettings,
};
