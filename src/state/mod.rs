use std::sync::{Arc, RwLock};

use crate::chat::{OrchestratorConfig, ResponseOrchestrator};
use crate::core::config::AppConfig;
use crate::llm::{GenerationClient, RetryPolicy};
use crate::memory::{ConversationMemory, JsonFileStore};
use crate::rag::{seed_sample_documents, DocumentIndex, IndexConfig};

pub mod error;

use error::InitializationError;

/// Global application state shared across all routes.
///
/// Built once at process start and passed to handlers as an `Arc`; there
/// are no ambient globals. The document index is populated (sample corpus)
/// before the listener starts accepting requests, so searches observe a
/// fully initialized index.
pub struct AppState {
    pub config: AppConfig,
    pub index: Arc<RwLock<DocumentIndex>>,
    pub memory: Arc<ConversationMemory>,
    pub generation: GenerationClient,
    pub orchestrator: ResponseOrchestrator,
}

impl AppState {
    /// Initializes the application state:
    /// 1. load and validate configuration
    /// 2. build and seed the document index
    /// 3. restore conversational memory from its snapshot
    /// 4. wire the generation client and orchestrator
    pub async fn initialize() -> Result<Arc<Self>, InitializationError> {
        let config = AppConfig::from_env()?;
        Self::with_config(config).await
    }

    pub async fn with_config(config: AppConfig) -> Result<Arc<Self>, InitializationError> {
        config.validate()?;

        let mut index = DocumentIndex::new(IndexConfig {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        });
        seed_sample_documents(&mut index);
        let index = Arc::new(RwLock::new(index));

        let store = Arc::new(JsonFileStore::new(config.memory_path.clone()));
        let memory = Arc::new(ConversationMemory::new(store));
        memory.load().await;

        let generation = GenerationClient::new(&config.backend_base_url, RetryPolicy::default());

        let orchestrator = ResponseOrchestrator::new(
            index.clone(),
            memory.clone(),
            generation.clone(),
            OrchestratorConfig {
                default_model: config.default_model.clone(),
                top_k: config.top_k,
            },
        );

        Ok(Arc::new(AppState {
            config,
            index,
            memory,
            generation,
            orchestrator,
        }))
    }
}
