//! Process configuration, read once at startup from the environment.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
    #[error("chunk_overlap ({overlap}) must be smaller than chunk_size ({size})")]
    OverlapTooLarge { overlap: usize, size: usize },
}

/// Service configuration with documented defaults. Validated at the
/// boundary; once constructed it is immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the Ollama-compatible generation backend.
    /// Env: `OLLAMA_BASE_URL`, default `http://localhost:11434`.
    pub backend_base_url: String,
    /// Model used when a request does not name one.
    /// Env: `CHAT_MODEL`, default `mistral:7b`.
    pub default_model: String,
    /// HTTP listen port. Env: `PORT`, default 8000.
    pub port: u16,
    /// Memory snapshot location. Env: `MEMORY_PATH`,
    /// default `conversation_memory.json`.
    pub memory_path: PathBuf,
    /// Log directory. Env: `LOG_DIR`, default `logs`.
    pub log_dir: PathBuf,
    /// Chunk window length in characters.
    pub chunk_size: usize,
    /// Chunk back-step in characters; must stay below `chunk_size`.
    pub chunk_overlap: usize,
    /// Default number of chunks retrieved per query.
    pub top_k: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_base_url: "http://localhost:11434".to_string(),
            default_model: "mistral:7b".to_string(),
            port: 8000,
            memory_path: PathBuf::from("conversation_memory.json"),
            log_dir: PathBuf::from("logs"),
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 3,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = env::var("OLLAMA_BASE_URL") {
            let trimmed = url.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::Invalid {
                    var: "OLLAMA_BASE_URL",
                    value: url.clone(),
                });
            }
            config.backend_base_url = trimmed.to_string();
        }

        if let Ok(model) = env::var("CHAT_MODEL") {
            if !model.trim().is_empty() {
                config.default_model = model.trim().to_string();
            }
        }

        if let Ok(port) = env::var("PORT") {
            config.port = port.parse().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                value: port.clone(),
            })?;
        }

        if let Ok(path) = env::var("MEMORY_PATH") {
            config.memory_path = PathBuf::from(path);
        }

        if let Ok(dir) = env::var("LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid {
                var: "chunk_size",
                value: "0".to_string(),
            });
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::OverlapTooLarge {
                overlap: self.chunk_overlap,
                size: self.chunk_size,
            });
        }
        Ok(())
    }
}
