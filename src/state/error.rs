use thiserror::Error;

/// Startup failures. Anything here aborts the process before serving.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("configuration error: {0}")]
    Config(#[from] crate::core::config::ConfigError),
}
