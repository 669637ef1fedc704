//! Persistence collaborator for conversational memory.
//!
//! The core hands the collaborator a whole-state snapshot after each update;
//! format and timing are the collaborator's concern. The default
//! implementation writes a pretty-printed JSON file.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FactKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    pub facts: HashMap<FactKey, String>,
    #[serde(default)]
    pub turns: u64,
    pub last_updated: DateTime<Utc>,
}

/// Whole-state snapshot keyed by session id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub sessions: HashMap<String, PersistedSession>,
    pub last_updated: DateTime<Utc>,
}

/// Abstraction over memory persistence backends.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Writes the snapshot, replacing any previous state.
    async fn persist(&self, snapshot: &MemorySnapshot) -> anyhow::Result<()>;

    /// Reads the last written snapshot; `None` when nothing was persisted.
    async fn load(&self) -> anyhow::Result<Option<MemorySnapshot>>;
}

/// File-backed store: one JSON document holding the whole state.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl MemoryStore for JsonFileStore {
    async fn persist(&self, snapshot: &MemorySnapshot) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let body = serde_json::to_vec_pretty(snapshot)?;
        tokio::fs::write(&self.path, body).await?;
        Ok(())
    }

    async fn load(&self) -> anyhow::Result<Option<MemorySnapshot>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> MemorySnapshot {
        let mut facts = HashMap::new();
        facts.insert(FactKey::Name, "Alex".to_string());
        facts.insert(FactKey::Location, "Boston".to_string());

        let mut sessions = HashMap::new();
        sessions.insert(
            "default".to_string(),
            PersistedSession {
                facts,
                turns: 2,
                last_updated: Utc::now(),
            },
        );
        MemorySnapshot {
            sessions,
            last_updated: Utc::now(),
        }
    }

    #[tokio::test]
    async fn persist_then_load_restores_the_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("conversation_memory.json"));

        store.persist(&sample_snapshot()).await.unwrap();
        let loaded = store.load().await.unwrap().expect("snapshot present");

        let session = &loaded.sessions["default"];
        assert_eq!(session.facts[&FactKey::Name], "Alex");
        assert_eq!(session.facts[&FactKey::Location], "Boston");
        assert_eq!(session.turns, 2);
    }

    #[tokio::test]
    async fn loading_a_missing_file_is_none_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("missing.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[test]
    fn fact_keys_serialize_as_lowercase_strings() {
        let mut facts = HashMap::new();
        facts.insert(FactKey::Age, "30".to_string());
        let json = serde_json::to_string(&facts).unwrap();
        assert_eq!(json, r#"{"age":"30"}"#);
    }
}
