//! Per-session conversational memory.
//!
//! Extracts a small closed set of facts (name, age, location) from user
//! messages, keeps them in-process for the lifetime of the service, and
//! snapshots them through a [`MemoryStore`] collaborator after every update.

mod store;

pub use store::{JsonFileStore, MemorySnapshot, MemoryStore, PersistedSession};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tokio::sync::Mutex;

/// The closed set of fact keys the extractor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactKey {
    Name,
    Age,
    Location,
}

/// Summary rendering order; fixed so output is deterministic.
const SUMMARY_ORDER: [FactKey; 3] = [FactKey::Name, FactKey::Age, FactKey::Location];

#[derive(Debug, Clone, Default)]
struct SessionFacts {
    facts: HashMap<FactKey, String>,
    turns: u64,
    last_updated: Option<DateTime<Utc>>,
}

/// Session-scoped fact store. All mutation goes through one async mutex,
/// which serializes concurrent updates for the same session (and,
/// incidentally, across sessions; the maps are tiny).
pub struct ConversationMemory {
    sessions: Mutex<HashMap<String, SessionFacts>>,
    store: Arc<dyn MemoryStore>,
}

impl ConversationMemory {
    pub fn new(store: Arc<dyn MemoryStore>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            store,
        }
    }

    /// Restores the snapshot written by the persistence collaborator, if one
    /// exists. Load failures are logged, not fatal.
    pub async fn load(&self) {
        match self.store.load().await {
            Ok(Some(snapshot)) => {
                let mut sessions = self.sessions.lock().await;
                for (id, persisted) in snapshot.sessions {
                    sessions.insert(
                        id,
                        SessionFacts {
                            facts: persisted.facts,
                            turns: persisted.turns,
                            last_updated: Some(persisted.last_updated),
                        },
                    );
                }
                tracing::info!("Restored memory for {} sessions", sessions.len());
            }
            Ok(None) => {}
            Err(err) => tracing::warn!("Could not load conversation memory: {err}"),
        }
    }

    /// Merges facts extracted from `message` into the session (new keys
    /// added, existing overwritten), then asks the collaborator to persist.
    /// Persistence failures are logged and swallowed; a turn never fails
    /// because the snapshot could not be written.
    pub async fn update(&self, session_id: &str, message: &str) {
        let extracted = extract_facts(message);

        let snapshot = {
            let mut sessions = self.sessions.lock().await;
            let entry = sessions.entry(session_id.to_string()).or_default();
            entry.turns += 1;
            entry.last_updated = Some(Utc::now());
            if !extracted.is_empty() {
                tracing::debug!(session = session_id, ?extracted, "Updated session facts");
                entry.facts.extend(extracted);
            }
            snapshot_of(&sessions)
        };

        if let Err(err) = self.store.persist(&snapshot).await {
            tracing::warn!("Could not persist conversation memory: {err}");
        }
    }

    /// Renders the stored facts as a clause list, e.g. "User's name is
    /// Alex. User is 30 years old. User lives in Paris." Empty string when
    /// nothing is stored for the session.
    pub async fn context_summary(&self, session_id: &str) -> String {
        let sessions = self.sessions.lock().await;
        let Some(entry) = sessions.get(session_id) else {
            return String::new();
        };

        let mut parts = Vec::new();
        for key in SUMMARY_ORDER {
            if let Some(value) = entry.facts.get(&key) {
                parts.push(match key {
                    FactKey::Name => format!("User's name is {value}"),
                    FactKey::Age => format!("User is {value} years old"),
                    FactKey::Location => format!("User lives in {value}"),
                });
            }
        }
        parts.join(". ")
    }

    /// Number of sessions that have seen at least one turn.
    pub async fn sessions_stored(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Number of sessions with at least one remembered fact.
    pub async fn users_remembered(&self) -> usize {
        self.sessions
            .lock()
            .await
            .values()
            .filter(|s| !s.facts.is_empty())
            .count()
    }
}

fn snapshot_of(sessions: &HashMap<String, SessionFacts>) -> MemorySnapshot {
    MemorySnapshot {
        sessions: sessions
            .iter()
            .map(|(id, s)| {
                (
                    id.clone(),
                    PersistedSession {
                        facts: s.facts.clone(),
                        turns: s.turns,
                        last_updated: s.last_updated.unwrap_or_else(Utc::now),
                    },
                )
            })
            .collect(),
        last_updated: Utc::now(),
    }
}

/// Name lead-ins, checked in order; first match wins.
const NAME_LEAD_INS: &[&str] = &["my name is", "i'm", "i am", "call me", "this is"];

/// Location lead-ins, checked in order; first match wins.
const LOCATION_LEAD_INS: &[&str] = &["i live in", "i'm from", "i am from"];

fn age_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"i am (\d+)").expect("valid regex"))
}

/// Scans `message` for fact lead-in phrases. Each fact type matches
/// independently with first-match-wins.
///
/// Known ambiguity: the age lead-in ("i am <digits>") overlaps the name
/// lead-in ("i am"), so "i am 30" stores age "30" and also name "30".
/// Callers relying on the name fact should expect that collision.
pub fn extract_facts(message: &str) -> HashMap<FactKey, String> {
    let lower = message.to_lowercase();
    let mut facts = HashMap::new();

    for lead_in in NAME_LEAD_INS {
        if let Some(value) = word_after(&lower, lead_in) {
            facts.insert(FactKey::Name, value);
            break;
        }
    }

    if let Some(captures) = age_pattern().captures(&lower) {
        facts.insert(FactKey::Age, captures[1].to_string());
    }

    for lead_in in LOCATION_LEAD_INS {
        if let Some(value) = word_after(&lower, lead_in) {
            facts.insert(FactKey::Location, value);
            break;
        }
    }

    facts
}

/// The single word immediately following `lead_in`, title-cased. Values
/// shorter than 2 characters are discarded as noise.
fn word_after(lower_message: &str, lead_in: &str) -> Option<String> {
    let idx = lower_message.find(lead_in)?;
    let rest = &lower_message[idx + lead_in.len()..];
    let word = rest.split_whitespace().next()?;
    if word.chars().count() < 2 {
        return None;
    }
    Some(title_case(word))
}

fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut at_word_start = true;
    for c in word.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
