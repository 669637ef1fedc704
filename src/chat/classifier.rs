//! Stateless query triage.
//!
//! Classifies a message before any expensive work so the common casual
//! traffic never reaches retrieval or the generation backend. Precedence is
//! fixed: arithmetic, then personal-memory, then smalltalk, then knowledge.

use std::sync::OnceLock;

use regex::Regex;

/// Category of an incoming message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryClass {
    /// Entire message is an arithmetic expression.
    Arithmetic,
    /// Asks about stored facts ("what is my name", ...).
    Personal,
    /// Exact match against the closed greeting/thanks/farewell vocabulary.
    Smalltalk,
    /// Everything else; requires retrieval.
    Knowledge,
}

/// Phrases that mark a personal-memory query (substring match).
const PERSONAL_PHRASES: &[&str] = &[
    "what is my name",
    "what's my name",
    "who am i",
    "what do you know about me",
    "do you remember me",
    "what did i tell you",
];

/// Closed smalltalk vocabulary (exact match after trim/lowercase).
pub(crate) const SMALLTALK_KEYS: &[&str] = &[
    "hello",
    "hi",
    "how are you",
    "what's up",
    "thanks",
    "thank you",
    "bye",
    "goodbye",
    "help",
    "what can you do",
    "who are you",
];

fn arithmetic_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9+\-*/().^\s]+$").expect("valid regex"))
}

/// Classifies `message`. Total function; never fails.
pub fn classify(message: &str) -> QueryClass {
    let trimmed = message.trim().to_lowercase();
    if trimmed.is_empty() {
        return QueryClass::Knowledge;
    }

    if arithmetic_pattern().is_match(&trimmed) {
        return QueryClass::Arithmetic;
    }

    if PERSONAL_PHRASES.iter().any(|p| trimmed.contains(p)) {
        return QueryClass::Personal;
    }

    if SMALLTALK_KEYS.contains(&trimmed.as_str()) {
        return QueryClass::Smalltalk;
    }

    QueryClass::Knowledge
}
