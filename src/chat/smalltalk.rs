//! Canned responses for the instant smalltalk path.

/// Fixed response table keyed by the exact lowercased/trimmed message.
const RESPONSES: &[(&str, &str)] = &[
    ("hello", "Hello! How can I help you today?"),
    ("hi", "Hi there! What would you like to know?"),
    (
        "how are you",
        "I'm doing great, thanks for asking! How can I assist you?",
    ),
    ("what's up", "Not much, just ready to help! What do you need?"),
    ("thanks", "You're welcome!"),
    (
        "thank you",
        "You're very welcome! Is there anything else I can help with?",
    ),
    ("bye", "Goodbye! Have a great day!"),
    ("goodbye", "See you later! Take care!"),
    (
        "help",
        "I'm here to help! I can answer questions, perform calculations, and assist with \
         various topics. What would you like to know?",
    ),
    (
        "what can you do",
        "I can help with:\n\u{2022} Answering questions\n\u{2022} Mathematical calculations\n\
         \u{2022} Remembering information about you\n\u{2022} Providing information\n\
         \u{2022} General assistance\n\nWhat would you like help with?",
    ),
    (
        "who are you",
        "I'm your AI assistant! I'm here to help answer questions, perform calculations, and \
         remember things about you. How can I assist you today?",
    ),
];

pub const GENERIC_GREETING: &str = "Hello! How can I help you today?";

/// Looks up the canned response for a lowercased/trimmed smalltalk key.
pub fn canned_response(key: &str) -> Option<&'static str> {
    RESPONSES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, response)| *response)
}
