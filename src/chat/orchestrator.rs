//! Ties the pipeline together: classify, short-circuit the cheap paths,
//! otherwise retrieve, generate, and degrade to a locally synthesized answer
//! when the backend is unavailable.

use std::sync::{Arc, RwLock};

use crate::chat::classifier::{classify, QueryClass};
use crate::chat::mathexpr::{evaluate, format_number};
use crate::chat::prompt::{build_full_prompt, build_system_prompt};
use crate::chat::smalltalk::{canned_response, GENERIC_GREETING};
use crate::chat::types::{ChatOutcome, ResponseMetadata, ResponsePath, SourceRef};
use crate::embedding::feature_vector;
use crate::llm::{GenerationClient, GenerationRequest, GenerationSettings};
use crate::memory::ConversationMemory;
use crate::rag::DocumentIndex;

/// Snippet length shown per source alongside an answer.
const SNIPPET_CHARS: usize = 150;

/// Per-topic content length in a synthesized fallback answer.
const FALLBACK_TOPIC_CHARS: usize = 200;

/// Topics suggested when retrieval found nothing. Fixed list matching the
/// sample corpus; the index may be empty at that point, so the list cannot
/// be derived from it.
const SUGGESTED_TOPICS: &[&str] = &[
    "Artificial Intelligence (AI)",
    "Machine Learning",
    "Natural Language Processing (NLP)",
    "Gravity and Physics",
    "Power (Physics, Electrical, Computing)",
];

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub default_model: String,
    pub top_k: usize,
}

pub struct ResponseOrchestrator {
    index: Arc<RwLock<DocumentIndex>>,
    memory: Arc<ConversationMemory>,
    generation: GenerationClient,
    config: OrchestratorConfig,
}

impl ResponseOrchestrator {
    pub fn new(
        index: Arc<RwLock<DocumentIndex>>,
        memory: Arc<ConversationMemory>,
        generation: GenerationClient,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            index,
            memory,
            generation,
            config,
        }
    }

    /// Runs the full pipeline for one message. Always produces a well-formed
    /// response object; no error crosses this boundary.
    pub async fn respond(
        &self,
        session_id: &str,
        message: &str,
        settings: &GenerationSettings,
    ) -> ChatOutcome {
        match self.respond_inner(session_id, message, settings).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!("Unexpected pipeline error: {err}");
                ChatOutcome {
                    content: format!(
                        "I apologize, but I encountered an error while processing your \
                         request: {err}"
                    ),
                    sources: Vec::new(),
                    metadata: ResponseMetadata {
                        path: ResponsePath::Error,
                        model: self.config.default_model.clone(),
                        tokens_used: 0,
                        rag_enabled: false,
                        documents_retrieved: None,
                        error: Some(err.to_string()),
                    },
                }
            }
        }
    }

    async fn respond_inner(
        &self,
        session_id: &str,
        message: &str,
        settings: &GenerationSettings,
    ) -> anyhow::Result<ChatOutcome> {
        // Facts are extracted on every turn, before classification, so a
        // statement like "my name is Alex" is remembered even though it
        // takes the retrieval path.
        self.memory.update(session_id, message).await;

        match classify(message) {
            QueryClass::Arithmetic => Ok(self.instant_math(message)),
            QueryClass::Personal => Ok(self.instant_personal(session_id).await),
            QueryClass::Smalltalk => Ok(self.instant_smalltalk(message)),
            QueryClass::Knowledge => self.answer_with_retrieval(session_id, message, settings).await,
        }
    }

    fn instant_math(&self, message: &str) -> ChatOutcome {
        let expression = message.trim();
        let content = match evaluate(expression) {
            Ok(value) => {
                let result = format_number(value);
                format!(
                    "**Calculation Result:** {expression} = {result}\n\n**Step-by-step:**\n\
                     1. Expression: {expression}\n2. Result: {result}"
                )
            }
            Err(err) => {
                tracing::debug!("Math evaluation failed: {err}");
                format!(
                    "I can see you want to calculate: {expression}\n\nHowever, I'm having \
                     trouble processing this expression. Please try a simpler format like \
                     '6+9' or '10*5'."
                )
            }
        };

        ChatOutcome {
            content,
            sources: Vec::new(),
            metadata: ResponseMetadata::instant(ResponsePath::InstantMath, "instant_calculator"),
        }
    }

    async fn instant_personal(&self, session_id: &str) -> ChatOutcome {
        let summary = self.memory.context_summary(session_id).await;
        let content = if summary.is_empty() {
            "I don't have any specific information about you yet. You can tell me things like \
             your name, age, or where you live, and I'll remember them for our conversation!"
                .to_string()
        } else {
            format!(
                "Based on our conversation, I know that {summary}.\n\nIs there anything else \
                 you'd like me to remember about you?"
            )
        };

        ChatOutcome {
            content,
            sources: Vec::new(),
            metadata: ResponseMetadata::instant(
                ResponsePath::InstantPersonal,
                "conversation_memory",
            ),
        }
    }

    fn instant_smalltalk(&self, message: &str) -> ChatOutcome {
        let key = message.trim().to_lowercase();
        let content = canned_response(&key).unwrap_or(GENERIC_GREETING).to_string();

        ChatOutcome {
            content,
            sources: Vec::new(),
            metadata: ResponseMetadata::instant(ResponsePath::InstantGreeting, "instant_response"),
        }
    }

    async fn answer_with_retrieval(
        &self,
        session_id: &str,
        message: &str,
        settings: &GenerationSettings,
    ) -> anyhow::Result<ChatOutcome> {
        let top_k = settings.top_k.unwrap_or(self.config.top_k);
        let query_vector = feature_vector(message);

        // Search and snapshot everything needed from the hits inside one
        // lock scope; the guard must not be held across an await.
        let (context, sources) = {
            let index = self
                .index
                .read()
                .map_err(|_| anyhow::anyhow!("document index lock poisoned"))?;
            let hits = index.search(&query_vector, top_k);

            let context = hits
                .iter()
                .map(|hit| hit.chunk.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");
            let sources: Vec<SourceRef> = hits
                .iter()
                .map(|hit| SourceRef {
                    title: hit.chunk.source_filename.clone(),
                    source: hit.chunk.source_label.clone(),
                    snippet: truncate_chars(&hit.chunk.text, SNIPPET_CHARS),
                    similarity_score: hit.score,
                })
                .collect();
            (context, sources)
        };

        if sources.is_empty() {
            tracing::debug!("No relevant documents found for query");
        } else {
            tracing::debug!(documents = sources.len(), "Retrieved context documents");
        }

        let user_context = self.memory.context_summary(session_id).await;
        let system_prompt = build_system_prompt(&context, &user_context);
        let request = GenerationRequest {
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| self.config.default_model.clone()),
            prompt: build_full_prompt(&system_prompt, message),
            temperature: settings.temperature.unwrap_or(0.7),
            max_tokens: settings.max_tokens.unwrap_or(500),
        };

        match self.generation.generate_with_retry(&request).await {
            Some(response) => Ok(ChatOutcome {
                content: response.text,
                metadata: ResponseMetadata {
                    path: ResponsePath::RagWithGeneration,
                    model: request.model,
                    tokens_used: response.tokens_used,
                    rag_enabled: true,
                    documents_retrieved: Some(sources.len()),
                    error: None,
                },
                sources,
            }),
            None => Ok(self.synthesize_fallback(message, sources)),
        }
    }

    /// Builds a context-grounded answer locally when the backend failed
    /// after all retries.
    fn synthesize_fallback(&self, message: &str, sources: Vec<SourceRef>) -> ChatOutcome {
        let mut content = format!("I understand you're asking about: **{message}**\n\n");

        if sources.is_empty() {
            content.push_str(
                "I don't have specific information about this topic in my current knowledge \
                 base. However, I can help with:\n\n",
            );
            for topic in SUGGESTED_TOPICS {
                content.push_str(&format!("\u{2022} **{topic}**\n"));
            }
            content.push_str(
                "\nI'm also experiencing delays with the AI model right now. Please try asking \
                 about one of the topics above, or try again later for a full response.",
            );
        } else {
            content.push_str("Here's what I found in my knowledge base:\n\n");

            for (i, (title, snippets)) in group_by_title(&sources).iter().enumerate() {
                let combined = snippets.join(" ").replace("...", "");
                let topic_content = truncate_chars(combined.trim(), FALLBACK_TOPIC_CHARS);
                content.push_str(&format!("**{}. {title}**\n{topic_content}\n\n", i + 1));
            }

            if let Some(note) = courtesy_note(message) {
                content.push_str(note);
                content.push_str("\n\n");
            }

            content.push_str(
                "I'm experiencing some delays with the AI model right now, but I've provided \
                 the most relevant information from my knowledge base. Please try again in a \
                 moment for a more detailed AI-generated response.",
            );
        }

        let documents_retrieved = sources.len();
        ChatOutcome {
            content,
            sources,
            metadata: ResponseMetadata {
                path: ResponsePath::RagFallback,
                model: "fallback".to_string(),
                tokens_used: 0,
                rag_enabled: true,
                documents_retrieved: Some(documents_retrieved),
                error: None,
            },
        }
    }
}

/// Groups source snippets by title, preserving first-seen order.
fn group_by_title(sources: &[SourceRef]) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for source in sources {
        match groups.iter_mut().find(|(title, _)| *title == source.title) {
            Some((_, snippets)) => snippets.push(source.snippet.clone()),
            None => groups.push((source.title.clone(), vec![source.snippet.clone()])),
        }
    }
    groups
}

/// Subject-keyword courtesy notes for the fallback answer. Plain substring
/// match, so "ai" also fires inside longer words.
fn courtesy_note(message: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();
    if lower.contains("artificial intelligence") || lower.contains("ai") {
        Some(
            "**AI Context**: I have information about artificial intelligence, machine \
             learning, and natural language processing in my knowledge base.",
        )
    } else if lower.contains("gravity") {
        Some(
            "**Physics Context**: I have information about gravity and fundamental forces in \
             my knowledge base.",
        )
    } else if lower.contains("power") {
        Some(
            "**Power Context**: I have comprehensive information about power in physics, \
             electrical power, and computing power in my knowledge base.",
        )
    } else {
        None
    }
}

/// Truncates to at most `limit` characters, appending an ellipsis when
/// anything was cut. Character-based so multi-byte text never splits.
fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit).collect();
    format!("{cut}...")
}
