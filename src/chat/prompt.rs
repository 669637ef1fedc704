//! Prompt assembly for the retrieval path.

/// Builds the system prompt embedding retrieved context and the session's
/// memory summary.
pub fn build_system_prompt(context: &str, user_context: &str) -> String {
    let user_context_block = if user_context.is_empty() {
        String::new()
    } else {
        format!("\n\nUser Context: {user_context}")
    };

    format!(
        "You are a helpful AI assistant with access to a knowledge base and conversation \
         memory. Use the following context to answer the user's question.\n\n\
         Context from knowledge base:\n{context}\n{user_context_block}\n\n\
         Answer the user's question based on the context provided. Be helpful, accurate, and \
         conversational. If the context doesn't contain relevant information, say so politely \
         and offer to help with other topics."
    )
}

/// Joins the system prompt and user message into the single-string prompt
/// the generation backend expects.
pub fn build_full_prompt(system_prompt: &str, message: &str) -> String {
    format!("{system_prompt}\n\nUser: {message}\n\nAssistant:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_embeds_context_and_memory() {
        let prompt = build_system_prompt("Gravity pulls.", "User's name is Alex");
        assert!(prompt.contains("Gravity pulls."));
        assert!(prompt.contains("User Context: User's name is Alex"));
    }

    #[test]
    fn empty_memory_leaves_no_user_context_block() {
        let prompt = build_system_prompt("ctx", "");
        assert!(!prompt.contains("User Context:"));
    }

    #[test]
    fn full_prompt_ends_with_the_assistant_cue() {
        let prompt = build_full_prompt("system", "explain gravity");
        assert!(prompt.starts_with("system\n\nUser: explain gravity"));
        assert!(prompt.ends_with("Assistant:"));
    }
}
