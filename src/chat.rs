//! Chat orchestration.
//!
//! The engine ties the pipeline together: retrieve context for the
//! incoming message, assemble the system/history/user message
//! sequence, ask the completion gateway, and fall back to a
//! deterministic context-derived reply (or a fixed apology) when the
//! gateway reports absence. The caller always gets a string back.

use crate::completion::CompletionGateway;
use crate::context::{ConversationContext, Role, Turn};
use crate::search::Retriever;

/// Persona instruction embedded at the top of every system message.
const PERSONA: &str = "You are a digital twin of a girlfriend, created for Valentine's Day.\n\
Your goal is to be romantic, loving, and helpful. You speak with warmth and affection.\n\
Use the provided Context (memories/facts) to answer the user's message.\n\
If the context doesn't answer the question, use your general knowledge but stay in character as a loving girlfriend.\n\
Keep responses concise (2-3 sentences max) unless asked for more.\n\
Always be supportive and sweet. Use emojis like 💕, 💝, 😊.";

/// Lead-in for the context-derived fallback reply.
const FALLBACK_LEAD_IN: &str = "💕 I remember this:";

/// Reply when the gateway is unavailable and nothing was retrieved.
const OFFLINE_APOLOGY: &str = "Thinking of you... 💕 (I'm having trouble connecting to my brain right now, please check my internet connection!)";

/// How many stored turns are replayed into each request (the two most
/// recent exchanges).
const PROMPT_HISTORY_TURNS: usize = 4;

/// Retrieval-augmented chat engine for a single session.
///
/// Owns the session's conversation history; the retriever's document
/// store may be shared with other sessions, the history never is.
pub struct ChatEngine {
    retriever: Retriever,
    gateway: CompletionGateway,
    history: ConversationContext,
    top_k: usize,
}

impl ChatEngine {
    pub fn new(
        retriever: Retriever,
        gateway: CompletionGateway,
        max_history_turns: usize,
        top_k: usize,
    ) -> Self {
        Self {
            retriever,
            gateway,
            history: ConversationContext::new(max_history_turns),
            top_k,
        }
    }

    /// Produce a reply for `query`. Never fails: if the model is
    /// unreachable the reply comes from the fallback chain.
    pub async fn get_response(&mut self, query: &str) -> String {
        let context = self.retriever.get_context(query, self.top_k);

        let mut messages = Vec::with_capacity(PROMPT_HISTORY_TURNS + 2);
        messages.push(Turn::new(Role::System, build_system_prompt(&context)));
        messages.extend(self.history.recent(PROMPT_HISTORY_TURNS).iter().cloned());
        messages.push(Turn::new(Role::User, query));

        let reply = match self.gateway.complete(&messages).await {
            Some(text) => text,
            None if !context.is_empty() => fallback_from_context(&context),
            None => OFFLINE_APOLOGY.to_string(),
        };

        self.history.push(Turn::new(Role::User, query));
        self.history.push(Turn::new(Role::Assistant, reply.clone()));

        reply
    }

    /// Forget the conversation so far.
    pub fn clear_memory(&mut self) {
        self.history.clear();
    }

    /// Read-only copy of the stored conversation window.
    pub fn history(&self) -> Vec<Turn> {
        self.history.snapshot()
    }
}

/// System message: persona plus the retrieved context. Rebuilt on
/// every call, never stored in history.
fn build_system_prompt(context: &str) -> String {
    format!("{}\n\nContext from memories:\n{}", PERSONA, context)
}

/// Deterministic reply assembled from the retrieved context: the
/// lead-in, then each non-empty line of the context.
fn fallback_from_context(context: &str) -> String {
    let lines: Vec<&str> = context
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    format!("{}\n{}", FALLBACK_LEAD_IN, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionGateway;
    use crate::config::CompletionConfig;
    use crate::store::{Chunk, DocumentStore};
    use std::sync::Arc;

    /// Engine with a token-less gateway, so every call exercises the
    /// fallback chain without touching the network.
    fn offline_engine(contents: &[&str]) -> ChatEngine {
        let chunks = contents
            .iter()
            .map(|content| Chunk {
                content: content.to_string(),
                source: "memories.txt".to_string(),
            })
            .collect();
        let store = Arc::new(DocumentStore::from_chunks(chunks));
        let retriever = Retriever::new(store);
        let gateway = CompletionGateway::new(&CompletionConfig::default()).unwrap();
        ChatEngine::new(retriever, gateway, 3, 3)
    }

    #[tokio::test]
    async fn test_fallback_with_context() {
        let mut engine = offline_engine(&["We adopted a cat named Mocha in 2023."]);
        let reply = engine.get_response("tell me about our cat").await;
        assert!(reply.starts_with(FALLBACK_LEAD_IN));
        assert!(reply.contains("We adopted a cat named Mocha in 2023."));
    }

    #[tokio::test]
    async fn test_apology_without_context() {
        let mut engine = offline_engine(&[]);
        let reply = engine.get_response("hello there").await;
        assert_eq!(reply, OFFLINE_APOLOGY);
    }

    #[tokio::test]
    async fn test_every_path_records_the_exchange() {
        let mut engine = offline_engine(&["Sunsets at the pier."]);
        engine.get_response("pier").await;
        let history = engine.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].content, "pier");
        assert_eq!(history[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let mut engine = offline_engine(&[]);
        for i in 0..5 {
            engine.get_response(&format!("message {}", i)).await;
        }
        let history = engine.history();
        assert_eq!(history.len(), 6);
        // Oldest surviving exchange is number 2
        assert_eq!(history[0].content, "message 2");
    }

    #[tokio::test]
    async fn test_clear_memory() {
        let mut engine = offline_engine(&[]);
        engine.clear_memory();
        assert!(engine.history().is_empty());

        engine.get_response("first").await;
        engine.get_response("second").await;
        engine.clear_memory();
        assert!(engine.history().is_empty());

        // Next exchange starts fresh
        engine.get_response("third").await;
        assert_eq!(engine.history().len(), 2);
        assert_eq!(engine.history()[0].content, "third");
    }

    #[test]
    fn test_system_prompt_embeds_context() {
        let prompt = build_system_prompt("We rode the ferris wheel.");
        assert!(prompt.starts_with(PERSONA));
        assert!(prompt.ends_with("Context from memories:\nWe rode the ferris wheel."));
    }

    #[test]
    fn test_fallback_drops_blank_lines() {
        let context = "first memory\n\nsecond memory\n   \nthird memory";
        let reply = fallback_from_context(context);
        assert_eq!(
            reply,
            "💕 I remember this:\nfirst memory\nsecond memory\nthird memory"
        );
    }
}
