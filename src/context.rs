//! Bounded conversation history.
//!
//! One `ConversationContext` belongs to exactly one chat session; the
//! session's call path is the only mutator. Turns are appended in
//! user/assistant pairs and the oldest are evicted first once the
//! window is full.

use serde::Serialize;

/// Speaker of a conversation turn. Serializes to the lowercase wire
/// role used by chat-completions endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a conversation. Also used verbatim as the wire
/// message shape in completion requests.
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// FIFO-bounded log of conversation turns.
///
/// Holds at most `2 * max_history_turns` turns (one user and one
/// assistant turn per exchange). The system prompt is never stored
/// here; it is rebuilt on every call.
pub struct ConversationContext {
    turns: Vec<Turn>,
    max_history_turns: usize,
}

impl ConversationContext {
    pub fn new(max_history_turns: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_history_turns,
        }
    }

    /// Append one turn, then evict from the front until the bound
    /// holds again.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
        while self.turns.len() > self.max_history_turns * 2 {
            self.turns.remove(0);
        }
    }

    /// The most recent `n` turns, oldest first.
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Read-only copy of the full window.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
