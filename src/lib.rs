//! # twinchat
//!
//! A retrieval-augmented digital companion chat engine.
//!
//! twinchat keeps a small in-memory knowledge base of plain-text
//! memories, retrieves the passages most relevant to each incoming
//! message with lexical scoring, combines them with a bounded window
//! of recent conversation turns, and asks a hosted chat-completions
//! endpoint for a reply in a fixed affectionate persona. When the
//! endpoint is unreachable, a deterministic fallback chain guarantees
//! the caller still receives text.
//!
//! ## Pipeline
//!
//! ```text
//! ┌────────────┐   ┌───────────────┐   ┌──────────────┐
//! │ .txt files │──▶│ DocumentStore │──▶│  Retriever   │
//! └────────────┘   │  (chunked)    │   │  (lexical)   │
//!                  └───────────────┘   └──────┬───────┘
//!                                             │ context
//!                  ┌───────────────┐   ┌──────▼───────┐
//!                  │  Completion   │◀──│  ChatEngine  │──▶ reply
//!                  │   Gateway     │   │  + history   │
//!                  └───────────────┘   └──────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`chunk`] | Sliding-window text chunking |
//! | [`store`] | Knowledge-base loading |
//! | [`search`] | Lexical retrieval |
//! | [`context`] | Bounded conversation history |
//! | [`completion`] | Chat-completions HTTP gateway |
//! | [`chat`] | Orchestration and fallback chain |

pub mod chat;
pub mod chunk;
pub mod completion;
pub mod config;
pub mod context;
pub mod search;
pub mod store;
