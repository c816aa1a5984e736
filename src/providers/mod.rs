// src/providers/mod.rs

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

pub mod openrouter;

/// A single chat message sent to a model backend.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Token accounting reported by the upstream provider, when available.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

/// Raw generation result from one backend model.
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub content: String,
    pub usage: TokenUsage,
}

/// A common trait for chat-completion model backends.
/// This keeps the translator and the benchmark independent of the concrete
/// HTTP client, and lets tests substitute deterministic backends.
///
/// Note: We're not using async_trait here, so implementers must handle async directly.
pub trait ChatBackend: Send + Sync {
    /// Sends a message list to the given model and returns its reply.
    fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> impl Future<Output = Result<ModelReply>> + Send;
}
