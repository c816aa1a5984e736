// src/providers/openrouter.rs

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::OpenRouterConfig;
use crate::errors::{RelayError, Result};
use crate::providers::{ChatBackend, ChatMessage, ModelReply, TokenUsage};

/// A client for the OpenRouter chat-completions API.
///
/// Cloning is cheap; the underlying reqwest client shares one connection pool
/// across all concurrent candidates of a race.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    config: OpenRouterConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<ApiUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: String,
}

#[derive(Deserialize)]
struct ApiUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

impl OpenRouterClient {
    /// Creates a new `OpenRouterClient`.
    pub fn new(client: Client, config: OpenRouterConfig) -> Self {
        Self { client, config }
    }
}

impl ChatBackend for OpenRouterClient {
    /// Calls one OpenRouter model with the given message list and returns its
    /// reply text and token usage.
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<ModelReply> {
        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );

        let body = ChatRequest { model, messages };

        let start = Instant::now();

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.app_title)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        println!("📥 OpenRouter {} responded {} ({}ms)", model, status, latency_ms);

        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(RelayError::ApiError {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let chat_resp: ChatResponse = resp.json().await?;

        let usage = chat_resp.usage.map_or_else(TokenUsage::default, |u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        let content = chat_resp
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| RelayError::UnexpectedResponse("No choices in response".to_string()))?;

        if content.is_empty() {
            return Err(RelayError::EmptyResponse);
        }

        Ok(ModelReply { content, usage })
    }
}
