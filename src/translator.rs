// src/translator.rs
//
// Builds the bidirectional translation prompt, races it across every
// configured model, and parses the winning model's output.

use std::sync::Arc;

use serde::Serialize;

use crate::errors::Result;
use crate::models::TranslateRequest;
use crate::providers::{ChatBackend, ChatMessage, ModelReply, TokenUsage};
use crate::race::{race, Candidate, FailureDetail, RaceConfig};

/// How many trailing chat-history entries are kept for context.
const HISTORY_LIMIT: usize = 2;

/// Parsed result of one raced translation.
#[derive(Debug, Clone, Serialize)]
pub struct Translation {
    pub translated_message: String,
    pub tone: Option<String>,
    /// Model that won the race.
    pub model: String,
    pub latency_ms: u64,
    pub usage: TokenUsage,
}

/// Builds the message list shared read-only by every racing candidate.
pub fn build_messages(req: &TranslateRequest) -> Vec<ChatMessage> {
    let direction = if req.is_to_emoji {
        "text_to_emoji"
    } else {
        "emoji_to_text"
    };

    let history = req.chat_history.as_deref().unwrap_or_default();
    let tail = &history[history.len().saturating_sub(HISTORY_LIMIT)..];
    let history_snippet = if tail.is_empty() {
        "None".to_string()
    } else {
        tail.iter()
            .map(|m| format!("- {m}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let system_prompt = r#"You are a bidirectional translator between English text and emoji chains.
- When direction is 'text_to_emoji', convert the original message into a concise emoji sequence that preserves meaning and tone.
- When direction is 'emoji_to_text', convert the emoji sequence into natural, concise English.
- Always respond in STRICT JSON with the following structure:
{
  "translatedMessage": "<string>",
  "metadata": {
    "tone": "<short tone phrase like 'Extreme Laughter', 'Mild Sarcasm', 'Neutral'>"
  }
}
- Do not include any extra keys, explanation, or commentary."#;

    let user_prompt = format!(
        "Direction: {direction}\n\
         Original message: {}\n\
         Recent chat history (may be empty or partial):\n{history_snippet}\n\
         Return ONLY the JSON object as specified.",
        req.original_message
    );

    vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user(user_prompt),
    ]
}

/// Pulls the translated message and tone out of raw model output.
///
/// Models are asked for strict JSON but routinely wrap it in prose, so the
/// parser takes the outermost brace pair and falls back to treating the whole
/// output as the translation.
pub fn extract_translation(raw: &str) -> (String, Option<String>) {
    let content = raw.trim();

    let json_candidate = match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if end > start => &content[start..=end],
        _ => content,
    };

    match serde_json::from_str::<serde_json::Value>(json_candidate) {
        Ok(parsed) => {
            let translated = parsed
                .get("translatedMessage")
                .or_else(|| parsed.get("translation"))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let tone = parsed
                .get("metadata")
                .and_then(|m| m.get("tone"))
                .or_else(|| parsed.get("tone"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());
            (translated, tone)
        }
        Err(_) => (content.to_string(), None),
    }
}

/// Races every configured model on one translation request and parses the
/// winner. Generic over the backend so tests can inject deterministic ones.
pub async fn translate_raced<B>(
    backend: &B,
    models: &[String],
    race_config: &RaceConfig,
    req: &TranslateRequest,
) -> Result<Translation>
where
    B: ChatBackend + Clone + Send + Sync + 'static,
{
    let messages: Arc<Vec<ChatMessage>> = Arc::new(build_messages(req));

    let candidates: Vec<_> = models
        .iter()
        .map(|model| {
            let backend = backend.clone();
            let messages = Arc::clone(&messages);
            let model = model.clone();
            Candidate::new(model.clone(), async move {
                backend
                    .chat(&model, &messages)
                    .await
                    .map_err(FailureDetail::from)
            })
        })
        .collect();

    let winner = race(candidates, race_config).await?;
    let ModelReply { content, usage } = winner.payload;
    let (translated_message, tone) = extract_translation(&content);

    Ok(Translation {
        translated_message,
        tone,
        model: winner.candidate_id,
        latency_ms: winner.latency_ms,
        usage,
    })
}
