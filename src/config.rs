// src/config.rs
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{RelayError, Result};

/// Configuration for the OpenRouter backend.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_base: String,
    pub api_key: String,
    /// Sent as HTTP-Referer; recommended by OpenRouter for request attribution.
    pub referer: String,
    /// Sent as X-Title.
    pub app_title: String,
}

/// High-level application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openrouter: OpenRouterConfig,
    /// Model ids raced against each other on every translation request.
    pub models: Vec<String>,
    /// Maximum wall-clock duration for one whole race.
    pub global_timeout: Duration,
    /// Maximum duration for any single model call within a race.
    pub model_timeout: Duration,
    pub feedback_log_path: PathBuf,
}

const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";

/// Free-tier models raced when OPENROUTER_MODELS is unset.
const DEFAULT_MODELS: &str = "mistralai/mistral-7b-instruct:free,\
deepseek/deepseek-r1:free,\
deepseek/deepseek-r1-distill-llama-70b:free,\
cognitivecomputations/dolphin3.0-mistral-24b:free,\
cognitivecomputations/dolphin-mistral-24b-venice-edition:free";

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY").map_err(|_| {
            RelayError::Config("OPENROUTER_API_KEY is not set in the environment".to_string())
        })?;
        let api_base =
            std::env::var("OPENROUTER_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let referer = std::env::var("OPENROUTER_REFERER")
            .unwrap_or_else(|_| "https://emoji-relay.example.com".to_string());

        let models_str =
            std::env::var("OPENROUTER_MODELS").unwrap_or_else(|_| DEFAULT_MODELS.to_string());
        let models = parse_model_list(&models_str)?;

        let global_timeout = duration_from_env("RACE_GLOBAL_TIMEOUT_MS", 40_000)?;
        let model_timeout = duration_from_env("RACE_MODEL_TIMEOUT_MS", 30_000)?;

        let feedback_log_path = std::env::var("FEEDBACK_LOG_PATH")
            .unwrap_or_else(|_| "feedback_log.jsonl".to_string())
            .into();

        Ok(AppConfig {
            openrouter: OpenRouterConfig {
                api_base,
                api_key,
                referer,
                app_title: "emoji-relay".to_string(),
            },
            models,
            global_timeout,
            model_timeout,
            feedback_log_path,
        })
    }
}

fn parse_model_list(raw: &str) -> Result<Vec<String>> {
    let models: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if models.is_empty() {
        return Err(RelayError::Config(
            "OPENROUTER_MODELS does not name any model".to_string(),
        ));
    }

    Ok(models)
}

fn duration_from_env(var: &str, default_ms: u64) -> Result<Duration> {
    let ms = match std::env::var(var) {
        Ok(raw) => raw.parse::<u64>().map_err(|_| {
            RelayError::Config(format!(
                "{var} must be a whole number of milliseconds, got '{raw}'"
            ))
        })?,
        Err(_) => default_ms,
    };

    if ms == 0 {
        return Err(RelayError::Config(format!("{var} must be positive")));
    }

    Ok(Duration::from_millis(ms))
}
