// tests/translator_tests.rs
//
// End-to-end translator behavior against a scripted in-process backend, so
// the race and the response parsing are exercised without any network.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use emoji_relay::errors::{RelayError, Result};
use emoji_relay::models::TranslateRequest;
use emoji_relay::providers::{ChatBackend, ChatMessage, ModelReply, TokenUsage};
use emoji_relay::race::{FailureDetail, RaceConfig, RaceError};
use emoji_relay::translator::translate_raced;
use tokio::time::sleep;

/// What one scripted model does: wait, then answer or fail.
#[derive(Clone)]
struct Script {
    delay: Duration,
    reply: std::result::Result<String, u16>,
}

#[derive(Clone)]
struct ScriptedBackend {
    scripts: Arc<HashMap<String, Script>>,
}

impl ScriptedBackend {
    fn new(scripts: Vec<(&str, Script)>) -> Self {
        Self {
            scripts: Arc::new(
                scripts
                    .into_iter()
                    .map(|(model, script)| (model.to_string(), script))
                    .collect(),
            ),
        }
    }
}

impl ChatBackend for ScriptedBackend {
    async fn chat(&self, model: &str, _messages: &[ChatMessage]) -> Result<ModelReply> {
        let script = self.scripts.get(model).cloned().ok_or_else(|| {
            RelayError::UnexpectedResponse(format!("no script for model '{model}'"))
        })?;

        sleep(script.delay).await;

        match script.reply {
            Ok(content) => Ok(ModelReply {
                content,
                usage: TokenUsage::default(),
            }),
            Err(status) => Err(RelayError::ApiError {
                status,
                body: "scripted failure".to_string(),
            }),
        }
    }
}

fn request() -> TranslateRequest {
    TranslateRequest {
        original_message: "see you at the party".to_string(),
        is_to_emoji: true,
        chat_history: None,
    }
}

fn models(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[tokio::test(start_paused = true)]
async fn fastest_clean_success_is_parsed_and_attributed() {
    let backend = ScriptedBackend::new(vec![
        (
            "fast",
            Script {
                delay: Duration::from_millis(20),
                reply: Ok(
                    r#"{"translatedMessage": "🎉🥳", "metadata": {"tone": "Excited"}}"#.to_string(),
                ),
            },
        ),
        (
            "slow",
            Script {
                delay: Duration::from_millis(100),
                reply: Ok(r#"{"translatedMessage": "🎊"}"#.to_string()),
            },
        ),
    ]);
    let race_config = RaceConfig::new(Duration::from_millis(500));

    let translation = translate_raced(&backend, &models(&["fast", "slow"]), &race_config, &request())
        .await
        .expect("expected a translation");

    assert_eq!(translation.model, "fast");
    assert_eq!(translation.translated_message, "🎉🥳");
    assert_eq!(translation.tone.as_deref(), Some("Excited"));
}

#[tokio::test(start_paused = true)]
async fn backend_errors_surface_as_normalized_race_failures() {
    let backend = ScriptedBackend::new(vec![
        (
            "down",
            Script {
                delay: Duration::from_millis(10),
                reply: Err(503),
            },
        ),
        (
            "limited",
            Script {
                delay: Duration::from_millis(20),
                reply: Err(429),
            },
        ),
    ]);
    let race_config = RaceConfig::new(Duration::from_millis(500));

    let err = translate_raced(&backend, &models(&["down", "limited"]), &race_config, &request())
        .await
        .expect_err("expected total failure");

    match err {
        RelayError::Race(RaceError::AllFailed { failures }) => {
            assert_eq!(failures.len(), 2);
            assert_eq!(failures[0].candidate_id, "down");
            assert!(matches!(
                failures[0].detail,
                FailureDetail::Api { status: 503, .. }
            ));
            assert!(matches!(
                failures[1].detail,
                FailureDetail::Api { status: 429, .. }
            ));
        }
        other => panic!("expected AllFailed, got {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn one_clean_success_among_failures_wins() {
    let backend = ScriptedBackend::new(vec![
        (
            "broken",
            Script {
                delay: Duration::from_millis(5),
                reply: Err(500),
            },
        ),
        (
            "working",
            Script {
                delay: Duration::from_millis(60),
                reply: Ok("not json at all 🎈".to_string()),
            },
        ),
    ]);
    let race_config = RaceConfig::new(Duration::from_millis(500));

    let translation = translate_raced(
        &backend,
        &models(&["broken", "working"]),
        &race_config,
        &request(),
    )
    .await
    .expect("expected a translation");

    assert_eq!(translation.model, "working");
    // Unparseable output falls back to the raw content.
    assert_eq!(translation.translated_message, "not json at all 🎈");
    assert_eq!(translation.tone, None);
}
