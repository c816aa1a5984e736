// src/bin/benchmark.rs
//
// Sequential latency benchmark across the configured models. Runs every model
// against a fixed set of emoji/text test cases, one call at a time, prints a
// summary, and writes a timestamped JSON report. No racing here: sequential
// calls keep each measurement attributable to a single in-flight request.

use std::time::Instant;

use reqwest::Client;
use serde::Serialize;

use emoji_relay::config::AppConfig;
use emoji_relay::errors::RelayError;
use emoji_relay::providers::openrouter::OpenRouterClient;
use emoji_relay::providers::{ChatBackend, ChatMessage, TokenUsage};

const EMOJI_CASES: &[&str] = &["🎉🎂🎈", "😂😂💀", "🏃‍♂️💨⏰"];
const TEXT_CASES: &[&str] = &[
    "Happy birthday! Hope you have a great party",
    "I'm running late, see you in ten minutes",
];

#[derive(Debug, Serialize)]
struct BenchmarkResult {
    model: String,
    test_type: &'static str,
    input: String,
    output: String,
    latency_ms: u64,
    success: bool,
    tokens: Option<TokenUsage>,
    timestamp: String,
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  Warning: Could not load .env file: {}", e);
    }
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config =
        AppConfig::from_env().expect("Failed to load app configuration from environment");
    let backend = OpenRouterClient::new(Client::new(), config.openrouter.clone());

    let mut results = Vec::new();

    for model in &config.models {
        println!("\n🏎️  Benchmarking {model}");

        for emojis in EMOJI_CASES {
            results.push(run_case(&backend, model, "emoji_to_text", emojis).await);
        }
        for text in TEXT_CASES {
            results.push(run_case(&backend, model, "text_to_emoji", text).await);
        }
    }

    summarize(&results);

    let report_path = format!(
        "benchmark_results_{}.json",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );
    match serde_json::to_string_pretty(&results) {
        Ok(json) => match std::fs::write(&report_path, json) {
            Ok(()) => println!("\n💾 Results written to {report_path}"),
            Err(e) => eprintln!("❌ Failed to write {report_path}: {e}"),
        },
        Err(e) => eprintln!("❌ Failed to serialize results: {e}"),
    }
}

async fn run_case(
    backend: &OpenRouterClient,
    model: &str,
    test_type: &'static str,
    input: &str,
) -> BenchmarkResult {
    let messages = match test_type {
        "emoji_to_text" => vec![
            ChatMessage::system(
                "You are an expert at translating emojis to text. Provide clear, concise translations.",
            ),
            ChatMessage::user(format!("Translate these emojis to text: {input}")),
        ],
        _ => vec![
            ChatMessage::system(
                "You are an expert at translating text to emojis. Respond with emojis only.",
            ),
            ChatMessage::user(format!("Translate this text to emojis: {input}")),
        ],
    };

    let start = Instant::now();
    match backend.chat(model, &messages).await {
        Ok(reply) => {
            let latency_ms = start.elapsed().as_millis() as u64;
            println!("  ✅ {test_type} ({latency_ms}ms): {}", reply.content.trim());
            BenchmarkResult {
                model: model.to_string(),
                test_type,
                input: input.to_string(),
                output: reply.content,
                latency_ms,
                success: true,
                tokens: Some(reply.usage),
                timestamp: chrono::Utc::now().to_rfc3339(),
            }
        }
        Err(e) => {
            let latency_ms = start.elapsed().as_millis() as u64;
            let message = match &e {
                RelayError::ApiError { status, .. } => format!("HTTP {status}"),
                other => other.to_string(),
            };
            println!("  ❌ {test_type} ({latency_ms}ms): {message}");
            BenchmarkResult {
                model: model.to_string(),
                test_type,
                input: input.to_string(),
                output: message,
                latency_ms,
                success: false,
                tokens: None,
                timestamp: chrono::Utc::now().to_rfc3339(),
            }
        }
    }
}

fn summarize(results: &[BenchmarkResult]) {
    println!("\n📊 Summary");

    // Results arrive grouped by model, so consecutive dedup is enough.
    let mut models: Vec<&str> = results.iter().map(|r| r.model.as_str()).collect();
    models.dedup();

    for model in models {
        let runs: Vec<&BenchmarkResult> = results.iter().filter(|r| r.model == model).collect();
        let successes = runs.iter().filter(|r| r.success).count();
        let avg_latency_ms = if successes > 0 {
            runs.iter()
                .filter(|r| r.success)
                .map(|r| r.latency_ms)
                .sum::<u64>()
                / successes as u64
        } else {
            0
        };
        println!(
            "  {model}: {successes}/{} ok, avg {avg_latency_ms}ms",
            runs.len()
        );
    }
}
