// src/feedback.rs
//
// Append-only JSONL feedback log for offline analysis. One record per line,
// never read back by the service itself.

use std::path::Path;

use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::errors::Result;
use crate::models::FeedbackRequest;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackRecord<'a> {
    timestamp: String,
    original_input: &'a str,
    correction_text: &'a str,
    anonymous_id: Option<&'a str>,
    rating: Option<i32>,
}

/// Appends one feedback submission to the log at `path`.
pub async fn append_feedback(path: &Path, req: &FeedbackRequest) -> Result<()> {
    let record = FeedbackRecord {
        timestamp: chrono::Utc::now().to_rfc3339(),
        original_input: &req.original_input,
        correction_text: &req.correction_text,
        anonymous_id: req.anonymous_id.as_deref(),
        rating: req.rating,
    };

    let mut line = serde_json::to_string(&record)?;
    line.push('\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;

    Ok(())
}
