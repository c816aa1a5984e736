// src/models.rs
//
// Wire-format types for the public REST API. Field names stay camelCase on
// the wire for compatibility with existing clients.

use serde::{Deserialize, Serialize};

/// Body of POST /api/v1/translate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    /// The text or emoji chain to be translated.
    pub original_message: String,
    /// true translates text to emoji; false translates emoji back to text.
    pub is_to_emoji: bool,
    /// Optional recent messages for contextual translation.
    #[serde(default)]
    pub chat_history: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub translated_message: String,
    pub metadata: TranslateResponseMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponseMetadata {
    /// Assessed emotional tone (e.g., "Extreme Laughter", "Mild Sarcasm").
    pub tone: Option<String>,
}

/// Body of POST /api/v1/feedback.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// Original text/emoji input that triggered the translation.
    pub original_input: String,
    /// User-provided correct/suggested translation.
    pub correction_text: String,
    /// Anonymous identifier used to track the source of the feedback.
    #[serde(default)]
    pub anonymous_id: Option<String>,
    /// Anonymous score provided by the user (e.g., 1 to 5).
    #[serde(default)]
    pub rating: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackResponse {
    pub status: String,
}

impl FeedbackResponse {
    pub fn accepted() -> Self {
        Self {
            status: "accepted".to_string(),
        }
    }
}
