// src/api/handlers/feedback.rs
use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::api::AppState;
use crate::feedback;
use crate::models::{FeedbackRequest, FeedbackResponse};

/// Stores feedback in JSONL format for offline analysis. Returns 202 on
/// success.
pub async fn submit_feedback(
    state: web::Data<AppState>,
    req: web::Json<FeedbackRequest>,
) -> Result<HttpResponse> {
    match feedback::append_feedback(&state.config.feedback_log_path, &req).await {
        Ok(()) => Ok(HttpResponse::Accepted().json(FeedbackResponse::accepted())),
        Err(e) => {
            log::error!("Failed to store feedback: {}", e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "error": format!("Failed to store feedback: {e}")
            })))
        }
    }
}
