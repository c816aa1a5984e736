// src/api/handlers/translate.rs
use actix_web::{web, HttpResponse, Result};
use serde_json::json;
use uuid::Uuid;

use crate::api::AppState;
use crate::errors::RelayError;
use crate::models::{TranslateRequest, TranslateResponse, TranslateResponseMetadata};
use crate::providers::openrouter::OpenRouterClient;
use crate::race::{RaceConfig, RaceError};
use crate::translator;

/// Core translation endpoint. Races every configured model and answers with
/// the first clean success. Total failure maps to 502 (every model failed)
/// or 504 (global deadline), with the per-candidate diagnostics in the body.
pub async fn translate(
    state: web::Data<AppState>,
    req: web::Json<TranslateRequest>,
) -> Result<HttpResponse> {
    let request_id = Uuid::new_v4().to_string();
    let req = req.into_inner();

    let backend = OpenRouterClient::new(state.client.clone(), state.config.openrouter.clone());
    let race_config = RaceConfig::new(state.config.global_timeout)
        .with_per_candidate_timeout(state.config.model_timeout);

    match translator::translate_raced(&backend, &state.config.models, &race_config, &req).await {
        Ok(translation) => {
            log::info!(
                "translation {} won by {} in {}ms",
                request_id,
                translation.model,
                translation.latency_ms
            );
            Ok(HttpResponse::Ok().json(TranslateResponse {
                translated_message: translation.translated_message,
                metadata: TranslateResponseMetadata {
                    tone: translation.tone,
                },
            }))
        }
        Err(RelayError::Race(RaceError::AllFailed { failures })) => {
            log::error!(
                "translation {}: all {} model calls failed: {}",
                request_id,
                failures.len(),
                serde_json::to_string(&failures).unwrap_or_default()
            );
            Ok(HttpResponse::BadGateway().json(json!({
                "error": "All model calls failed",
                "failures": failures,
            })))
        }
        Err(RelayError::Race(RaceError::DeadlineExceeded { deadline, failures })) => {
            log::error!(
                "translation {}: no model answered within {:?}",
                request_id,
                deadline
            );
            Ok(HttpResponse::GatewayTimeout().json(json!({
                "error": "Global timeout while waiting for models",
                "failures": failures,
            })))
        }
        Err(e) => {
            log::error!("translation {} failed: {}", request_id, e);
            Ok(HttpResponse::InternalServerError().json(json!({ "error": e.to_string() })))
        }
    }
}
