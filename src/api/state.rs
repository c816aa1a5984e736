// src/api/state.rs
use crate::config::AppConfig;
use reqwest::Client;
use std::sync::Arc;

/// Shared per-worker state. The reqwest client is safe for concurrent use by
/// all candidates of a race at once.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub client: Client,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            client: Client::new(),
        }
    }
}
