// src/errors.rs
use thiserror::Error;

use crate::race::{FailureDetail, RaceError};

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Failed to read or write file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Unexpected response structure: {0}")]
    UnexpectedResponse(String),

    #[error("Received empty text response from model")]
    EmptyResponse,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Race(#[from] RaceError),
}

pub type Result<T> = std::result::Result<T, RelayError>;

/// Normalizes a backend call error into the per-candidate failure taxonomy
/// before it reaches the race coordinator.
impl From<RelayError> for FailureDetail {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::ApiError { status, body } => FailureDetail::Api { status, body },
            RelayError::Request(e) if e.is_timeout() => FailureDetail::TimedOut,
            other => FailureDetail::Transport {
                message: other.to_string(),
            },
        }
    }
}
