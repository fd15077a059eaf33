use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

impl BotError {
    /// Message safe to hand back to the chat client.
    pub fn public_message(&self) -> String {
        match self {
            BotError::InvalidRequest(msg) => format!("Invalid request: {}", msg),
            BotError::ConfigError(_) => "The assistant is not configured correctly".to_string(),
            BotError::ApiError { .. } | BotError::NetworkError(_) => {
                "The language model service is unavailable".to_string()
            }
            _ => "Failed to process chat request".to_string(),
        }
    }
}

impl IntoResponse for BotError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Chat request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.public_message() })),
        )
            .into_response()
    }
}

impl From<String> for BotError {
    fn from(msg: String) -> Self {
        BotError::Other(msg)
    }
}

impl From<&str> for BotError {
    fn from(msg: &str) -> Self {
        BotError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
