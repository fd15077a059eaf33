use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::store::StoreError;

/// Failures reported back to the model as tool results.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unauthorized: the admin password is incorrect")]
    Unauthorized,
    #[error("Not found: no slot matches that date, time, subject and teacher")]
    NotFound,
    #[error("Conflict: that slot has already been booked")]
    Conflict,
    #[error("Unknown tool '{0}'")]
    UnknownTool(String),
    #[error("Invalid arguments for tool '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },
    #[error("Schedule store error: {0}")]
    Store(StoreError),
}

impl ToolError {
    pub fn invalid(tool: &str, message: impl Into<String>) -> Self {
        ToolError::InvalidArguments {
            tool: tool.to_string(),
            message: message.into(),
        }
    }
}

impl From<StoreError> for ToolError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ToolError::NotFound,
            StoreError::Conflict => ToolError::Conflict,
            other => ToolError::Store(other),
        }
    }
}

/// Outcome of one tool invocation, serialized into a `tool` message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolResult {
    Success(Value),
    Error { error: String },
}

impl ToolResult {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolResult::Error { .. })
    }

    pub fn to_content(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"error":"unserializable tool result"}"#.to_string())
    }
}

impl From<std::result::Result<Value, ToolError>> for ToolResult {
    fn from(result: std::result::Result<Value, ToolError>) -> Self {
        match result {
            Ok(value) => ToolResult::Success(value),
            Err(err) => ToolResult::Error {
                error: err.to_string(),
            },
        }
    }
}
