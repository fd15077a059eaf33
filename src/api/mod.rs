pub mod client;
pub mod models;
pub mod response;

pub use client::{normalize_base_url, OpenAiClient};
pub use models::RequestBody;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::Message;

/// A chat model that may answer directly or ask for tool invocations.
#[async_trait]
pub trait ChatCompletionProvider: Send + Sync {
    async fn complete(&self, messages: &[Message], tools: &[Value]) -> Result<Message>;

    fn model_name(&self) -> &str;
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
