use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use super::models::{EmbeddingRequest, EmbeddingResponse, RequestBody};
use super::response::parse_assistant_message;
use super::{ChatCompletionProvider, EmbeddingProvider};
use crate::error::{BotError, Result};
use crate::models::Message;

/// Accepts a base URL with or without `/v1` (or a full completions URL)
/// and returns the `/v1` base.
pub fn normalize_base_url(endpoint: &str) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    if let Some(base) = endpoint.strip_suffix("/chat/completions") {
        base.to_string()
    } else if endpoint.ends_with("/v1") {
        endpoint.to_string()
    } else {
        format!("{}/v1", endpoint)
    }
}

/// Client for OpenAI-compatible chat completion and embedding endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: &SecretString, api_endpoint: &str, model: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
                .map_err(|e| BotError::ConfigError(format!("Invalid authorization header: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base_url(api_endpoint),
            model: model.into(),
        })
    }

    async fn post_json<T: serde::Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BotError::ApiError {
                status,
                message: error_text,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ChatCompletionProvider for OpenAiClient {
    async fn complete(&self, messages: &[Message], tools: &[Value]) -> Result<Message> {
        let request_body = RequestBody {
            model: &self.model,
            messages,
            tools: if tools.is_empty() { None } else { Some(tools) },
            tool_choice: if tools.is_empty() { None } else { Some("auto") },
        };

        tracing::debug!(model = %self.model, messages = messages.len(), "Sending chat completion request");
        let response_json = self.post_json("chat/completions", &request_body).await?;
        parse_assistant_message(&response_json)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };
        let response_json = self.post_json("embeddings", &request).await?;
        let response: EmbeddingResponse = serde_json::from_value(response_json)?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| BotError::Other("Embedding response contained no data".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url_variants() {
        assert_eq!(normalize_base_url("https://api.openai.com/v1"), "https://api.openai.com/v1");
        assert_eq!(normalize_base_url("https://api.openai.com/v1/"), "https://api.openai.com/v1");
        assert_eq!(normalize_base_url("http://localhost:11434"), "http://localhost:11434/v1");
        assert_eq!(
            normalize_base_url("https://openrouter.ai/api/v1/chat/completions"),
            "https://openrouter.ai/api/v1"
        );
    }
}
