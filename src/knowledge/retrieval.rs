use std::sync::Arc;

use crate::api::EmbeddingProvider;
use crate::config::defaults::{default_match_count, default_match_threshold};
use crate::models::{Message, Role};
use crate::store::KnowledgeStore;

/// Best-effort context lookup for the system prompt.
pub struct KnowledgeRetriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn KnowledgeStore>,
    match_count: usize,
    match_threshold: f32,
}

impl KnowledgeRetriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn KnowledgeStore>) -> Self {
        Self {
            embedder,
            store,
            match_count: default_match_count(),
            match_threshold: default_match_threshold(),
        }
    }

    pub fn with_policy(mut self, match_count: usize, match_threshold: f32) -> Self {
        self.match_count = match_count;
        self.match_threshold = match_threshold;
        self
    }

    /// Matched entries joined by blank lines; empty on any failure.
    pub async fn context_for(&self, query: &str) -> String {
        let query = query.trim();
        if query.is_empty() {
            return String::new();
        }

        let embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                tracing::warn!(error = %e, "Embedding failed, continuing without context");
                return String::new();
            }
        };

        match self
            .store
            .match_documents(&embedding, self.match_threshold, self.match_count)
            .await
        {
            Ok(matches) => {
                tracing::debug!(matches = matches.len(), "Knowledge base lookup finished");
                matches
                    .into_iter()
                    .take(self.match_count)
                    .map(|m| m.content.trim().to_string())
                    .filter(|content| !content.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n\n")
            }
            Err(e) => {
                tracing::warn!(error = %e, "Knowledge store lookup failed, continuing without context");
                String::new()
            }
        }
    }
}

/// Text of the most recent user message, if any.
pub fn latest_user_text(messages: &[Message]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(Message::text_content)
}
