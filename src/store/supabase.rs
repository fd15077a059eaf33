use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use super::{error_for_status, KnowledgeStore, StoreError, StoreResult};
use crate::models::{KnowledgeDocument, KnowledgeMatch, QaPair};

/// Knowledge base held in Supabase, reached through its PostgREST API.
pub struct SupabaseKnowledgeStore {
    client: reqwest::Client,
    rest_url: String,
    qa_table: String,
    documents_table: String,
    match_function: String,
}

impl SupabaseKnowledgeStore {
    pub fn new(
        base_url: &str,
        service_key: &SecretString,
        qa_table: impl Into<String>,
        documents_table: impl Into<String>,
        match_function: impl Into<String>,
    ) -> StoreResult<Self> {
        let key = service_key.expose_secret();
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(key)
                .map_err(|e| StoreError::Auth(format!("invalid Supabase key: {}", e)))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| StoreError::Auth(format!("invalid Supabase key: {}", e)))?,
        );

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", base_url.trim_end_matches('/')),
            qa_table: qa_table.into(),
            documents_table: documents_table.into(),
            match_function: match_function.into(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    /// Delete-all request for the documents table. PostgREST refuses
    /// unfiltered deletes, so the filter matches any non-null `id`
    /// whatever its type.
    fn clear_request(&self) -> StoreResult<reqwest::Request> {
        Ok(self
            .client
            .delete(self.table_url(&self.documents_table))
            .query(&[("id", "not.is.null")])
            .build()?)
    }
}

#[async_trait]
impl KnowledgeStore for SupabaseKnowledgeStore {
    async fn match_documents(
        &self,
        embedding: &[f32],
        threshold: f32,
        count: usize,
    ) -> StoreResult<Vec<KnowledgeMatch>> {
        let url = format!("{}/rpc/{}", self.rest_url, self.match_function);
        let response = self
            .client
            .post(url)
            .json(&json!({
                "query_embedding": embedding,
                "match_threshold": threshold,
                "match_count": count,
            }))
            .send()
            .await?;
        let response = error_for_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(format!("match results: {}", e)))
    }

    async fn list_qa_pairs(&self) -> StoreResult<Vec<QaPair>> {
        let response = self
            .client
            .get(self.table_url(&self.qa_table))
            .query(&[("select", "question,answer")])
            .send()
            .await?;
        let response = error_for_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(format!("knowledge rows: {}", e)))
    }

    async fn clear_documents(&self) -> StoreResult<()> {
        let response = self.client.execute(self.clear_request()?).await?;
        error_for_status(response).await?;
        Ok(())
    }

    async fn insert_document(&self, document: &KnowledgeDocument) -> StoreResult<()> {
        let response = self
            .client
            .post(self.table_url(&self.documents_table))
            .header("Prefer", "return=minimal")
            .json(document)
            .send()
            .await?;
        error_for_status(response).await?;
        Ok(())
    }
}
