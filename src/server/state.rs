use std::sync::Arc;

use crate::api::OpenAiClient;
use crate::config::Config;
use crate::error::{BotError, Result};
use crate::knowledge::KnowledgeRetriever;
use crate::orchestrator::Orchestrator;
use crate::store::{
    GoogleSheetsStore, KnowledgeStore, SchedulingStore, ServiceAccountAuth, SupabaseKnowledgeStore,
};
use crate::tools::ToolRegistry;
use secrecy::ExposeSecret;

/// Shared, read-only handles built once at startup.
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub retriever: KnowledgeRetriever,
    pub schedule: Arc<dyn SchedulingStore>,
    pub knowledge: Arc<dyn KnowledgeStore>,
}

impl AppState {
    pub fn new(
        orchestrator: Orchestrator,
        retriever: KnowledgeRetriever,
        schedule: Arc<dyn SchedulingStore>,
        knowledge: Arc<dyn KnowledgeStore>,
    ) -> Self {
        Self {
            orchestrator,
            retriever,
            schedule,
            knowledge,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let chat = OpenAiClient::new(&config.chat.api_key, &config.chat.api_endpoint, &config.chat.model)?;
        let embedder = OpenAiClient::new(
            &config.embedding.api_key,
            &config.embedding.api_endpoint,
            &config.embedding.model,
        )?;

        let http = reqwest::Client::new();
        let auth = ServiceAccountAuth::new(
            http.clone(),
            &config.sheets.client_email,
            config.sheets.private_key.expose_secret(),
        )
        .map_err(|e| BotError::ConfigError(e.to_string()))?;
        let schedule: Arc<dyn SchedulingStore> = Arc::new(GoogleSheetsStore::new(
            http,
            auth,
            &config.sheets.spreadsheet_id,
            &config.sheets.sheet_name,
        ));

        let knowledge: Arc<dyn KnowledgeStore> = Arc::new(
            SupabaseKnowledgeStore::new(
                &config.supabase.url,
                &config.supabase.service_key,
                &config.supabase.qa_table,
                &config.supabase.documents_table,
                &config.supabase.match_function,
            )
            .map_err(|e| BotError::ConfigError(e.to_string()))?,
        );

        let tools = Arc::new(ToolRegistry::new(schedule.clone(), config.admin_password.clone()));
        let mut orchestrator = Orchestrator::new(Arc::new(chat), tools);
        if let Some(persona) = &config.chat.persona {
            orchestrator = orchestrator.with_persona(persona.clone());
        }

        let retriever = KnowledgeRetriever::new(Arc::new(embedder), knowledge.clone())
            .with_policy(config.embedding.match_count, config.embedding.match_threshold);

        Ok(Self::new(orchestrator, retriever, schedule, knowledge))
    }
}
