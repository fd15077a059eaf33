//! Runtime configuration.
//!
//! Credentials come from the environment (a `.env` file is honoured);
//! non-secret tuning comes from an optional YAML file. Precedence is
//! CLI > env > file > default. Each section loads on its own so a binary only
//! requires the credentials it actually uses.
//!
//! # Environment Variables
//!
//! - `OPENAI_API_KEY` - chat completion key (required by the server)
//! - `AI_API_ENDPOINT`, `AI_MODEL` - optional provider overrides
//! - `EMBEDDING_API_KEY` - embedding key, falls back to `OPENAI_API_KEY`
//! - `EMBEDDING_MODEL` - optional embedding model override
//! - `GOOGLE_SHEET_ID`, `GOOGLE_SERVICE_ACCOUNT_EMAIL`, `GOOGLE_PRIVATE_KEY` - schedule sheet
//! - `SCHEDULE_SHEET_NAME` - optional tab name
//! - `SUPABASE_URL`, `SUPABASE_SERVICE_KEY` - knowledge store
//! - `ADMIN_PASSWORD` - secret gating the schedule-creation tools
//! - `HOST`, `PORT`, `AI_VERBOSE` - optional server settings

pub mod defaults;
mod file;

pub use file::{ApiConfig, FileConfig, KnowledgeConfig, ModelConfig, ScheduleConfig, SessionConfig};

use secrecy::SecretString;
use std::env;
use std::net::IpAddr;

use crate::cli::Args;
use crate::error::{BotError, Result};
use defaults::*;

/// Source of environment values; `std::env` in production, a map in tests.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Loads `.env` if present; a missing file is not an error.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

fn optional(lookup: Lookup<'_>, key: &str) -> Option<String> {
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn required(lookup: Lookup<'_>, key: &str) -> Result<String> {
    optional(lookup, key)
        .ok_or_else(|| BotError::ConfigError(format!("{} environment variable not set", key)))
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

pub struct ChatSettings {
    pub api_key: SecretString,
    pub api_endpoint: String,
    pub model: String,
    pub persona: Option<String>,
}

impl ChatSettings {
    pub fn load(lookup: Lookup<'_>, file: &FileConfig) -> Result<Self> {
        Ok(Self {
            api_key: SecretString::from(required(lookup, "OPENAI_API_KEY")?),
            api_endpoint: optional(lookup, "AI_API_ENDPOINT")
                .or_else(|| file.api.endpoint.clone())
                .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
            model: optional(lookup, "AI_MODEL")
                .or_else(|| file.model.default_model.clone())
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            persona: file.model.persona.clone(),
        })
    }
}

pub struct EmbeddingSettings {
    pub api_key: SecretString,
    pub api_endpoint: String,
    pub model: String,
    pub match_count: usize,
    pub match_threshold: f32,
}

impl EmbeddingSettings {
    pub fn load(lookup: Lookup<'_>, file: &FileConfig) -> Result<Self> {
        let api_key = optional(lookup, "EMBEDDING_API_KEY")
            .or_else(|| optional(lookup, "OPENAI_API_KEY"))
            .ok_or_else(|| {
                BotError::ConfigError(
                    "EMBEDDING_API_KEY or OPENAI_API_KEY environment variable not set".to_string(),
                )
            })?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            api_endpoint: optional(lookup, "AI_API_ENDPOINT")
                .or_else(|| file.api.endpoint.clone())
                .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
            model: optional(lookup, "EMBEDDING_MODEL")
                .or_else(|| file.knowledge.embedding_model.clone())
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            match_count: file.knowledge.match_count,
            match_threshold: file.knowledge.match_threshold,
        })
    }
}

pub struct SheetsSettings {
    pub spreadsheet_id: String,
    pub client_email: String,
    pub private_key: SecretString,
    pub sheet_name: String,
}

impl SheetsSettings {
    pub fn load(lookup: Lookup<'_>, file: &FileConfig) -> Result<Self> {
        // Keys pasted into .env files usually carry literal "\n" sequences.
        let private_key = required(lookup, "GOOGLE_PRIVATE_KEY")?.replace("\\n", "\n");

        Ok(Self {
            spreadsheet_id: required(lookup, "GOOGLE_SHEET_ID")?,
            client_email: required(lookup, "GOOGLE_SERVICE_ACCOUNT_EMAIL")?,
            private_key: SecretString::from(private_key),
            sheet_name: optional(lookup, "SCHEDULE_SHEET_NAME")
                .or_else(|| file.schedule.sheet_name.clone())
                .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string()),
        })
    }
}

pub struct SupabaseSettings {
    pub url: String,
    pub service_key: SecretString,
    pub qa_table: String,
    pub documents_table: String,
    pub match_function: String,
}

impl SupabaseSettings {
    pub fn load(lookup: Lookup<'_>, file: &FileConfig) -> Result<Self> {
        let knowledge = &file.knowledge;
        Ok(Self {
            url: required(lookup, "SUPABASE_URL")?,
            service_key: SecretString::from(required(lookup, "SUPABASE_SERVICE_KEY")?),
            qa_table: knowledge.qa_table.clone().unwrap_or_else(|| DEFAULT_QA_TABLE.to_string()),
            documents_table: knowledge
                .documents_table
                .clone()
                .unwrap_or_else(|| DEFAULT_DOCUMENTS_TABLE.to_string()),
            match_function: knowledge
                .match_function
                .clone()
                .unwrap_or_else(|| DEFAULT_MATCH_FUNCTION.to_string()),
        })
    }
}

pub fn load_admin_password(lookup: Lookup<'_>) -> Result<SecretString> {
    required(lookup, "ADMIN_PASSWORD").map(SecretString::from)
}

pub fn load_verbose(lookup: Lookup<'_>, file: &FileConfig) -> bool {
    optional(lookup, "AI_VERBOSE")
        .map(|v| is_truthy(&v))
        .or(file.session.verbose)
        .unwrap_or(false)
}

pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerSettings {
    pub fn load(lookup: Lookup<'_>, args: &Args) -> Result<Self> {
        let host = match args.host.clone().or_else(|| optional(lookup, "HOST")) {
            Some(host) => host
                .parse()
                .map_err(|_| BotError::ConfigError(format!("Invalid HOST value: {}", host)))?,
            None => DEFAULT_HOST
                .parse()
                .map_err(|_| BotError::ConfigError("Invalid default host".to_string()))?,
        };

        let port = match args.port {
            Some(port) => port,
            None => match optional(lookup, "PORT") {
                Some(port) => port
                    .parse()
                    .map_err(|_| BotError::ConfigError(format!("Invalid PORT value: {}", port)))?,
                None => DEFAULT_PORT,
            },
        };

        Ok(Self { host, port })
    }
}

/// Everything the chat server needs; fails on the first missing credential.
pub struct Config {
    pub chat: ChatSettings,
    pub embedding: EmbeddingSettings,
    pub sheets: SheetsSettings,
    pub supabase: SupabaseSettings,
    pub admin_password: SecretString,
    pub server: ServerSettings,
    pub verbose: bool,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file = FileConfig::load(args.config.as_deref())
            .map_err(|e| BotError::ConfigError(format!("{:#}", e)))?;
        Self::from_lookup(&env_lookup, &file, args)
    }

    pub fn from_lookup(lookup: Lookup<'_>, file: &FileConfig, args: &Args) -> Result<Self> {
        Ok(Config {
            chat: ChatSettings::load(lookup, file)?,
            embedding: EmbeddingSettings::load(lookup, file)?,
            sheets: SheetsSettings::load(lookup, file)?,
            supabase: SupabaseSettings::load(lookup, file)?,
            admin_password: load_admin_password(lookup)?,
            server: ServerSettings::load(lookup, args)?,
            verbose: args.verbose || load_verbose(lookup, file),
        })
    }
}
