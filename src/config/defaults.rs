pub const DEFAULT_API_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_SHEET_NAME: &str = "Schedule";
pub const DEFAULT_QA_TABLE: &str = "faqs";
pub const DEFAULT_DOCUMENTS_TABLE: &str = "documents";
pub const DEFAULT_MATCH_FUNCTION: &str = "match_documents";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

pub fn default_match_count() -> usize {
    3
}

pub fn default_match_threshold() -> f32 {
    0.5
}
