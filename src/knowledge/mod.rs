mod retrieval;
mod sync;

pub use retrieval::{latest_user_text, KnowledgeRetriever};
pub use sync::{sync_knowledge, SyncReport};
