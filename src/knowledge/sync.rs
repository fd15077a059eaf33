use serde::Serialize;

use crate::api::EmbeddingProvider;
use crate::error::Result;
use crate::models::KnowledgeDocument;
use crate::store::KnowledgeStore;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub total_pairs: usize,
    pub skipped: usize,
    pub inserted: usize,
    pub failed: usize,
}

/// Rebuilds the vector index from the Q&A source.
///
/// Listing or clearing failures abort the run. Per-pair embedding or insert
/// failures are logged and counted, and the batch continues. With `dry_run`
/// nothing is deleted, embedded or inserted; `inserted` then counts the
/// pairs that would be indexed.
pub async fn sync_knowledge(
    embedder: &dyn EmbeddingProvider,
    store: &dyn KnowledgeStore,
    dry_run: bool,
) -> Result<SyncReport> {
    let pairs = store.list_qa_pairs().await?;
    let mut report = SyncReport {
        total_pairs: pairs.len(),
        ..SyncReport::default()
    };
    tracing::info!(pairs = pairs.len(), dry_run, "Loaded knowledge base pairs");

    if !dry_run {
        store.clear_documents().await?;
        tracing::info!("Cleared indexed documents");
    }

    for (index, pair) in pairs.iter().enumerate() {
        let Some((question, answer)) = pair.complete() else {
            tracing::warn!(row = index + 1, "Skipping pair without question or answer");
            report.skipped += 1;
            continue;
        };

        if dry_run {
            tracing::info!(question, "Would index");
            report.inserted += 1;
            continue;
        }

        let content = KnowledgeDocument::format_content(question, answer);
        let embedding = match embedder.embed(&content).await {
            Ok(embedding) => embedding,
            Err(e) => {
                tracing::error!(question, error = %e, "Embedding failed");
                report.failed += 1;
                continue;
            }
        };

        let document = KnowledgeDocument::from_pair(question, answer, embedding);
        match store.insert_document(&document).await {
            Ok(()) => {
                report.inserted += 1;
                tracing::info!(question, inserted = report.inserted, "Indexed");
            }
            Err(e) => {
                tracing::error!(question, error = %e, "Insert failed");
                report.failed += 1;
            }
        }
    }

    Ok(report)
}
