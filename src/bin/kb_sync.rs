use anyhow::Context;
use clap::Parser;

use tuitionbot::api::OpenAiClient;
use tuitionbot::cli::SyncArgs;
use tuitionbot::config::{self, EmbeddingSettings, FileConfig, SupabaseSettings};
use tuitionbot::knowledge::sync_knowledge;
use tuitionbot::logging;
use tuitionbot::store::SupabaseKnowledgeStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = SyncArgs::parse();
    config::load_dotenv();

    let file = FileConfig::load(args.config.as_deref())?;
    logging::init(args.verbose || config::load_verbose(&config::env_lookup, &file));

    let embedding = EmbeddingSettings::load(&config::env_lookup, &file)?;
    let supabase = SupabaseSettings::load(&config::env_lookup, &file)?;

    let embedder = OpenAiClient::new(&embedding.api_key, &embedding.api_endpoint, &embedding.model)?;
    let store = SupabaseKnowledgeStore::new(
        &supabase.url,
        &supabase.service_key,
        &supabase.qa_table,
        &supabase.documents_table,
        &supabase.match_function,
    )
    .context("Failed to create knowledge store client")?;

    let report = sync_knowledge(&embedder, &store, args.dry_run)
        .await
        .context("Knowledge sync aborted")?;

    tracing::info!(
        total = report.total_pairs,
        inserted = report.inserted,
        skipped = report.skipped,
        failed = report.failed,
        dry_run = args.dry_run,
        "Knowledge sync finished"
    );
    Ok(())
}
