use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "tuitionbot")]
#[command(about = "Tuition centre support chatbot server", long_about = None)]
pub struct Args {
    #[arg(long = "host", help = "Address to bind (overrides HOST)")]
    pub host: Option<String>,

    #[arg(short = 'p', long = "port", help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(short = 'c', long = "config", help = "Path to a YAML or JSON config file")]
    pub config: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", help = "Enable debug logging")]
    pub verbose: bool,
}

#[derive(Parser, Debug, Default)]
#[command(name = "kb-sync")]
#[command(about = "Rebuild the vector index from the knowledge base Q&A pairs", long_about = None)]
pub struct SyncArgs {
    #[arg(long = "dry-run", help = "List the pairs that would be indexed without writing")]
    pub dry_run: bool,

    #[arg(short = 'c', long = "config", help = "Path to a YAML or JSON config file")]
    pub config: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", help = "Enable debug logging")]
    pub verbose: bool,
}
