use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use tuitionbot::cli::Args;
use tuitionbot::config::{self, Config};
use tuitionbot::logging;
use tuitionbot::server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    config::load_dotenv();

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            logging::init(args.verbose);
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    logging::init(config.verbose);

    let state = Arc::new(AppState::from_config(&config)?);
    info!(model = %config.chat.model, sheet = %config.sheets.sheet_name, "Application state ready");

    let app = create_router(state);
    let addr = SocketAddr::new(config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
