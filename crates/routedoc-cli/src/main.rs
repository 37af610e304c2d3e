//! CLI entry point - the composition root.

use anyhow::Context;
use clap::Parser;
use routedoc_axum::Server;
use routedoc_cli::Cli;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads ROUTEDOC_*
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = cli.server_config();
    let mut server = Server::from_config(&config);
    server.get("/health", || async { "OK" });

    let handle = server
        .listen(config.port)
        .await
        .with_context(|| format!("Failed to start server on port {}", config.port))?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!("Received Ctrl-C");

    handle.close_with_timeout(config.shutdown_timeout).await?;
    Ok(())
}
