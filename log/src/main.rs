//! Message log HTTP server binary entry point.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use message_log::MessageLog;
use message_log::server::{CliArgs, MessageLogServer, MessageLogServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI arguments
    let args = CliArgs::parse();

    let log_config = args.to_log_config();
    let server_config = MessageLogServerConfig::from(&args);

    tracing::info!("Opening message log with config: {:?}", log_config);

    let log = MessageLog::open(log_config)
        .await
        .context("Failed to open message log")?;

    let server = MessageLogServer::new(Arc::new(log), server_config);
    server.run().await.context("HTTP server failed")?;

    Ok(())
}
