mod auth;
mod compose;
mod config;
mod fetch;
mod ingest;
mod platform;
#[cfg(test)]
mod testing;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::fetch::AttachmentFetcher;
use crate::ingest::Ingestor;
use crate::platform::telegram::TelegramTransport;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,notebridge=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Notes directory: {}", config.notes.directory.display());
    info!("  Authorized user: {}", config.telegram.authorized_user_id);

    let transport = TelegramTransport::connect(&config.telegram)
        .await
        .context("Failed to start Telegram transport")?;

    info!("Bot is running, waiting for messages...");
    let mut ingestor = Ingestor::new(&config, transport, AttachmentFetcher::new());
    ingestor.run().await;

    Ok(())
}
