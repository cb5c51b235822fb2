//! Keyword reactor entry point: wire the Telegram adapter to the engine and
//! run the sequential event loop.

use std::sync::Arc;
use std::time::Duration;

use reactor_common::config::{self, AppConfig};
use reactor_engine::dedup::DedupStore;
use reactor_engine::filter::UserFilter;
use reactor_engine::matcher::KeywordRegistry;
use reactor_engine::processor::Processor;
use reactor_telegram::{TelegramClient, UpdatePoller};

/// Pause before retrying after a failed poll round.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reactor_bot=info,reactor_engine=debug".into()),
        )
        .init();

    tracing::info!("Keyword reactor starting...");

    // Load configuration
    let config = AppConfig::from_env()?;
    let actions = config::load_keyword_actions(&config.keyword_actions_file)?;
    let registry = KeywordRegistry::new(actions)?;
    tracing::info!(
        keywords = registry.len(),
        monitor = %config.monitor_channel,
        scope = ?config.cooldown_scope,
        "Configuration loaded"
    );

    let client = Arc::new(TelegramClient::new(&config.telegram_bot_token)?);

    let mut processor = Processor::new(
        client.clone(),
        registry,
        UserFilter::new(config.user_id_floor),
        DedupStore::load(&config.interacted_file),
        config.cooldown_scope,
        config.cooldown,
    );
    processor.preload_stickers().await;

    tracing::info!("Event loop started");
    run(client.as_ref(), &config, &mut processor).await
}

/// Sequential event loop: one poll round at a time, one message at a time.
/// A failed round is logged and retried; no message failure ends the loop.
async fn run(
    client: &TelegramClient,
    config: &AppConfig,
    processor: &mut Processor,
) -> anyhow::Result<()> {
    let mut poller = UpdatePoller::new(client, &config.monitor_channel);

    loop {
        match poller.poll_once().await {
            Ok(texts) => {
                for text in texts {
                    let report = processor.process(&text).await;
                    if !report.outcomes.is_empty() {
                        tracing::info!(outcomes = ?report.outcomes, "Cycle complete");
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Update poll failed, retrying");
                tokio::time::sleep(POLL_RETRY_DELAY).await;
            }
        }
    }
}
