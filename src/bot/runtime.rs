//! Bot runtime - Polling and Webhook runners.

use tracing::info;

use super::dispatcher::{BotDispatcher, ThrottledBot};
use super::webhook::start_webhook;
use crate::config::{BotMode, Config};

/// Run the bot with the configured mode until shutdown.
pub async fn run(config: &Config, bot: ThrottledBot, mut dispatcher: BotDispatcher) -> anyhow::Result<()> {
    match config.bot_mode {
        BotMode::Polling => {
            info!("Starting bot in polling mode...");
            dispatcher.dispatch().await;
        }
        BotMode::Webhook => {
            info!("Starting bot in webhook mode...");
            start_webhook(config, dispatcher, bot).await?;
        }
    }

    Ok(())
}
