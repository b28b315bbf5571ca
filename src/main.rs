//! Aegis - forbidden-word moderation bot for Telegram groups.
//!
//! Tracks forbidden-word violations per user over a sliding six-hour window
//! and escalates from a silent note to a warning to removal.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - JSON file stores for group settings and offenses
//! - `moderation` - Moderation engine, ports and periodic sweeper
//! - `cache` - Typed caches with Moka
//! - `permissions` - Admin checking with caching
//! - `bot` - Dispatcher, runtime and Telegram adapter (with Throttle)
//! - `plugins` - Admin command handlers
//! - `events` - Membership events and message moderation
//! - `utils` - Utility functions

mod bot;
mod cache;
mod config;
mod database;
mod error;
mod events;
mod moderation;
mod permissions;
mod plugins;
mod utils;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::sync::Arc;

use anyhow::Context;
use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bot::{AppState, TelegramGateway};
use config::Config;
use database::{OffenseRepository, SettingsRepository};
use moderation::{ModerationEngine, Sweeper};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // RUST_LOG overrides the default filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("aegis=info,teloxide=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Aegis bot...");

    let config = Config::from_env();
    info!("Configuration loaded successfully");
    info!("Bot mode: {:?}", config.bot_mode);

    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.data_dir.display()))?;

    let settings = Arc::new(
        SettingsRepository::open(config.settings_path(), config.default_forbidden_words.clone())
            .await,
    );
    let offenses = Arc::new(OffenseRepository::open(config.offenses_path()).await);
    info!("Data loaded from {}", config.data_dir.display());

    // Throttle keeps us inside Telegram's per-chat and global rate limits
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());

    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    if config.owner_ids.is_empty() {
        info!("No owner IDs configured (OWNER_IDS is empty)");
    } else {
        info!("Bot owners: {:?}", config.owner_ids);
    }

    let gateway = Arc::new(TelegramGateway::new(bot.clone()));
    let engine = ModerationEngine::new(
        settings.clone(),
        offenses.clone(),
        gateway.clone(),
        gateway.clone(),
        config.removal_timeout,
    );

    let sweeper = Sweeper::new(offenses.clone(), config.sweep_interval);
    sweeper.start();

    let state = AppState::new(
        &bot,
        settings,
        offenses,
        engine,
        gateway,
        config.owner_ids.clone(),
    );
    let dispatcher = bot::build_dispatcher(bot.clone(), state);

    let result = bot::run(&config, bot, dispatcher).await;

    sweeper.stop().await;
    info!("Aegis stopped");

    result
}
