//! Configuration module for Aegis bot.
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Words every new group starts with unless `DEFAULT_FORBIDDEN_WORDS` is set.
const DEFAULT_FORBIDDEN_WORDS: &[&str] = &["fuck", "bingwa", "bingwa sokoni"];

/// Bot running mode
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub bot_mode: BotMode,
    pub webhook_url: Option<String>,
    pub webhook_port: u16,
    pub webhook_secret: Option<String>,

    /// Owner user IDs (comma-separated)
    /// These users pass every admin check in every chat.
    pub owner_ids: Vec<u64>,

    // Storage
    pub data_dir: PathBuf,

    // Moderation
    pub sweep_interval: Duration,
    pub removal_timeout: Duration,
    pub default_forbidden_words: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if required environment variables are not set.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let bot_mode = env::var("BOT_MODE")
            .unwrap_or_else(|_| "polling".to_string())
            .to_lowercase();

        let bot_mode = match bot_mode.as_str() {
            "webhook" => BotMode::Webhook,
            _ => BotMode::Polling,
        };

        let webhook_url = env::var("WEBHOOK_URL").ok();

        if bot_mode == BotMode::Webhook && webhook_url.is_none() {
            panic!("WEBHOOK_URL must be set when BOT_MODE is webhook");
        }

        let owner_ids = env::var("OWNER_IDS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| s.trim().parse::<u64>().ok())
            .collect();

        let default_forbidden_words = env::var("DEFAULT_FORBIDDEN_WORDS")
            .ok()
            .map(|raw| parse_word_list(&raw))
            .unwrap_or_else(|| {
                DEFAULT_FORBIDDEN_WORDS
                    .iter()
                    .map(|w| w.to_string())
                    .collect()
            });

        Self {
            bot_token: env::var("BOT_TOKEN").expect("BOT_TOKEN must be set"),
            bot_mode,
            webhook_url,
            webhook_port: env_parse("WEBHOOK_PORT").unwrap_or(8443),
            webhook_secret: env::var("WEBHOOK_SECRET").ok().filter(|s| !s.is_empty()),
            owner_ids,
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            sweep_interval: Duration::from_secs(env_parse("SWEEP_INTERVAL_SECS").unwrap_or(30 * 60)),
            removal_timeout: Duration::from_secs(env_parse("REMOVAL_TIMEOUT_SECS").unwrap_or(15)),
            default_forbidden_words,
        }
    }

    /// Path of the per-group settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("group-settings.json")
    }

    /// Path of the offense ledger file.
    pub fn offenses_path(&self) -> PathBuf {
        self.data_dir.join("user-offenses.json")
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Split a comma-separated word list, lowercasing and dropping blanks.
fn parse_word_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}
