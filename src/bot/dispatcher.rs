//! Message dispatcher setup.
//!
//! Builds the dispatcher with all command handlers and event handlers.

use std::sync::Arc;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::{DefaultKey, UpdateHandler};
use teloxide::prelude::*;

use crate::database::{OffenseRepository, SettingsRepository};
use crate::events;
use crate::moderation::{Membership, ModerationEngine};
use crate::permissions::Permissions;
use crate::plugins;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Dispatcher type shared by the polling and webhook runners.
pub type BotDispatcher = Dispatcher<ThrottledBot, anyhow::Error, DefaultKey>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Per-group forbidden words and templates.
    pub settings: Arc<SettingsRepository>,

    /// Offense ledger, shared with the engine and the sweeper.
    pub offenses: Arc<OffenseRepository>,

    pub engine: ModerationEngine,

    /// Member removal, shared by the engine and `/remove`.
    pub membership: Arc<dyn Membership>,

    /// Permission checker with admin caching.
    pub permissions: Permissions,
}

impl AppState {
    pub fn new(
        bot: &ThrottledBot,
        settings: Arc<SettingsRepository>,
        offenses: Arc<OffenseRepository>,
        engine: ModerationEngine,
        membership: Arc<dyn Membership>,
        owner_ids: Vec<u64>,
    ) -> Self {
        // Permissions needs the inner Bot for API calls
        let permissions = Permissions::with_owners(bot.inner().clone(), owner_ids);

        Self {
            settings,
            offenses,
            engine,
            membership,
            permissions,
        }
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(bot: ThrottledBot, state: AppState) -> BotDispatcher {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    use teloxide::dispatching::UpdateFilterExt;

    // Commands first; anything else in a group goes through moderation
    let message_handler = Update::filter_message()
        .branch(plugins::command_handler())
        .branch(events::message_event_handler());

    // Join/leave/kick notifications
    let member_handler = Update::filter_chat_member().branch(events::event_handler());

    dptree::entry()
        .branch(message_handler)
        .branch(member_handler)
}
